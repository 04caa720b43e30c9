//! The ESPD exchange marshaller.
//!
//! [`ExchangeMarshaller`] is the single entry point for writing and reading
//! ESPD Request and ESPD Response documents. Every operation is a fixed
//! pipeline:
//!
//! - export: transformer, root-element wrapping, serializer, flush
//! - import: serializer, kind check, transformer
//!
//! Both sink kinds share one byte path: the text-buffer variants serialize
//! into an owned byte buffer and append its UTF-8 text afterwards.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use espd_model::types::{EspdRequestType, EspdResponseType};
use espd_model::{DocumentKind, EspdDocument};
use espd_xml::{RootElement, XmlCodec, wrap_request, wrap_response};
use tracing::{debug, warn};

use crate::config::ExchangeConfig;
use crate::error::{ExchangeError, ExchangeResult, Operation};
use crate::serializer::SchemaSerializer;
use crate::transform::{
    ExportTransformer, ImportTransformer, RequestExporter, RequestImporter, ResponseExporter,
    ResponseImporter, TransformError,
};

/// Converts [`EspdDocument`]s to and from ESPD XML.
///
/// The marshaller holds only shared, immutable collaborators. It is
/// `Send + Sync`, cheap to clone and keeps no state between calls.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use espd_core::ExchangeMarshaller;
/// use espd_model::EspdDocument;
///
/// let marshaller = ExchangeMarshaller::default();
/// let document = EspdDocument {
///     id: Some("ESPD-1".to_owned()),
///     issue_date: NaiveDate::from_ymd_opt(2024, 1, 31),
///     ..EspdDocument::default()
/// };
///
/// let mut xml = Vec::new();
/// marshaller.export_request(&document, &mut xml).unwrap();
///
/// let imported = marshaller.import_request(xml.as_slice()).unwrap();
/// assert_eq!(imported, document);
/// ```
#[derive(Clone)]
pub struct ExchangeMarshaller {
    serializer: Arc<dyn SchemaSerializer>,
    request_exporter: Arc<dyn ExportTransformer<EspdRequestType>>,
    request_importer: Arc<dyn ImportTransformer<EspdRequestType>>,
    response_exporter: Arc<dyn ExportTransformer<EspdResponseType>>,
    response_importer: Arc<dyn ImportTransformer<EspdResponseType>>,
}

impl fmt::Debug for ExchangeMarshaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExchangeMarshaller { .. }")
    }
}

impl Default for ExchangeMarshaller {
    fn default() -> Self {
        Self::new(&ExchangeConfig::default())
    }
}

impl ExchangeMarshaller {
    /// Create a marshaller with the default XML codec and transformers.
    #[must_use]
    pub fn new(config: &ExchangeConfig) -> Self {
        Self::from_parts(
            Arc::new(XmlCodec::new(config.codec_options())),
            Arc::new(RequestExporter),
            Arc::new(RequestImporter),
            Arc::new(ResponseExporter),
            Arc::new(ResponseImporter),
        )
    }

    /// Create a default marshaller configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(&ExchangeConfig::from_env())
    }

    /// Create a marshaller from explicit collaborators.
    #[must_use]
    pub fn from_parts(
        serializer: Arc<dyn SchemaSerializer>,
        request_exporter: Arc<dyn ExportTransformer<EspdRequestType>>,
        request_importer: Arc<dyn ImportTransformer<EspdRequestType>>,
        response_exporter: Arc<dyn ExportTransformer<EspdResponseType>>,
        response_importer: Arc<dyn ImportTransformer<EspdResponseType>>,
    ) -> Self {
        Self {
            serializer,
            request_exporter,
            request_importer,
            response_exporter,
            response_importer,
        }
    }

    /// Replace the serializer.
    #[must_use]
    pub fn with_serializer(mut self, serializer: Arc<dyn SchemaSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Replace the request export transformer.
    #[must_use]
    pub fn with_request_exporter(
        mut self,
        exporter: Arc<dyn ExportTransformer<EspdRequestType>>,
    ) -> Self {
        self.request_exporter = exporter;
        self
    }

    /// Replace the request import transformer.
    #[must_use]
    pub fn with_request_importer(
        mut self,
        importer: Arc<dyn ImportTransformer<EspdRequestType>>,
    ) -> Self {
        self.request_importer = importer;
        self
    }

    /// Replace the response export transformer.
    #[must_use]
    pub fn with_response_exporter(
        mut self,
        exporter: Arc<dyn ExportTransformer<EspdResponseType>>,
    ) -> Self {
        self.response_exporter = exporter;
        self
    }

    /// Replace the response import transformer.
    #[must_use]
    pub fn with_response_importer(
        mut self,
        importer: Arc<dyn ImportTransformer<EspdResponseType>>,
    ) -> Self {
        self.response_importer = importer;
        self
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// Write `document` as an ESPD Request to `sink` and flush it.
    ///
    /// # Errors
    ///
    /// See [`ExchangeMarshaller::export`].
    pub fn export_request<W: Write>(&self, document: &EspdDocument, sink: W) -> ExchangeResult<()> {
        self.export(DocumentKind::Request, document, sink)
    }

    /// Append `document` as ESPD Request XML text to `buffer`.
    ///
    /// # Errors
    ///
    /// See [`ExchangeMarshaller::export_to_buffer`].
    pub fn export_request_to_buffer<B>(
        &self,
        document: &EspdDocument,
        buffer: &mut B,
    ) -> ExchangeResult<()>
    where
        B: fmt::Write + ?Sized,
    {
        self.export_to_buffer(DocumentKind::Request, document, buffer)
    }

    /// Write `document` as an ESPD Response to `sink` and flush it.
    ///
    /// # Errors
    ///
    /// See [`ExchangeMarshaller::export`].
    pub fn export_response<W: Write>(
        &self,
        document: &EspdDocument,
        sink: W,
    ) -> ExchangeResult<()> {
        self.export(DocumentKind::Response, document, sink)
    }

    /// Append `document` as ESPD Response XML text to `buffer`.
    ///
    /// # Errors
    ///
    /// See [`ExchangeMarshaller::export_to_buffer`].
    pub fn export_response_to_buffer<B>(
        &self,
        document: &EspdDocument,
        buffer: &mut B,
    ) -> ExchangeResult<()>
    where
        B: fmt::Write + ?Sized,
    {
        self.export_to_buffer(DocumentKind::Response, document, buffer)
    }

    /// Write `document` as a `kind` document to `sink` and flush it.
    ///
    /// On failure the sink may hold a partial document.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Transform`] if the document cannot be mapped
    /// - [`ExchangeError::Io`] if writing or flushing the sink fails
    pub fn export<W: Write>(
        &self,
        kind: DocumentKind,
        document: &EspdDocument,
        mut sink: W,
    ) -> ExchangeResult<()> {
        let operation = Operation::export(kind);
        self.write_document(operation, document, &mut sink)?;
        sink.flush()
            .map_err(|err| ExchangeError::io(operation, err))?;

        debug!(kind = %kind, operation = %operation, "export completed");
        Ok(())
    }

    /// Append `document` as `kind` XML text to `buffer`.
    ///
    /// The text is byte-identical to what [`ExchangeMarshaller::export`]
    /// writes. Nothing is appended if the export fails before the buffer is
    /// reached.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Transform`] if the document cannot be mapped
    /// - [`ExchangeError::Io`] if the buffer rejects the text
    pub fn export_to_buffer<B>(
        &self,
        kind: DocumentKind,
        document: &EspdDocument,
        buffer: &mut B,
    ) -> ExchangeResult<()>
    where
        B: fmt::Write + ?Sized,
    {
        let operation = Operation::export(kind);
        let mut bytes = Vec::new();
        self.write_document(operation, document, &mut bytes)?;

        let text = String::from_utf8(bytes).map_err(|err| {
            ExchangeError::io(operation, io::Error::new(io::ErrorKind::InvalidData, err))
        })?;
        buffer
            .write_str(&text)
            .map_err(|err| ExchangeError::io(operation, io::Error::other(err)))?;

        debug!(kind = %kind, operation = %operation, bytes = text.len(), "export completed");
        Ok(())
    }

    fn write_document(
        &self,
        operation: Operation,
        document: &EspdDocument,
        sink: &mut dyn Write,
    ) -> ExchangeResult<()> {
        let envelope = self
            .envelope(operation.kind(), document)
            .map_err(|err| ExchangeError::transform(operation, err))?;
        self.serializer
            .write(&envelope, sink)
            .map_err(|err| ExchangeError::xml(operation, err))
    }

    fn envelope(
        &self,
        kind: DocumentKind,
        document: &EspdDocument,
    ) -> Result<RootElement, TransformError> {
        match kind {
            DocumentKind::Request => {
                let value = self.request_exporter.transform(document)?;
                Ok(wrap_request(value))
            }
            DocumentKind::Response => {
                let value = self.response_exporter.transform(document)?;
                Ok(wrap_response(value))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Import
    // ---------------------------------------------------------------------

    /// Read an ESPD Request from `source`.
    ///
    /// # Errors
    ///
    /// See [`ExchangeMarshaller::import`].
    pub fn import_request<R: Read>(&self, source: R) -> ExchangeResult<EspdDocument> {
        self.import(DocumentKind::Request, source)
    }

    /// Read an ESPD Response from `source`.
    ///
    /// # Errors
    ///
    /// See [`ExchangeMarshaller::import`].
    pub fn import_response<R: Read>(&self, source: R) -> ExchangeResult<EspdDocument> {
        self.import(DocumentKind::Response, source)
    }

    /// Read a `kind` document from `source`.
    ///
    /// The source is read to its end but not closed.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Parse`] if the input is not well-formed XML
    /// - [`ExchangeError::SchemaValidation`] if it conforms to neither schema
    /// - [`ExchangeError::SchemaMismatch`] if it is a document of the other kind
    /// - [`ExchangeError::Transform`] if the parsed value cannot be mapped
    /// - [`ExchangeError::Io`] if reading the source fails
    /// - [`ExchangeError::DocumentTooLarge`] if the source exceeds the size limit
    pub fn import<R: Read>(
        &self,
        kind: DocumentKind,
        mut source: R,
    ) -> ExchangeResult<EspdDocument> {
        let operation = Operation::import(kind);
        let envelope = self
            .serializer
            .read(&mut source, kind)
            .map_err(|err| ExchangeError::xml(operation, err))?;

        let document = match (kind, envelope) {
            (DocumentKind::Request, RootElement::Request(request)) => {
                self.request_importer.transform(*request)
            }
            (DocumentKind::Response, RootElement::Response(response)) => {
                self.response_importer.transform(*response)
            }
            (expected, other) => {
                let found = other.kind();
                warn!(
                    operation = %operation,
                    expected = %expected,
                    found = %found,
                    "document kind mismatch"
                );
                return Err(ExchangeError::SchemaMismatch {
                    operation,
                    expected,
                    found,
                });
            }
        }
        .map_err(|err| ExchangeError::transform(operation, err))?;

        debug!(kind = %kind, operation = %operation, "import completed");
        Ok(document)
    }
}
