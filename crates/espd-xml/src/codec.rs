//! Stream-oriented front door of the XML layer.
//!
//! [`XmlCodec`] writes envelopes to any [`io::Write`] and reads them from any
//! [`io::Read`]. Reads are bounded by [`CodecOptions::max_document_size`]; the
//! whole document is buffered before parsing and the buffer is dropped before
//! the call returns.

use std::io::{Read, Write};

use espd_model::DocumentKind;
use tracing::trace;

use crate::deserialize::from_xml;
use crate::envelope::RootElement;
use crate::error::XmlError;
use crate::serialize::write_xml;

/// Default upper bound for an imported document, in bytes.
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Output and input settings of an [`XmlCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Indentation width in spaces; `0` writes compact XML.
    pub indent: usize,
    /// Whether to emit the XML declaration.
    pub write_declaration: bool,
    /// Largest source accepted by [`XmlCodec::read`], in bytes.
    pub max_document_size: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            indent: 0,
            write_declaration: true,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

/// quick-xml based codec for ESPD Request and Response documents.
///
/// The codec is immutable and can be shared across threads.
///
/// # Examples
///
/// ```
/// use espd_model::DocumentKind;
/// use espd_model::types::{EspdRequestType, Identifier};
/// use espd_xml::{XmlCodec, wrap_request};
///
/// let codec = XmlCodec::default();
/// let request = EspdRequestType {
///     id: Identifier::new("doc-1"),
///     issue_date: "2024-01-31".to_owned(),
///     ..EspdRequestType::default()
/// };
///
/// let mut out = Vec::new();
/// codec.write(&wrap_request(request.clone()), &mut out).unwrap();
///
/// let back = codec.read(out.as_slice(), DocumentKind::Request).unwrap();
/// assert_eq!(back.into_request().unwrap(), request);
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlCodec {
    options: CodecOptions,
}

impl XmlCodec {
    /// Create a codec with the given options.
    #[must_use]
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// Returns the codec options.
    #[must_use]
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Write `envelope` as a complete document to `sink`.
    ///
    /// The sink is not flushed.
    ///
    /// # Errors
    ///
    /// Returns `XmlError::Io` if the sink fails.
    pub fn write<W: Write>(&self, envelope: &RootElement, sink: W) -> Result<(), XmlError> {
        write_xml(sink, envelope, &self.options)
    }

    /// Read one document from `source`.
    ///
    /// The source is read to its end. `expected` names the root the caller
    /// wants and is used to describe unknown roots; the returned envelope may
    /// still be of the other kind.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the source fails, exceeds the size limit, is not
    /// well-formed or does not conform to either schema.
    pub fn read<R: Read>(
        &self,
        source: R,
        expected: DocumentKind,
    ) -> Result<RootElement, XmlError> {
        let limit = self.options.max_document_size;
        let mut buf = Vec::new();
        source
            .take(u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1))
            .read_to_end(&mut buf)?;
        if buf.len() > limit {
            return Err(XmlError::DocumentTooLarge { limit });
        }
        trace!(bytes = buf.len(), expected = %expected, "parsing document");

        let xml = buf.strip_prefix(UTF8_BOM).unwrap_or(&buf);
        from_xml(xml, expected)
    }
}
