//! Error types for the exchange layer.

use std::fmt;
use std::io;

use espd_model::DocumentKind;
use espd_xml::{XmlError, XmlErrorCategory};

use crate::transform::TransformError;

/// One of the public exchange operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Writing an ESPD Request.
    ExportRequest,
    /// Writing an ESPD Response.
    ExportResponse,
    /// Reading an ESPD Request.
    ImportRequest,
    /// Reading an ESPD Response.
    ImportResponse,
}

impl Operation {
    /// The export operation for `kind`.
    #[must_use]
    pub fn export(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Request => Self::ExportRequest,
            DocumentKind::Response => Self::ExportResponse,
        }
    }

    /// The import operation for `kind`.
    #[must_use]
    pub fn import(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Request => Self::ImportRequest,
            DocumentKind::Response => Self::ImportResponse,
        }
    }

    /// The document kind this operation handles.
    #[must_use]
    pub fn kind(self) -> DocumentKind {
        match self {
            Self::ExportRequest | Self::ImportRequest => DocumentKind::Request,
            Self::ExportResponse | Self::ImportResponse => DocumentKind::Response,
        }
    }

    /// Returns `true` for the export operations.
    #[must_use]
    pub fn is_export(self) -> bool {
        matches!(self, Self::ExportRequest | Self::ExportResponse)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.is_export() { "export" } else { "import" };
        write!(f, "{direction} of ESPD {}", self.kind())
    }
}

/// Failure of an exchange operation.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The transformer could not map the document or the schema value.
    #[error("{operation} failed: cannot map document: {source}")]
    Transform {
        /// Failed operation.
        operation: Operation,
        /// Transformer failure.
        source: TransformError,
    },

    /// The input is not well-formed XML.
    #[error("{operation} failed: input is not well-formed XML: {source}")]
    Parse {
        /// Failed operation.
        operation: Operation,
        /// Parser failure.
        source: XmlError,
    },

    /// The input is well-formed but does not conform to the schema.
    #[error("{operation} failed: document does not conform to the schema: {source}")]
    SchemaValidation {
        /// Failed operation.
        operation: Operation,
        /// Validation failure.
        source: XmlError,
    },

    /// The input is a document of the other kind.
    #[error("{operation} failed: expected an ESPD {expected} but found an ESPD {found}")]
    SchemaMismatch {
        /// Failed operation.
        operation: Operation,
        /// Kind the caller asked for.
        expected: DocumentKind,
        /// Kind found in the input.
        found: DocumentKind,
    },

    /// The sink or source failed.
    #[error("{operation} failed: I/O error: {source}")]
    Io {
        /// Failed operation.
        operation: Operation,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The source exceeds the configured size limit.
    #[error("{operation} failed: {source}")]
    DocumentTooLarge {
        /// Failed operation.
        operation: Operation,
        /// Size limit failure.
        source: XmlError,
    },
}

/// Flat classification of an [`ExchangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeErrorKind {
    /// See [`ExchangeError::Transform`].
    Transform,
    /// See [`ExchangeError::Parse`].
    Parse,
    /// See [`ExchangeError::SchemaValidation`].
    SchemaValidation,
    /// See [`ExchangeError::SchemaMismatch`].
    SchemaMismatch,
    /// See [`ExchangeError::Io`].
    Io,
    /// See [`ExchangeError::DocumentTooLarge`].
    DocumentTooLarge,
}

impl ExchangeError {
    /// Returns the error classification.
    #[must_use]
    pub fn kind(&self) -> ExchangeErrorKind {
        match self {
            Self::Transform { .. } => ExchangeErrorKind::Transform,
            Self::Parse { .. } => ExchangeErrorKind::Parse,
            Self::SchemaValidation { .. } => ExchangeErrorKind::SchemaValidation,
            Self::SchemaMismatch { .. } => ExchangeErrorKind::SchemaMismatch,
            Self::Io { .. } => ExchangeErrorKind::Io,
            Self::DocumentTooLarge { .. } => ExchangeErrorKind::DocumentTooLarge,
        }
    }

    /// Returns the operation that failed.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Transform { operation, .. }
            | Self::Parse { operation, .. }
            | Self::SchemaValidation { operation, .. }
            | Self::SchemaMismatch { operation, .. }
            | Self::Io { operation, .. }
            | Self::DocumentTooLarge { operation, .. } => *operation,
        }
    }

    pub(crate) fn transform(operation: Operation, source: TransformError) -> Self {
        Self::Transform { operation, source }
    }

    pub(crate) fn io(operation: Operation, source: io::Error) -> Self {
        Self::Io { operation, source }
    }

    /// Classify a serializer failure.
    pub(crate) fn xml(operation: Operation, source: XmlError) -> Self {
        match source.category() {
            XmlErrorCategory::Io => {
                let source = match source {
                    XmlError::Io(err) => err,
                    other => io::Error::other(other),
                };
                Self::Io { operation, source }
            }
            XmlErrorCategory::Parse => Self::Parse { operation, source },
            XmlErrorCategory::SchemaValidation => Self::SchemaValidation { operation, source },
            XmlErrorCategory::TooLarge => Self::DocumentTooLarge { operation, source },
        }
    }
}

/// Convenience result type for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;
