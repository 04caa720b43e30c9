//! Mapping between [`EspdDocument`] and the ESPD schema types.
//!
//! The marshaller only depends on the [`ExportTransformer`] and
//! [`ImportTransformer`] contracts. [`request`] and [`response`] hold the
//! default field mappings; closures with the right signature are accepted as
//! transformers too, which keeps test doubles short.

mod common;
pub mod request;
pub mod response;

use espd_model::EspdDocument;

pub use request::{RequestExporter, RequestImporter};
pub use response::{ResponseExporter, ResponseImporter};

/// Converts a document into a wire schema value.
pub trait ExportTransformer<T>: Send + Sync {
    /// Map `document` onto the schema type.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the document lacks data the schema requires.
    fn transform(&self, document: &EspdDocument) -> Result<T, TransformError>;
}

/// Converts a parsed wire schema value into a document.
pub trait ImportTransformer<T>: Send + Sync {
    /// Map `value` onto the document model.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError`] if the value cannot be mapped.
    fn transform(&self, value: T) -> Result<EspdDocument, TransformError>;
}

impl<T, F> ExportTransformer<T> for F
where
    F: Fn(&EspdDocument) -> Result<T, TransformError> + Send + Sync,
{
    fn transform(&self, document: &EspdDocument) -> Result<T, TransformError> {
        self(document)
    }
}

impl<T, F> ImportTransformer<T> for F
where
    F: Fn(T) -> Result<EspdDocument, TransformError> + Send + Sync,
{
    fn transform(&self, value: T) -> Result<EspdDocument, TransformError> {
        self(value)
    }
}

/// Data could not be mapped between the document model and a schema type.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A value the target model requires is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A value is present but cannot be interpreted.
    #[error("invalid value {value:?} for {field}: {reason}")]
    InvalidValue {
        /// Field being mapped.
        field: &'static str,
        /// Offending lexical value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Failure raised by a custom transformer.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransformError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
