//! ESPD exchange marshalling.
//!
//! This crate turns in-memory [`EspdDocument`](espd_model::EspdDocument)s into
//! ESPD Request and ESPD Response XML and back. It composes three
//! collaborators, each behind a trait so callers can swap them:
//!
//! - [`SchemaSerializer`]: writes and reads root-element envelopes
//!   (default: [`espd_xml::XmlCodec`])
//! - [`ExportTransformer`]: maps a document onto a schema type
//! - [`ImportTransformer`]: maps a schema type onto a document
//!
//! [`ExchangeMarshaller`] wires them together and reports every failure as
//! an [`ExchangeError`].

pub mod config;
pub mod error;
pub mod marshaller;
pub mod serializer;
pub mod transform;

pub use config::ExchangeConfig;
pub use error::{ExchangeError, ExchangeErrorKind, ExchangeResult, Operation};
pub use marshaller::ExchangeMarshaller;
pub use serializer::SchemaSerializer;
pub use transform::{
    ExportTransformer, ImportTransformer, RequestExporter, RequestImporter, ResponseExporter,
    ResponseImporter, TransformError,
};
