//! ESPD XML serialization/deserialization.
//!
//! This crate is the schema-binding layer for the ESPD exchange formats: it
//! converts between the schema types of `espd-model` and their XML wire form.
//!
//! # Key components
//!
//! - [`RootElement`] with [`wrap_request`] / [`wrap_response`]: the qualified
//!   root envelope of each document kind
//! - [`EspdSerialize`] trait and [`write_xml`] / [`to_xml`] for writing documents
//! - [`EspdDeserialize`] trait and [`from_xml`] for parsing documents
//! - [`XmlCodec`]: stream-oriented write/read with size limits
//! - [`XmlError`] and its [`XmlErrorCategory`]
//!
//! # ESPD XML conventions
//!
//! - Request root: `{urn:grow:names:specification:ubl:schema:xsd:ESPDRequest-1}ESPDRequest`
//! - Response root: `{urn:grow:names:specification:ubl:schema:xsd:ESPDResponse-1}ESPDResponse`
//! - Children use the UBL `cac`/`cbc`, CCV and ESPD component prefixes
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`

pub mod codec;
pub mod deserialize;
pub mod envelope;
pub mod error;
pub mod serialize;

pub use codec::{CodecOptions, DEFAULT_MAX_DOCUMENT_SIZE, XmlCodec};
pub use deserialize::{EspdDeserialize, from_xml};
pub use envelope::{RootElement, wrap_request, wrap_response};
pub use error::{XmlError, XmlErrorCategory};
pub use serialize::{EspdSerialize, to_xml, write_xml};
