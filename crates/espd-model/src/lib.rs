//! Document model and schema types for the ESPD exchange formats.
//!
//! Two layers live here:
//!
//! - [`document`]: the wire-format independent [`EspdDocument`] that the rest of
//!   an application works with.
//! - [`types`]: the value shapes of the ESPD Request and ESPD Response XML
//!   vocabularies. Values are kept lexical (strings); typed parsing belongs to
//!   whoever maps them onto the document model.
//!
//! [`kind`] holds the table that ties each [`DocumentKind`] to its root element.

pub mod document;
pub mod kind;
pub mod types;

pub use document::{
    Amount, Answer, ContractingAuthority, Criterion, EconomicOperator, EspdDocument,
    ProcurementProcedure, Requirement, RequirementGroup, ResponseType, UnknownResponseType,
};
pub use kind::{DocumentKind, QualifiedName, namespaces};
pub use types::{EspdRequestType, EspdResponseType};
