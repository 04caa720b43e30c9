//! XML codec error types.
//!
//! [`XmlError`] covers everything that can go wrong while writing or reading an
//! ESPD document. [`XmlError::category`] folds the variants into the failure
//! classes callers branch on.

use std::fmt;
use std::io;

use espd_model::QualifiedName;

/// Errors that can occur during ESPD XML serialization or deserialization.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error on the sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Text or names that are not valid UTF-8.
    #[error("invalid text encoding: {0}")]
    Encoding(String),

    /// Input that is not well-formed XML for a reason quick-xml does not report.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The input ended inside an open element.
    #[error("unexpected end of document in {0}")]
    UnexpectedEof(String),

    /// The input contains no element at all.
    #[error("document has no root element")]
    NoRootElement,

    /// The root element is not one of the known ESPD roots.
    #[error("unknown root element {{{namespace}}}{local_name}, expected {expected}")]
    UnknownRootElement {
        /// Namespace the root was found in.
        namespace: String,
        /// Local name of the root.
        local_name: String,
        /// Root the caller asked for.
        expected: QualifiedName,
    },

    /// A required XML element was missing.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// A required XML attribute was missing.
    #[error("missing required XML attribute: {0}")]
    MissingAttribute(String),

    /// An element appeared where only text is allowed.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// The source holds more bytes than the configured limit.
    #[error("document exceeds the maximum size of {limit} bytes")]
    DocumentTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
}

/// Failure class of an [`XmlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlErrorCategory {
    /// The sink or source failed.
    Io,
    /// The input is not well-formed XML.
    Parse,
    /// The input is well-formed but does not conform to the schema.
    SchemaValidation,
    /// The input is over the size limit.
    TooLarge,
}

impl XmlError {
    /// Classifies this error.
    #[must_use]
    pub fn category(&self) -> XmlErrorCategory {
        match self {
            Self::Io(_) | Self::QuickXml(quick_xml::Error::Io(_)) => XmlErrorCategory::Io,
            Self::QuickXml(_)
            | Self::Attribute(_)
            | Self::Encoding(_)
            | Self::Malformed(_)
            | Self::UnexpectedEof(_)
            | Self::NoRootElement => XmlErrorCategory::Parse,
            Self::UnknownRootElement { .. }
            | Self::MissingElement(_)
            | Self::MissingAttribute(_)
            | Self::UnexpectedElement(_) => XmlErrorCategory::SchemaValidation,
            Self::DocumentTooLarge { .. } => XmlErrorCategory::TooLarge,
        }
    }
}

impl fmt::Display for XmlErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Io => "io",
            Self::Parse => "parse",
            Self::SchemaValidation => "schema validation",
            Self::TooLarge => "too large",
        })
    }
}
