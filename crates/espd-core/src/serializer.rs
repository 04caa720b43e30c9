//! The serializer contract used by the marshaller.

use std::io::{Read, Write};

use espd_model::DocumentKind;
use espd_xml::{RootElement, XmlCodec, XmlError};

/// Writes and reads root-element envelopes.
///
/// Implementations must be usable from several threads at once.
pub trait SchemaSerializer: Send + Sync {
    /// Write `envelope` as a complete document to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the sink fails.
    fn write(&self, envelope: &RootElement, sink: &mut dyn Write) -> Result<(), XmlError>;

    /// Read one document from `source`, declaring `expected` as the wanted kind.
    ///
    /// The returned envelope may be of either kind.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the source fails or holds no conformant document.
    fn read(&self, source: &mut dyn Read, expected: DocumentKind) -> Result<RootElement, XmlError>;
}

impl SchemaSerializer for XmlCodec {
    fn write(&self, envelope: &RootElement, sink: &mut dyn Write) -> Result<(), XmlError> {
        XmlCodec::write(self, envelope, sink)
    }

    fn read(&self, source: &mut dyn Read, expected: DocumentKind) -> Result<RootElement, XmlError> {
        XmlCodec::read(self, source, expected)
    }
}
