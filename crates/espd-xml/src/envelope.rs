//! Root-element envelopes.
//!
//! A [`RootElement`] pairs a schema value with the qualified root element the
//! codec must emit for it. The element identity always comes from the
//! [`DocumentKind`] table, never from the payload.

use espd_model::{DocumentKind, EspdRequestType, EspdResponseType, QualifiedName};

/// A schema value wrapped in its document root.
#[derive(Debug, Clone, PartialEq)]
pub enum RootElement {
    /// `espd-req:ESPDRequest`.
    Request(Box<EspdRequestType>),
    /// `espd-resp:ESPDResponse`.
    Response(Box<EspdResponseType>),
}

/// Wraps a request value in the ESPD Request root.
#[must_use]
pub fn wrap_request(value: EspdRequestType) -> RootElement {
    RootElement::Request(Box::new(value))
}

/// Wraps a response value in the ESPD Response root.
#[must_use]
pub fn wrap_response(value: EspdResponseType) -> RootElement {
    RootElement::Response(Box::new(value))
}

impl RootElement {
    /// Returns the document kind of this envelope.
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Request(_) => DocumentKind::Request,
            Self::Response(_) => DocumentKind::Response,
        }
    }

    /// Returns the qualified root element name.
    #[must_use]
    pub fn name(&self) -> QualifiedName {
        self.kind().root_element()
    }

    /// Unwraps a request, handing the envelope back if it holds a response.
    pub fn into_request(self) -> Result<EspdRequestType, Self> {
        match self {
            Self::Request(value) => Ok(*value),
            other @ Self::Response(_) => Err(other),
        }
    }

    /// Unwraps a response, handing the envelope back if it holds a request.
    pub fn into_response(self) -> Result<EspdResponseType, Self> {
        match self {
            Self::Response(value) => Ok(*value),
            other @ Self::Request(_) => Err(other),
        }
    }
}
