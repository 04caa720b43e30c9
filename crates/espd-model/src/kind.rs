//! Document kinds and their root element identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace URIs used by the ESPD exchange vocabularies.
pub mod namespaces {
    /// ESPD Request root namespace.
    pub const ESPD_REQUEST: &str = "urn:grow:names:specification:ubl:schema:xsd:ESPDRequest-1";
    /// ESPD Response root namespace.
    pub const ESPD_RESPONSE: &str = "urn:grow:names:specification:ubl:schema:xsd:ESPDResponse-1";
    /// UBL 2.1 common aggregate components.
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    /// UBL 2.1 common basic components.
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
    /// Core criterion vocabulary aggregate components.
    pub const CCV: &str =
        "urn:isa:names:specification:ubl:schema:xsd:CCV-CommonAggregateComponents-1";
    /// Core criterion vocabulary basic components.
    pub const CCV_CBC: &str =
        "urn:isa:names:specification:ubl:schema:xsd:CCV-CommonBasicComponents-1";
    /// ESPD aggregate components.
    pub const ESPD_CAC: &str =
        "urn:grow:names:specification:ubl:schema:xsd:ESPD-CommonAggregateComponents-1";
    /// ESPD basic components.
    pub const ESPD_CBC: &str =
        "urn:grow:names:specification:ubl:schema:xsd:ESPD-CommonBasicComponents-1";

    /// Prefix declarations emitted on every root element, in output order.
    pub const CHILD_PREFIXES: &[(&str, &str)] = &[
        ("cac", CAC),
        ("cbc", CBC),
        ("ccv", CCV),
        ("ccv-cbc", CCV_CBC),
        ("espd-cac", ESPD_CAC),
        ("espd-cbc", ESPD_CBC),
    ];
}

/// One of the two exchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// ESPD Request, issued by a contracting authority.
    Request,
    /// ESPD Response, returned by an economic operator.
    Response,
}

impl DocumentKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 2] = [Self::Request, Self::Response];

    /// Returns the qualified root element name of this kind.
    #[must_use]
    pub fn root_element(self) -> QualifiedName {
        match self {
            Self::Request => QualifiedName::new(namespaces::ESPD_REQUEST, "ESPDRequest"),
            Self::Response => QualifiedName::new(namespaces::ESPD_RESPONSE, "ESPDResponse"),
        }
    }

    /// Returns the prefix bound to the root namespace on export.
    #[must_use]
    pub fn root_prefix(self) -> &'static str {
        match self {
            Self::Request => "espd-req",
            Self::Response => "espd-resp",
        }
    }

    /// Looks up the kind whose root element has the given identity.
    #[must_use]
    pub fn from_root_element(namespace: &str, local_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            let root = kind.root_element();
            root.namespace == namespace && root.local_name == local_name
        })
    }

    /// Returns the lowercase name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A namespace-qualified XML element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Namespace URI.
    pub namespace: &'static str,
    /// Local part of the name.
    pub local_name: &'static str,
}

impl QualifiedName {
    /// Creates a qualified name.
    #[must_use]
    pub const fn new(namespace: &'static str, local_name: &'static str) -> Self {
        Self {
            namespace,
            local_name,
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_name)
    }
}
