//! Exchange configuration.
//!
//! Provides [`ExchangeConfig`] for tuning how documents are written and how
//! much input an import accepts. Values are loaded from environment variables.

use espd_xml::{CodecOptions, DEFAULT_MAX_DOCUMENT_SIZE};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Exchange layer configuration.
///
/// # Examples
///
/// ```
/// use espd_core::config::ExchangeConfig;
///
/// let config = ExchangeConfig::default();
/// assert_eq!(config.xml_indent, 0);
/// assert!(config.xml_declaration);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeConfig {
    /// Indentation width of exported XML; `0` writes compact output.
    #[builder(default = 0)]
    pub xml_indent: usize,

    /// Whether exported XML starts with an XML declaration.
    #[builder(default = true)]
    pub xml_declaration: bool,

    /// Largest document accepted on import, in bytes.
    #[builder(default = DEFAULT_MAX_DOCUMENT_SIZE)]
    pub max_document_size: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            xml_indent: 0,
            xml_declaration: true,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

impl ExchangeConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `ESPD_XML_INDENT` | `0` |
    /// | `ESPD_XML_DECLARATION` | `true` |
    /// | `ESPD_MAX_DOCUMENT_SIZE` | `10485760` |
    ///
    /// Unparsable numbers keep their default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("ESPD_XML_INDENT") {
            if let Ok(n) = v.parse::<usize>() {
                config.xml_indent = n;
            }
        }
        if let Ok(v) = std::env::var("ESPD_XML_DECLARATION") {
            config.xml_declaration = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("ESPD_MAX_DOCUMENT_SIZE") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_document_size = n;
            }
        }

        config
    }

    /// Codec settings derived from this configuration.
    #[must_use]
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            indent: self.xml_indent,
            write_declaration: self.xml_declaration,
            max_document_size: self.max_document_size,
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
