//! The wire-format independent ESPD document.
//!
//! An [`EspdDocument`] is what the application reads and edits. Importing an
//! ESPD Request and importing an ESPD Response both yield this type; a Request
//! simply leaves the economic operator and all answers empty.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// In-memory representation of a procurement eligibility exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspdDocument {
    /// Document identifier.
    pub id: Option<String>,
    /// Date the document was issued.
    pub issue_date: Option<NaiveDate>,
    /// Time of day the document was issued.
    pub issue_time: Option<NaiveTime>,
    /// Reference number of the procurement file.
    pub contract_folder_id: Option<String>,
    /// The buyer running the procedure.
    pub authority: Option<ContractingAuthority>,
    /// The candidate answering; only present on responses.
    pub economic_operator: Option<EconomicOperator>,
    /// Procedure identification.
    pub procurement: Option<ProcurementProcedure>,
    /// Lot identifiers the document applies to.
    pub lots: Vec<String>,
    /// Exclusion and selection criteria.
    pub criteria: Vec<Criterion>,
}

impl EspdDocument {
    /// Returns `true` if any requirement carries an answer.
    #[must_use]
    pub fn has_answers(&self) -> bool {
        self.criteria
            .iter()
            .flat_map(|c| &c.groups)
            .any(RequirementGroup::has_answers)
    }
}

/// Contracting authority details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractingAuthority {
    /// Official name.
    pub name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Contact e-mail.
    pub contact_email: Option<String>,
}

/// Economic operator details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicOperator {
    /// Registered name.
    pub name: String,
    /// VAT number.
    pub vat_number: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Contact e-mail.
    pub contact_email: Option<String>,
    /// Whether the operator is a micro, small or medium-sized enterprise.
    pub sme: Option<bool>,
}

/// Identification of the procurement procedure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementProcedure {
    /// Procedure title.
    pub title: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Official Journal notice number.
    pub notice_reference: Option<String>,
}

/// An exclusion or selection criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    /// Criterion identifier from the ESPD criteria taxonomy.
    pub id: Uuid,
    /// Taxonomy type code, e.g. `CRITERION.EXCLUSION.CONVICTIONS.FRAUD`.
    pub type_code: String,
    /// Short name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Requirement groups.
    pub groups: Vec<RequirementGroup>,
}

/// A group of requirements, possibly nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroup {
    /// Group identifier.
    pub id: Uuid,
    /// Requirements directly in this group.
    pub requirements: Vec<Requirement>,
    /// Nested groups.
    pub groups: Vec<RequirementGroup>,
}

impl RequirementGroup {
    fn has_answers(&self) -> bool {
        self.requirements.iter().any(|r| r.answer.is_some())
            || self.groups.iter().any(Self::has_answers)
    }
}

/// A single question inside a criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Requirement identifier.
    pub id: Uuid,
    /// The question text.
    pub description: String,
    /// Kind of answer expected.
    pub response_type: ResponseType,
    /// The answer, if given.
    pub answer: Option<Answer>,
}

/// An answer to a requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Yes/no answer.
    pub indicator: Option<bool>,
    /// Free text answer.
    pub description: Option<String>,
    /// Monetary answer.
    pub amount: Option<Amount>,
    /// Numeric answer.
    pub quantity: Option<f64>,
    /// Date answer.
    pub date: Option<NaiveDate>,
    /// Link to supporting evidence.
    pub evidence_url: Option<String>,
    /// Country answer.
    pub country_code: Option<String>,
}

/// A monetary amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    /// Decimal value.
    pub value: f64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// The kind of answer a requirement expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    /// Yes/no.
    #[default]
    Indicator,
    /// Free text.
    Description,
    /// Amount with currency.
    Amount,
    /// Number.
    Quantity,
    /// Calendar date.
    Date,
    /// URL of evidence.
    EvidenceUrl,
    /// Country code.
    CountryCode,
}

impl ResponseType {
    /// Returns the ESPD `responseDataType` code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indicator => "INDICATOR",
            Self::Description => "DESCRIPTION",
            Self::Amount => "AMOUNT",
            Self::Quantity => "QUANTITY",
            Self::Date => "DATE",
            Self::EvidenceUrl => "EVIDENCE_URL",
            Self::CountryCode => "CODE_COUNTRY",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `responseDataType` code that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response data type: {0}")]
pub struct UnknownResponseType(pub String);

impl FromStr for ResponseType {
    type Err = UnknownResponseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INDICATOR" => Ok(Self::Indicator),
            "DESCRIPTION" => Ok(Self::Description),
            "AMOUNT" => Ok(Self::Amount),
            "QUANTITY" => Ok(Self::Quantity),
            "DATE" => Ok(Self::Date),
            "EVIDENCE_URL" => Ok(Self::EvidenceUrl),
            "CODE_COUNTRY" => Ok(Self::CountryCode),
            other => Err(UnknownResponseType(other.to_owned())),
        }
    }
}
