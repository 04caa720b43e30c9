//! ESPD Request and ESPD Response schema types.
//!
//! These mirror the element structure of the ESPD v1 exchange schemas for the
//! parts of the vocabulary this workspace maps. Leaf values are kept in their
//! lexical form.

#![allow(missing_docs)]

/// ESPD Request root content (`espd-req:ESPDRequest`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EspdRequestType {
    pub ubl_version_id: Option<String>,
    pub customization_id: Option<String>,
    pub id: Identifier,
    pub copy_indicator: Option<String>,
    pub version_id: Option<String>,
    pub issue_date: String,
    pub issue_time: Option<String>,
    pub contract_folder_id: Option<String>,
    pub contracting_party: Option<ContractingParty>,
    pub procurement_project_lots: Vec<String>,
    pub criteria: Vec<CriterionType>,
    pub additional_document_references: Vec<DocumentReference>,
}

/// ESPD Response root content (`espd-resp:ESPDResponse`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EspdResponseType {
    pub ubl_version_id: Option<String>,
    pub customization_id: Option<String>,
    pub id: Identifier,
    pub copy_indicator: Option<String>,
    pub version_id: Option<String>,
    pub issue_date: String,
    pub issue_time: Option<String>,
    pub contract_folder_id: Option<String>,
    pub contracting_party: Option<ContractingParty>,
    pub economic_operator_party: Option<EconomicOperatorParty>,
    pub procurement_project_lots: Vec<String>,
    pub criteria: Vec<CriterionType>,
    pub additional_document_references: Vec<DocumentReference>,
}

/// `cbc:ID` with its optional `schemeAgencyID` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
    pub scheme_agency_id: Option<String>,
}

impl Identifier {
    /// Creates an identifier without a scheme agency.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scheme_agency_id: None,
        }
    }
}

/// `cac:ContractingParty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractingParty {
    pub party: Party,
}

/// `espd-cac:EconomicOperatorParty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EconomicOperatorParty {
    pub sme_indicator: Option<String>,
    pub party: Party,
}

/// `cac:Party`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    /// `cbc:WebsiteURI`.
    pub website_uri: Option<String>,
    /// `cac:PartyIdentification/cbc:ID`.
    pub identification: Option<String>,
    /// `cac:PartyName/cbc:Name`.
    pub name: String,
    /// `cac:PostalAddress/cac:Country/cbc:IdentificationCode`.
    pub country_code: Option<String>,
    /// `cac:Contact/cbc:ElectronicMail`.
    pub electronic_mail: Option<String>,
}

/// `cac:AdditionalDocumentReference`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentReference {
    pub id: Identifier,
    pub document_type_code: Option<String>,
    /// `cac:Attachment/cac:ExternalReference/cbc:FileName`.
    pub file_name: Option<String>,
    /// `cac:Attachment/cac:ExternalReference/cbc:Description`.
    pub description: Option<String>,
}

/// `ccv:Criterion`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriterionType {
    pub id: String,
    pub type_code: String,
    pub name: String,
    pub description: Option<String>,
    pub requirement_groups: Vec<RequirementGroupType>,
}

/// `ccv:RequirementGroup`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementGroupType {
    pub id: String,
    pub requirements: Vec<RequirementType>,
    pub requirement_groups: Vec<RequirementGroupType>,
}

/// `ccv:Requirement`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementType {
    /// `responseDataType` attribute.
    pub response_data_type: String,
    pub id: String,
    pub description: String,
    pub response: Option<ResponseValue>,
}

/// `ccv:Response`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseValue {
    pub description: Option<String>,
    pub date: Option<String>,
    pub quantity: Option<String>,
    pub indicator: Option<String>,
    /// `cac:EvidenceDocumentReference/cac:Attachment/cac:ExternalReference/cbc:URI`.
    pub evidence_uri: Option<String>,
    pub amount: Option<AmountType>,
    /// `ccv-cbc:Code`.
    pub code: Option<String>,
}

/// `ccv-cbc:Amount` with its `currencyID` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountType {
    pub value: String,
    pub currency_id: String,
}
