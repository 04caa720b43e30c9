//! Field mappings shared by the request and response transformers.

use chrono::{NaiveDate, NaiveTime};
use espd_model::types::{
    AmountType, ContractingParty, CriterionType, DocumentReference, EconomicOperatorParty,
    Identifier, Party, RequirementGroupType, RequirementType, ResponseValue,
};
use espd_model::{
    Amount, Answer, ContractingAuthority, Criterion, EconomicOperator, EspdDocument,
    ProcurementProcedure, Requirement, RequirementGroup, ResponseType,
};
use uuid::Uuid;

use super::TransformError;

pub(super) const UBL_VERSION_ID: &str = "2.1";
pub(super) const CUSTOMIZATION_ID: &str = "urn:www.cenbii.eu:transaction:biitrns070:ver3.0";
pub(super) const VERSION_ID: &str = "1";
pub(super) const COPY_INDICATOR: &str = "false";

const SCHEME_AGENCY_ID: &str = "EU-COM-GROW";
const NOTICE_DOCUMENT_TYPE: &str = "TED_CN";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Header values common to both root types.
pub(super) struct Header {
    pub id: Identifier,
    pub issue_date: String,
    pub issue_time: Option<String>,
}

pub(super) fn export_header(document: &EspdDocument) -> Result<Header, TransformError> {
    let id = document
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(TransformError::MissingField("id"))?;
    let issue_date = document
        .issue_date
        .ok_or(TransformError::MissingField("issue_date"))?;

    Ok(Header {
        id: Identifier {
            value: id.trim().to_owned(),
            scheme_agency_id: Some(SCHEME_AGENCY_ID.to_owned()),
        },
        issue_date: issue_date.format(DATE_FORMAT).to_string(),
        issue_time: document
            .issue_time
            .map(|time| time.format(TIME_FORMAT).to_string()),
    })
}

pub(super) fn import_id(id: &Identifier) -> Result<String, TransformError> {
    let value = id.value.trim();
    if value.is_empty() {
        return Err(TransformError::MissingField("id"));
    }
    Ok(value.to_owned())
}

pub(super) fn export_authority(authority: &ContractingAuthority) -> ContractingParty {
    ContractingParty {
        party: Party {
            website_uri: authority.website.clone(),
            identification: None,
            name: authority.name.clone(),
            country_code: authority.country_code.clone(),
            electronic_mail: authority.contact_email.clone(),
        },
    }
}

pub(super) fn import_authority(party: ContractingParty) -> ContractingAuthority {
    let Party {
        website_uri,
        name,
        country_code,
        electronic_mail,
        ..
    } = party.party;
    ContractingAuthority {
        name,
        country_code,
        website: website_uri,
        contact_email: electronic_mail,
    }
}

pub(super) fn export_operator(operator: &EconomicOperator) -> EconomicOperatorParty {
    EconomicOperatorParty {
        sme_indicator: operator.sme.map(|sme| sme.to_string()),
        party: Party {
            website_uri: operator.website.clone(),
            identification: operator.vat_number.clone(),
            name: operator.name.clone(),
            country_code: operator.country_code.clone(),
            electronic_mail: operator.contact_email.clone(),
        },
    }
}

pub(super) fn import_operator(
    party: EconomicOperatorParty,
) -> Result<EconomicOperator, TransformError> {
    let sme = party
        .sme_indicator
        .as_deref()
        .map(|value| parse_bool("economic_operator.sme", value))
        .transpose()?;
    let Party {
        website_uri,
        identification,
        name,
        country_code,
        electronic_mail,
    } = party.party;
    Ok(EconomicOperator {
        name,
        vat_number: identification,
        country_code,
        website: website_uri,
        contact_email: electronic_mail,
        sme,
    })
}

/// The procurement procedure travels as the contract notice reference.
pub(super) fn export_procurement(procurement: &ProcurementProcedure) -> DocumentReference {
    DocumentReference {
        id: Identifier::new(procurement.notice_reference.clone().unwrap_or_default()),
        document_type_code: Some(NOTICE_DOCUMENT_TYPE.to_owned()),
        file_name: procurement.title.clone(),
        description: procurement.description.clone(),
    }
}

pub(super) fn import_procurement(
    references: Vec<DocumentReference>,
) -> Option<ProcurementProcedure> {
    references
        .into_iter()
        .find(|r| r.document_type_code.as_deref() == Some(NOTICE_DOCUMENT_TYPE))
        .map(|r| ProcurementProcedure {
            title: r.file_name,
            description: r.description,
            notice_reference: Some(r.id.value).filter(|id| !id.is_empty()),
        })
}

pub(super) fn export_criteria(criteria: &[Criterion], with_answers: bool) -> Vec<CriterionType> {
    criteria
        .iter()
        .map(|criterion| CriterionType {
            id: criterion.id.to_string(),
            type_code: criterion.type_code.clone(),
            name: criterion.name.clone(),
            description: criterion.description.clone(),
            requirement_groups: export_groups(&criterion.groups, with_answers),
        })
        .collect()
}

fn export_groups(groups: &[RequirementGroup], with_answers: bool) -> Vec<RequirementGroupType> {
    groups
        .iter()
        .map(|group| RequirementGroupType {
            id: group.id.to_string(),
            requirements: group
                .requirements
                .iter()
                .map(|r| export_requirement(r, with_answers))
                .collect(),
            requirement_groups: export_groups(&group.groups, with_answers),
        })
        .collect()
}

fn export_requirement(requirement: &Requirement, with_answers: bool) -> RequirementType {
    RequirementType {
        response_data_type: requirement.response_type.as_str().to_owned(),
        id: requirement.id.to_string(),
        description: requirement.description.clone(),
        response: requirement
            .answer
            .as_ref()
            .filter(|_| with_answers)
            .map(export_answer),
    }
}

fn export_answer(answer: &Answer) -> ResponseValue {
    ResponseValue {
        description: answer.description.clone(),
        date: answer.date.map(|d| d.format(DATE_FORMAT).to_string()),
        quantity: answer.quantity.map(|q| q.to_string()),
        indicator: answer.indicator.map(|i| i.to_string()),
        evidence_uri: answer.evidence_url.clone(),
        amount: answer.amount.as_ref().map(|amount| AmountType {
            value: amount.value.to_string(),
            currency_id: amount.currency.clone(),
        }),
        code: answer.country_code.clone(),
    }
}

pub(super) fn import_criteria(
    criteria: Vec<CriterionType>,
    with_answers: bool,
) -> Result<Vec<Criterion>, TransformError> {
    criteria
        .into_iter()
        .map(|criterion| {
            Ok(Criterion {
                id: parse_uuid("criterion.id", &criterion.id)?,
                type_code: criterion.type_code,
                name: criterion.name,
                description: criterion.description,
                groups: import_groups(criterion.requirement_groups, with_answers)?,
            })
        })
        .collect()
}

fn import_groups(
    groups: Vec<RequirementGroupType>,
    with_answers: bool,
) -> Result<Vec<RequirementGroup>, TransformError> {
    groups
        .into_iter()
        .map(|group| {
            Ok(RequirementGroup {
                id: parse_uuid("requirement_group.id", &group.id)?,
                requirements: group
                    .requirements
                    .into_iter()
                    .map(|r| import_requirement(r, with_answers))
                    .collect::<Result<_, _>>()?,
                groups: import_groups(group.requirement_groups, with_answers)?,
            })
        })
        .collect()
}

fn import_requirement(
    requirement: RequirementType,
    with_answers: bool,
) -> Result<Requirement, TransformError> {
    let response_type = requirement
        .response_data_type
        .trim()
        .parse::<ResponseType>()
        .map_err(|err| {
            TransformError::invalid(
                "requirement.response_data_type",
                requirement.response_data_type.as_str(),
                err,
            )
        })?;
    let answer = match requirement.response {
        Some(response) if with_answers => Some(import_answer(response)?),
        _ => None,
    };
    Ok(Requirement {
        id: parse_uuid("requirement.id", &requirement.id)?,
        description: requirement.description,
        response_type,
        answer,
    })
}

fn import_answer(response: ResponseValue) -> Result<Answer, TransformError> {
    let amount = match response.amount {
        Some(amount) => Some(Amount {
            value: parse_decimal("answer.amount", &amount.value)?,
            currency: amount.currency_id,
        }),
        None => None,
    };
    Ok(Answer {
        indicator: response
            .indicator
            .as_deref()
            .map(|v| parse_bool("answer.indicator", v))
            .transpose()?,
        description: response.description,
        amount,
        quantity: response
            .quantity
            .as_deref()
            .map(|v| parse_decimal("answer.quantity", v))
            .transpose()?,
        date: response
            .date
            .as_deref()
            .map(|v| parse_date("answer.date", v))
            .transpose()?,
        evidence_url: response.evidence_uri,
        country_code: response.code,
    })
}

pub(super) fn parse_uuid(field: &'static str, value: &str) -> Result<Uuid, TransformError> {
    Uuid::parse_str(value.trim()).map_err(|err| TransformError::invalid(field, value, err))
}

/// Parses an `xsd:date`, tolerating a trailing timezone designator.
pub(super) fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, TransformError> {
    let trimmed = value.trim();
    let (date, zone) = match trimmed.get(..10) {
        Some(date) => (date, &trimmed[date.len()..]),
        None => (trimmed, ""),
    };
    if !is_timezone(zone) {
        return Err(TransformError::invalid(field, value, "unexpected trailing characters"));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|err| TransformError::invalid(field, value, err))
}

/// Parses an `xsd:time`, tolerating fractional seconds and a timezone designator.
pub(super) fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, TransformError> {
    let trimmed = value.trim();
    let end = trimmed
        .find(|c: char| c == 'Z' || c == '+' || c == '-')
        .unwrap_or(trimmed.len());
    let (time, zone) = trimmed.split_at(end);
    if !is_timezone(zone) {
        return Err(TransformError::invalid(field, value, "unexpected trailing characters"));
    }
    NaiveTime::parse_from_str(time, TIME_FORMAT)
        .map_err(|err| TransformError::invalid(field, value, err))
}

fn is_timezone(zone: &str) -> bool {
    match zone.as_bytes() {
        [] | [b'Z'] => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Parses an `xsd:boolean`.
pub(super) fn parse_bool(field: &'static str, value: &str) -> Result<bool, TransformError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(TransformError::invalid(field, value, "expected true, false, 1 or 0")),
    }
}

/// Parses an `xsd:decimal` into a finite `f64`.
pub(super) fn parse_decimal(field: &'static str, value: &str) -> Result<f64, TransformError> {
    let number = value
        .trim()
        .parse::<f64>()
        .map_err(|err| TransformError::invalid(field, value, err))?;
    if !number.is_finite() {
        return Err(TransformError::invalid(field, value, "not a finite number"));
    }
    Ok(number)
}
