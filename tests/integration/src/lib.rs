//! Integration tests for the ESPD exchange layer.
//!
//! These tests drive [`ExchangeMarshaller`] end to end through the default
//! XML codec and transformers. Run them with:
//! ```text
//! cargo test -p espd-integration
//! ```
//!
//! Set `RUST_LOG=espd_core=debug` to see the marshaller's events.

use std::sync::Once;

use chrono::{NaiveDate, NaiveTime};
use espd_core::{ExchangeConfig, ExchangeMarshaller};
use espd_model::{
    Amount, Answer, ContractingAuthority, Criterion, EconomicOperator, EspdDocument,
    ProcurementProcedure, Requirement, RequirementGroup, ResponseType,
};
use uuid::{Uuid, uuid};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a marshaller with the default collaborators.
#[must_use]
pub fn marshaller() -> ExchangeMarshaller {
    marshaller_with(&ExchangeConfig::default())
}

/// Create a marshaller with the default collaborators and `config`.
#[must_use]
pub fn marshaller_with(config: &ExchangeConfig) -> ExchangeMarshaller {
    init_tracing();
    ExchangeMarshaller::new(config)
}

/// Generate a unique document identifier for a test.
#[must_use]
pub fn test_document_id(prefix: &str) -> String {
    let id = Uuid::new_v4().to_string()[..8].to_owned();
    format!("ESPD-{prefix}-{id}")
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A buyer-side document as a contracting authority would publish it.
#[must_use]
pub fn request_document(prefix: &str) -> EspdDocument {
    EspdDocument {
        id: Some(test_document_id(prefix)),
        issue_date: date(2024, 3, 18),
        issue_time: NaiveTime::from_hms_opt(10, 15, 30),
        contract_folder_id: Some("CF/2024/0042".to_owned()),
        authority: Some(ContractingAuthority {
            name: "Ville de Liège & Partenaires <Régie>".to_owned(),
            country_code: Some("BE".to_owned()),
            website: Some("https://www.liege.be/marchés?lang=fr&x=1".to_owned()),
            contact_email: Some("marches@liege.be".to_owned()),
        }),
        economic_operator: None,
        procurement: Some(ProcurementProcedure {
            title: Some("Entretien des voiries \"Lot unique\"".to_owned()),
            description: Some("Travaux d'entretien 2024–2026".to_owned()),
            notice_reference: Some("2024/S 055-162345".to_owned()),
        }),
        lots: vec!["0".to_owned()],
        criteria: vec![
            Criterion {
                id: uuid!("005eab18-2341-4a1b-8d6c-5a1f1ab2c3d4"),
                type_code: "CRITERION.EXCLUSION.CONVICTIONS.PARTICIPATION_IN_CRIMINAL_ORGANISATION"
                    .to_owned(),
                name: "Participation in a criminal organisation".to_owned(),
                description: Some("Has the economic operator been convicted?".to_owned()),
                groups: vec![RequirementGroup {
                    id: uuid!("7c637c0c-7703-4389-ba52-02997a055bd7"),
                    requirements: vec![Requirement {
                        id: uuid!("974c8196-9d1c-419c-9ca9-45bb9f5fd59a"),
                        description: "Your answer?".to_owned(),
                        response_type: ResponseType::Indicator,
                        answer: None,
                    }],
                    groups: vec![RequirementGroup {
                        id: uuid!("ecf40999-7b64-4e10-b960-7f8ff8674cf6"),
                        requirements: vec![
                            Requirement {
                                id: uuid!("ecf40999-7b64-4e10-b960-7f8ff8674cf7"),
                                description: "Date of conviction".to_owned(),
                                response_type: ResponseType::Date,
                                answer: None,
                            },
                            Requirement {
                                id: uuid!("ecf40999-7b64-4e10-b960-7f8ff8674cf8"),
                                description: "Reason".to_owned(),
                                response_type: ResponseType::Description,
                                answer: None,
                            },
                        ],
                        groups: Vec::new(),
                    }],
                }],
            },
            Criterion {
                id: uuid!("499efc97-2ac1-4af2-9e84-323c2ca67747"),
                type_code: "CRITERION.SELECTION.ECONOMIC_FINANCIAL_STANDING.TURNOVER.GENERAL_YEARLY"
                    .to_owned(),
                name: "General yearly turnover".to_owned(),
                description: None,
                groups: vec![RequirementGroup {
                    id: uuid!("96f00020-0a25-402e-b856-fb4c3f2cec4d"),
                    requirements: vec![
                        Requirement {
                            id: uuid!("5aacceb3-280e-42f1-b2da-3d8ac7877fe9"),
                            description: "Turnover".to_owned(),
                            response_type: ResponseType::Amount,
                            answer: None,
                        },
                        Requirement {
                            id: uuid!("5aacceb3-280e-42f1-b2da-3d8ac7877fea"),
                            description: "Number of employees".to_owned(),
                            response_type: ResponseType::Quantity,
                            answer: None,
                        },
                    ],
                    groups: Vec::new(),
                }],
            },
        ],
    }
}

/// The operator's answer to [`request_document`].
#[must_use]
pub fn response_document(prefix: &str) -> EspdDocument {
    let mut document = request_document(prefix);
    document.economic_operator = Some(EconomicOperator {
        name: "Travaux Publics Meuse SA".to_owned(),
        vat_number: Some("BE0999888777".to_owned()),
        country_code: Some("BE".to_owned()),
        website: None,
        contact_email: Some("offres@tpmeuse.example".to_owned()),
        sme: Some(true),
    });

    let exclusion = &mut document.criteria[0].groups[0];
    exclusion.requirements[0].answer = Some(Answer {
        indicator: Some(false),
        ..Answer::default()
    });
    exclusion.groups[0].requirements[0].answer = Some(Answer {
        date: date(2019, 11, 4),
        ..Answer::default()
    });
    exclusion.groups[0].requirements[1].answer = Some(Answer {
        description: Some("Spent conviction; see <annex> & register".to_owned()),
        evidence_url: Some("https://e-certis.example/doc?id=12&lang=fr".to_owned()),
        ..Answer::default()
    });

    let turnover = &mut document.criteria[1].groups[0];
    turnover.requirements[0].answer = Some(Answer {
        amount: Some(Amount {
            value: 4_350_000.25,
            currency: "EUR".to_owned(),
        }),
        ..Answer::default()
    });
    turnover.requirements[1].answer = Some(Answer {
        quantity: Some(87.0),
        ..Answer::default()
    });

    document
}

mod test_concurrency;
mod test_failure;
mod test_kind;
mod test_round_trip;
