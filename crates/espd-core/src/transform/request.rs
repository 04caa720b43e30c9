//! Default mapping between [`EspdDocument`] and [`EspdRequestType`].
//!
//! A request carries the buyer's side only: the economic operator and all
//! answers are left out on export and ignored on import.

use espd_model::EspdDocument;
use espd_model::types::EspdRequestType;

use super::common::{
    self, COPY_INDICATOR, CUSTOMIZATION_ID, UBL_VERSION_ID, VERSION_ID, export_header,
};
use super::{ExportTransformer, ImportTransformer, TransformError};

/// Maps a document onto an ESPD Request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestExporter;

impl ExportTransformer<EspdRequestType> for RequestExporter {
    fn transform(&self, document: &EspdDocument) -> Result<EspdRequestType, TransformError> {
        let header = export_header(document)?;
        Ok(EspdRequestType {
            ubl_version_id: Some(UBL_VERSION_ID.to_owned()),
            customization_id: Some(CUSTOMIZATION_ID.to_owned()),
            id: header.id,
            copy_indicator: Some(COPY_INDICATOR.to_owned()),
            version_id: Some(VERSION_ID.to_owned()),
            issue_date: header.issue_date,
            issue_time: header.issue_time,
            contract_folder_id: document.contract_folder_id.clone(),
            contracting_party: document.authority.as_ref().map(common::export_authority),
            procurement_project_lots: document.lots.clone(),
            criteria: common::export_criteria(&document.criteria, false),
            additional_document_references: document
                .procurement
                .iter()
                .map(common::export_procurement)
                .collect(),
        })
    }
}

/// Maps an ESPD Request onto a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestImporter;

impl ImportTransformer<EspdRequestType> for RequestImporter {
    fn transform(&self, value: EspdRequestType) -> Result<EspdDocument, TransformError> {
        Ok(EspdDocument {
            id: Some(common::import_id(&value.id)?),
            issue_date: Some(common::parse_date("issue_date", &value.issue_date)?),
            issue_time: value
                .issue_time
                .as_deref()
                .map(|time| common::parse_time("issue_time", time))
                .transpose()?,
            contract_folder_id: value.contract_folder_id,
            authority: value.contracting_party.map(common::import_authority),
            economic_operator: None,
            procurement: common::import_procurement(value.additional_document_references),
            lots: value.procurement_project_lots,
            criteria: common::import_criteria(value.criteria, false)?,
        })
    }
}
