//! Default mapping between [`EspdDocument`] and [`EspdResponseType`].

use espd_model::EspdDocument;
use espd_model::types::EspdResponseType;

use super::common::{
    self, COPY_INDICATOR, CUSTOMIZATION_ID, UBL_VERSION_ID, VERSION_ID, export_header,
};
use super::{ExportTransformer, ImportTransformer, TransformError};

/// Maps a document onto an ESPD Response.
///
/// A response is written by an economic operator, so
/// [`EspdDocument::economic_operator`] is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseExporter;

impl ExportTransformer<EspdResponseType> for ResponseExporter {
    fn transform(&self, document: &EspdDocument) -> Result<EspdResponseType, TransformError> {
        let header = export_header(document)?;
        let operator = document
            .economic_operator
            .as_ref()
            .ok_or(TransformError::MissingField("economic_operator"))?;

        Ok(EspdResponseType {
            ubl_version_id: Some(UBL_VERSION_ID.to_owned()),
            customization_id: Some(CUSTOMIZATION_ID.to_owned()),
            id: header.id,
            copy_indicator: Some(COPY_INDICATOR.to_owned()),
            version_id: Some(VERSION_ID.to_owned()),
            issue_date: header.issue_date,
            issue_time: header.issue_time,
            contract_folder_id: document.contract_folder_id.clone(),
            contracting_party: document.authority.as_ref().map(common::export_authority),
            economic_operator_party: Some(common::export_operator(operator)),
            procurement_project_lots: document.lots.clone(),
            criteria: common::export_criteria(&document.criteria, true),
            additional_document_references: document
                .procurement
                .iter()
                .map(common::export_procurement)
                .collect(),
        })
    }
}

/// Maps an ESPD Response onto a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseImporter;

impl ImportTransformer<EspdResponseType> for ResponseImporter {
    fn transform(&self, value: EspdResponseType) -> Result<EspdDocument, TransformError> {
        let party = value
            .economic_operator_party
            .ok_or(TransformError::MissingField("economic_operator"))?;

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
            economic_operator: Some(common::import_operator(party)?),
            procurement: common::import_procurement(value.additional_document_references),
            lots: value.procurement_project_lots,
            criteria: common::import_criteria(value.criteria, true)?,
        })
    }
}
