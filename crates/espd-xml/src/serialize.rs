//! ESPD XML serialization: writing schema values as ESPD-conformant XML.
//!
//! This module provides the [`EspdSerialize`] trait and its implementations for
//! the ESPD schema types, plus [`write_xml`] which emits a complete document:
//!
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>` (optional)
//! - Root element prefixed and bound to the kind's namespace
//! - Prefix declarations for the UBL, CCV and ESPD component namespaces

use std::io::{self, Write};

use espd_model::namespaces;
use espd_model::types::{
    AmountType, ContractingParty, CriterionType, DocumentReference, EconomicOperatorParty,
    EspdRequestType, EspdResponseType, Identifier, Party, RequirementGroupType, RequirementType,
    ResponseValue,
};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::codec::CodecOptions;
use crate::envelope::RootElement;
use crate::error::XmlError;

/// Trait for serializing ESPD schema types to XML.
///
/// Implementors write their own wrapping element (if any) and its children at
/// the writer's current position. Root element handling lives in [`write_xml`].
///
/// Uses `io::Result` because `quick_xml::Writer` closures require `io::Result<()>`.
pub trait EspdSerialize {
    /// Serialize this value into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Write an envelope as a complete XML document into `sink`.
///
/// # Errors
///
/// Returns `XmlError` if writing to the sink fails.
pub fn write_xml<W: Write>(
    sink: W,
    envelope: &RootElement,
    options: &CodecOptions,
) -> Result<(), XmlError> {
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(sink, b' ', options.indent)
    } else {
        Writer::new(sink)
    };

    if options.write_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let kind = envelope.kind();
    let root = kind.root_element();
    let prefix = kind.root_prefix();
    let tag = format!("{prefix}:{}", root.local_name);

    let mut declarations = Vec::with_capacity(namespaces::CHILD_PREFIXES.len() + 1);
    declarations.push((format!("xmlns:{prefix}"), root.namespace));
    for (child_prefix, uri) in namespaces::CHILD_PREFIXES {
        declarations.push((format!("xmlns:{child_prefix}"), *uri));
    }

    let mut element = writer.create_element(tag.as_str());
    for (name, uri) in &declarations {
        element = element.with_attribute((name.as_str(), *uri));
    }
    element.write_inner_content(|w| match envelope {
        RootElement::Request(value) => value.serialize_xml(w),
        RootElement::Response(value) => value.serialize_xml(w),
    })?;

    Ok(())
}

/// Serialize an envelope with default options into a fresh buffer.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml(envelope: &RootElement) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(2048);
    write_xml(&mut buf, envelope, &CodecOptions::default())?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Helper functions for writing common XML patterns
// ---------------------------------------------------------------------------

/// Write a simple `<tag>text</tag>` element.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

/// Write `<tag>text</tag>` only if the value is `Some`.
fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

/// Write `<tag schemeAgencyID="...">value</tag>`.
fn write_identifier<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    id: &Identifier,
) -> io::Result<()> {
    let mut element = writer.create_element(tag);
    if let Some(agency) = &id.scheme_agency_id {
        element = element.with_attribute(("schemeAgencyID", agency.as_str()));
    }
    element.write_text_content(BytesText::new(&id.value))?;
    Ok(())
}

/// Write `<outer><tag>text</tag></outer>` if the value is `Some`.
fn write_optional_wrapped<W: Write>(
    writer: &mut Writer<W>,
    outer: &str,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        writer
            .create_element(outer)
            .write_inner_content(|w| write_text_element(w, tag, v))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Root content
// ---------------------------------------------------------------------------

/// Borrowed view of the children shared by both root types, in schema order.
struct RootContent<'a> {
    ubl_version_id: Option<&'a str>,
    customization_id: Option<&'a str>,
    id: &'a Identifier,
    copy_indicator: Option<&'a str>,
    version_id: Option<&'a str>,
    issue_date: &'a str,
    issue_time: Option<&'a str>,
    contract_folder_id: Option<&'a str>,
    contracting_party: Option<&'a ContractingParty>,
    economic_operator_party: Option<&'a EconomicOperatorParty>,
    procurement_project_lots: &'a [String],
    criteria: &'a [CriterionType],
    additional_document_references: &'a [DocumentReference],
}

impl RootContent<'_> {
    fn write<W: Write>(&self, w: &mut Writer<W>) -> io::Result<()> {
        write_optional_text(w, "cbc:UBLVersionID", self.ubl_version_id)?;
        write_optional_text(w, "cbc:CustomizationID", self.customization_id)?;
        write_identifier(w, "cbc:ID", self.id)?;
        write_optional_text(w, "cbc:CopyIndicator", self.copy_indicator)?;
        write_optional_text(w, "cbc:VersionID", self.version_id)?;
        write_text_element(w, "cbc:IssueDate", self.issue_date)?;
        write_optional_text(w, "cbc:IssueTime", self.issue_time)?;
        write_optional_text(w, "cbc:ContractFolderID", self.contract_folder_id)?;
        if let Some(party) = self.contracting_party {
            party.serialize_xml(w)?;
        }
        if let Some(party) = self.economic_operator_party {
            party.serialize_xml(w)?;
        }
        for lot in self.procurement_project_lots {
            write_optional_wrapped(
                w,
                "cac:ProcurementProjectLot",
                "cbc:ID",
                Some(lot.as_str()),
            )?;
        }
        for criterion in self.criteria {
            criterion.serialize_xml(w)?;
        }
        for reference in self.additional_document_references {
            reference.serialize_xml(w)?;
        }
        Ok(())
    }
}

impl EspdSerialize for EspdRequestType {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        RootContent {
            ubl_version_id: self.ubl_version_id.as_deref(),
            customization_id: self.customization_id.as_deref(),
            id: &self.id,
            copy_indicator: self.copy_indicator.as_deref(),
            version_id: self.version_id.as_deref(),
            issue_date: &self.issue_date,
            issue_time: self.issue_time.as_deref(),
            contract_folder_id: self.contract_folder_id.as_deref(),
            contracting_party: self.contracting_party.as_ref(),
            economic_operator_party: None,
            procurement_project_lots: &self.procurement_project_lots,
            criteria: &self.criteria,
            additional_document_references: &self.additional_document_references,
        }
        .write(writer)
    }
}

impl EspdSerialize for EspdResponseType {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        RootContent {
            ubl_version_id: self.ubl_version_id.as_deref(),
            customization_id: self.customization_id.as_deref(),
            id: &self.id,
            copy_indicator: self.copy_indicator.as_deref(),
            version_id: self.version_id.as_deref(),
            issue_date: &self.issue_date,
            issue_time: self.issue_time.as_deref(),
            contract_folder_id: self.contract_folder_id.as_deref(),
            contracting_party: self.contracting_party.as_ref(),
            economic_operator_party: self.economic_operator_party.as_ref(),
            procurement_project_lots: &self.procurement_project_lots,
            criteria: &self.criteria,
            additional_document_references: &self.additional_document_references,
        }
        .write(writer)
    }
}

// ---------------------------------------------------------------------------
// Parties and references
// ---------------------------------------------------------------------------

impl EspdSerialize for Party {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("cac:Party").write_inner_content(|w| {
            write_optional_text(w, "cbc:WebsiteURI", self.website_uri.as_deref())?;
            write_optional_wrapped(
                w,
                "cac:PartyIdentification",
                "cbc:ID",
                self.identification.as_deref(),
            )?;
            write_optional_wrapped(w, "cac:PartyName", "cbc:Name", Some(self.name.as_str()))?;
            if let Some(code) = &self.country_code {
                w.create_element("cac:PostalAddress")
                    .write_inner_content(|w| {
                        write_optional_wrapped(
                            w,
                            "cac:Country",
                            "cbc:IdentificationCode",
                            Some(code.as_str()),
                        )
                    })?;
            }
            write_optional_wrapped(
                w,
                "cac:Contact",
                "cbc:ElectronicMail",
                self.electronic_mail.as_deref(),
            )?;
            Ok(())
        })?;
        Ok(())
    }
}

impl EspdSerialize for ContractingParty {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("cac:ContractingParty")
            .write_inner_content(|w| self.party.serialize_xml(w))?;
        Ok(())
    }
}

impl EspdSerialize for EconomicOperatorParty {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("espd-cac:EconomicOperatorParty")
            .write_inner_content(|w| {
                write_optional_text(w, "espd-cbc:SMEIndicator", self.sme_indicator.as_deref())?;
                self.party.serialize_xml(w)
            })?;
        Ok(())
    }
}

fn write_external_reference<W: Write>(
    doc: &DocumentReference,
    w: &mut Writer<W>,
) -> io::Result<()> {
    w.create_element("cac:ExternalReference")
        .write_inner_content(|w| {
            write_optional_text(w, "cbc:FileName", doc.file_name.as_deref())?;
            write_optional_text(w, "cbc:Description", doc.description.as_deref())
        })?;
    Ok(())
}

impl EspdSerialize for DocumentReference {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("cac:AdditionalDocumentReference")
            .write_inner_content(|w| {
                write_identifier(w, "cbc:ID", &self.id)?;
                write_optional_text(
                    w,
                    "cbc:DocumentTypeCode",
                    self.document_type_code.as_deref(),
                )?;
                if self.file_name.is_some() || self.description.is_some() {
                    w.create_element("cac:Attachment")
                        .write_inner_content(|w| write_external_reference(self, w))?;
                }
                Ok(())
            })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

impl EspdSerialize for CriterionType {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("ccv:Criterion")
            .write_inner_content(|w| {
                write_text_element(w, "cbc:ID", &self.id)?;
                write_text_element(w, "cbc:TypeCode", &self.type_code)?;
                write_text_element(w, "cbc:Name", &self.name)?;
                write_optional_text(w, "cbc:Description", self.description.as_deref())?;
                for group in &self.requirement_groups {
                    group.serialize_xml(w)?;
                }
                Ok(())
            })?;
        Ok(())
    }
}

impl EspdSerialize for RequirementGroupType {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("ccv:RequirementGroup")
            .write_inner_content(|w| {
                write_text_element(w, "cbc:ID", &self.id)?;
                for requirement in &self.requirements {
                    requirement.serialize_xml(w)?;
                }
                for group in &self.requirement_groups {
                    group.serialize_xml(w)?;
                }
                Ok(())
            })?;
        Ok(())
    }
}

impl EspdSerialize for RequirementType {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("ccv:Requirement")
            .with_attribute(("responseDataType", self.response_data_type.as_str()))
            .write_inner_content(|w| {
                write_text_element(w, "cbc:ID", &self.id)?;
                write_text_element(w, "cbc:Description", &self.description)?;
                if let Some(response) = &self.response {
                    response.serialize_xml(w)?;
                }
                Ok(())
            })?;
        Ok(())
    }
}

impl EspdSerialize for ResponseValue {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("ccv:Response")
            .write_inner_content(|w| {
                write_optional_text(w, "cbc:Description", self.description.as_deref())?;
                write_optional_text(w, "cbc:Date", self.date.as_deref())?;
                write_optional_text(w, "cbc:Quantity", self.quantity.as_deref())?;
                write_optional_text(w, "ccv-cbc:Indicator", self.indicator.as_deref())?;
                if let Some(uri) = &self.evidence_uri {
                    write_evidence_reference(w, uri)?;
                }
                if let Some(amount) = &self.amount {
                    amount.serialize_xml(w)?;
                }
                write_optional_text(w, "ccv-cbc:Code", self.code.as_deref())?;
                Ok(())
            })?;
        Ok(())
    }
}

/// Write `<cac:EvidenceDocumentReference>` holding the evidence URI.
fn write_evidence_reference<W: Write>(w: &mut Writer<W>, uri: &str) -> io::Result<()> {
    w.create_element("cac:EvidenceDocumentReference")
        .write_inner_content(|w| {
            w.create_element("cac:Attachment")
                .write_inner_content(|w| {
                    write_optional_wrapped(w, "cac:ExternalReference", "cbc:URI", Some(uri))
                })?;
            Ok(())
        })?;
    Ok(())
}

impl EspdSerialize for AmountType {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("ccv-cbc:Amount")
            .with_attribute(("currencyID", self.currency_id.as_str()))
            .write_text_content(BytesText::new(&self.value))?;
        Ok(())
    }
}
