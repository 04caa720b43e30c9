//! ESPD XML deserialization: parsing ESPD documents into schema values.
//!
//! This module provides the [`EspdDeserialize`] trait and its implementations
//! for the ESPD schema types, plus [`from_xml`] which locates the root element,
//! resolves its namespace and dispatches to the matching root type.
//!
//! Child elements are matched by local name; only the root element is checked
//! against its namespace. Unknown children are skipped.

use std::borrow::Cow;

use espd_model::DocumentKind;
use espd_model::types::{
    AmountType, ContractingParty, CriterionType, DocumentReference, EconomicOperatorParty,
    EspdRequestType, EspdResponseType, Identifier, Party, RequirementGroupType, RequirementType,
    ResponseValue,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::envelope::{RootElement, wrap_request, wrap_response};
use crate::error::XmlError;

/// Trait for deserializing ESPD schema types from XML.
///
/// The opening tag has already been consumed by the caller, which also reads
/// any attributes it needs from it; the implementation reads child elements
/// until the matching end tag.
pub trait EspdDeserialize: Sized {
    /// Deserialize an instance from the given XML reader.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or required fields are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Parse an ESPD document into its root-element envelope.
///
/// The root element's namespace and local name decide which schema type is
/// parsed. `expected` is only used to describe an unknown root; the caller is
/// responsible for checking the returned envelope's kind.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed, the root element is unknown or
/// the content does not conform to the schema.
pub fn from_xml(xml: &[u8], expected: DocumentKind) -> Result<RootElement, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().expand_empty_elements = true;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let (namespace, local_name) = resolve_root_name(&start)?;
                let Some(kind) = DocumentKind::from_root_element(&namespace, &local_name) else {
                    return Err(XmlError::UnknownRootElement {
                        namespace,
                        local_name,
                        expected: expected.root_element(),
                    });
                };
                let envelope = match kind {
                    DocumentKind::Request => {
                        wrap_request(EspdRequestType::deserialize_xml(&mut reader)?)
                    }
                    DocumentKind::Response => {
                        wrap_response(EspdResponseType::deserialize_xml(&mut reader)?)
                    }
                };
                ensure_nothing_after_root(&mut reader)?;
                return Ok(envelope);
            }
            Event::Text(text) if !is_blank(&text) => {
                return Err(XmlError::Malformed(
                    "text content before the root element".to_owned(),
                ));
            }
            Event::End(_) => {
                return Err(XmlError::Malformed(
                    "closing tag before the root element".to_owned(),
                ));
            }
            Event::Eof => return Err(XmlError::NoRootElement),
            // Skip declaration, comments, processing instructions, doctype, whitespace.
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions for reading common XML patterns
// ---------------------------------------------------------------------------

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

fn utf8(bytes: &[u8]) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::Encoding(e.to_string()))
}

/// Resolve the namespace URI and local name of the root start tag.
///
/// Only declarations on the root itself are considered, which is the only
/// place a root's own prefix can be bound.
fn resolve_root_name(start: &BytesStart<'_>) -> Result<(String, String), XmlError> {
    let name = start.name();
    let local_name = utf8(name.local_name().as_ref())?.to_owned();
    let declaration: Cow<'_, [u8]> = match name.prefix() {
        Some(prefix) => Cow::Owned([b"xmlns:".as_slice(), prefix.as_ref()].concat()),
        None => Cow::Borrowed(b"xmlns"),
    };

    let mut namespace = String::new();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == declaration.as_ref() {
            namespace = unescape_value(&attr.value)?;
        }
    }
    Ok((namespace, local_name))
}

/// Fail on a second root element or stray text after the root.
fn ensure_nothing_after_root(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    loop {
        match reader.read_event()? {
            Event::Eof => return Ok(()),
            Event::Start(_) | Event::End(_) => {
                return Err(XmlError::Malformed(
                    "content after the root element".to_owned(),
                ));
            }
            Event::Text(text) if !is_blank(&text) => {
                return Err(XmlError::Malformed(
                    "text content after the root element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

fn unescape_value(raw: &[u8]) -> Result<String, XmlError> {
    let raw = utf8(raw)?;
    quick_xml::escape::unescape(raw)
        .map(Cow::into_owned)
        .map_err(|e| XmlError::Malformed(e.to_string()))
}

/// Read the value of the attribute with the given local name.
fn attribute_value(start: &BytesStart<'_>, local_name: &str) -> Result<Option<String>, XmlError> {
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == local_name.as_bytes() {
            return unescape_value(&attr.value).map(Some);
        }
    }
    Ok(None)
}

/// Read the value of an attribute that must be present.
fn required_attribute(
    start: &BytesStart<'_>,
    local_name: &str,
    context: &str,
) -> Result<String, XmlError> {
    attribute_value(start, local_name)?
        .ok_or_else(|| XmlError::MissingAttribute(format!("{local_name} on {context}")))
}

/// Read the text content of the current element and consume its end tag.
///
/// Expects the reader to be positioned right after a `Start` event. Character
/// and predefined entity references are resolved; CDATA is taken verbatim.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::Encoding(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::CData(e) => text.push_str(utf8(&e)?),
            Event::GeneralRef(e) => {
                let char_ref = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::Malformed(err.to_string()))?;
                if let Some(ch) = char_ref {
                    text.push(ch);
                } else {
                    let name = e
                        .decode()
                        .map_err(|err| XmlError::Encoding(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| XmlError::Malformed(format!("unknown entity &{name};")))?;
                    text.push_str(resolved);
                }
            }
            Event::Start(e) => {
                return Err(XmlError::UnexpectedElement(format!(
                    "<{}> inside text content",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedEof("text content".to_owned()));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedEof("skipped element".to_owned()));
            }
            _ => {}
        }
    }
}

/// Visit each child element of the current element until its end tag.
///
/// The visitor receives the child's start tag and local name and must consume
/// the child completely (read its text, deserialize it, or skip it).
fn read_children<'a, F>(
    reader: &mut Reader<&'a [u8]>,
    context: &str,
    mut visit: F,
) -> Result<(), XmlError>
where
    F: FnMut(&mut Reader<&'a [u8]>, &BytesStart<'a>, &str) -> Result<(), XmlError>,
{
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                let tag_name = utf8(local.as_ref())?;
                visit(reader, &e, tag_name)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(XmlError::UnexpectedEof(context.to_owned())),
            _ => {}
        }
    }
}

/// Descend through single-child wrappers (`outer/.../leaf`) and read the leaf text.
///
/// Returns `None` if the leaf does not occur.
fn read_nested_text(
    reader: &mut Reader<&[u8]>,
    path: &[&str],
    context: &str,
) -> Result<Option<String>, XmlError> {
    let Some((head, rest)) = path.split_first() else {
        return read_text_content(reader).map(Some);
    };
    let mut found = None;
    read_children(reader, context, |reader, _, tag_name| {
        if tag_name == *head && found.is_none() {
            found = read_nested_text(reader, rest, context)?;
            Ok(())
        } else {
            skip_element(reader)
        }
    })?;
    Ok(found)
}

fn missing(element: &str, context: &str) -> XmlError {
    XmlError::MissingElement(format!("{element} in {context}"))
}

// ---------------------------------------------------------------------------
// Root content
// ---------------------------------------------------------------------------

/// Children shared by both root types, collected in any order.
#[derive(Default)]
struct RootFields {
    ubl_version_id: Option<String>,
    customization_id: Option<String>,
    id: Option<Identifier>,
    copy_indicator: Option<String>,
    version_id: Option<String>,
    issue_date: Option<String>,
    issue_time: Option<String>,
    contract_folder_id: Option<String>,
    contracting_party: Option<ContractingParty>,
    procurement_project_lots: Vec<String>,
    criteria: Vec<CriterionType>,
    additional_document_references: Vec<DocumentReference>,
}

impl RootFields {
    fn read_child(
        &mut self,
        reader: &mut Reader<&[u8]>,
        start: &BytesStart<'_>,
        tag_name: &str,
        context: &str,
    ) -> Result<(), XmlError> {
        match tag_name {
            "UBLVersionID" => self.ubl_version_id = Some(read_text_content(reader)?),
            "CustomizationID" => self.customization_id = Some(read_text_content(reader)?),
            "ID" => {
                let scheme_agency_id = attribute_value(start, "schemeAgencyID")?;
                self.id = Some(Identifier {
                    value: read_text_content(reader)?,
                    scheme_agency_id,
                });
            }
            "CopyIndicator" => self.copy_indicator = Some(read_text_content(reader)?),
            "VersionID" => self.version_id = Some(read_text_content(reader)?),
            "IssueDate" => self.issue_date = Some(read_text_content(reader)?),
            "IssueTime" => self.issue_time = Some(read_text_content(reader)?),
            "ContractFolderID" => self.contract_folder_id = Some(read_text_content(reader)?),
            "ContractingParty" => {
                self.contracting_party = Some(ContractingParty::deserialize_xml(reader)?);
            }
            "ProcurementProjectLot" => {
                let lot = read_nested_text(reader, &["ID"], "ProcurementProjectLot")?
                    .ok_or_else(|| missing("cbc:ID", "ProcurementProjectLot"))?;
                self.procurement_project_lots.push(lot);
            }
            "Criterion" => self.criteria.push(CriterionType::deserialize_xml(reader)?),
            "AdditionalDocumentReference" => self
                .additional_document_references
                .push(DocumentReference::deserialize_xml(reader)?),
            _ => {
                tracing::trace!(element = tag_name, context, "skipping unknown element");
                skip_element(reader)?;
            }
        }
        Ok(())
    }

    fn required(&mut self, context: &str) -> Result<(Identifier, String), XmlError> {
        let id = self.id.take().ok_or_else(|| missing("cbc:ID", context))?;
        let issue_date = self
            .issue_date
            .take()
            .ok_or_else(|| missing("cbc:IssueDate", context))?;
        Ok((id, issue_date))
    }
}

impl EspdDeserialize for EspdRequestType {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        const CONTEXT: &str = "ESPDRequest";
        let mut fields = RootFields::default();
        read_children(reader, CONTEXT, |reader, start, tag_name| {
            fields.read_child(reader, start, tag_name, CONTEXT)
        })?;

        let (id, issue_date) = fields.required(CONTEXT)?;
        Ok(EspdRequestType {
            ubl_version_id: fields.ubl_version_id,
            customization_id: fields.customization_id,
            id,
            copy_indicator: fields.copy_indicator,
            version_id: fields.version_id,
            issue_date,
            issue_time: fields.issue_time,
            contract_folder_id: fields.contract_folder_id,
            contracting_party: fields.contracting_party,
            procurement_project_lots: fields.procurement_project_lots,
            criteria: fields.criteria,
            additional_document_references: fields.additional_document_references,
        })
    }
}

impl EspdDeserialize for EspdResponseType {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        const CONTEXT: &str = "ESPDResponse";
        let mut fields = RootFields::default();
        let mut economic_operator_party = None;
        read_children(reader, CONTEXT, |reader, start, tag_name| {
            if tag_name == "EconomicOperatorParty" {
                economic_operator_party = Some(EconomicOperatorParty::deserialize_xml(reader)?);
                Ok(())
            } else {
                fields.read_child(reader, start, tag_name, CONTEXT)
            }
        })?;

        let (id, issue_date) = fields.required(CONTEXT)?;
        Ok(EspdResponseType {
            ubl_version_id: fields.ubl_version_id,
            customization_id: fields.customization_id,
            id,
            copy_indicator: fields.copy_indicator,
            version_id: fields.version_id,
            issue_date,
            issue_time: fields.issue_time,
            contract_folder_id: fields.contract_folder_id,
            contracting_party: fields.contracting_party,
            economic_operator_party,
            procurement_project_lots: fields.procurement_project_lots,
            criteria: fields.criteria,
            additional_document_references: fields.additional_document_references,
        })
    }
}

// ---------------------------------------------------------------------------
// Parties and references
// ---------------------------------------------------------------------------

impl EspdDeserialize for Party {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut party = Party::default();
        let mut name = None;
        read_children(reader, "Party", |reader, _, tag_name| {
            match tag_name {
                "WebsiteURI" => party.website_uri = Some(read_text_content(reader)?),
                "PartyIdentification" => {
                    party.identification =
                        read_nested_text(reader, &["ID"], "PartyIdentification")?;
                }
                "PartyName" => name = read_nested_text(reader, &["Name"], "PartyName")?,
                "PostalAddress" => {
                    party.country_code = read_nested_text(
                        reader,
                        &["Country", "IdentificationCode"],
                        "PostalAddress",
                    )?;
                }
                "Contact" => {
                    party.electronic_mail =
                        read_nested_text(reader, &["ElectronicMail"], "Contact")?;
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;

        party.name = name.ok_or_else(|| missing("cac:PartyName", "Party"))?;
        Ok(party)
    }
}

impl EspdDeserialize for ContractingParty {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut party = None;
        read_children(reader, "ContractingParty", |reader, _, tag_name| {
            if tag_name == "Party" {
                party = Some(Party::deserialize_xml(reader)?);
                Ok(())
            } else {
                skip_element(reader)
            }
        })?;

        Ok(ContractingParty {
            party: party.ok_or_else(|| missing("cac:Party", "ContractingParty"))?,
        })
    }
}

impl EspdDeserialize for EconomicOperatorParty {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut sme_indicator = None;
        let mut party = None;
        read_children(reader, "EconomicOperatorParty", |reader, _, tag_name| {
            match tag_name {
                "SMEIndicator" => sme_indicator = Some(read_text_content(reader)?),
                "Party" => party = Some(Party::deserialize_xml(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;

        Ok(EconomicOperatorParty {
            sme_indicator,
            party: party.ok_or_else(|| missing("cac:Party", "EconomicOperatorParty"))?,
        })
    }
}

impl EspdDeserialize for DocumentReference {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        const CONTEXT: &str = "AdditionalDocumentReference";
        let mut id = None;
        let mut reference = DocumentReference::default();
        read_children(reader, CONTEXT, |reader, start, tag_name| {
            match tag_name {
                "ID" => {
                    let scheme_agency_id = attribute_value(start, "schemeAgencyID")?;
                    id = Some(Identifier {
                        value: read_text_content(reader)?,
                        scheme_agency_id,
                    });
                }
                "DocumentTypeCode" => {
                    reference.document_type_code = Some(read_text_content(reader)?);
                }
                "Attachment" => read_children(reader, "Attachment", |reader, _, tag_name| {
                    if tag_name != "ExternalReference" {
                        return skip_element(reader);
                    }
                    read_children(reader, "ExternalReference", |reader, _, tag_name| {
                        match tag_name {
                            "FileName" => reference.file_name = Some(read_text_content(reader)?),
                            "Description" => {
                                reference.description = Some(read_text_content(reader)?);
                            }
                            _ => skip_element(reader)?,
                        }
                        Ok(())
                    })
                })?,
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;

        reference.id = id.ok_or_else(|| missing("cbc:ID", CONTEXT))?;
        Ok(reference)
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

impl EspdDeserialize for CriterionType {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        const CONTEXT: &str = "Criterion";
        let mut id = None;
        let mut type_code = None;
        let mut name = None;
        let mut description = None;
        let mut requirement_groups = Vec::new();
        read_children(reader, CONTEXT, |reader, _, tag_name| {
            match tag_name {
                "ID" => id = Some(read_text_content(reader)?),
                "TypeCode" => type_code = Some(read_text_content(reader)?),
                "Name" => name = Some(read_text_content(reader)?),
                "Description" => description = Some(read_text_content(reader)?),
                "RequirementGroup" => {
                    requirement_groups.push(RequirementGroupType::deserialize_xml(reader)?);
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;

        Ok(CriterionType {
            id: id.ok_or_else(|| missing("cbc:ID", CONTEXT))?,
            type_code: type_code.ok_or_else(|| missing("cbc:TypeCode", CONTEXT))?,
            name: name.unwrap_or_default(),
            description,
            requirement_groups,
        })
    }
}

impl EspdDeserialize for RequirementGroupType {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        const CONTEXT: &str = "RequirementGroup";
        let mut id = None;
        let mut requirements = Vec::new();
        let mut requirement_groups = Vec::new();
        read_children(reader, CONTEXT, |reader, start, tag_name| {
            match tag_name {
                "ID" => id = Some(read_text_content(reader)?),
                "Requirement" => {
                    let response_data_type =
                        required_attribute(start, "responseDataType", "Requirement")?;
                    let mut requirement = RequirementType::deserialize_xml(reader)?;
                    requirement.response_data_type = response_data_type;
                    requirements.push(requirement);
                }
                "RequirementGroup" => {
                    requirement_groups.push(RequirementGroupType::deserialize_xml(reader)?);
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;

        Ok(RequirementGroupType {
            id: id.ok_or_else(|| missing("cbc:ID", CONTEXT))?,
            requirements,
            requirement_groups,
        })
    }
}

impl EspdDeserialize for RequirementType {
    /// Reads the children only; the `responseDataType` attribute is filled in
    /// by the enclosing group, which owns the start tag.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        const CONTEXT: &str = "Requirement";
        let mut id = None;
        let mut description = None;
        let mut response = None;
        read_children(reader, CONTEXT, |reader, _, tag_name| {
            match tag_name {
                "ID" => id = Some(read_text_content(reader)?),
                "Description" => description = Some(read_text_content(reader)?),
                "Response" => response = Some(ResponseValue::deserialize_xml(reader)?),
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;

        Ok(RequirementType {
            response_data_type: String::new(),
            id: id.ok_or_else(|| missing("cbc:ID", CONTEXT))?,
            description: description.unwrap_or_default(),
            response,
        })
    }
}

impl EspdDeserialize for ResponseValue {
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut value = ResponseValue::default();
        read_children(reader, "Response", |reader, start, tag_name| {
            match tag_name {
                "Description" => value.description = Some(read_text_content(reader)?),
                "Date" => value.date = Some(read_text_content(reader)?),
                "Quantity" => value.quantity = Some(read_text_content(reader)?),
                "Indicator" => value.indicator = Some(read_text_content(reader)?),
                "Code" => value.code = Some(read_text_content(reader)?),
                "Amount" => {
                    let currency_id = required_attribute(start, "currencyID", "Amount")?;
                    value.amount = Some(AmountType {
                        value: read_text_content(reader)?,
                        currency_id,
                    });
                }
                "EvidenceDocumentReference" => {
                    value.evidence_uri = read_nested_text(
                        reader,
                        &["Attachment", "ExternalReference", "URI"],
                        "EvidenceDocumentReference",
                    )?;
                }
                _ => skip_element(reader)?,
            }
            Ok(())
        })?;
        Ok(value)
    }
}
