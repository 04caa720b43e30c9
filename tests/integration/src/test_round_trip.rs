//! Export/import round trip integration tests.

#[cfg(test)]
mod tests {
    use espd_core::ExchangeConfig;
    use espd_model::{EspdDocument, namespaces};

    use crate::{marshaller, marshaller_with, request_document, response_document};

    #[test]
    fn test_should_round_trip_request() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let document = request_document("rt-req");

        let mut xml = Vec::new();
        marshaller.export_request(&document, &mut xml)?;
        let imported = marshaller.import_request(xml.as_slice())?;

        assert_eq!(imported, document);
        Ok(())
    }

    #[test]
    fn test_should_round_trip_response() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let document = response_document("rt-resp");

        let mut xml = Vec::new();
        marshaller.export_response(&document, &mut xml)?;
        let imported = marshaller.import_response(xml.as_slice())?;

        assert_eq!(imported, document);
        assert!(imported.has_answers());
        Ok(())
    }

    #[test]
    fn test_should_round_trip_through_text_buffer() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let document = response_document("rt-buf");

        let mut text = String::new();
        marshaller.export_response_to_buffer(&document, &mut text)?;
        let imported = marshaller.import_response(text.as_bytes())?;

        assert_eq!(imported, document);
        Ok(())
    }

    #[test]
    fn test_should_round_trip_minimal_document() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let document = EspdDocument {
            id: Some("ESPD-min".to_owned()),
            issue_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
            ..EspdDocument::default()
        };

        let mut xml = Vec::new();
        marshaller.export_request(&document, &mut xml)?;
        assert_eq!(marshaller.import_request(xml.as_slice())?, document);
        Ok(())
    }

    #[test]
    fn test_should_round_trip_minimal_imported_response() -> anyhow::Result<()> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<espd-resp:ESPDResponse xmlns:espd-resp="{}" xmlns:cac="{}" xmlns:cbc="{}"
  xmlns:espd-cac="{}">
  <cbc:ID>ESPD-min-resp</cbc:ID>
  <cbc:IssueDate>2025-02-03</cbc:IssueDate>
  <espd-cac:EconomicOperatorParty>
    <cac:Party><cac:PartyName><cbc:Name>Solo Traders</cbc:Name></cac:PartyName></cac:Party>
  </espd-cac:EconomicOperatorParty>
</espd-resp:ESPDResponse>"#,
            namespaces::ESPD_RESPONSE,
            namespaces::CAC,
            namespaces::CBC,
            namespaces::ESPD_CAC,
        );
        let marshaller = marshaller();

        let document = marshaller.import_response(xml.as_bytes())?;
        let operator = document.economic_operator.clone().expect("operator");
        assert_eq!(operator.name, "Solo Traders");
        assert_eq!(operator.sme, None);

        let mut reexported = Vec::new();
        marshaller.export_response(&document, &mut reexported)?;
        let reimported = marshaller.import_response(reexported.as_slice())?;
        assert_eq!(reimported, document);
        Ok(())
    }

    #[test]
    fn test_should_round_trip_indented_output_without_declaration() -> anyhow::Result<()> {
        let config = ExchangeConfig::builder()
            .xml_indent(2)
            .xml_declaration(false)
            .build();
        let marshaller = marshaller_with(&config);
        let document = response_document("rt-pretty");

        let mut xml = String::new();
        marshaller.export_response_to_buffer(&document, &mut xml)?;
        assert!(xml.starts_with("<espd-resp:ESPDResponse"));
        assert!(xml.contains("\n  <cbc:"));

        assert_eq!(marshaller.import_response(xml.as_bytes())?, document);
        Ok(())
    }

    #[test]
    fn test_should_escape_markup_characters() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let document = response_document("rt-escape");

        let mut xml = String::new();
        marshaller.export_response_to_buffer(&document, &mut xml)?;
        assert!(xml.contains("Ville de Liège &amp; Partenaires &lt;Régie&gt;"));
        assert!(!xml.contains("<Régie>"));
        assert!(!xml.contains("<annex>"));
        Ok(())
    }

    #[test]
    fn test_should_start_with_xml_declaration_by_default() -> anyhow::Result<()> {
        let mut xml = String::new();
        marshaller().export_request_to_buffer(&request_document("decl"), &mut xml)?;
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        Ok(())
    }
}
