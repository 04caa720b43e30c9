//! Document kind isolation and cross-kind rejection tests.

#[cfg(test)]
mod tests {
    use espd_core::{ExchangeError, ExchangeErrorKind, Operation};
    use espd_model::{DocumentKind, namespaces};

    use crate::{marshaller, request_document, response_document};

    #[test]
    fn test_should_emit_only_request_root_for_request() -> anyhow::Result<()> {
        let mut xml = String::new();
        marshaller().export_request_to_buffer(&response_document("iso-req"), &mut xml)?;

        assert!(xml.contains("<espd-req:ESPDRequest"));
        assert!(xml.contains(namespaces::ESPD_REQUEST));
        assert!(!xml.contains("ESPDResponse"));
        assert!(!xml.contains(namespaces::ESPD_RESPONSE));
        assert!(xml.trim_end().ends_with("</espd-req:ESPDRequest>"));
        Ok(())
    }

    #[test]
    fn test_should_emit_only_response_root_for_response() -> anyhow::Result<()> {
        let mut xml = String::new();
        marshaller().export_response_to_buffer(&response_document("iso-resp"), &mut xml)?;

        assert!(xml.contains("<espd-resp:ESPDResponse"));
        assert!(xml.contains(namespaces::ESPD_RESPONSE));
        assert!(!xml.contains("ESPDRequest"));
        assert!(!xml.contains(namespaces::ESPD_REQUEST));
        Ok(())
    }

    #[test]
    fn test_should_omit_answers_from_request() -> anyhow::Result<()> {
        let mut xml = String::new();
        marshaller().export_request_to_buffer(&response_document("no-answers"), &mut xml)?;

        assert!(!xml.contains("ccv:Response"));
        assert!(!xml.contains("EconomicOperatorParty"));
        Ok(())
    }

    #[test]
    fn test_should_reject_response_in_request_import() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let mut xml = Vec::new();
        marshaller.export_response(&response_document("cross-1"), &mut xml)?;

        let err = marshaller.import_request(xml.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::SchemaMismatch);
        assert!(matches!(
            err,
            ExchangeError::SchemaMismatch {
                operation: Operation::ImportRequest,
                expected: DocumentKind::Request,
                found: DocumentKind::Response,
            }
        ));
        Ok(())
    }

    #[test]
    fn test_should_reject_request_in_response_import() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let mut xml = Vec::new();
        marshaller.export_request(&request_document("cross-2"), &mut xml)?;

        let err = marshaller.import_response(xml.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::SchemaMismatch {
                operation: Operation::ImportResponse,
                expected: DocumentKind::Response,
                found: DocumentKind::Request,
            }
        ));
        assert_eq!(
            err.to_string(),
            "import of ESPD response failed: expected an ESPD response but found an ESPD request"
        );
        Ok(())
    }

    #[test]
    fn test_should_dispatch_on_kind() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let document = response_document("dispatch");

        for kind in DocumentKind::ALL {
            let mut via_dispatch = Vec::new();
            marshaller.export(kind, &document, &mut via_dispatch)?;

            let mut via_named = Vec::new();
            match kind {
                DocumentKind::Request => marshaller.export_request(&document, &mut via_named)?,
                DocumentKind::Response => marshaller.export_response(&document, &mut via_named)?,
            }
            assert_eq!(via_dispatch, via_named);

            let imported = marshaller.import(kind, via_dispatch.as_slice())?;
            assert_eq!(imported.id, document.id);
        }
        Ok(())
    }

    #[test]
    fn test_should_accept_foreign_prefixes() -> anyhow::Result<()> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<req:ESPDRequest xmlns:req="{}" xmlns:b="{}">
  <b:ID>ESPD-foreign</b:ID>
  <b:IssueDate>2024-07-01</b:IssueDate>
</req:ESPDRequest>"#,
            namespaces::ESPD_REQUEST,
            namespaces::CBC,
        );

        let document = marshaller().import_request(xml.as_bytes())?;
        assert_eq!(document.id.as_deref(), Some("ESPD-foreign"));
        assert_eq!(
            document.issue_date,
            chrono::NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        Ok(())
    }
}
