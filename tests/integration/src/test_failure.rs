//! Failure classification integration tests.

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io::{self, Read};

    use espd_core::{ExchangeConfig, ExchangeError, ExchangeErrorKind, Operation, TransformError};
    use espd_model::namespaces;

    use crate::{marshaller, marshaller_with, request_document, response_document};

    fn request_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<espd-req:ESPDRequest xmlns:espd-req="{}" xmlns:cbc="{}" xmlns:ccv="{}">
{body}
</espd-req:ESPDRequest>"#,
            namespaces::ESPD_REQUEST,
            namespaces::CBC,
            namespaces::CCV,
        )
    }

    #[test]
    fn test_should_fail_parse_on_malformed_input() -> anyhow::Result<()> {
        let marshaller = marshaller();
        let mut valid = Vec::new();
        marshaller.export_request(&request_document("trunc"), &mut valid)?;
        let truncated = &valid[..valid.len() / 2];

        let inputs: [&[u8]; 5] = [
            truncated,
            b"",
            b"   \n\t",
            b"this is not XML at all",
            b"{\"id\": \"ESPD-json\"}",
        ];
        for input in inputs {
            let err = marshaller.import_request(input).unwrap_err();
            assert_eq!(
                err.kind(),
                ExchangeErrorKind::Parse,
                "input {:?} gave {err}",
                String::from_utf8_lossy(input)
            );
        }
        Ok(())
    }

    #[test]
    fn test_should_fail_parse_on_mismatched_tags() {
        let xml = request_xml("<cbc:ID>x</cbc:IssueDate>");
        let err = marshaller().import_request(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::Parse);
    }

    #[test]
    fn test_should_fail_schema_validation_on_unknown_root() {
        let xml = r#"<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2">
                       <ID>1</ID>
                     </Invoice>"#;
        let err = marshaller().import_response(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::SchemaValidation);
    }

    #[test]
    fn test_should_fail_schema_validation_on_missing_mandatory_element() {
        let xml = request_xml("<cbc:IssueDate>2024-01-01</cbc:IssueDate>");
        let err = marshaller().import_request(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::SchemaValidation);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_should_fail_transform_on_unparsable_value() {
        let xml = request_xml(
            "<cbc:ID>ESPD-bad-date</cbc:ID><cbc:IssueDate>31/12/2024</cbc:IssueDate>",
        );
        let err = marshaller().import_request(xml.as_bytes()).unwrap_err();

        assert_eq!(err.kind(), ExchangeErrorKind::Transform);
        assert!(matches!(
            err,
            ExchangeError::Transform {
                source: TransformError::InvalidValue {
                    field: "issue_date",
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn test_should_fail_transform_on_unknown_response_data_type() {
        let xml = request_xml(
            r#"<cbc:ID>ESPD-rdt</cbc:ID><cbc:IssueDate>2024-01-01</cbc:IssueDate>
            <ccv:Criterion>
              <cbc:ID>005eab18-2341-4a1b-8d6c-5a1f1ab2c3d4</cbc:ID>
              <cbc:TypeCode>CRITERION.OTHER</cbc:TypeCode>
              <cbc:Name>Other</cbc:Name>
              <ccv:RequirementGroup>
                <cbc:ID>7c637c0c-7703-4389-ba52-02997a055bd7</cbc:ID>
                <ccv:Requirement responseDataType="PERCENTAGE">
                  <cbc:ID>974c8196-9d1c-419c-9ca9-45bb9f5fd59a</cbc:ID>
                  <cbc:Description>Share</cbc:Description>
                </ccv:Requirement>
              </ccv:RequirementGroup>
            </ccv:Criterion>"#,
        );
        let err = marshaller().import_request(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::Transform);
    }

    #[test]
    fn test_should_fail_transform_on_response_without_operator() {
        let xml = format!(
            r#"<espd-resp:ESPDResponse xmlns:espd-resp="{}" xmlns:cbc="{}">
                 <cbc:ID>ESPD-no-operator</cbc:ID>
                 <cbc:IssueDate>2025-02-03</cbc:IssueDate>
               </espd-resp:ESPDResponse>"#,
            namespaces::ESPD_RESPONSE,
            namespaces::CBC,
        );
        let err = marshaller().import_response(xml.as_bytes()).unwrap_err();

        assert_eq!(err.kind(), ExchangeErrorKind::Transform);
        assert!(matches!(
            err,
            ExchangeError::Transform {
                operation: Operation::ImportResponse,
                source: TransformError::MissingField("economic_operator"),
            }
        ));
    }

    #[test]
    fn test_should_fail_export_on_missing_required_data() {
        let marshaller = marshaller();

        let mut document = response_document("missing");
        document.economic_operator = None;
        let mut sink = Vec::new();
        let err = marshaller
            .export_response(&document, &mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Transform {
                source: TransformError::MissingField("economic_operator"),
                ..
            }
        ));
        assert!(sink.is_empty());

        document.issue_date = None;
        let mut text = String::new();
        let err = marshaller
            .export_request_to_buffer(&document, &mut text)
            .unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::Transform);
        assert!(text.is_empty());
    }

    #[test]
    fn test_should_reject_oversized_source() -> anyhow::Result<()> {
        let limit = 512;
        let marshaller =
            marshaller_with(&ExchangeConfig::builder().max_document_size(limit).build());

        let mut xml = Vec::new();
        marshaller.export_response(&response_document("big"), &mut xml)?;
        assert!(xml.len() > limit);

        let err = marshaller.import_response(xml.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::DocumentTooLarge);

        let padded = [xml.as_slice(), &vec![b' '; limit]].concat();
        let err = marshaller.import_response(padded.as_slice()).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::DocumentTooLarge);
        Ok(())
    }

    /// Yields some bytes, then fails.
    struct BrokenSource {
        prefix: &'static [u8],
    }

    impl Read for BrokenSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.prefix.is_empty() {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
            }
            let n = buf.len().min(self.prefix.len());
            buf[..n].copy_from_slice(&self.prefix[..n]);
            self.prefix = &self.prefix[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_should_surface_source_failure_as_io() {
        let source = BrokenSource {
            prefix: b"<?xml version=\"1.0\"?><espd-req:ESPDRequest",
        };
        let err = marshaller().import_request(source).unwrap_err();
        assert_eq!(err.kind(), ExchangeErrorKind::Io);
        match err {
            ExchangeError::Io { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
