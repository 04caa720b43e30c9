//! Shared-marshaller concurrency tests.

#[cfg(test)]
mod tests {
    use std::thread;

    use espd_core::ExchangeMarshaller;
    use espd_model::EspdDocument;

    use crate::{marshaller, request_document, response_document};

    const THREADS: usize = 8;
    const ROUNDS: usize = 16;

    fn export_response(marshaller: &ExchangeMarshaller, document: &EspdDocument) -> Vec<u8> {
        let mut xml = Vec::new();
        marshaller
            .export_response(document, &mut xml)
            .expect("export should succeed");
        xml
    }

    #[test]
    fn test_should_export_identically_from_many_threads() {
        let marshaller = marshaller();
        let document = response_document("threads");
        let expected = export_response(&marshaller, &document);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        (0..ROUNDS)
                            .map(|_| export_response(&marshaller, &document))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            for handle in handles {
                for xml in handle.join().expect("worker should not panic") {
                    assert_eq!(xml, expected);
                }
            }
        });
    }

    #[test]
    fn test_should_mix_kinds_across_threads() {
        let marshaller = marshaller();

        thread::scope(|scope| {
            for n in 0..THREADS {
                let marshaller = marshaller.clone();
                scope.spawn(move || {
                    let prefix = format!("mixed-{n}");
                    for _ in 0..ROUNDS {
                        if n % 2 == 0 {
                            let document = request_document(&prefix);
                            let mut xml = String::new();
                            marshaller
                                .export_request_to_buffer(&document, &mut xml)
                                .expect("request export");
                            let imported = marshaller
                                .import_request(xml.as_bytes())
                                .expect("request import");
                            assert_eq!(imported, document);
                        } else {
                            let document = response_document(&prefix);
                            let mut xml = Vec::new();
                            marshaller
                                .export_response(&document, &mut xml)
                                .expect("response export");
                            let imported = marshaller
                                .import_response(xml.as_slice())
                                .expect("response import");
                            assert_eq!(imported, document);
                        }
                    }
                    tracing::debug!(worker = n, rounds = ROUNDS, "worker finished");
                });
            }
        });
    }
}
