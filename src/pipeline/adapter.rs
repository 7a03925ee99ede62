use super::llm::LlmClient;
use super::parser::parse_extraction_response;
use super::prompt::build_extraction_prompt;
use super::ExtractionError;
use crate::models::{ExtractionResult, ReportCategory, Signal};

/// Builds the category-specific extraction request, invokes the service
/// exactly once, and normalises the response into the internal signal
/// schema. Every failure is returned as a typed `ExtractionError`; callers
/// decide whether to skip the document or abort the run.
pub struct SignalExtractor {
    llm: Box<dyn LlmClient + Send + Sync>,
}

impl SignalExtractor {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>) -> Self {
        Self { llm }
    }

    pub fn extract(
        &self,
        document_text: &str,
        category: ReportCategory,
        source_filename: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        let _span = tracing::info_span!(
            "extract_signals",
            source = source_filename,
            category = %category
        )
        .entered();

        if document_text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let prompt = build_extraction_prompt(category, document_text, source_filename)
            .ok_or_else(|| ExtractionError::UnclassifiedDocument(source_filename.to_string()))?;

        let response = self.llm.generate(&prompt)?;
        let (property_address, raw_signals) = parse_extraction_response(&response)?;

        // Stamp category and source; the response is not trusted for either.
        let signals: Vec<Signal> = raw_signals
            .into_iter()
            .map(|raw| Signal {
                title: raw.title,
                category,
                description: raw.description,
                impact: raw.impact,
                severity: raw.severity,
                recommended_action: raw.recommended_action,
                client_explanation: raw.client_explanation,
                source_document: source_filename.to_string(),
            })
            .collect();

        tracing::info!(signals = signals.len(), "extraction complete");

        Ok(ExtractionResult {
            property_address,
            category,
            source_document: source_filename.to_string(),
            signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::pipeline::llm::MockLlmClient;

    fn mock_response() -> String {
        r#"```json
{
  "propertyAddress": "12 Harbour Lane, Whitstable",
  "signals": [
    {
      "title": "Public Sewer In Boundary",
      "description": "The map shows a public foul sewer crossing the rear garden.",
      "impact": "Build-over restrictions apply; extensions need water company approval.",
      "severity": "red",
      "recommendedAction": "Request a build-over agreement history from the water company.",
      "clientExplanation": "A public sewer runs under your garden, which limits building over it."
    },
    {
      "title": "Connections Confirmed",
      "description": "Foul and surface water drainage are both connected to the mains.",
      "impact": "No action needed.",
      "severity": "green",
      "recommendedAction": "",
      "clientExplanation": ""
    }
  ]
}
```"#
        .to_string()
    }

    fn extractor(client: MockLlmClient) -> SignalExtractor {
        SignalExtractor::new(Box::new(client))
    }

    #[test]
    fn extracts_and_stamps_signals() {
        let result = extractor(MockLlmClient::new(&mock_response()))
            .extract(
                "sewer map text",
                ReportCategory::DrainageWater,
                "Drainage_Water_Check.pdf",
            )
            .unwrap();

        assert_eq!(result.property_address, "12 Harbour Lane, Whitstable");
        assert!(matches!(result.category, ReportCategory::DrainageWater));
        assert_eq!(result.source_document, "Drainage_Water_Check.pdf");
        assert_eq!(result.signals.len(), 2);
        for signal in &result.signals {
            assert!(matches!(signal.category, ReportCategory::DrainageWater));
            assert_eq!(signal.source_document, "Drainage_Water_Check.pdf");
        }
        assert!(matches!(result.signals[0].severity, Severity::Red));
    }

    #[test]
    fn empty_document_short_circuits_without_service_call() {
        struct UnreachableClient;
        impl LlmClient for UnreachableClient {
            fn generate(&self, _prompt: &str) -> Result<String, ExtractionError> {
                panic!("the extraction service must not be called for an empty document");
            }
        }

        let extractor = SignalExtractor::new(Box::new(UnreachableClient));
        let result = extractor.extract("", ReportCategory::Environmental, "env.pdf");
        assert!(matches!(result, Err(ExtractionError::EmptyDocument)));

        let result = extractor.extract("   \n\t ", ReportCategory::Environmental, "env.pdf");
        assert!(matches!(result, Err(ExtractionError::EmptyDocument)));
    }

    #[test]
    fn unknown_category_is_a_typed_failure() {
        let result = extractor(MockLlmClient::new(&mock_response())).extract(
            "some text",
            ReportCategory::Unknown,
            "mystery.pdf",
        );
        assert!(matches!(
            result,
            Err(ExtractionError::UnclassifiedDocument(ref f)) if f == "mystery.pdf"
        ));
    }

    #[test]
    fn service_failure_propagates_as_typed_error() {
        let result = extractor(MockLlmClient::failing("connection refused")).extract(
            "some text",
            ReportCategory::LocalAuthority,
            "la.pdf",
        );
        assert!(matches!(result, Err(ExtractionError::Service(_))));
    }

    #[test]
    fn unparseable_response_is_malformed() {
        let result = extractor(MockLlmClient::new("I could not find any findings."))
            .extract("text", ReportCategory::LocalAuthority, "la.pdf");
        assert!(matches!(result, Err(ExtractionError::MalformedResponse(_))));
    }

    #[test]
    fn service_is_invoked_exactly_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        struct CountingClient {
            calls: Arc<AtomicUsize>,
            response: String,
        }
        impl LlmClient for CountingClient {
            fn generate(&self, _prompt: &str) -> Result<String, ExtractionError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(self.response.clone())
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = SignalExtractor::new(Box::new(CountingClient {
            calls: Arc::clone(&calls),
            response: mock_response(),
        }));
        extractor
            .extract("text", ReportCategory::DrainageWater, "dw.pdf")
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
