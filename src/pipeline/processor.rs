use super::adapter::SignalExtractor;
use super::classify::classify_filename;
use super::pdf::TextSource;
use super::ExtractionError;
use crate::models::{ExtractionResult, ReportCategory};

/// One input document: the filename the classifier sees plus raw bytes.
pub struct SourceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A document the run could not extract signals from. The run continues
/// without it; the failure is recorded against the run.
#[derive(Debug)]
pub struct DocumentFailure {
    pub filename: String,
    pub category: ReportCategory,
    pub error: ExtractionError,
}

/// Outcome of processing one property's documents.
pub struct RunOutcome {
    pub results: Vec<ExtractionResult>,
    pub failures: Vec<DocumentFailure>,
}

impl RunOutcome {
    /// True when no document produced an extraction. The caller must
    /// surface a run-level failure instead of rendering an empty report
    /// that reads as an all-clear.
    pub fn all_failed(&self) -> bool {
        self.results.is_empty()
    }
}

/// Drives classify → text extraction → signal extraction for each document
/// in turn. Documents are independent; a failure in one never aborts the
/// others.
pub struct DocumentProcessor {
    text: Box<dyn TextSource + Send + Sync>,
    extractor: SignalExtractor,
}

impl DocumentProcessor {
    pub fn new(text: Box<dyn TextSource + Send + Sync>, extractor: SignalExtractor) -> Self {
        Self { text, extractor }
    }

    pub fn process(&self, documents: &[SourceDocument]) -> RunOutcome {
        let mut results = Vec::new();
        let mut failures = Vec::new();

        for document in documents {
            let category = classify_filename(&document.filename);
            match self.process_one(document, category) {
                Ok(result) => results.push(result),
                Err(error) => {
                    tracing::warn!(
                        source = %document.filename,
                        kind = error.kind(),
                        error = %error,
                        "document excluded from report"
                    );
                    failures.push(DocumentFailure {
                        filename: document.filename.clone(),
                        category,
                        error,
                    });
                }
            }
        }

        RunOutcome { results, failures }
    }

    fn process_one(
        &self,
        document: &SourceDocument,
        category: ReportCategory,
    ) -> Result<ExtractionResult, ExtractionError> {
        let text = self.text.extract_text(&document.bytes);
        self.extractor.extract(&text, category, &document.filename)
    }
}
