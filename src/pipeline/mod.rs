pub mod adapter;
pub mod aggregate;
pub mod classify;
pub mod llm;
pub mod parser;
pub mod pdf;
pub mod processor;
pub mod prompt;

pub use adapter::*;
pub use aggregate::*;
pub use classify::*;
pub use llm::*;
pub use parser::*;
pub use pdf::*;
pub use processor::*;
pub use prompt::*;

use thiserror::Error;

/// Per-document failure kinds. All of these are recoverable at run level:
/// a failed document is recorded and its signals are simply absent from the
/// aggregate. No operation in this pipeline panics across its boundary.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("document contains no extractable text")]
    EmptyDocument,

    #[error("filename matched no known report category: {0}")]
    UnclassifiedDocument(String),

    #[error("extraction service call failed: {0}")]
    Service(String),

    #[error("extraction response did not match the declared schema: {0}")]
    MalformedResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Stable identifier recorded against a failed document.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::EmptyDocument => "empty_document",
            ExtractionError::UnclassifiedDocument(_) => "unclassified_document",
            ExtractionError::Service(_) => "service_error",
            ExtractionError::MalformedResponse(_) => "malformed_response",
            ExtractionError::Io(_) => "io_error",
        }
    }
}
