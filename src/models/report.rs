use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ReportCategory, Severity};

/// One normalised finding extracted from a source document, carrying a
/// severity and audience-specific wordings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// Short human label.
    pub title: String,
    /// Domain the signal came from. Stamped by the extraction adapter,
    /// never taken from the service response.
    pub category: ReportCategory,
    /// Quoted/paraphrased source evidence (internal wording).
    pub description: String,
    /// Effect on the transaction (shown in both modes).
    pub impact: String,
    pub severity: Severity,
    /// Technical remediation text (internal wording).
    pub recommended_action: String,
    /// Plain-language equivalent of the action/impact (client wording).
    pub client_explanation: String,
    /// Filename of the document the signal was derived from.
    pub source_document: String,
}

/// Everything extracted from one document. Created once per document by the
/// extraction adapter, consumed once by the aggregator.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub property_address: String,
    pub category: ReportCategory,
    pub source_document: String,
    pub signals: Vec<Signal>,
}

/// Red/amber/green tallies for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub red: usize,
    pub amber: usize,
    pub green: usize,
}

impl SeverityCounts {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Red => self.red += 1,
            Severity::Amber => self.amber += 1,
            Severity::Green => self.green += 1,
        }
    }

    /// True when the category has nothing needing attention.
    pub fn is_clear(&self) -> bool {
        self.red == 0 && self.amber == 0
    }

    pub fn total(&self) -> usize {
        self.red + self.amber + self.green
    }
}

/// One deduplicated priority action. Carries both audience wordings of the
/// same underlying finding, so the two render modes always list the same
/// actions in the same order and differ only in phrasing.
#[derive(Debug, Clone)]
pub struct ActionEntry {
    pub recommended_action: String,
    pub client_explanation: String,
}

/// One category section of the aggregated report: the document that fed it,
/// its signals in severity order, and tallies across all of its signals.
#[derive(Debug, Clone)]
pub struct CategorySection {
    pub category: ReportCategory,
    /// Source document classified into this category, if any.
    /// Last write wins when two documents classify the same way.
    pub source_document: Option<String>,
    /// Severity-ascending; ties keep their source order.
    pub signals: Vec<Signal>,
    /// Counts over ALL of this category's signals, not filtered by mode.
    pub counts: SeverityCounts,
}

/// The aggregator's output, read by both render modes. Immutable once built.
#[derive(Debug, Clone)]
pub struct AggregatedReport {
    pub property_address: String,
    /// Carried in the report so rendering stays a pure function of
    /// (report, mode) and output is byte-reproducible.
    pub generated_at: DateTime<Utc>,
    /// Always one section per entry of `SECTION_ORDER`, in that order.
    pub sections: Vec<CategorySection>,
    /// At most eight entries, deduplicated case-insensitively on the
    /// internal wording.
    pub actions: Vec<ActionEntry>,
}

impl AggregatedReport {
    /// Severity tallies across every category.
    pub fn totals(&self) -> SeverityCounts {
        let mut totals = SeverityCounts::default();
        for section in &self.sections {
            totals.red += section.counts.red;
            totals.amber += section.counts.amber;
            totals.green += section.counts.green;
        }
        totals
    }

    pub fn signal_count(&self) -> usize {
        self.sections.iter().map(|s| s.signals.len()).sum()
    }
}

/// One row of the append-only run history.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: Option<i64>,
    pub property_address: String,
    pub created_at: DateTime<Utc>,
    pub internal_report_path: String,
    pub client_report_path: String,
    pub signal_count: usize,
    pub red_count: usize,
    pub amber_count: usize,
    pub green_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_record_and_total() {
        let mut counts = SeverityCounts::default();
        counts.record(Severity::Red);
        counts.record(Severity::Amber);
        counts.record(Severity::Amber);
        counts.record(Severity::Green);
        assert_eq!(counts.red, 1);
        assert_eq!(counts.amber, 2);
        assert_eq!(counts.green, 1);
        assert_eq!(counts.total(), 4);
        assert!(!counts.is_clear());
    }

    #[test]
    fn clear_means_no_red_or_amber() {
        let counts = SeverityCounts {
            red: 0,
            amber: 0,
            green: 3,
        };
        assert!(counts.is_clear());
    }
}
