use std::fmt;

use serde::{Deserialize, Serialize};

/// The three recognised search-report domains, plus a sentinel for
/// documents the classifier cannot place. `Unknown` is a classification
/// failure: it is never rendered as a report section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportCategory {
    LocalAuthority,
    Environmental,
    DrainageWater,
    Unknown,
}

/// Fixed order in which category sections appear in every rendered report.
/// Both the aggregator and the renderer walk this list explicitly; map
/// iteration order is never relied on.
pub const SECTION_ORDER: [ReportCategory; 3] = [
    ReportCategory::LocalAuthority,
    ReportCategory::Environmental,
    ReportCategory::DrainageWater,
];

impl ReportCategory {
    /// Human-readable section heading.
    pub fn label(&self) -> &'static str {
        match self {
            ReportCategory::LocalAuthority => "Local Authority",
            ReportCategory::Environmental => "Environmental",
            ReportCategory::DrainageWater => "Drainage & Water",
            ReportCategory::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ReportCategory::Unknown)
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Traffic-light severity. The derived order (Red < Amber < Green) is the
/// sort order for report output and the cutoff for client-mode visibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Amber,
    Green,
}

impl Severity {
    /// CSS class used for badges and signal cards.
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Red => "red",
            Severity::Amber => "amber",
            Severity::Green => "green",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// Which audience a rendered report is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Internal,
    Client,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_red_first() {
        assert!(Severity::Red < Severity::Amber);
        assert!(Severity::Amber < Severity::Green);
    }

    #[test]
    fn severity_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Red).unwrap(), "\"red\"");
        let parsed: Severity = serde_json::from_str("\"amber\"").unwrap();
        assert!(matches!(parsed, Severity::Amber));
    }

    #[test]
    fn section_order_is_fixed() {
        assert_eq!(
            SECTION_ORDER,
            [
                ReportCategory::LocalAuthority,
                ReportCategory::Environmental,
                ReportCategory::DrainageWater,
            ]
        );
    }

    #[test]
    fn unknown_is_not_a_section() {
        assert!(!SECTION_ORDER.contains(&ReportCategory::Unknown));
        assert!(!ReportCategory::Unknown.is_known());
    }

    #[test]
    fn labels_match_report_headings() {
        assert_eq!(ReportCategory::LocalAuthority.label(), "Local Authority");
        assert_eq!(ReportCategory::DrainageWater.label(), "Drainage & Water");
    }
}
