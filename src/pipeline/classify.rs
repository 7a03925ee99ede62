use crate::models::ReportCategory;

/// Filename keyword table, checked top to bottom. The row order is part of
/// the contract: a filename matching keywords from several rows always
/// classifies as the first row that matches.
const REPORT_PATTERNS: &[(ReportCategory, &[&str])] = &[
    (
        ReportCategory::Environmental,
        &["environmental", "martello", "climate"],
    ),
    (ReportCategory::DrainageWater, &["drainage", "water"]),
    (
        ReportCategory::LocalAuthority,
        &["local", "authority", "search"],
    ),
];

/// Classify a document by its filename. Case-insensitive substring match
/// against the keyword table. Total: every input maps to a category, with
/// `Unknown` for filenames matching no keyword.
pub fn classify_filename(filename: &str) -> ReportCategory {
    let lower = filename.to_lowercase();
    for (category, keywords) in REPORT_PATTERNS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *category;
        }
    }
    ReportCategory::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_local_authority() {
        assert!(matches!(
            classify_filename("LA_Search_42.pdf"),
            ReportCategory::LocalAuthority
        ));
        assert!(matches!(
            classify_filename("local-authority-results.pdf"),
            ReportCategory::LocalAuthority
        ));
    }

    #[test]
    fn classify_environmental() {
        assert!(matches!(
            classify_filename("Environmental_Report.pdf"),
            ReportCategory::Environmental
        ));
        assert!(matches!(
            classify_filename("martello-summary.pdf"),
            ReportCategory::Environmental
        ));
        assert!(matches!(
            classify_filename("ClimateRisk.pdf"),
            ReportCategory::Environmental
        ));
    }

    #[test]
    fn classify_drainage_water() {
        assert!(matches!(
            classify_filename("Drainage_Water_Check.pdf"),
            ReportCategory::DrainageWater
        ));
        assert!(matches!(
            classify_filename("water-enquiry.pdf"),
            ReportCategory::DrainageWater
        ));
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert!(matches!(
            classify_filename("ENVIRONMENTAL.PDF"),
            ReportCategory::Environmental
        ));
        assert!(matches!(
            classify_filename("DRAINAGE.pdf"),
            ReportCategory::DrainageWater
        ));
    }

    #[test]
    fn classify_unmatched_as_unknown() {
        assert!(matches!(
            classify_filename("invoice.pdf"),
            ReportCategory::Unknown
        ));
        assert!(matches!(classify_filename(""), ReportCategory::Unknown));
    }

    #[test]
    fn ambiguous_filenames_follow_table_order() {
        // "environmental" and "search" both match; the Environmental row
        // comes first in the table.
        assert!(matches!(
            classify_filename("environmental_search.pdf"),
            ReportCategory::Environmental
        ));
        // "water" (Drainage & Water) outranks "search" (Local Authority).
        assert!(matches!(
            classify_filename("water_search.pdf"),
            ReportCategory::DrainageWater
        ));
    }
}
