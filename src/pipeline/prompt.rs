use crate::models::ReportCategory;

/// Maximum length, in bytes, of document text included in a prompt. The cut
/// is lossy and deliberate: the extraction service has an input budget, and
/// search findings cluster near the front of these reports.
pub const EXCERPT_MAX_BYTES: usize = 15_000;

/// Per-category severity rules, embedded verbatim in every extraction
/// request so the service applies them consistently. This table is the
/// single source of truth for how findings map to traffic lights; a new
/// category or rule change starts here.
pub struct SeverityRules {
    pub red: &'static str,
    pub amber: &'static str,
    pub green: &'static str,
}

const LOCAL_AUTHORITY_RULES: SeverityRules = SeverityRules {
    red: "Section 106 agreements, enforcement notices, compulsory purchase orders, radon above 3%",
    amber: "unadopted roads, Community Infrastructure Levy, pending planning applications, \
            building regulations issues, radon 1-3%, conservation areas, tree preservation orders",
    green: "all-clear results",
};

const ENVIRONMENTAL_RULES: SeverityRules = SeverityRules {
    red: "flood risk at or above 1% annual probability, contaminated land",
    amber: "proximity to conservation areas, climate-related risk flags",
    green: "low radon, no issues found",
};

const DRAINAGE_WATER_RULES: SeverityRules = SeverityRules {
    red: "public sewer crossing the property boundary, no confirmed surface water connection",
    amber: "sewer within 3m or 30m, nearby pumping stations",
    green: "all connections confirmed",
};

/// Severity rules for a category. `None` for `Unknown`: there is no
/// extraction request to build for an unclassified document.
pub fn severity_rules(category: ReportCategory) -> Option<&'static SeverityRules> {
    match category {
        ReportCategory::LocalAuthority => Some(&LOCAL_AUTHORITY_RULES),
        ReportCategory::Environmental => Some(&ENVIRONMENTAL_RULES),
        ReportCategory::DrainageWater => Some(&DRAINAGE_WATER_RULES),
        ReportCategory::Unknown => None,
    }
}

/// Build the category-specific extraction request: the declared JSON output
/// contract, the category's severity rules, and a bounded excerpt of the
/// document text.
pub fn build_extraction_prompt(
    category: ReportCategory,
    document_text: &str,
    filename: &str,
) -> Option<String> {
    let rules = severity_rules(category)?;
    let excerpt = truncate_excerpt(document_text);

    Some(format!(
        r#"Extract signals from this {category} search report.

Return JSON:
{{
  "propertyAddress": "<Title Case address>",
  "signals": [
    {{
      "title": "<Short title>",
      "description": "<What the report says, with a quote>",
      "impact": "<How it affects the transaction>",
      "severity": "<red | amber | green>",
      "recommendedAction": "<Technical action for the file handler>",
      "clientExplanation": "<Plain English, addressing the buyer as 'you'>"
    }}
  ]
}}

Severity rules:
RED: {red}
AMBER: {amber}
GREEN: {green}

Report from {filename}:
{excerpt}

Return ONLY valid JSON."#,
        category = category.label(),
        red = rules.red,
        amber = rules.amber,
        green = rules.green,
    ))
}

/// Cut the document text to the prompt budget on a UTF-8 boundary.
fn truncate_excerpt(text: &str) -> &str {
    if text.len() <= EXCERPT_MAX_BYTES {
        return text;
    }
    let mut end = EXCERPT_MAX_BYTES;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
