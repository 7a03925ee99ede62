use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{
    ActionEntry, AggregatedReport, CategorySection, ExtractionResult, Severity, SeverityCounts,
    Signal, SECTION_ORDER,
};

/// Upper bound on the priority-action list.
pub const MAX_ACTIONS: usize = 8;

/// Merge per-document extraction results into the single report both render
/// modes read. Sole producer of `AggregatedReport`; the renderer never
/// mutates it.
pub fn aggregate(
    property_address: &str,
    generated_at: DateTime<Utc>,
    results: &[ExtractionResult],
) -> AggregatedReport {
    // Flatten, keeping each result's own signal order. Signals outside the
    // three addressable categories are dropped, not rendered.
    let mut signals: Vec<Signal> = Vec::new();
    for result in results {
        for signal in &result.signals {
            if signal.category.is_known() {
                signals.push(signal.clone());
            } else {
                tracing::warn!(
                    title = %signal.title,
                    source = %signal.source_document,
                    "dropping signal with unrecognised category"
                );
            }
        }
    }

    // Severity ascending. `sort_by_key` is stable, and that matters: equal
    // severities must keep their source order.
    signals.sort_by_key(|s| s.severity);

    let actions = build_actions(&signals);

    let sections = SECTION_ORDER
        .iter()
        .map(|&category| {
            let section_signals: Vec<Signal> = signals
                .iter()
                .filter(|s| s.category == category)
                .cloned()
                .collect();

            let mut counts = SeverityCounts::default();
            for signal in &section_signals {
                counts.record(signal.severity);
            }

            // Last write wins when two documents classify the same way;
            // upload only allows one file per category, so this is recorded
            // rather than defended against.
            let source_document = results
                .iter()
                .filter(|r| r.category == category)
                .last()
                .map(|r| r.source_document.clone());

            CategorySection {
                category,
                source_document,
                signals: section_signals,
                counts,
            }
        })
        .collect();

    AggregatedReport {
        property_address: property_address.to_string(),
        generated_at,
        sections,
        actions,
    }
}

/// Build the deduplicated priority-action list from Red and Amber signals
/// in severity order. Dedup is case-insensitive on the internal wording;
/// the first occurrence wins and keeps its casing. Each entry carries both
/// audience wordings of the same finding, so the two render modes can never
/// disagree on which findings drove an action, only on the phrasing.
fn build_actions(sorted_signals: &[Signal]) -> Vec<ActionEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut actions = Vec::new();

    for signal in sorted_signals.iter().filter(|s| s.severity != Severity::Green) {
        if actions.len() == MAX_ACTIONS {
            break;
        }
        let internal = signal.recommended_action.trim();
        if internal.is_empty() {
            continue;
        }
        if !seen.insert(internal.to_lowercase()) {
            continue;
        }
        let client = match signal.client_explanation.trim() {
            "" => signal.impact.trim(),
            text => text,
        };
        actions.push(ActionEntry {
            recommended_action: internal.to_string(),
            client_explanation: client.to_string(),
        });
    }

    actions
}
