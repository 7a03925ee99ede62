use std::borrow::Cow;
use std::fmt::Write as _;

use crate::models::{
    AggregatedReport, CategorySection, RenderMode, Severity, Signal,
};

/// Render the aggregated report as a self-contained HTML document.
/// Pure: no I/O, no mutation, and identical input always produces
/// identical bytes. The generation timestamp travels inside the report.
pub fn render(report: &AggregatedReport, mode: RenderMode) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str(&render_head(report, mode));
    html.push_str(&render_header(report, mode));

    if mode == RenderMode::Client {
        html.push_str(CLIENT_INTRO);
    }

    render_glance(&mut html, report, mode);
    render_actions(&mut html, report, mode);
    render_findings(&mut html, report, mode);
    html.push_str(&render_footer(report));

    html
}

fn esc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

// ═══════════════════════════════════════════════════════════
// Page chrome
// ═══════════════════════════════════════════════════════════

fn render_head(report: &AggregatedReport, mode: RenderMode) -> String {
    let (header_bg, watermark_color) = match mode {
        RenderMode::Internal => ("#2c3e50", "rgba(44, 62, 80, 0.05)"),
        RenderMode::Client => ("#1d70b8", "rgba(29, 112, 184, 0.05)"),
    };
    let (badge_bg, badge_color) = match mode {
        RenderMode::Internal => ("rgba(255,255,255,0.2)", "#fff"),
        RenderMode::Client => ("#fff", "#1d70b8"),
    };
    let address = if report.property_address.is_empty() {
        Cow::Borrowed("Property")
    } else {
        esc(&report.property_address)
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Property Search Report – {address}</title>
<style>
:root {{
  --color-red: #d4351c;
  --color-amber: #ffb700;
  --color-green: #00823b;
  --header-bg: {header_bg};
}}
body {{
  font-family: Arial, sans-serif;
  margin: 40px;
  line-height: 1.8;
  font-size: 16px;
  color: #0b0c0c;
}}
.watermark {{
  position: fixed;
  top: 50%;
  left: 50%;
  transform: translate(-50%, -50%) rotate(-45deg);
  font-size: 120px;
  font-weight: 900;
  color: {watermark_color};
  z-index: -1;
  pointer-events: none;
}}
.header {{
  background: var(--header-bg);
  padding: 32px;
  border-radius: 8px;
  margin-bottom: 40px;
  color: white;
  position: relative;
}}
.mode-badge {{
  position: absolute;
  top: 16px;
  right: 32px;
  background: {badge_bg};
  color: {badge_color};
  padding: 8px 16px;
  border-radius: 6px;
  font-weight: 700;
  font-size: 13px;
}}
h1 {{ font-size: 28px; margin: 0; }}
.address {{ font-size: 20px; font-weight: 600; margin-top: 8px; }}
h2 {{ font-size: 22px; border-bottom: 3px solid #ddd; padding-bottom: 12px; margin-top: 32px; }}
h3 {{ font-size: 20px; margin-top: 28px; color: var(--header-bg); }}
.traffic-light-grid {{ display: grid; gap: 20px; margin: 24px 0; }}
.traffic-light-row {{
  border: 2px solid #ddd;
  padding: 20px;
  border-radius: 8px;
  display: flex;
  justify-content: space-between;
}}
.traffic-badge {{ padding: 10px 16px; border-radius: 6px; font-weight: 600; }}
.traffic-badge.red {{ background: #fef1ef; color: #a82315; border: 2px solid var(--color-red); }}
.traffic-badge.amber {{ background: #fffbf0; color: #8a7500; border: 2px solid var(--color-amber); }}
.traffic-badge.green {{ background: #f0f9f4; color: #006838; border: 2px solid var(--color-green); }}
.actions-box {{
  background: #fff4e5;
  border: 3px solid #ff9500;
  padding: 28px;
  border-radius: 12px;
  margin: 32px 0;
}}
.actions-box h2 {{ border: none; color: #d84315; margin-top: 0; }}
.actions-list {{ list-style: none; padding: 0; }}
.actions-list li {{
  background: white;
  padding: 18px 18px 18px 55px;
  margin: 14px 0;
  border-left: 5px solid #d84315;
  position: relative;
}}
.actions-list li::before {{ content: "→"; position: absolute; left: 16px; font-size: 26px; color: #d84315; }}
.signal-card {{ border: 2px solid #ddd; border-radius: 8px; margin: 20px 0; padding: 24px; }}
.signal-card.red {{ border-left: 6px solid var(--color-red); background: #fef9f8; }}
.signal-card.amber {{ border-left: 6px solid var(--color-amber); background: #fffef9; }}
.signal-card.green {{ border-left: 6px solid var(--color-green); }}
.signal-card h4 {{ margin: 0 0 12px; font-size: 19px; }}
.signal-card p {{ margin: 10px 0; }}
</style>
</head>
<body>
"#
    )
}

fn render_header(report: &AggregatedReport, mode: RenderMode) -> String {
    let (watermark, badge) = match mode {
        RenderMode::Internal => ("INTERNAL USE ONLY", "INTERNAL ONLY"),
        RenderMode::Client => ("CLIENT REPORT", "FOR CLIENT"),
    };
    let address = if report.property_address.is_empty() {
        Cow::Borrowed("Property")
    } else {
        esc(&report.property_address)
    };

    format!(
        r#"<div class="watermark">{watermark}</div>
<div class="header">
  <div class="mode-badge">{badge}</div>
  <h1>Property Search Report</h1>
  <div class="address">{address}</div>
</div>
"#
    )
}

const CLIENT_INTRO: &str = r#"<div style="background: #f0f4f5; padding: 20px; border-radius: 6px; margin: 20px 0; border-left: 4px solid var(--header-bg);">
  <p><strong>About This Report</strong></p>
  <p>This report summarises key findings from searches on your property. Please read carefully and contact us with any questions.</p>
</div>
"#;

// ═══════════════════════════════════════════════════════════
// At a glance — one badge row per category, fixed order
// ═══════════════════════════════════════════════════════════

fn render_glance(html: &mut String, report: &AggregatedReport, mode: RenderMode) {
    html.push_str("<h2>At a Glance</h2>\n<div class=\"traffic-light-grid\">\n");

    for section in &report.sections {
        let counts = section.counts;
        let _ = write!(
            html,
            "<div class=\"traffic-light-row\">\n  <strong>{}</strong>\n  <div>",
            esc(section.category.label())
        );
        if counts.red > 0 {
            let label = match mode {
                RenderMode::Internal => "✖ Significant",
                RenderMode::Client => "⚠️ Action Required",
            };
            let _ = write!(
                html,
                "<span class=\"traffic-badge red\">{label} ({})</span> ",
                counts.red
            );
        }
        if counts.amber > 0 {
            let label = match mode {
                RenderMode::Internal => "! Advisory",
                RenderMode::Client => "ℹ️ Please Note",
            };
            let _ = write!(
                html,
                "<span class=\"traffic-badge amber\">{label} ({})</span> ",
                counts.amber
            );
        }
        if counts.is_clear() {
            html.push_str("<span class=\"traffic-badge green\">✓ Clear</span>");
        }
        html.push_str("</div></div>\n");
    }

    html.push_str("</div>\n");
}

// ═══════════════════════════════════════════════════════════
// Priority actions — same findings in both modes, mode-specific wording
// ═══════════════════════════════════════════════════════════

fn render_actions(html: &mut String, report: &AggregatedReport, mode: RenderMode) {
    if report.actions.is_empty() {
        return;
    }

    let (heading, lead) = match mode {
        RenderMode::Internal => ("⚠️ Priority Actions", "Complete before exchange:"),
        RenderMode::Client => ("⚠️ Important Points", "Please review these items carefully:"),
    };

    let _ = write!(
        html,
        "<div class=\"actions-box\">\n  <h2>{heading}</h2>\n  <p>{lead}</p>\n  <ul class=\"actions-list\">\n"
    );
    for action in &report.actions {
        let wording = match mode {
            RenderMode::Internal => &action.recommended_action,
            RenderMode::Client => &action.client_explanation,
        };
        let _ = writeln!(html, "    <li>{}</li>", esc(wording));
    }
    html.push_str("  </ul>\n</div>\n");
}

// ═══════════════════════════════════════════════════════════
// Findings — per-category sections with per-signal cards
// ═══════════════════════════════════════════════════════════

fn render_findings(html: &mut String, report: &AggregatedReport, mode: RenderMode) {
    let heading = match mode {
        RenderMode::Internal => "Detailed Findings",
        RenderMode::Client => "What We Found",
    };
    let _ = writeln!(html, "<h2>{heading}</h2>");

    for section in &report.sections {
        render_section(html, section, mode);
    }
}

fn render_section(html: &mut String, section: &CategorySection, mode: RenderMode) {
    let _ = writeln!(html, "<h3>{}</h3>", esc(section.category.label()));

    // Client mode hides Green signals; the section itself always appears,
    // with an explicit all-clear card when nothing is visible.
    let visible: Vec<&Signal> = section
        .signals
        .iter()
        .filter(|s| mode == RenderMode::Internal || s.severity != Severity::Green)
        .collect();

    if visible.is_empty() {
        html.push_str(
            r#"<div class="signal-card green">
  <h4>✓ No Issues Found</h4>
  <p>All standard checks completed with no issues requiring attention.</p>
</div>
"#,
        );
        return;
    }

    for signal in visible {
        render_signal_card(html, signal, mode);
    }
}

fn render_signal_card(html: &mut String, signal: &Signal, mode: RenderMode) {
    let _ = write!(
        html,
        "<div class=\"signal-card {}\">\n  <h4>{}</h4>\n",
        signal.severity.css_class(),
        esc(&signal.title)
    );

    match mode {
        RenderMode::Client => {
            let text = if signal.client_explanation.trim().is_empty() {
                &signal.impact
            } else {
                &signal.client_explanation
            };
            let _ = writeln!(html, "  <p>{}</p>", esc(text));
        }
        RenderMode::Internal => {
            let _ = writeln!(html, "  <p>{}</p>", esc(&signal.description));
            let _ = writeln!(
                html,
                "  <p><strong>Impact:</strong> {}</p>",
                esc(&signal.impact)
            );
            let _ = writeln!(
                html,
                "  <p><strong>Action:</strong> {}</p>",
                esc(&signal.recommended_action)
            );
        }
    }

    html.push_str("</div>\n");
}

// ═══════════════════════════════════════════════════════════
// Footer — source documents and generation time
// ═══════════════════════════════════════════════════════════

fn render_footer(report: &AggregatedReport) -> String {
    let sources = report
        .sections
        .iter()
        .filter_map(|section| {
            section
                .source_document
                .as_ref()
                .map(|file| format!("{}: {}", esc(section.category.label()), esc(file)))
        })
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        r#"<hr style="margin-top: 48px; border: none; border-top: 2px solid #ddd;">
<p style="font-size: 13px; color: #505a5f;">
<strong>Sources:</strong> {sources}<br>
Generated: {generated}
</p>
</body>
</html>
"#,
        generated = report.generated_at.format("%d %B %Y at %H:%M"),
    )
}
