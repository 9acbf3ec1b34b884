//! Attribution chart rendering.
//!
//! One parameterized renderer covers both observed variants: a static
//! inline SVG bar chart and an interactive HTML panel. Either way the chart
//! shows, per feature, the signed margin-space contribution, ordered by
//! magnitude, red for risk-increasing and blue for risk-decreasing.

use crate::config::RenderMode;
use crate::explain::Attribution;
use crate::features::FeatureSpec;

const INCREASING_COLOR: &str = "#FF4B4B";
const DECREASING_COLOR: &str = "#2E86C1";

/// Render the attribution panel in the configured mode.
pub fn render_attribution(
    specs: &[FeatureSpec],
    attribution: &Attribution,
    mode: RenderMode,
) -> String {
    let rows = sorted_rows(specs, attribution);
    match mode {
        RenderMode::Svg => attribution_svg(&rows, attribution.baseline),
        RenderMode::Interactive => attribution_html(&rows, attribution.baseline),
    }
}

struct Row<'a> {
    name: &'a str,
    contribution: f64,
}

/// Pair names with contributions and sort by |contribution| descending.
fn sorted_rows<'a>(specs: &'a [FeatureSpec], attribution: &Attribution) -> Vec<Row<'a>> {
    let mut rows: Vec<Row<'a>> = specs
        .iter()
        .zip(&attribution.contributions)
        .map(|(spec, &contribution)| Row {
            name: &spec.name,
            contribution,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

fn bar_color(contribution: f64) -> &'static str {
    if contribution >= 0.0 {
        INCREASING_COLOR
    } else {
        DECREASING_COLOR
    }
}

/// Static SVG: one horizontal bar per feature around a center zero line.
fn attribution_svg(rows: &[Row<'_>], baseline: f64) -> String {
    const WIDTH: f64 = 640.0;
    const ROW_HEIGHT: f64 = 30.0;
    const LABEL_WIDTH: f64 = 230.0;
    const TOP: f64 = 28.0;

    let plot_width = WIDTH - LABEL_WIDTH - 10.0;
    let center = LABEL_WIDTH + plot_width / 2.0;
    let max_abs = rows
        .iter()
        .map(|r| r.contribution.abs())
        .fold(0.0f64, f64::max)
        .max(1e-9);
    let scale = (plot_width / 2.0 - 8.0) / max_abs;
    let height = TOP + ROW_HEIGHT * rows.len() as f64 + 24.0;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH} {height}\" \
         role=\"img\" aria-label=\"Feature contributions\">\n\
         <text x=\"{LABEL_WIDTH}\" y=\"18\" font-size=\"13\" fill=\"#444\">\
         Contribution to predicted risk (margin space, baseline {baseline:.3})</text>\n\
         <line x1=\"{center}\" y1=\"{TOP}\" x2=\"{center}\" y2=\"{:.1}\" \
         stroke=\"#999\" stroke-dasharray=\"3 3\"/>\n",
        height - 20.0
    );

    for (i, row) in rows.iter().enumerate() {
        let y = TOP + ROW_HEIGHT * i as f64;
        let bar_len = row.contribution.abs() * scale;
        let x = if row.contribution >= 0.0 {
            center
        } else {
            center - bar_len
        };
        let value_x = if row.contribution >= 0.0 {
            center + bar_len + 6.0
        } else {
            center - bar_len - 6.0
        };
        let anchor = if row.contribution >= 0.0 {
            "start"
        } else {
            "end"
        };

        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"end\" \
             fill=\"#222\">{}</text>\n\
             <rect x=\"{x:.2}\" y=\"{:.1}\" width=\"{bar_len:.2}\" height=\"16\" \
             fill=\"{}\"/>\n\
             <text x=\"{value_x:.2}\" y=\"{:.1}\" font-size=\"12\" \
             text-anchor=\"{anchor}\" fill=\"#555\">{:+.3}</text>\n",
            LABEL_WIDTH - 8.0,
            y + 13.0,
            escape_html(row.name),
            y,
            bar_color(row.contribution),
            y + 13.0,
            row.contribution,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Interactive panel: CSS bars with hover tooltips carrying exact values.
fn attribution_html(rows: &[Row<'_>], baseline: f64) -> String {
    let max_abs = rows
        .iter()
        .map(|r| r.contribution.abs())
        .fold(0.0f64, f64::max)
        .max(1e-9);

    let mut html = format!(
        "<div class=\"attribution\">\n\
         <p class=\"attribution-baseline\">Baseline (expected margin): {baseline:.3}</p>\n"
    );

    for row in rows {
        let pct = (row.contribution.abs() / max_abs * 100.0).min(100.0);
        html.push_str(&format!(
            "<div class=\"attribution-row\" title=\"{}: {:+.4}\">\n\
             <span class=\"attribution-label\">{}</span>\n\
             <span class=\"attribution-bar\" \
             style=\"width:{pct:.1}%;background:{}\"></span>\n\
             <span class=\"attribution-value\">{:+.3}</span>\n\
             </div>\n",
            escape_html(row.name),
            row.contribution,
            escape_html(row.name),
            bar_color(row.contribution),
            row.contribution,
        ));
    }

    html.push_str("</div>\n");
    html
}

/// Minimal HTML/attribute escaping for text we interpolate into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<FeatureSpec> {
        ["NLR", "Platelet/spleen ratio", "Portal vein width", "Collagen IV"]
            .into_iter()
            .map(FeatureSpec::from_name)
            .collect()
    }

    fn attribution() -> Attribution {
        Attribution {
            baseline: 0.11,
            contributions: vec![-0.31, -0.05, 0.22, 0.08],
        }
    }

    #[test]
    fn rows_are_sorted_by_magnitude() {
        let specs = specs();
        let rows = sorted_rows(&specs, &attribution());
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["NLR", "Portal vein width", "Collagen IV", "Platelet/spleen ratio"]
        );
    }

    #[test]
    fn svg_uses_two_color_scheme() {
        let svg = render_attribution(&specs(), &attribution(), RenderMode::Svg);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(INCREASING_COLOR));
        assert!(svg.contains(DECREASING_COLOR));
    }

    #[test]
    fn interactive_panel_carries_exact_values_in_tooltips() {
        let html = render_attribution(&specs(), &attribution(), RenderMode::Interactive);
        assert!(html.contains("title=\"NLR: -0.3100\""));
        assert!(html.contains("attribution-bar"));
    }

    #[test]
    fn all_zero_contributions_render_without_division_blowup() {
        let attribution = Attribution {
            baseline: 0.0,
            contributions: vec![0.0; 4],
        };
        let svg = render_attribution(&specs(), &attribution, RenderMode::Svg);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn names_are_escaped() {
        let specs = vec![FeatureSpec::from_name("a<b>&\"c\"")];
        let attribution = Attribution {
            baseline: 0.0,
            contributions: vec![0.1],
        };
        let svg = render_attribution(&specs, &attribution, RenderMode::Svg);
        assert!(svg.contains("a&lt;b&gt;&amp;&quot;c&quot;"));
    }
}
