//! Request handlers and page assembly.
//!
//! Per-request failures never crash the process: scoring problems come back
//! as an error banner with HTTP 400, and an explanation failure downgrades
//! to a warning while the risk result stays on the page.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ScoreError;
use crate::explain::Attribution;
use crate::features::{FeatureSpec, InputVector};
use crate::render::{escape_html, render_attribution};
use crate::risk::{RiskAssessment, Scorer};

use super::AppState;

// =============================================================================
// HTML handlers
// =============================================================================

/// The input form with clinical defaults.
pub async fn index(State(ctx): State<AppState>) -> Html<String> {
    let form = render_form(&ctx.specs, None);
    Html(page(&form))
}

/// Form submission: score, classify, explain, render the full page.
pub async fn predict(
    State(ctx): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let input = match parse_form(&fields, &ctx.specs) {
        Ok(input) => input,
        Err(err) => return error_page(&ctx, &fields, &err),
    };

    let scorer = Scorer::new(ctx.config.convention);
    let assessment = match scorer.assess(&ctx.model, &input) {
        Ok(assessment) => assessment,
        Err(err) => return error_page(&ctx, &fields, &err),
    };

    let explanation = explain(&ctx, &input);
    let explanation_html = match &explanation {
        Ok(attribution) => render_attribution(&ctx.specs, attribution, ctx.config.render_mode),
        Err(err) => {
            tracing::warn!(error = %err, "attribution failed; serving result without chart");
            format!(
                "<div class=\"banner warning\">Explanation unavailable: {}</div>",
                escape_html(&err.to_string())
            )
        }
    };

    let body = format!(
        "{}\n<section class=\"panel\"><h2>Feature attribution</h2>\n{}</section>\n{}",
        result_panel(&assessment),
        explanation_html,
        render_form(&ctx.specs, Some(&fields)),
    );
    Html(page(&body)).into_response()
}

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

// =============================================================================
// JSON API
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Covariate values in feature order.
    pub values: Vec<f32>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probability: f32,
    pub percent: f32,
    pub tier: &'static str,
    pub advice: &'static str,
    pub color: &'static str,
    /// Present unless attribution failed; the prediction stands either way.
    pub attribution: Option<Attribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_error: Option<String>,
}

/// Machine-readable variant of the predict cycle.
pub async fn api_predict(
    State(ctx): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let input = InputVector::new(request.values, &ctx.specs)?;
    let assessment = Scorer::new(ctx.config.convention).assess(&ctx.model, &input)?;

    let (attribution, explanation_error) = match explain(&ctx, &input) {
        Ok(attribution) => (Some(attribution), None),
        Err(err) => {
            tracing::warn!(error = %err, "attribution failed for API request");
            (None, Some(err.to_string()))
        }
    };

    Ok(Json(PredictResponse {
        probability: assessment.probability,
        percent: assessment.percent(),
        tier: assessment.tier.label(),
        advice: assessment.advice,
        color: assessment.color,
        attribution,
        explanation_error,
    }))
}

/// Scoring errors surfaced by the JSON API as HTTP 400.
#[derive(Debug)]
pub struct ApiError(ScoreError);

impl From<ScoreError> for ApiError {
    fn from(err: ScoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0.to_string(),
            "status": StatusCode::BAD_REQUEST.as_u16(),
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

// =============================================================================
// Request plumbing
// =============================================================================

/// Collect form fields `f0..fN` into an ordered input vector.
fn parse_form(
    fields: &HashMap<String, String>,
    specs: &[FeatureSpec],
) -> Result<InputVector, ScoreError> {
    let mut values = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let raw = fields
            .get(&format!("f{i}"))
            .ok_or_else(|| ScoreError::MissingInput {
                name: spec.name.clone(),
            })?;
        let value: f32 = raw
            .trim()
            .parse()
            .map_err(|_| ScoreError::MalformedInput {
                name: spec.name.clone(),
                raw: raw.clone(),
            })?;
        values.push(value);
    }
    InputVector::new(values, specs)
}

fn explain(ctx: &AppState, input: &InputVector) -> Result<Attribution, crate::error::ExplainError> {
    ctx.explainer.explain_row(input.as_slice())
}

fn error_page(ctx: &AppState, fields: &HashMap<String, String>, err: &ScoreError) -> Response {
    let body = format!(
        "<div class=\"banner error\">{}</div>\n{}",
        escape_html(&err.to_string()),
        render_form(&ctx.specs, Some(fields)),
    );
    (StatusCode::BAD_REQUEST, Html(page(&body))).into_response()
}

// =============================================================================
// Page assembly
// =============================================================================

fn result_panel(assessment: &RiskAssessment) -> String {
    format!(
        "<section class=\"panel\">\n\
         <h2>Prediction</h2>\n\
         <p class=\"tier\" style=\"color:{}\">{} — {:.2}% probability of \
         upper-GI bleeding within 6 months</p>\n\
         <p class=\"advice\">{}</p>\n\
         </section>",
        assessment.color,
        assessment.tier.label(),
        assessment.percent(),
        assessment.advice,
    )
}

/// The covariate form. `submitted` keeps the user's values across a
/// round-trip; otherwise each field is seeded with its clinical default.
fn render_form(specs: &[FeatureSpec], submitted: Option<&HashMap<String, String>>) -> String {
    let mut form = String::from(
        "<section class=\"panel\"><h2>Patient baseline indicators</h2>\n\
         <form method=\"post\" action=\"/predict\">\n",
    );

    for (i, spec) in specs.iter().enumerate() {
        let value = submitted
            .and_then(|fields| fields.get(&format!("f{i}")))
            .cloned()
            .unwrap_or_else(|| spec.default.to_string());
        let unit = if spec.unit.is_empty() {
            String::new()
        } else {
            format!(" ({})", spec.unit)
        };
        form.push_str(&format!(
            "<label>{}{}\n\
             <input type=\"number\" name=\"f{i}\" value=\"{}\" \
             min=\"{}\" max=\"{}\" step=\"{}\" required>\n\
             </label>\n",
            escape_html(&spec.name),
            escape_html(&unit),
            escape_html(&value),
            spec.min,
            spec.max,
            spec.step,
        ));
    }

    form.push_str(
        "<button type=\"submit\">Predict</button>\n</form>\n</section>",
    );
    form
}

fn page(body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>BCS upper-GI bleeding risk</title>\n\
         <style>{CSS}</style>\n</head>\n<body>\n\
         <h1>Budd-Chiari syndrome: upper-GI bleeding risk</h1>\n\
         <p class=\"intro\">Enter the patient's baseline indicators and press \
         Predict to estimate the 6-month bleeding risk with individualized \
         recommendations.</p>\n\
         {body}\n\
         <footer>Research demonstration only — model outputs do not replace \
         clinical judgment.</footer>\n</body>\n</html>\n"
    )
}

const CSS: &str = "\
body{font-family:sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem;color:#222}\
h1{font-size:1.4rem}\
.panel{border:1px solid #ddd;border-radius:6px;padding:1rem;margin:1rem 0}\
.tier{font-size:1.2rem;font-weight:bold}\
.banner{padding:.75rem 1rem;border-radius:6px;margin:1rem 0}\
.banner.error{background:#fdecea;color:#b71c1c}\
.banner.warning{background:#fff8e1;color:#8d6e00}\
label{display:block;margin:.5rem 0}\
input{margin-left:.5rem}\
button{margin-top:.75rem;padding:.5rem 1.5rem}\
.attribution-row{display:flex;align-items:center;gap:.5rem;margin:.25rem 0}\
.attribution-label{flex:0 0 220px;text-align:right}\
.attribution-bar{display:inline-block;height:14px;border-radius:2px}\
.attribution-value{color:#555;font-size:.85rem}\
footer{color:#777;font-size:.8rem;margin-top:2rem}";

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<FeatureSpec> {
        ["NLR", "Portal vein width"]
            .into_iter()
            .map(FeatureSpec::from_name)
            .collect()
    }

    #[test]
    fn parse_form_preserves_spec_order() {
        let specs = specs();
        let mut fields = HashMap::new();
        fields.insert("f1".to_string(), "14.0".to_string());
        fields.insert("f0".to_string(), "3.5".to_string());

        let input = parse_form(&fields, &specs).unwrap();
        assert_eq!(input.as_slice(), &[3.5, 14.0]);
    }

    #[test]
    fn parse_form_reports_missing_field_by_name() {
        let specs = specs();
        let mut fields = HashMap::new();
        fields.insert("f0".to_string(), "3.5".to_string());

        assert_eq!(
            parse_form(&fields, &specs),
            Err(ScoreError::MissingInput {
                name: "Portal vein width".into()
            })
        );
    }

    #[test]
    fn parse_form_reports_malformed_value() {
        let specs = specs();
        let mut fields = HashMap::new();
        fields.insert("f0".to_string(), "3.5".to_string());
        fields.insert("f1".to_string(), "wide".to_string());

        assert_eq!(
            parse_form(&fields, &specs),
            Err(ScoreError::MalformedInput {
                name: "Portal vein width".into(),
                raw: "wide".into()
            })
        );
    }

    #[test]
    fn form_seeds_defaults_when_nothing_submitted() {
        let html = render_form(&specs(), None);
        assert!(html.contains("name=\"f0\" value=\"3.5\""));
        assert!(html.contains("name=\"f1\" value=\"14\""));
    }

    #[test]
    fn form_keeps_submitted_values() {
        let mut fields = HashMap::new();
        fields.insert("f0".to_string(), "7.2".to_string());
        fields.insert("f1".to_string(), "16.5".to_string());

        let html = render_form(&specs(), Some(&fields));
        assert!(html.contains("value=\"7.2\""));
        assert!(html.contains("value=\"16.5\""));
    }
}
