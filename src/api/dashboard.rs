//! Server-rendered irrigation dashboard.
//!
//! `GET /` renders the whole page for the readings in the query string: a
//! sidebar form, the pump card and a collapsible debug panel. Submitting the
//! form re-runs the pipeline from scratch.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, warn};

use super::handlers::AdvisorState;
use crate::config::defaults;
use crate::types::{Crop, DecisionReport, InputRanges, ReadingInput};

/// What the main panel shows.
#[derive(Debug)]
pub enum PageOutcome {
    Report(Box<DecisionReport>),
    Error(String),
}

/// GET / - Render the dashboard
pub async fn serve_dashboard(
    State(state): State<AdvisorState>,
    query: Result<Query<ReadingInput>, QueryRejection>,
) -> Response {
    let (form, outcome, status) = match query {
        Ok(Query(input)) => match input.validate(&state.config.inputs) {
            Ok(reading) => match state.engine().evaluate(&reading) {
                Ok(report) => (input, PageOutcome::Report(Box::new(report)), StatusCode::OK),
                Err(e) => {
                    error!(error = %e, "Inference failed");
                    (
                        input,
                        PageOutcome::Error(format!("Prediction failed: {e}")),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                }
            },
            Err(e) => (input, PageOutcome::Error(e.to_string()), StatusCode::BAD_REQUEST),
        },
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected dashboard query");
            (
                ReadingInput::default(),
                PageOutcome::Error(rejection.body_text()),
                StatusCode::BAD_REQUEST,
            )
        }
    };

    (status, Html(render_page(&form, &state.config.inputs, &outcome))).into_response()
}

/// Escape text for an HTML body or attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn number_field(name: &str, label: &str, value: f64, min: f64, max: f64, step: &str, kind: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label>
<input type="{kind}" id="{name}" name="{name}" value="{value}" min="{min}" max="{max}" step="{step}">"#
    )
}

fn render_sidebar(form: &ReadingInput, ranges: &InputRanges) -> String {
    let selected_crop = form
        .crop
        .as_deref()
        .and_then(|c| c.parse::<Crop>().ok())
        .unwrap_or_default();
    let crop_options: String = Crop::ALL
        .iter()
        .map(|c| {
            let selected = if *c == selected_crop { " selected" } else { "" };
            format!(r#"<option value="{c}"{selected}>{c}</option>"#)
        })
        .collect();

    let fields = [
        number_field(
            "temperature",
            "🌡️ Temperature (°C)",
            form.temperature.unwrap_or(defaults::TEMPERATURE),
            ranges.temperature.min,
            ranges.temperature.max,
            "0.1",
            "number",
        ),
        number_field(
            "soil_moisture",
            "🌱 Soil Moisture",
            form.soil_moisture.unwrap_or(defaults::SOIL_MOISTURE),
            ranges.soil_moisture.min,
            ranges.soil_moisture.max,
            "0.1",
            "number",
        ),
        number_field(
            "day",
            "📅 Day Number",
            f64::from(form.day.unwrap_or(defaults::DAY)),
            ranges.day.min,
            ranges.day.max,
            "1",
            "number",
        ),
        number_field(
            "time",
            "⏰ Time (Hour)",
            form.time.unwrap_or(defaults::TIME),
            ranges.time.min,
            ranges.time.max,
            "0.1",
            "number",
        ),
        number_field(
            "moisture_trend",
            "📈 Moisture Trend",
            form.moisture_trend.unwrap_or(defaults::MOISTURE_TREND),
            ranges.moisture_trend.min,
            ranges.moisture_trend.max,
            "1",
            "range",
        ),
    ]
    .join("\n");

    format!(
        r#"<aside class="sidebar">
<h2>🌿 Enter Environment Data</h2>
<form method="get" action="/">
{fields}
<label for="crop">🌾 Crop Type</label>
<select id="crop" name="crop">{crop_options}</select>
<button type="submit">Predict</button>
</form>
</aside>"#
    )
}

fn render_report(report: &DecisionReport) -> String {
    let class = if report.decision.pump { "pump-on" } else { "pump-off" };
    let icon = if report.decision.pump { "💧" } else { "🌤️" };
    format!(
        r#"<div class="result">
<div class="{class}">{icon} {headline}<br><span class="pump-detail">{detail}</span></div>
<details>
<summary>🔍 Debug Information</summary>
<table>
<tr><td>Model Raw Prediction</td><td>{raw}</td></tr>
<tr><td>Temperature</td><td>{temperature} °C</td></tr>
<tr><td>Soil Moisture</td><td>{moisture}</td></tr>
<tr><td>Crop</td><td>{crop}</td></tr>
<tr><td>Rule</td><td>{reason}</td></tr>
</table>
</details>
</div>"#,
        headline = report.headline,
        detail = report.detail,
        raw = report.raw_prediction,
        temperature = report.reading.temperature(),
        moisture = report.reading.soil_moisture(),
        crop = report.reading.crop(),
        reason = escape_html(&report.reason),
    )
}

/// Full HTML document for one dashboard render.
pub fn render_page(form: &ReadingInput, ranges: &InputRanges, outcome: &PageOutcome) -> String {
    let body = match outcome {
        PageOutcome::Report(report) => render_report(report),
        PageOutcome::Error(message) => {
            format!(r#"<div class="error">❌ {}</div>"#, escape_html(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>IoT Smart Irrigation</title>
<link rel="stylesheet" href="/static/dashboard.css">
</head>
<body>
{sidebar}
<main class="main">
<div class="main-title">💧 IoT Smart Irrigation System</div>
<div class="sub-title">AI + IoT-powered Precision Farming Dashboard</div>
<h2>🧠 Prediction Result</h2>
{body}
<footer>🌱 Precision irrigation advisor</footer>
</main>
</body>
</html>"#,
        sidebar = render_sidebar(form, ranges),
    )
}
