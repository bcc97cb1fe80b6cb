//! Drives a full wizard session against a fake HTTP backend.

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use farm_client::HttpAdvisorService;
use farm_core::{FieldName, ResultAggregator, ResultsState, Transition, Wizard, WizardStep};

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn aggregator(base_url: &str) -> ResultAggregator {
    let service = HttpAdvisorService::new(base_url, Duration::from_secs(5)).unwrap();
    ResultAggregator::new(Arc::new(service))
}

/// Answers summaries by topic so both concurrent calls get a stable reply.
async fn summarize(Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["prompt"].as_str().unwrap_or_default();
    let text = if prompt.contains("predicted a yield") {
        "Good rainfall supports this yield."
    } else {
        "Urea supplies the nitrogen this soil lacks."
    };
    Json(json!({ "generated_text": text }))
}

fn healthy_backend() -> Router {
    Router::new()
        .route(
            "/predict/yield",
            post(|| async { Json(json!({ "predicted_yield": 3.456 })) }),
        )
        .route(
            "/predict/fertilizer",
            post(|| async { Json(json!({ "recommended_fertilizer": "Urea" })) }),
        )
        .route("/generate/gemini_text", post(summarize))
}

fn fill_all_steps(wizard: &mut Wizard) {
    for (field, value) in [
        (FieldName::Crop, "Rice"),
        (FieldName::State, "Assam"),
        (FieldName::Season, "Kharif"),
    ] {
        wizard.set_field(field, value);
    }
    assert_eq!(wizard.next(), Transition::Moved(WizardStep::SoilEnvironment));

    for (field, value) in [
        (FieldName::SoilColor, "Alluvial"),
        (FieldName::Nitrogen, "80"),
        (FieldName::Phosphorus, "40"),
        (FieldName::Potassium, "40"),
        (FieldName::Ph, "6.0"),
        (FieldName::RainfallFert, "1800"),
        (FieldName::Temperature, "27"),
    ] {
        wizard.set_field(field, value);
    }
    assert_eq!(wizard.next(), Transition::Moved(WizardStep::CultivationPractices));

    for (field, value) in [
        (FieldName::Area, "4"),
        (FieldName::AnnualRainfallYield, "2000"),
        (FieldName::FertilizerQuantity, "120"),
        (FieldName::Pesticide, "1"),
    ] {
        wizard.set_field(field, value);
    }
}

#[tokio::test]
async fn full_session_reaches_results_with_summaries() {
    let base = spawn_backend(healthy_backend()).await;
    let mut wizard = Wizard::new();
    fill_all_steps(&mut wizard);

    let transition = wizard.advance(&aggregator(&base)).await;

    assert_eq!(transition, Transition::Moved(WizardStep::Results));
    assert_eq!(
        wizard.results(),
        &ResultsState {
            yield_prediction_raw: Some(3.456),
            fertilizer_recommendation_raw: Some("Urea".to_string()),
            yield_prediction_summary: Some("Good rainfall supports this yield.".to_string()),
            fertilizer_recommendation_summary: Some(
                "Urea supplies the nitrogen this soil lacks.".to_string()
            ),
            error: None,
        }
    );
    assert!(!wizard.is_busy());
}

#[tokio::test]
async fn fertilizer_outage_surfaces_status_and_keeps_yield() {
    let router = Router::new()
        .route(
            "/predict/yield",
            post(|| async { Json(json!({ "predicted_yield": 42.5 })) }),
        )
        .route(
            "/predict/fertilizer",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Fertilizer model not loaded" })),
                )
            }),
        );
    let base = spawn_backend(router).await;
    let mut wizard = Wizard::new();
    fill_all_steps(&mut wizard);

    wizard.advance(&aggregator(&base)).await;

    assert_eq!(wizard.step(), WizardStep::Results);
    assert_eq!(wizard.results().yield_prediction_raw, Some(42.5));
    assert_eq!(wizard.results().fertilizer_recommendation_raw, None);
    assert_eq!(wizard.results().yield_prediction_summary, None);
    assert_eq!(
        wizard.results().error.as_deref(),
        Some("Request failed with status code 500: Fertilizer model not loaded")
    );
}

#[tokio::test]
async fn text_outage_only_replaces_summaries() {
    let router = Router::new()
        .route(
            "/predict/yield",
            post(|| async { Json(json!({ "predicted_yield": 1.0 })) }),
        )
        .route(
            "/predict/fertilizer",
            post(|| async { Json(json!({ "recommended_fertilizer": "DAP" })) }),
        )
        .route(
            "/generate/gemini_text",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "detail": "Gemini API is not configured" })),
                )
            }),
        );
    let base = spawn_backend(router).await;
    let mut wizard = Wizard::new();
    fill_all_steps(&mut wizard);

    wizard.advance(&aggregator(&base)).await;

    let results = wizard.results();
    assert_eq!(results.error, None);
    assert_eq!(results.fertilizer_recommendation_raw.as_deref(), Some("DAP"));
    assert_eq!(
        results.yield_prediction_summary.as_deref(),
        Some(
            "Could not generate AI summary for yield: Request failed with status code 503: Gemini API is not configured"
        )
    );
    assert_eq!(
        results.fertilizer_recommendation_summary.as_deref(),
        Some(
            "Could not generate AI summary for fertilizer: Request failed with status code 503: Gemini API is not configured"
        )
    );
}

#[tokio::test]
async fn reset_after_results_starts_a_fresh_plan() {
    let base = spawn_backend(healthy_backend()).await;
    let mut wizard = Wizard::new();
    fill_all_steps(&mut wizard);
    wizard.advance(&aggregator(&base)).await;

    wizard.reset();

    assert_eq!(wizard.step(), WizardStep::CropLocation);
    assert!(wizard.form().is_empty());
    assert!(wizard.results().is_empty());
    assert_eq!(wizard.next(), Transition::Blocked);
}
