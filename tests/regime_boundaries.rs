// tests/regime_boundaries.rs
//
// Boundary-exact regime classification via the public /regime endpoint,
// mirrored against the library classifier.

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use http::StatusCode;
use serde_json::Value;
use tokio::sync::OnceCell;
use tower::ServiceExt; // for `oneshot`

use bubble_risk_analyzer::{app, Regime};

static ROUTER: OnceCell<axum::Router> = OnceCell::const_new();

async fn test_app() -> axum::Router {
    ROUTER.get_or_init(|| async { app() }).await.clone()
}

async fn call_regime(score: i64) -> (StatusCode, Option<String>) {
    let router = test_app().await;
    let req = Request::builder()
        .method("GET")
        .uri(format!("/regime?score={score}"))
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    let label = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .and_then(|v| v["regime"].as_str().map(str::to_string));
    (status, label)
}

#[tokio::test]
async fn boundaries_are_exact_over_http() {
    for (score, expected) in [
        (0, "Healthy Expansion"),
        (34, "Healthy Expansion"),
        (35, "Late-Cycle Froth"),
        (54, "Late-Cycle Froth"),
        (55, "Bubble Risk Elevated"),
        (74, "Bubble Risk Elevated"),
        (75, "Bubble / Unwind Risk"),
        (100, "Bubble / Unwind Risk"),
    ] {
        let (status, label) = call_regime(score).await;
        assert_eq!(status, StatusCode::OK, "score {score}");
        assert_eq!(label.as_deref(), Some(expected), "score {score}");
    }
}

#[tokio::test]
async fn http_agrees_with_library_for_every_score() {
    for score in 0..=100i64 {
        let (status, label) = call_regime(score).await;
        assert_eq!(status, StatusCode::OK);
        let lib = Regime::from_score(score as u32);
        assert_eq!(label.as_deref(), Some(lib.label()), "score {score}");
    }
}
