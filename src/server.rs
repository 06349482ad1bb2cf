use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::advisor::Advisor;
use crate::config::Config;
use crate::roster::loader::parse_roster;
use crate::roster::Roster;
use crate::types::{
    MatchState, MatchStateInput, Recommendation, SubstitutionRecommendation, TimelineRow,
};

const DEFAULT_TOP: usize = 5;

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    roster: Roster,
    advisor: Advisor,
}

impl ApiState {
    pub fn new(config: Config, roster: Roster, advisor: Advisor) -> Self {
        Self {
            config,
            roster,
            advisor,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct MatchRequest {
    #[serde(flatten)]
    state: MatchStateInput,
    roster: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidatesRequest {
    #[serde(flatten)]
    context: MatchRequest,
    top: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TimelineRequest {
    #[serde(flatten)]
    context: MatchRequest,
    player: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    rating_source: String,
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    recommendation: Recommendation,
    timeline: Vec<TimelineRow>,
}

#[derive(Debug, Serialize)]
struct CandidatesResponse {
    match_state: MatchState,
    candidates: Vec<SubstitutionRecommendation>,
}

#[derive(Debug, Serialize)]
struct TimelineResponse {
    match_state: MatchState,
    rows: Vec<TimelineRow>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/roster", get(show_roster))
        .route("/v1/recommend", post(recommend))
        .route("/v1/candidates", post(candidates))
        .route("/v1/timeline", post(timeline))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(state: ApiState, bind: SocketAddr) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<ApiState>) -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        rating_source: state.advisor.predictor_name().to_string(),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn show_roster(State(state): State<ApiState>) -> Json<ApiResponse<Roster>> {
    ok(state.roster)
}

async fn recommend(
    State(state): State<ApiState>,
    Json(request): Json<MatchRequest>,
) -> ApiResult<RecommendResponse> {
    let (match_state, roster) = resolve_request(&state, &request)?;
    let advice = state.advisor.recommend(&match_state, &roster);
    Ok(ok(RecommendResponse {
        recommendation: advice.recommendation,
        timeline: advice.timeline,
    }))
}

async fn candidates(
    State(state): State<ApiState>,
    Json(request): Json<CandidatesRequest>,
) -> ApiResult<CandidatesResponse> {
    let (match_state, roster) = resolve_request(&state, &request.context)?;
    let top = request.top.unwrap_or(DEFAULT_TOP);
    Ok(ok(CandidatesResponse {
        candidates: state.advisor.candidates(&match_state, &roster, top),
        match_state,
    }))
}

async fn timeline(
    State(state): State<ApiState>,
    Json(request): Json<TimelineRequest>,
) -> ApiResult<TimelineResponse> {
    let (match_state, roster) = resolve_request(&state, &request.context)?;
    if let Some(player) = &request.player {
        if roster.get(player).is_none() {
            return Err(ApiError::bad_request(format!("unknown player: {player}")));
        }
    }
    let mut rows = state.advisor.timeline(&match_state, &roster);
    if let Some(player) = &request.player {
        rows.retain(|row| &row.player_id == player);
    }
    Ok(ok(TimelineResponse { match_state, rows }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn resolve_request(
    state: &ApiState,
    request: &MatchRequest,
) -> std::result::Result<(MatchState, Roster), ApiError> {
    let match_state = request
        .state
        .resolve(&state.config.match_defaults, &state.config.inputs)
        .map_err(|error| ApiError::bad_request(error.to_string()))?;
    let roster = match &request.roster {
        Some(raw) => parse_roster(raw).map_err(|error| ApiError::bad_request(error.to_string()))?,
        None => state.roster.clone(),
    };
    Ok((match_state, roster))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{build_router, ApiState};
    use crate::advisor::Advisor;
    use crate::config::{Config, InputPolicy};
    use crate::rating::MeanAttributeRating;
    use crate::roster::Roster;

    fn state(config: Config) -> ApiState {
        let advisor = Advisor::new(config.model.clone(), Arc::new(MeanAttributeRating));
        ApiState::new(config, Roster::sample(), advisor)
    }

    fn call(state: ApiState, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        tokio_test::block_on(async move {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds");
            let response = build_router(state)
                .oneshot(request)
                .await
                .expect("router responds");
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("body reads");
            let payload = serde_json::from_slice(&bytes).expect("body is JSON");
            (status, payload)
        })
    }

    #[test]
    fn health_reports_rating_source() {
        let (status, payload) = call(state(Config::default()), "GET", "/health", json!({}));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["data"]["rating_source"], "mean_attributes");
    }

    #[test]
    fn recommend_uses_defaults_for_missing_fields() {
        let (status, payload) = call(
            state(Config::default()),
            "POST",
            "/v1/recommend",
            json!({ "wbgt": 34.0, "altitude_m": 2400.0 }),
        );
        assert_eq!(status, StatusCode::OK);
        let data = &payload["data"];
        assert_eq!(data["recommendation"]["match_state"]["minute"], 65);
        assert_eq!(data["timeline"].as_array().map(Vec::len), Some(91 * 8));
        let pressing = data["recommendation"]["pressing"]["level"].as_str();
        assert!(matches!(pressing, Some("low" | "medium" | "high")));
    }

    #[test]
    fn reject_policy_returns_bad_request() {
        let mut config = Config::default();
        config.inputs.policy = InputPolicy::Reject;
        let (status, payload) = call(state(config), "POST", "/v1/recommend", json!({ "minute": 95 }));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["ok"], false);
        assert!(payload["error"].as_str().unwrap_or_default().contains("minute"));
    }

    #[test]
    fn inline_roster_with_missing_field_is_rejected() {
        let roster = json!({
            "pitch": [{ "id": "solo", "position": "Forward", "age": 22, "pace": 80 }],
            "bench": []
        });
        let (status, payload) = call(
            state(Config::default()),
            "POST",
            "/v1/recommend",
            json!({ "roster": roster }),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().unwrap_or_default().contains("shooting"));
    }

    #[test]
    fn timeline_filters_to_one_player() {
        let (status, payload) = call(
            state(Config::default()),
            "POST",
            "/v1/timeline",
            json!({ "player": "P17_Weah", "minute": 30 }),
        );
        assert_eq!(status, StatusCode::OK);
        let rows = payload["data"]["rows"].as_array().expect("rows array");
        assert_eq!(rows.len(), 91);
        assert!(rows.iter().all(|r| r["player_id"] == "P17_Weah"));
    }

    #[test]
    fn candidates_are_ranked() {
        let (status, payload) = call(
            state(Config::default()),
            "POST",
            "/v1/candidates",
            json!({ "top": 4, "risk_aversion": 0.5 }),
        );
        assert_eq!(status, StatusCode::OK);
        let candidates = payload["data"]["candidates"].as_array().expect("array");
        assert_eq!(candidates.len(), 4);
        let scores = candidates
            .iter()
            .map(|c| c["score"].as_f64().unwrap_or(f64::NAN))
            .collect::<Vec<_>>();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
