use crate::api::api_error::APIError;
use crate::api::extract::JsonOrEmpty;
use crate::api::model::{CreateAddressRequest, CreateRuleRequest, ListResult};
use crate::api::server::AppState;
use crate::rules::update_existing_rule_enabled;
use crate::upstream::{fetch_all_pages, PageSet, UpstreamResponse};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::Value;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

type Passthrough = (StatusCode, Json<Value>);

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/addresses", get(list_addresses).post(create_address))
        .route("/api/addresses/:id", delete(delete_address))
        .route("/api/rules", get(list_rules).post(create_rule))
        .route("/api/rules/:id", delete(delete_rule))
        .route("/api/rules/:id/enable", post(enable_rule))
        .route("/api/rules/:id/disable", post(disable_rule))
        .route("/api/enable-routing", post(enable_routing))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

/// Relay a provider reply with its own status and body.
fn passthrough(response: UpstreamResponse) -> Passthrough {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (status, Json(response.body))
}

fn listing(pages: PageSet) -> Json<ListResult> {
    Json(ListResult {
        success: true,
        result: pages.items,
        result_info: pages.result_info,
    })
}

#[allow(clippy::unused_async)]
async fn health_check() -> &'static str {
    "ok"
}

async fn list_addresses(State(state): State<AppState>) -> Result<Json<ListResult>, APIError> {
    let path = state.config.addresses_path();
    let pages = fetch_all_pages(
        state.upstream.as_ref(),
        &path,
        &[],
        Some(state.config.page_size),
    )
    .await?;
    Ok(listing(pages))
}

async fn create_address(
    State(state): State<AppState>,
    WithRejection(JsonOrEmpty(payload), _): WithRejection<
        JsonOrEmpty<CreateAddressRequest>,
        APIError,
    >,
) -> Result<Passthrough, APIError> {
    let body = payload.upstream_body()?;
    let response = state
        .upstream
        .post(&state.config.addresses_path(), Some(&body))
        .await?;
    tracing::info!("registered destination address {}", body["email"]);
    Ok(passthrough(response))
}

async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Passthrough, APIError> {
    let response = state
        .upstream
        .delete(&state.config.address_path(&id))
        .await?;
    tracing::info!("deleted destination address {id}");
    Ok(passthrough(response))
}

async fn list_rules(State(state): State<AppState>) -> Result<Json<ListResult>, APIError> {
    let path = state.config.rules_path();
    let pages = fetch_all_pages(
        state.upstream.as_ref(),
        &path,
        &[],
        Some(state.config.page_size),
    )
    .await?;
    Ok(listing(pages))
}

async fn create_rule(
    State(state): State<AppState>,
    WithRejection(JsonOrEmpty(payload), _): WithRejection<
        JsonOrEmpty<CreateRuleRequest>,
        APIError,
    >,
) -> Result<Passthrough, APIError> {
    let rule = match payload.validate(&state.config.domain) {
        Ok(rule) => rule,
        Err(err) => {
            tracing::debug!("rejected rule creation: {err}");
            return Err(err.into());
        }
    };
    let response = state
        .upstream
        .post(&state.config.rules_path(), Some(&rule.upstream_body()))
        .await?;
    tracing::info!("created rule {} -> {}", rule.alias, rule.destination);
    Ok(passthrough(response))
}

async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Passthrough, APIError> {
    let response = state.upstream.delete(&state.config.rule_path(&id)).await?;
    tracing::info!("deleted rule {id}");
    Ok(passthrough(response))
}

async fn set_rule_enabled(
    state: &AppState,
    id: &str,
    enabled: bool,
) -> Result<Passthrough, APIError> {
    let response =
        update_existing_rule_enabled(state.upstream.as_ref(), &state.config, id, enabled).await?;
    tracing::info!("rule {id} enabled={enabled}");
    Ok(passthrough(response))
}

async fn enable_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Passthrough, APIError> {
    set_rule_enabled(&state, &id, true).await
}

async fn disable_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Passthrough, APIError> {
    set_rule_enabled(&state, &id, false).await
}

async fn enable_routing(State(state): State<AppState>) -> Result<Passthrough, APIError> {
    let response = state
        .upstream
        .post(&state.config.routing_dns_path(), None)
        .await?;
    tracing::info!("enabled email routing for zone {}", state.config.zone_id);
    Ok(passthrough(response))
}
