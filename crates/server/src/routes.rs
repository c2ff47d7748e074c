//! The single routing contract:
//! `PATCH /leads/{lead_id}/funnel-step/{step_slug}` — partial update carrying
//! the answer payload for the current step. There is no server-side lead
//! store; the payload doubles as the caller's accumulated profile.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::patch,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use leadflow_core::config::AppConfig;
use leadflow_core::errors::{ApplicationError, InterfaceError};
use leadflow_core::funnel::{route, FunnelStep, RoutingResult};
use leadflow_core::{LeadId, LeadProfile, LeadUpdate};

#[derive(Clone)]
pub struct RoutingState {
    config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/leads/{lead_id}/funnel-step/{step_slug}", patch(route_funnel_step))
        .with_state(RoutingState { config })
}

pub async fn route_funnel_step(
    State(state): State<RoutingState>,
    Path((lead_id, step_slug)): Path<(String, String)>,
    payload: Result<Json<LeadUpdate>, JsonRejection>,
) -> Result<Json<RoutingResult>, (StatusCode, Json<ErrorResponse>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(answer) = payload.map_err(|rejection| {
        warn!(
            event_name = "funnel.request.malformed_body",
            correlation_id = %correlation_id,
            lead_id = %lead_id,
            detail = %rejection.body_text(),
            "rejecting malformed answer payload"
        );
        bad_request(&correlation_id)
    })?;

    let step = FunnelStep::from_path_segment(&step_slug).ok_or_else(|| {
        warn!(
            event_name = "funnel.request.unknown_step",
            correlation_id = %correlation_id,
            lead_id = %lead_id,
            segment = %step_slug,
            "rejecting request for unmapped funnel step"
        );
        bad_request(&correlation_id)
    })?;

    let lead = LeadId(lead_id);
    match route(&lead, step, answer, LeadProfile::default(), &state.config.routing) {
        Ok(outcome) => {
            info!(
                event_name = "funnel.request.resolved",
                correlation_id = %correlation_id,
                lead_id = lead.as_str(),
                current_step = step.wire_name(),
                next_step = outcome.result.next_funnel_step.wire_name(),
                "funnel step resolved"
            );
            Ok(Json(outcome.result))
        }
        Err(domain_error) => {
            Err(interface_response(ApplicationError::from(domain_error)
                .into_interface(correlation_id)))
        }
    }
}

fn bad_request(correlation_id: &str) -> (StatusCode, Json<ErrorResponse>) {
    interface_response(InterfaceError::BadRequest {
        message: "request rejected at the routing boundary".to_string(),
        correlation_id: correlation_id.to_string(),
    })
}

fn interface_response(error: InterfaceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(
            event_name = "funnel.request.failed",
            correlation_id = error.correlation_id(),
            detail = %error,
            "request failed"
        );
    } else {
        warn!(
            event_name = "funnel.request.rejected",
            correlation_id = error.correlation_id(),
            detail = %error,
            "request rejected"
        );
    }

    (status, Json(ErrorResponse { error: error.user_message().to_string() }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;

    use leadflow_core::config::AppConfig;
    use leadflow_core::funnel::FunnelStep;
    use leadflow_core::{Intent, LeadUpdate, SelfSignupProduct};

    use crate::routes::{route_funnel_step, RoutingState};

    fn state() -> RoutingState {
        RoutingState { config: Arc::new(AppConfig::default()) }
    }

    #[tokio::test]
    async fn resolves_a_step_addressed_by_slug() {
        let answer: LeadUpdate =
            serde_json::from_str(r#"{"erpSystem": "netsuite"}"#).expect("payload");

        let Json(result) = route_funnel_step(
            State(state()),
            Path(("lead-1".to_string(), "erp".to_string())),
            Ok(Json(answer)),
        )
        .await
        .expect("routable");

        assert_eq!(result.next_funnel_step, FunnelStep::SelfSignup);
        assert_eq!(result.intent, Intent::SelfServe);
        assert_eq!(result.self_signup_product, Some(SelfSignupProduct::CorporateCards));
    }

    #[tokio::test]
    async fn accepts_a_wire_name_as_degraded_fallback() {
        let answer: LeadUpdate =
            serde_json::from_str(r#"{"numberOfEmployees": "1"}"#).expect("payload");

        let Json(result) = route_funnel_step(
            State(state()),
            Path(("lead-2".to_string(), "numberOfEmployees".to_string())),
            Ok(Json(answer)),
        )
        .await
        .expect("routable");

        assert_eq!(result.next_funnel_step, FunnelStep::SelfSignup);
    }

    #[tokio::test]
    async fn unknown_step_segment_is_a_bad_request() {
        let answer: LeadUpdate =
            serde_json::from_str(r#"{"legalForm": "GmbH"}"#).expect("payload");

        let (status, Json(body)) = route_funnel_step(
            State(state()),
            Path(("lead-3".to_string(), "no-such-step".to_string())),
            Ok(Json(answer)),
        )
        .await
        .expect_err("unmapped step must be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn empty_answer_on_an_interactive_step_is_a_bad_request() {
        let (status, _body) = route_funnel_step(
            State(state()),
            Path(("lead-4".to_string(), "corporate-form".to_string())),
            Ok(Json(LeadUpdate::default())),
        )
        .await
        .expect_err("empty payload must be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
