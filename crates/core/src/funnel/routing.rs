use serde::Serialize;
use tracing::info;

use crate::config::RoutingConfig;
use crate::domain::lead::{Intent, LeadId, LeadProfile, LeadUpdate};
use crate::domain::product::SelfSignupProduct;
use crate::errors::DomainError;
use crate::funnel::product::select_self_signup_product;
use crate::funnel::steps::{FunnelStep, StepKind};
use crate::funnel::transition::transition;

/// One routing decision, serialized to the wire contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingResult {
    pub next_funnel_step: FunnelStep,
    pub waitlist_reason: Option<FunnelStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_signup_product: Option<SelfSignupProduct>,
    pub intent: Intent,
    pub total_steps: u32,
    pub step_number: u32,
}

/// Routing decision plus the merged profile. The caller owns the profile;
/// returning the merged copy keeps the accumulation explicit instead of
/// mutating shared state.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutingOutcome {
    pub result: RoutingResult,
    pub profile: LeadProfile,
}

/// Route one answer submission: merge, transition, compute progress and
/// intent, and attach a product recommendation when the lead self-signs-up.
/// Pure apart from diagnostic logging.
pub fn route(
    lead_id: &LeadId,
    current_step: FunnelStep,
    answer: LeadUpdate,
    known_profile: LeadProfile,
    config: &RoutingConfig,
) -> Result<RoutingOutcome, DomainError> {
    if lead_id.as_str().trim().is_empty() {
        return Err(DomainError::MissingLeadId);
    }
    if current_step.kind() == StepKind::Interactive && answer.is_empty() {
        return Err(DomainError::EmptyAnswerPayload { step: current_step });
    }

    let explicit_intent = answer.funnel_intent;
    let merged = known_profile.merge(answer.clone());
    let transition = transition(current_step, &answer, &merged, config);

    let progress = transition.next_step.progress();
    let intent = classify_intent(explicit_intent, transition.next_step);

    let self_signup_product = (transition.next_step == FunnelStep::SelfSignup)
        .then(|| select_self_signup_product(&merged));

    let result = RoutingResult {
        next_funnel_step: transition.next_step,
        waitlist_reason: transition.waitlist_reason,
        self_signup_product,
        intent,
        total_steps: progress.total_steps,
        step_number: progress.step_number,
    };

    info!(
        event_name = "funnel.route_resolved",
        lead_id = lead_id.as_str(),
        current_step = current_step.wire_name(),
        next_step = result.next_funnel_step.wire_name(),
        waitlisted = result.waitlist_reason.is_some(),
        "routing decision computed"
    );

    Ok(RoutingOutcome { result, profile: merged })
}

/// Explicitly submitted intent wins by default; self-serve and the two
/// higher-priority demo tiers override it based on the routing outcome.
fn classify_intent(explicit: Option<Intent>, next_step: FunnelStep) -> Intent {
    match next_step {
        FunnelStep::SelfSignup => Intent::SelfServe,
        FunnelStep::DemoBookingP0 | FunnelStep::DemoBookingP1 => Intent::Intro,
        _ => explicit.unwrap_or(Intent::Unknown),
    }
}
