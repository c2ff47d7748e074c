use serde::{Deserialize, Serialize};
use tracing::warn;

/// Every node in the funnel state machine, question steps and outcome
/// destinations alike. Single source of truth: the URL slug, the wire name,
/// and the interactive/outcome split all hang off this enum so the lookup
/// tables cannot drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunnelStep {
    Email,
    NumberOfEmployees,
    RegistrationCountry,
    IsMicroEntityTurnoverExceeded,
    LegalForm,
    ProductInterests,
    CardSpend,
    CardSpendSmallSpender,
    IsCreditRequired,
    NumberOfInvoices,
    FunnelIntent,
    EngagementStage,
    ErpSystem,
    Waitlist,
    NotForYou,
    DemoBookingP0,
    DemoBookingP1,
    DemoBookingP2,
    SelfSignup,
}

/// Whether a step asks a question or ends the funnel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    Interactive,
    Outcome,
}

/// Progress metadata derived from the canonical step order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub step_number: u32,
    pub total_steps: u32,
}

/// The interactive steps in canonical funnel order. Drives progress
/// reporting and must stay in lockstep with the transition edges.
pub const CANONICAL_ORDER: [FunnelStep; 9] = [
    FunnelStep::Email,
    FunnelStep::NumberOfEmployees,
    FunnelStep::RegistrationCountry,
    FunnelStep::LegalForm,
    FunnelStep::ProductInterests,
    FunnelStep::CardSpend,
    FunnelStep::IsCreditRequired,
    FunnelStep::NumberOfInvoices,
    FunnelStep::ErpSystem,
];

impl FunnelStep {
    pub const ALL: [FunnelStep; 19] = [
        FunnelStep::Email,
        FunnelStep::NumberOfEmployees,
        FunnelStep::RegistrationCountry,
        FunnelStep::IsMicroEntityTurnoverExceeded,
        FunnelStep::LegalForm,
        FunnelStep::ProductInterests,
        FunnelStep::CardSpend,
        FunnelStep::CardSpendSmallSpender,
        FunnelStep::IsCreditRequired,
        FunnelStep::NumberOfInvoices,
        FunnelStep::FunnelIntent,
        FunnelStep::EngagementStage,
        FunnelStep::ErpSystem,
        FunnelStep::Waitlist,
        FunnelStep::NotForYou,
        FunnelStep::DemoBookingP0,
        FunnelStep::DemoBookingP1,
        FunnelStep::DemoBookingP2,
        FunnelStep::SelfSignup,
    ];

    pub fn kind(self) -> StepKind {
        match self {
            FunnelStep::Waitlist
            | FunnelStep::NotForYou
            | FunnelStep::DemoBookingP0
            | FunnelStep::DemoBookingP1
            | FunnelStep::DemoBookingP2
            | FunnelStep::SelfSignup => StepKind::Outcome,
            _ => StepKind::Interactive,
        }
    }

    pub fn is_outcome(self) -> bool {
        self.kind() == StepKind::Outcome
    }

    /// Backend wire name, identical to the serde representation.
    pub fn wire_name(self) -> &'static str {
        match self {
            FunnelStep::Email => "email",
            FunnelStep::NumberOfEmployees => "numberOfEmployees",
            FunnelStep::RegistrationCountry => "registrationCountry",
            FunnelStep::IsMicroEntityTurnoverExceeded => "isMicroEntityTurnoverExceeded",
            FunnelStep::LegalForm => "legalForm",
            FunnelStep::ProductInterests => "productInterests",
            FunnelStep::CardSpend => "cardSpend",
            FunnelStep::CardSpendSmallSpender => "cardSpendSmallSpender",
            FunnelStep::IsCreditRequired => "isCreditRequired",
            FunnelStep::NumberOfInvoices => "numberOfInvoices",
            FunnelStep::FunnelIntent => "funnelIntent",
            FunnelStep::EngagementStage => "engagementStage",
            FunnelStep::ErpSystem => "erpSystem",
            FunnelStep::Waitlist => "waitlist",
            FunnelStep::NotForYou => "notForYou",
            FunnelStep::DemoBookingP0 => "demoBookingP0",
            FunnelStep::DemoBookingP1 => "demoBookingP1",
            FunnelStep::DemoBookingP2 => "demoBookingP2",
            FunnelStep::SelfSignup => "selfSignup",
        }
    }

    /// Human-readable URL path segment for this step.
    pub fn slug(self) -> &'static str {
        match self {
            FunnelStep::Email => "email",
            FunnelStep::NumberOfEmployees => "employees",
            FunnelStep::RegistrationCountry => "registration-country",
            FunnelStep::IsMicroEntityTurnoverExceeded => "micro-entity-turnover",
            FunnelStep::LegalForm => "corporate-form",
            FunnelStep::ProductInterests => "pick-solution",
            FunnelStep::CardSpend => "card-spend",
            FunnelStep::CardSpendSmallSpender => "card-spend-small",
            FunnelStep::IsCreditRequired => "is-credit-required",
            FunnelStep::NumberOfInvoices => "number-of-invoices",
            FunnelStep::FunnelIntent => "funnel-intent",
            FunnelStep::EngagementStage => "engagement-stage",
            FunnelStep::ErpSystem => "erp",
            FunnelStep::Waitlist => "waitlist",
            FunnelStep::NotForYou => "not-for-you",
            FunnelStep::DemoBookingP0 => "book-demo-p0",
            FunnelStep::DemoBookingP1 => "book-demo-p1",
            FunnelStep::DemoBookingP2 => "book-demo-p2",
            FunnelStep::SelfSignup => "self-onboarding",
        }
    }

    pub fn from_slug(value: &str) -> Option<FunnelStep> {
        Self::ALL.iter().copied().find(|step| step.slug() == value)
    }

    pub fn from_wire_name(value: &str) -> Option<FunnelStep> {
        Self::ALL.iter().copied().find(|step| step.wire_name() == value)
    }

    /// Resolve a URL path segment to a step. Slugs are the expected form;
    /// a raw wire name is accepted as a degraded identity fallback and
    /// logged, so an out-of-sync caller keeps working while the drift is
    /// visible in diagnostics.
    pub fn from_path_segment(value: &str) -> Option<FunnelStep> {
        if let Some(step) = Self::from_slug(value) {
            return Some(step);
        }
        let fallback = Self::from_wire_name(value);
        if let Some(step) = fallback {
            warn!(
                event_name = "funnel.step.slug_fallback",
                segment = value,
                resolved = step.wire_name(),
                "path segment is not a known slug, resolved via wire name"
            );
        }
        fallback
    }

    /// 1-based funnel position. Steps outside the canonical order (outcomes
    /// and the alternate/legacy question steps) report position 1; their
    /// progress is meaningless to callers by contract.
    pub fn progress(self) -> Progress {
        let step_number = CANONICAL_ORDER
            .iter()
            .position(|step| *step == self)
            .map(|index| index as u32 + 1)
            .unwrap_or(1);
        Progress { step_number, total_steps: CANONICAL_ORDER.len() as u32 }
    }
}
