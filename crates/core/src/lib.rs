pub mod config;
pub mod domain;
pub mod errors;
pub mod funnel;

pub use config::{AppConfig, DemoThresholds, RoutingConfig, ScoringConfig};
pub use domain::lead::{
    CardSpendBand, CreditRequired, EmployeeBand, EngagementStage, Intent, InvoiceVolumeBand,
    LeadId, LeadProfile, LeadUpdate,
};
pub use domain::product::{ProductInterest, SelfSignupProduct};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use funnel::{route, FunnelStep, Progress, RoutingOutcome, RoutingResult, StepKind};
