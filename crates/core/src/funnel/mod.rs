pub mod product;
pub mod routing;
pub mod scoring;
pub mod steps;
pub mod transition;

pub use routing::{route, RoutingOutcome, RoutingResult};
pub use steps::{FunnelStep, Progress, StepKind, CANONICAL_ORDER};
pub use transition::{transition, Transition};
