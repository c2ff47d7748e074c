use serde_json::json;

use leadflow_core::config::{AppConfig, LoadOptions};
use leadflow_core::funnel::scoring;
use leadflow_core::LeadProfile;

use super::CommandResult;

pub fn run(profile: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("score", "config", error.to_string(), 2);
        }
    };

    let profile: LeadProfile = match serde_json::from_str(profile) {
        Ok(profile) => profile,
        Err(error) => {
            return CommandResult::failure(
                "score",
                "malformed_profile",
                format!("profile is not valid JSON for the contract: {error}"),
                2,
            );
        }
    };

    let score = scoring::score(&profile, &config.routing.scoring);
    let thresholds = config.routing.thresholds;
    let tier = if score >= thresholds.demo_p0 {
        "demoBookingP0"
    } else if score >= thresholds.demo_p1 {
        "demoBookingP1"
    } else if score >= thresholds.demo_p2 {
        "demoBookingP2"
    } else {
        "selfSignup"
    };

    let payload = json!({ "score": score, "tier": tier });
    let output = serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
    CommandResult { exit_code: 0, output }
}
