use serde_json::json;

use leadflow_core::config::{AppConfig, LoadOptions};
use leadflow_core::funnel::{route, FunnelStep};
use leadflow_core::{LeadId, LeadProfile, LeadUpdate};

use super::CommandResult;

pub fn run(step: &str, answer: &str, profile: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("route", "config", error.to_string(), 2);
        }
    };

    let Some(step) = FunnelStep::from_path_segment(step) else {
        return CommandResult::failure(
            "route",
            "unknown_step",
            format!("`{step}` is not a known step slug"),
            2,
        );
    };

    let answer: LeadUpdate = match serde_json::from_str(answer) {
        Ok(answer) => answer,
        Err(error) => {
            return CommandResult::failure(
                "route",
                "malformed_answer",
                format!("answer payload is not valid JSON for the contract: {error}"),
                2,
            );
        }
    };

    let known_profile: LeadProfile = match profile {
        None => LeadProfile::default(),
        Some(raw) => match serde_json::from_str(raw) {
            Ok(profile) => profile,
            Err(error) => {
                return CommandResult::failure(
                    "route",
                    "malformed_profile",
                    format!("profile is not valid JSON for the contract: {error}"),
                    2,
                );
            }
        },
    };

    match route(&LeadId("cli".to_string()), step, answer, known_profile, &config.routing) {
        Ok(outcome) => {
            let payload = json!({
                "result": outcome.result,
                "profile": outcome.profile,
            });
            let output = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|error| format!("{{\"error\":\"{error}\"}}"));
            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult::failure("route", "validation", error.to_string(), 1),
    }
}
