use std::env;
use std::sync::{Mutex, OnceLock};

use leadflow_cli::commands::{route, score};
use serde_json::Value;

#[test]
fn route_resolves_a_sole_trader_shortcut() {
    with_env(&[], || {
        let result = route::run("employees", r#"{"numberOfEmployees": "1"}"#, None);
        assert_eq!(result.exit_code, 0, "expected successful routing");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["result"]["nextFunnelStep"], "selfSignup");
        assert_eq!(payload["result"]["intent"], "SELF_SERVE");
        assert_eq!(payload["profile"]["numberOfEmployees"], "1");
    });
}

#[test]
fn route_threads_the_known_profile_through_the_decision() {
    with_env(&[], || {
        let result = route::run(
            "pick-solution",
            r#"{"productInterest": ["corporate-cards"]}"#,
            Some(r#"{"numberOfEmployees": "11 - 25"}"#),
        );
        assert_eq!(result.exit_code, 0, "expected successful routing");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["result"]["nextFunnelStep"], "cardSpendSmallSpender");
        assert_eq!(payload["profile"]["numberOfEmployees"], "11 - 25");
    });
}

#[test]
fn route_rejects_an_unknown_step_slug() {
    with_env(&[], || {
        let result = route::run("no-such-step", r#"{"legalForm": "GmbH"}"#, None);
        assert_eq!(result.exit_code, 2, "expected unknown-step failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "route");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unknown_step");
    });
}

#[test]
fn route_rejects_a_malformed_answer_payload() {
    with_env(&[], || {
        let result = route::run("erp", r#"{"cardSpend": "not-a-band"}"#, None);
        assert_eq!(result.exit_code, 2, "expected malformed-answer failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "malformed_answer");
    });
}

#[test]
fn score_reports_score_and_tier() {
    with_env(&[], || {
        let result = score::run(
            r#"{
                "numberOfEmployees": ">300",
                "cardSpend": ">200k",
                "isCreditRequired": "Yes",
                "numberOfInvoices": ">500",
                "productInterest": ["accounts-payable", "corporate-cards"]
            }"#,
        );
        assert_eq!(result.exit_code, 0, "expected successful scoring");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["score"], 100);
        assert_eq!(payload["tier"], "demoBookingP0");
    });
}

#[test]
fn score_of_an_empty_profile_lands_in_self_signup() {
    with_env(&[], || {
        let result = score::run("{}");
        assert_eq!(result.exit_code, 0, "expected successful scoring");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["score"], 7);
        assert_eq!(payload["tier"], "selfSignup");
    });
}

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const MANAGED_VARS: [&str; 4] = [
    "LEADFLOW_SERVER_PORT",
    "LEADFLOW_LOG_LEVEL",
    "LEADFLOW_LOG_FORMAT",
    "LEADFLOW_ROUTING_SUPPORTED_COUNTRIES",
];

fn with_env(vars: &[(&str, &str)], run: impl FnOnce()) {
    let _guard = env_lock().lock().expect("env lock");
    for var in MANAGED_VARS {
        env::remove_var(var);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    run();

    for (key, _) in vars {
        env::remove_var(key);
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be JSON")
}
