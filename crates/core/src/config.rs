use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::lead::{CardSpendBand, EmployeeBand, InvoiceVolumeBand};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub routing: RoutingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Business rules for the routing engine. Thresholds and point tables are
/// configuration, not code, so they can be tuned without touching the state
/// machine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// ISO-3166-1 alpha-2 codes accepted at the country gate.
    pub supported_countries: Vec<String>,
    pub thresholds: DemoThresholds,
    pub scoring: ScoringConfig,
}

/// Minimum scores for the demo-booking tiers, inclusive on the lower bound.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoThresholds {
    pub demo_p0: u32,
    pub demo_p1: u32,
    pub demo_p2: u32,
}

/// Additive sub-score tables. Band tables are indexed by the band's rank.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub employee_band_points: Vec<u32>,
    pub spend_level_points: Vec<u32>,
    /// Applied when the spend band is unset; most leads reaching the spend
    /// step have some spend, so this is non-zero.
    pub fallback_spend_points: u32,
    pub invoice_band_points: Vec<u32>,
    pub credit_required_points: u32,
    pub credit_optional_points: u32,
    pub multi_interest_points: u32,
    pub single_interest_points: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            routing: RoutingConfig::default(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            supported_countries: ["DE", "NL", "GB", "AT", "FR", "ES", "IT", "BE", "LU", "IE"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            thresholds: DemoThresholds::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Default for DemoThresholds {
    fn default() -> Self {
        Self { demo_p0: 70, demo_p1: 50, demo_p2: 30 }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            employee_band_points: vec![0, 5, 10, 15, 20, 25, 30],
            spend_level_points: vec![2, 2, 5, 10, 15, 20, 25, 30],
            fallback_spend_points: 2,
            invoice_band_points: vec![2, 4, 6, 8, 10],
            credit_required_points: 20,
            credit_optional_points: 5,
            multi_interest_points: 10,
            single_interest_points: 5,
        }
    }
}

impl RoutingConfig {
    /// Country gate membership check, case-insensitive over alpha-2 codes.
    pub fn is_supported_country(&self, code: &str) -> bool {
        let upper = code.trim().to_ascii_uppercase();
        self.supported_countries.iter().any(|supported| supported == &upper)
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("leadflow.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(routing) = patch.routing {
            self.routing = routing;
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LEADFLOW_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("LEADFLOW_SERVER_PORT") {
            self.server.port = parse_u16("LEADFLOW_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("LEADFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("LEADFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("LEADFLOW_ROUTING_SUPPORTED_COUNTRIES") {
            self.routing.supported_countries = value
                .split(',')
                .map(|code| code.trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect();
        }

        let log_level =
            read_env("LEADFLOW_LOGGING_LEVEL").or_else(|| read_env("LEADFLOW_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LEADFLOW_LOGGING_FORMAT").or_else(|| read_env("LEADFLOW_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        validate_routing(&self.routing)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("leadflow.toml"), PathBuf::from("config/leadflow.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_routing(routing: &RoutingConfig) -> Result<(), ConfigError> {
    if routing.supported_countries.is_empty() {
        return Err(ConfigError::Validation(
            "routing.supported_countries must not be empty".to_string(),
        ));
    }
    for code in &routing.supported_countries {
        let valid = code.len() == 2 && code.chars().all(|ch| ch.is_ascii_uppercase());
        if !valid {
            return Err(ConfigError::Validation(format!(
                "routing.supported_countries entries must be upper-case alpha-2 codes, got `{code}`"
            )));
        }
    }

    let thresholds = routing.thresholds;
    if !(thresholds.demo_p0 > thresholds.demo_p1 && thresholds.demo_p1 > thresholds.demo_p2) {
        return Err(ConfigError::Validation(
            "routing.thresholds must be strictly descending: demo_p0 > demo_p1 > demo_p2"
                .to_string(),
        ));
    }
    if thresholds.demo_p2 == 0 {
        return Err(ConfigError::Validation(
            "routing.thresholds.demo_p2 must be greater than zero".to_string(),
        ));
    }

    let scoring = &routing.scoring;
    validate_points_table(
        "routing.scoring.employee_band_points",
        &scoring.employee_band_points,
        EmployeeBand::ALL.len(),
    )?;
    validate_points_table(
        "routing.scoring.spend_level_points",
        &scoring.spend_level_points,
        CardSpendBand::LEVELS,
    )?;
    validate_points_table(
        "routing.scoring.invoice_band_points",
        &scoring.invoice_band_points,
        InvoiceVolumeBand::ALL.len(),
    )?;

    Ok(())
}

fn validate_points_table(name: &str, table: &[u32], expected_len: usize) -> Result<(), ConfigError> {
    if table.len() != expected_len {
        return Err(ConfigError::Validation(format!(
            "{name} must have exactly {expected_len} entries, got {}",
            table.len()
        )));
    }
    if table.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(ConfigError::Validation(format!(
            "{name} must be monotonically non-decreasing"
        )));
    }
    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
    routing: Option<RoutingConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
