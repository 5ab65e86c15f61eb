use std::env;

/// Route polled when `BUSES_ROUTE_ID` is not set.
pub const DEFAULT_ROUTE_ID: &str = "14";

/// Position table queried when `BUSES_TABLE_NAME` is not set.
pub const DEFAULT_TABLE_NAME: &str = "TaipLocationData-dev";

/// Vehicles looked up in the position store when not reporting live.
pub const DEFAULT_ROSTER: [&str; 5] = ["0135", "0143", "0754", "0756", "0757"];

/// Per-deployment settings for the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub route_id: String,
    pub roster: Vec<String>,
    pub table_name: String,
    pub concurrent_fallback: bool,
}

impl TrackerConfig {
    /// Defaults overridden by `BUSES_ROUTE_ID`, `BUSES_ROSTER`,
    /// `BUSES_TABLE_NAME` and `BUSES_CONCURRENT_FALLBACK`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let route_id = env::var("BUSES_ROUTE_ID").unwrap_or_else(|_| {
            tracing::trace!("BUSES_ROUTE_ID not set, using default: {DEFAULT_ROUTE_ID}");
            defaults.route_id
        });
        let roster = env::var("BUSES_ROSTER")
            .map(|value| parse_list(&value))
            .unwrap_or(defaults.roster);
        let table_name = env::var("BUSES_TABLE_NAME").unwrap_or(defaults.table_name);
        let concurrent_fallback = env::var("BUSES_CONCURRENT_FALLBACK")
            .map(|value| parse_bool(&value))
            .unwrap_or(defaults.concurrent_fallback);

        Self { route_id, roster, table_name, concurrent_fallback }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            route_id: DEFAULT_ROUTE_ID.to_string(),
            roster: DEFAULT_ROSTER.iter().map(ToString::to_string).collect(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            concurrent_fallback: false,
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|entry| !entry.is_empty()).map(String::from).collect()
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
