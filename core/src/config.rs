use crate::types::Period;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything a run needs, as read from a model file.
///
/// Validation is deferred to `ChainModel::from_config`; this struct is
/// plain data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub total_periods: Period,
    pub initial_population: usize,
    pub new_per_period: usize,
    /// Ordered state labels. Order fixes state indices and table output.
    pub possible_states: Vec<String>,
    /// States eligible for a newly created customer.
    pub possible_initial_states: Vec<String>,
    /// Optional non-uniform weights aligned with `possible_initial_states`.
    #[serde(default)]
    pub initial_state_weights: Option<Vec<f64>>,
    /// Current state -> (next state -> probability). Unlisted entries are 0.
    pub transition_probabilities: HashMap<String, HashMap<String, f64>>,
    /// Display codes, used only when rendering the history table.
    pub label_to_code: HashMap<String, i64>,
    /// Price per period of holding a state (products). Optional.
    #[serde(default)]
    pub prices: HashMap<String, f64>,
}

impl SimConfig {
    /// Load a model from a JSON file.
    /// In tests, use SimConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Three products plus an absorbing "churned" state.
    pub fn default_test() -> Self {
        let states = ["basic", "plus", "premium", "churned"];
        let rows: [(&str, [f64; 4]); 4] = [
            ("basic", [0.70, 0.15, 0.05, 0.10]),
            ("plus", [0.10, 0.70, 0.10, 0.10]),
            ("premium", [0.05, 0.10, 0.80, 0.05]),
            ("churned", [0.00, 0.00, 0.00, 1.00]),
        ];

        let transition_probabilities: HashMap<String, HashMap<String, f64>> = rows
            .iter()
            .map(|(from, probs)| {
                let row: HashMap<String, f64> = states
                    .iter()
                    .zip(probs.iter())
                    .filter(|(_, p)| **p > 0.0)
                    .map(|(to, p)| (to.to_string(), *p))
                    .collect();
                (from.to_string(), row)
            })
            .collect();

        Self {
            total_periods: 12,
            initial_population: 50,
            new_per_period: 5,
            possible_states: states.iter().map(|s| s.to_string()).collect(),
            possible_initial_states: vec!["basic".into(), "plus".into(), "premium".into()],
            initial_state_weights: None,
            transition_probabilities,
            label_to_code: states
                .iter()
                .enumerate()
                .map(|(i, s)| (s.to_string(), i as i64))
                .collect(),
            prices: HashMap::from([
                ("basic".into(), 5.0),
                ("plus".into(), 12.0),
                ("premium".into(), 25.0),
            ]),
        }
    }
}
