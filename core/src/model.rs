//! The validated, read-only Markov chain shared by every customer.
//!
//! Built once from a `SimConfig`; any malformed table is rejected here,
//! before a single draw is made. Customers hold it behind an `Arc`.

use crate::{
    config::SimConfig,
    error::ConfigError,
    sampling::{self, PROBABILITY_TOLERANCE},
    types::StateId,
};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ChainModel {
    labels: Vec<String>,
    index: HashMap<String, StateId>,
    /// rows[from][to], dense, in label order. Every row has exactly
    /// `labels.len()` entries.
    rows: Vec<Vec<f64>>,
    initial_states: Vec<StateId>,
    initial_weights: Vec<f64>,
    /// Display codes; states missing from `label_to_code` render uncoded.
    codes: Vec<Option<i64>>,
}

impl ChainModel {
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        if config.possible_states.is_empty() {
            return Err(ConfigError::NoStates);
        }

        let mut index = HashMap::with_capacity(config.possible_states.len());
        for (i, label) in config.possible_states.iter().enumerate() {
            if index.insert(label.clone(), StateId(i)).is_some() {
                return Err(ConfigError::DuplicateState { label: label.clone() });
            }
        }
        let lookup = |label: &str, context: &str| {
            index.get(label).copied().ok_or_else(|| ConfigError::UnknownState {
                label: label.to_string(),
                context: context.to_string(),
            })
        };

        for from in config.transition_probabilities.keys() {
            lookup(from, "transition_probabilities")?;
        }

        let n = config.possible_states.len();
        let mut rows = Vec::with_capacity(n);
        for from in &config.possible_states {
            let entries = config
                .transition_probabilities
                .get(from)
                .ok_or_else(|| ConfigError::MissingRow { state: from.clone() })?;
            let mut row = vec![0.0; n];
            for (to, &p) in entries {
                let to_id = lookup(to, &format!("row '{from}'"))?;
                row[to_id.index()] = p;
            }
            check_row(from, &config.possible_states, &row)?;
            rows.push(row);
        }

        if config.possible_initial_states.is_empty() {
            return Err(ConfigError::NoInitialStates);
        }
        let initial_states = config
            .possible_initial_states
            .iter()
            .map(|s| lookup(s, "possible_initial_states"))
            .collect::<Result<Vec<_>, _>>()?;

        let initial_weights = match &config.initial_state_weights {
            None => sampling::uniform_weights(initial_states.len()),
            Some(w) if w.len() != initial_states.len() => {
                return Err(ConfigError::InitialWeights {
                    reason: format!("{} weights for {} initial states", w.len(), initial_states.len()),
                })
            }
            Some(w) => {
                sampling::check_distribution(w)
                    .map_err(|e| ConfigError::InitialWeights { reason: e.to_string() })?;
                w.clone()
            }
        };

        for label in config.label_to_code.keys() {
            lookup(label, "label_to_code")?;
        }
        let codes = config
            .possible_states
            .iter()
            .map(|s| config.label_to_code.get(s).copied())
            .collect();

        Ok(Self {
            labels: config.possible_states.clone(),
            index,
            rows,
            initial_states,
            initial_weights,
            codes,
        })
    }

    pub fn state_count(&self) -> usize {
        self.labels.len()
    }

    pub fn label(&self, state: StateId) -> &str {
        &self.labels[state.index()]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn state_id(&self, label: &str) -> Option<StateId> {
        self.index.get(label).copied()
    }

    pub fn code(&self, state: StateId) -> Option<i64> {
        self.codes[state.index()]
    }

    /// Next-state distribution for `state`, in label order.
    pub fn row(&self, state: StateId) -> &[f64] {
        &self.rows[state.index()]
    }

    pub fn initial_states(&self) -> &[StateId] {
        &self.initial_states
    }

    pub fn initial_weights(&self) -> &[f64] {
        &self.initial_weights
    }

    /// A state whose row sends all mass back to itself.
    pub fn is_absorbing(&self, state: StateId) -> bool {
        (self.row(state)[state.index()] - 1.0).abs() <= PROBABILITY_TOLERANCE
    }

    pub fn absorbing_states(&self) -> Vec<StateId> {
        (0..self.state_count())
            .map(StateId)
            .filter(|s| self.is_absorbing(*s))
            .collect()
    }
}

fn check_row(from: &str, labels: &[String], row: &[f64]) -> Result<(), ConfigError> {
    for (to, &value) in labels.iter().zip(row) {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidProbability {
                from: from.to_string(),
                to: to.clone(),
                value,
            });
        }
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ConfigError::RowSum {
            state: from.to_string(),
            sum,
        });
    }
    Ok(())
}
