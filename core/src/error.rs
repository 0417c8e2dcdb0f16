use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Malformed model: rejected before any sampling happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("possible_states is empty")]
    NoStates,

    #[error("state '{label}' is listed more than once")]
    DuplicateState { label: String },

    #[error("possible_initial_states is empty")]
    NoInitialStates,

    #[error("unknown state '{label}' referenced by {context}")]
    UnknownState { label: String, context: String },

    #[error("no transition row for state '{state}'")]
    MissingRow { state: String },

    #[error("transition row for '{state}' sums to {sum}, expected 1")]
    RowSum { state: String, sum: f64 },

    #[error("probability {from} -> {to} is {value}")]
    InvalidProbability { from: String, to: String, value: f64 },

    #[error("initial_state_weights: {reason}")]
    InitialWeights { reason: String },
}

/// Out-of-order or re-entrant calls on the simulator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("customers already created ({existing} >= {target}); reinitialize the simulation")]
    AlreadyPopulated { existing: usize, target: usize },

    #[error("population holds {existing} customers, more than the initial {target}; reinitialize the simulation")]
    PopulationOverrun { existing: usize, target: usize },

    #[error("simulation already ran to completion")]
    AlreadyCompleted,

    #[error("a previous run failed; the simulation state is invalid")]
    Poisoned,

    #[error("customer '{customer_id}' was transitioned outside run_simulation")]
    TransitionedOutsideRun { customer_id: String },

    #[error("history table is only available after a completed run")]
    NotCompleted,

    #[error("history of '{customer_id}' has {len} entries, table width is {width}")]
    HistoryOverflow { customer_id: String, len: usize, width: usize },
}

/// A probability vector that cannot be sampled from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    #[error("distribution is empty")]
    Empty,

    #[error("weight {index} is {value}")]
    InvalidWeight { index: usize, value: f64 },

    #[error("weights sum to {sum}, expected 1")]
    NotNormalized { sum: f64 },

    #[error("random source returned {roll}, outside [0, 1)")]
    InvalidRoll { roll: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
