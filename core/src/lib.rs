//! churnsim-core — population simulation of customers moving through a
//! discrete-time Markov chain of product states.
//!
//! A `Simulation` owns the customers, advances them period by period,
//! injects new cohorts and reduces their staggered histories into one
//! rectangular `HistoryTable`.

pub mod aggregate;
pub mod config;
pub mod customer;
pub mod error;
pub mod history;
pub mod model;
pub mod name_generator;
pub mod rng;
pub mod sampling;
pub mod simulation;
pub mod types;

pub use aggregate::StateCounts;
pub use config::SimConfig;
pub use customer::Customer;
pub use error::{ConfigError, LifecycleError, SamplingError, SimError, SimResult};
pub use history::{HistoryRow, HistoryTable};
pub use model::ChainModel;
pub use name_generator::{NameGenerator, NameSource, SequentialNames};
pub use rng::{RandomSource, RngBank, SimRng, StreamSlot};
pub use simulation::{RunPhase, Simulation};
pub use types::{HistoryCell, Period, StateId};
