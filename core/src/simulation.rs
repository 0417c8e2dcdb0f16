//! The population simulator.
//!
//! EXECUTION ORDER per period p (fixed, never reordered):
//!   1. Every existing customer transitions once, in creation order.
//!   2. `new_per_period` customers are created, in order.
//!   3. Each newborn's history is left-padded with p absence markers.
//!
//! RULES:
//!   - Newborns are never transitioned in the period they are born.
//!   - All randomness flows through the injected `RandomSource`.
//!   - A failed run poisons the simulator; build a new one.

use crate::{
    config::SimConfig,
    customer::Customer,
    error::{LifecycleError, SimError, SimResult},
    history::HistoryTable,
    model::ChainModel,
    name_generator::{NameGenerator, NameSource},
    rng::{RandomSource, RngBank, StreamSlot},
    types::Period,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Fresh,
    Running,
    Completed,
    Failed,
}

pub struct Simulation {
    config: SimConfig,
    model: Arc<ChainModel>,
    rng: Box<dyn RandomSource>,
    names: Box<dyn NameSource>,
    customers: Vec<Customer>,
    period: Period,
    phase: RunPhase,
    history: Option<HistoryTable>,
}

impl Simulation {
    /// Validate the model and wire the collaborators. No draws happen here.
    pub fn new(
        config: SimConfig,
        rng: Box<dyn RandomSource>,
        names: Box<dyn NameSource>,
    ) -> SimResult<Self> {
        let model = Arc::new(ChainModel::from_config(&config)?);
        Ok(Self {
            config,
            model,
            rng,
            names,
            customers: Vec::new(),
            period: 0,
            phase: RunPhase::Fresh,
            history: None,
        })
    }

    /// Production wiring: chain draws and names on separate seeded streams.
    pub fn seeded(config: SimConfig, seed: u64) -> SimResult<Self> {
        let bank = RngBank::new(seed);
        Self::new(
            config,
            Box::new(bank.for_stream(StreamSlot::Chain)),
            Box::new(NameGenerator::new(bank.for_stream(StreamSlot::Identity))),
        )
    }

    /// Create the initial cohort. Call at most once per run.
    pub fn create_customers(&mut self) -> SimResult<()> {
        self.ensure_usable()?;
        let target = self.config.initial_population;
        if !self.customers.is_empty() && self.customers.len() >= target {
            return Err(LifecycleError::AlreadyPopulated {
                existing: self.customers.len(),
                target,
            }
            .into());
        }
        if let Err(e) = self.spawn(target, 0) {
            self.phase = RunPhase::Failed;
            return Err(e);
        }
        log::info!("created {target} initial customers");
        Ok(())
    }

    /// Transition every current customer once, in creation order.
    pub fn one_period_transition(&mut self) -> SimResult<()> {
        self.ensure_usable()?;
        if let Err(e) = self.transition_all() {
            self.phase = RunPhase::Failed;
            return Err(e);
        }
        Ok(())
    }

    /// Run all `total_periods` periods and derive the history table.
    pub fn run_simulation(&mut self) -> SimResult<&HistoryTable> {
        if let Err(e) = self.check_run_entry() {
            log::warn!("run refused: {e}");
            return Err(e);
        }
        if self.customers.is_empty() && self.config.initial_population > 0 {
            self.create_customers()?;
        }

        self.phase = RunPhase::Running;
        log::info!(
            "run started: {} periods, {} customers, {} new per period",
            self.config.total_periods,
            self.customers.len(),
            self.config.new_per_period
        );
        for _ in 0..self.config.total_periods {
            if let Err(e) = self.advance_period() {
                self.phase = RunPhase::Failed;
                log::warn!("run failed at period {}: {e}", self.period);
                return Err(e);
            }
        }
        self.phase = RunPhase::Completed;
        log::info!("run completed: {} customers", self.customers.len());
        self.create_history()
    }

    /// (Re)derive the rectangular history table. Only after a completed run.
    pub fn create_history(&mut self) -> SimResult<&HistoryTable> {
        if self.phase != RunPhase::Completed {
            return Err(LifecycleError::NotCompleted.into());
        }
        let table = HistoryTable::from_customers(&self.customers, self.config.total_periods)?;
        log::info!(
            "history table: {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(&*self.history.insert(table))
    }

    pub fn history_table(&self) -> Option<&HistoryTable> {
        self.history.as_ref()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn model(&self) -> &ChainModel {
        &self.model
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Periods simulated so far.
    pub fn current_period(&self) -> Period {
        self.period
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    // ── Internals ─────────────────────────────────────────────────────

    fn advance_period(&mut self) -> SimResult<()> {
        self.transition_all()?;
        self.period += 1;
        let born = self.config.new_per_period;
        self.spawn(born, self.period)?;
        log::debug!(
            "period={} population={} born={born}",
            self.period,
            self.customers.len()
        );
        Ok(())
    }

    fn transition_all(&mut self) -> SimResult<()> {
        for customer in &mut self.customers {
            customer.transition(self.rng.as_mut())?;
        }
        Ok(())
    }

    fn spawn(&mut self, count: usize, period: Period) -> SimResult<()> {
        self.customers.reserve(count);
        for _ in 0..count {
            let customer_id = format!("c-{:06}", self.customers.len());
            let name = self.names.next_name();
            let mut customer =
                Customer::new(customer_id, name, Arc::clone(&self.model), self.rng.as_mut())?;
            if period > 0 {
                customer.backfill(period);
            }
            self.customers.push(customer);
        }
        Ok(())
    }

    fn ensure_usable(&self) -> SimResult<()> {
        match self.phase {
            RunPhase::Failed => Err(LifecycleError::Poisoned.into()),
            RunPhase::Completed => Err(LifecycleError::AlreadyCompleted.into()),
            RunPhase::Fresh | RunPhase::Running => Ok(()),
        }
    }

    fn check_run_entry(&self) -> SimResult<()> {
        self.ensure_usable()?;
        let target = self.config.initial_population;
        // create_customers never exceeds the target, so this only fires if
        // that guard is broken.
        if self.customers.len() > target {
            return Err(LifecycleError::PopulationOverrun {
                existing: self.customers.len(),
                target,
            }
            .into());
        }
        if let Some(c) = self.customers.iter().find(|c| c.transitions() > 0) {
            return Err(SimError::Lifecycle(LifecycleError::TransitionedOutsideRun {
                customer_id: c.customer_id().to_string(),
            }));
        }
        Ok(())
    }
}

impl std::fmt::Display for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Customer purchase simulation over {} periods.",
            self.config.total_periods
        )?;
        writeln!(f, "Initial customers: {}", self.config.initial_population)?;
        writeln!(f, "New customers per period: {}", self.config.new_per_period)?;
        let mut prices: Vec<_> = self.config.prices.iter().collect();
        prices.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "Prices:")?;
        if prices.is_empty() {
            write!(f, " none")?;
        }
        for (label, price) in prices {
            write!(f, " {label}={price:.2}")?;
        }
        Ok(())
    }
}
