//! A single customer: one Markov chain instance and its own history.

use crate::{
    error::{ConfigError, SamplingError, SimError, SimResult},
    history,
    model::ChainModel,
    rng::RandomSource,
    sampling,
    types::{CustomerId, HistoryCell, Period, StateId},
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Customer {
    customer_id: CustomerId,
    name: String,
    birth_period: Period,
    model: Arc<ChainModel>,
    current_state: StateId,
    /// One cell per period since period 0. Cells before `birth_period`
    /// are `Absent`; the first real entry is the initial state.
    history: Vec<HistoryCell>,
}

impl Customer {
    /// Sample an initial state from the model's initial distribution.
    /// Consumes exactly one roll.
    pub fn new(
        customer_id: CustomerId,
        name: String,
        model: Arc<ChainModel>,
        rng: &mut dyn RandomSource,
    ) -> SimResult<Self> {
        let pick = sampling::sample_index(model.initial_weights(), rng)?;
        let current_state = model.initial_states()[pick];
        Ok(Self {
            customer_id,
            name,
            birth_period: 0,
            model,
            current_state,
            history: vec![current_state.into()],
        })
    }

    /// Record that this customer was born at `period` by left-padding its
    /// history with `period` absence markers. Only valid on a fresh
    /// customer.
    pub(crate) fn backfill(&mut self, period: Period) {
        debug_assert_eq!(self.history.len(), 1, "backfill on a transitioned customer");
        history::pad_front(&mut self.history, period as usize);
        self.birth_period = period;
    }

    /// Advance one period: draw the next state from the current state's row.
    pub fn transition(&mut self, rng: &mut dyn RandomSource) -> SimResult<StateId> {
        let row = self.model.row(self.current_state);
        let next = sampling::sample_index(row, rng).map_err(|e| match e {
            SamplingError::NotNormalized { sum } => SimError::Configuration(ConfigError::RowSum {
                state: self.model.label(self.current_state).to_string(),
                sum,
            }),
            other => SimError::Sampling(other),
        })?;
        self.current_state = StateId(next);
        self.history.push(self.current_state.into());
        Ok(self.current_state)
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_period(&self) -> Period {
        self.birth_period
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    pub fn current_label(&self) -> &str {
        self.model.label(self.current_state)
    }

    /// Full aligned history, including leading absence markers.
    pub fn history(&self) -> &[HistoryCell] {
        &self.history
    }

    /// Only the periods this customer actually existed for.
    pub fn observed_history(&self) -> &[HistoryCell] {
        &self.history[self.birth_period as usize..]
    }

    /// Number of transitions applied since creation.
    pub fn transitions(&self) -> usize {
        self.observed_history().len() - 1
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::rng::SimRng;

    fn model() -> Arc<ChainModel> {
        Arc::new(ChainModel::from_config(&SimConfig::default_test()).unwrap())
    }

    #[test]
    fn starts_with_single_initial_state() {
        let mut rng = SimRng::new(1, 0);
        let c = Customer::new("c-000000".into(), "A B".into(), model(), &mut rng).unwrap();
        assert_eq!(c.history(), &[HistoryCell::State(c.current_state())]);
        assert!(c.model.initial_states().contains(&c.current_state()));
        assert_eq!(c.transitions(), 0);
    }

    #[test]
    fn transition_appends_exactly_one_entry() {
        let mut rng = SimRng::new(2, 0);
        let mut c = Customer::new("c-000000".into(), "A B".into(), model(), &mut rng).unwrap();
        for n in 1..=10 {
            let s = c.transition(&mut rng).unwrap();
            assert_eq!(c.history().len(), n + 1);
            assert_eq!(c.history().last(), Some(&HistoryCell::State(s)));
            assert_eq!(c.current_state(), s);
        }
    }

    #[test]
    fn backfill_pads_front_only() {
        let mut rng = SimRng::new(3, 0);
        let mut c = Customer::new("c-000001".into(), "A B".into(), model(), &mut rng).unwrap();
        let initial = c.current_state();
        c.backfill(3);
        assert_eq!(
            c.history(),
            &[
                HistoryCell::Absent,
                HistoryCell::Absent,
                HistoryCell::Absent,
                HistoryCell::State(initial)
            ]
        );
        assert_eq!(c.birth_period(), 3);
        assert_eq!(c.observed_history(), &[HistoryCell::State(initial)]);
    }
}
