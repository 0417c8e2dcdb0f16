//! Per-period state counts over a finished history table.
//!
//! This is the purchase-pattern time series a plotting front end consumes.

use crate::{history::HistoryTable, model::ChainModel, types::StateId};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCounts {
    labels: Vec<String>,
    /// counts[period][state]
    counts: Vec<Vec<usize>>,
    absent: Vec<usize>,
}

impl StateCounts {
    pub fn from_table(table: &HistoryTable, model: &ChainModel) -> Self {
        let n = model.state_count();
        let mut counts = vec![vec![0usize; n]; table.column_count()];
        let mut absent = vec![0usize; table.column_count()];
        for row in table.rows() {
            for (t, cell) in row.cells.iter().enumerate() {
                match cell.state() {
                    Some(s) => counts[t][s.index()] += 1,
                    None => absent[t] += 1,
                }
            }
        }
        Self {
            labels: model.labels().to_vec(),
            counts,
            absent,
        }
    }

    pub fn periods(&self) -> usize {
        self.counts.len()
    }

    /// `None` when `period` or `state` is outside the table.
    pub fn count(&self, period: usize, state: StateId) -> Option<usize> {
        self.counts.get(period)?.get(state.index()).copied()
    }

    pub fn absent(&self, period: usize) -> Option<usize> {
        self.absent.get(period).copied()
    }

    /// Customers alive (in any state) at `period`.
    pub fn present(&self, period: usize) -> Option<usize> {
        self.counts.get(period).map(|row| row.iter().sum())
    }

    /// Count of `state` in every period.
    pub fn series(&self, state: StateId) -> Vec<usize> {
        self.counts.iter().map(|row| row[state.index()]).collect()
    }

    /// One series per non-absorbing state, labelled, in state order.
    pub fn purchase_series(&self, model: &ChainModel) -> Vec<(String, Vec<usize>)> {
        (0..model.state_count())
            .map(StateId)
            .filter(|s| !model.is_absorbing(*s))
            .map(|s| (self.labels[s.index()].clone(), self.series(s)))
            .collect()
    }

    /// Sum of count × price per period. States without a price earn nothing.
    pub fn revenue(&self, prices: &HashMap<String, f64>) -> Vec<f64> {
        self.counts
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.labels)
                    .map(|(&n, label)| n as f64 * prices.get(label).copied().unwrap_or(0.0))
                    .sum::<f64>()
            })
            .collect()
    }
}
