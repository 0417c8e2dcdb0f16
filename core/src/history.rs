//! Ragged-to-rectangular history reduction.
//!
//! Each customer carries a history left-padded to its birth period.
//! Reduction right-pads every row to `total_periods + 1` cells with the
//! same `Absent` marker and stacks rows in creation order.

use crate::{
    customer::Customer,
    error::LifecycleError,
    model::ChainModel,
    types::{CustomerId, HistoryCell, Period},
};
use serde::{Deserialize, Serialize};

/// Prepend `n` absence markers.
pub fn pad_front(history: &mut Vec<HistoryCell>, n: usize) {
    let mut padded = vec![HistoryCell::Absent; n];
    padded.append(history);
    *history = padded;
}

/// Append absence markers until `history` is `width` long.
/// Fails if the history is already longer than `width`.
pub fn pad_back(history: &mut Vec<HistoryCell>, width: usize) -> Result<(), usize> {
    if history.len() > width {
        return Err(history.len());
    }
    history.resize(width, HistoryCell::Absent);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub customer_id: CustomerId,
    pub name: String,
    pub birth_period: Period,
    pub cells: Vec<HistoryCell>,
}

/// Rows = customers in creation order, columns = periods `0..=total_periods`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTable {
    columns: usize,
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn from_customers(
        customers: &[Customer],
        total_periods: Period,
    ) -> Result<Self, LifecycleError> {
        let width = total_periods as usize + 1;
        let rows = customers
            .iter()
            .map(|c| {
                let mut cells = c.history().to_vec();
                pad_back(&mut cells, width).map_err(|len| LifecycleError::HistoryOverflow {
                    customer_id: c.customer_id().to_string(),
                    len,
                    width,
                })?;
                Ok(HistoryRow {
                    customer_id: c.customer_id().to_string(),
                    name: c.name().to_string(),
                    birth_period: c.birth_period(),
                    cells,
                })
            })
            .collect::<Result<Vec<_>, LifecycleError>>()?;
        Ok(Self { columns: width, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&HistoryRow> {
        self.rows.get(i)
    }

    pub fn cell(&self, row: usize, period: usize) -> Option<HistoryCell> {
        self.rows.get(row).and_then(|r| r.cells.get(period).copied())
    }

    /// Every customer's cell at `period`, in row order. `None` past the
    /// last column.
    pub fn column(&self, period: usize) -> Option<Vec<HistoryCell>> {
        if period >= self.columns {
            return None;
        }
        Some(self.rows.iter().map(|r| r.cells[period]).collect())
    }

    /// Render through the model's display codes. Absence and states
    /// without a code both become `None`.
    pub fn to_codes(&self, model: &ChainModel) -> Vec<Vec<Option<i64>>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.state().and_then(|s| model.code(s))).collect())
            .collect()
    }

    /// Render state labels; absence becomes `None`.
    pub fn to_labels<'m>(&self, model: &'m ChainModel) -> Vec<Vec<Option<&'m str>>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.state().map(|s| model.label(s))).collect())
            .collect()
    }
}
