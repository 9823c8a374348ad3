//! Dense state × action value table.
//!
//! Out-of-range states or actions are never an error: reads return `None`
//! and writes report `false` without touching the table.

use serde::{Deserialize, Serialize};

/// Row-major table of action values, all zero at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl QTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Number of states.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of actions.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value of one state-action pair.
    pub fn get(&self, state: usize, action: usize) -> Option<f64> {
        self.row(state)?.get(action).copied()
    }

    /// All action values for a state.
    pub fn row(&self, state: usize) -> Option<&[f64]> {
        if state >= self.rows {
            return None;
        }
        let start = state * self.cols;
        Some(&self.values[start..start + self.cols])
    }

    fn row_mut(&mut self, state: usize) -> Option<&mut [f64]> {
        if state >= self.rows {
            return None;
        }
        let start = state * self.cols;
        Some(&mut self.values[start..start + self.cols])
    }

    /// Greedy action for a state; ties go to the lowest index.
    pub fn best_action(&self, state: usize) -> Option<usize> {
        let row = self.row(state)?;
        let mut best: Option<(usize, f64)> = None;
        for (action, value) in row.iter().copied().enumerate() {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Largest action value for a state.
    pub fn max_value(&self, state: usize) -> Option<f64> {
        let row = self.row(state)?;
        row.iter().copied().reduce(f64::max)
    }

    /// Blend `target` into one entry: `q = (1 - lr) * q + lr * target`.
    pub fn blend(&mut self, state: usize, action: usize, target: f64, lr: f64) -> bool {
        match self.row_mut(state).and_then(|row| row.get_mut(action)) {
            Some(q) => {
                *q = (1.0 - lr) * *q + lr * target;
                true
            }
            None => false,
        }
    }

    /// Blend `target` into every entry of a state's row.
    pub fn blend_row(&mut self, state: usize, target: f64, lr: f64) -> bool {
        match self.row_mut(state) {
            Some(row) => {
                row.iter_mut().for_each(|q| *q = (1.0 - lr) * *q + lr * target);
                true
            }
            None => false,
        }
    }

    /// Mean value across the whole table.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        }
    }

    /// Number of non-zero entries (state-action pairs that have been learned).
    pub fn touched(&self) -> usize {
        self.values.iter().filter(|q| **q != 0.0).count()
    }
}
