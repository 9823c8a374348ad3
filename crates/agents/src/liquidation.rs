//! Forced close-out of residual inventory at episode end.
//!
//! The book is crossed directly with no arrival-rate gating. A long position
//! sells into bid depth walking down from level `n`; a short position buys
//! ask depth walking up from level 1. The walk visits each level at most once
//! and stops early once inventory is flat, so an exhausted book leaves a
//! residual position instead of looping.

use sim_core::OrderBook;
use tracing::warn;
use types::{Cash, Volume};

use crate::state::AgentState;

/// Outcome of a liquidation walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Liquidation {
    /// Signed cash change from the walk.
    pub proceeds: Cash,
    /// Units closed out.
    pub filled: Volume,
    /// Inventory left open after the walk.
    pub residual: Volume,
}

impl Liquidation {
    /// Check if the position was fully closed.
    pub fn is_complete(&self) -> bool {
        self.residual == 0
    }
}

/// Flatten `state` against whatever depth rests in `book`, then refresh the touch.
pub fn liquidate(book: &mut OrderBook, state: &mut AgentState) -> Liquidation {
    let cash_before = state.cash();
    let start = state.inventory();

    if start > 0 {
        for level in (1..=book.levels()).rev() {
            if state.inventory() <= 0 {
                break;
            }
            let resting = book.volume(level).unwrap_or(0);
            if resting >= 0 {
                continue;
            }
            let quantity = resting.abs().min(state.inventory());
            book.adjust(level, quantity);
            state.on_sell(level, quantity);
        }
    } else if start < 0 {
        for level in 1..=book.levels() {
            if state.inventory() >= 0 {
                break;
            }
            let resting = book.volume(level).unwrap_or(0);
            if resting <= 0 {
                continue;
            }
            let quantity = resting.min(state.inventory().abs());
            book.adjust(level, -quantity);
            state.on_buy(level, quantity);
        }
    }
    book.refresh_touch();

    let residual = state.inventory();
    if residual != 0 {
        warn!(
            start_inventory = start,
            residual, "book depth exhausted before inventory was flat"
        );
    }

    Liquidation {
        proceeds: state.cash() - cash_before,
        filled: start.abs() - residual.abs(),
        residual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(inventory: Volume) -> AgentState {
        let mut state = AgentState::new();
        if inventory > 0 {
            state.on_buy(1, inventory);
        } else if inventory < 0 {
            state.on_sell(1, -inventory);
        }
        state
    }

    #[test]
    fn test_flat_position_is_untouched() {
        let mut book = OrderBook::from_volumes(vec![-5, 0, 5]).unwrap();
        let mut state = AgentState::new();

        let result = liquidate(&mut book, &mut state);
        assert_eq!(result, Liquidation::default());
        assert!(result.is_complete());
        assert_eq!(book.volumes(), &[-5, 0, 5]);
    }

    #[test]
    fn test_long_sells_into_best_bids_first() {
        let mut book = OrderBook::from_volumes(vec![-50, -30, 0, 20, 0]).unwrap();
        let mut state = holding(60); // cash -60

        let result = liquidate(&mut book, &mut state);

        // 30 @ 2, then 30 @ 1
        assert_eq!(result.proceeds, Cash(60 + 30));
        assert_eq!(result.filled, 60);
        assert!(result.is_complete());
        assert_eq!(book.volumes(), &[-20, 0, 0, 20, 0]);
        assert_eq!(book.best_bid(), 1);
        assert_eq!(state.inventory(), 0);
        assert_eq!(state.cash(), Cash(30));
    }

    #[test]
    fn test_short_buys_lowest_asks_first() {
        let mut book = OrderBook::from_volumes(vec![-5, 0, 10, 40]).unwrap();
        let mut state = holding(-25); // cash +25

        let result = liquidate(&mut book, &mut state);

        // 10 @ 3, then 15 @ 4
        assert_eq!(result.proceeds, Cash(-(30 + 60)));
        assert_eq!(result.residual, 0);
        assert_eq!(book.volumes(), &[-5, 0, 0, 25]);
        assert_eq!(book.best_ask(), 4);
        assert_eq!(state.cash(), Cash(25 - 90));
    }

    #[test]
    fn test_thin_book_leaves_residual() {
        let mut book = OrderBook::from_volumes(vec![-10, 0, 0, 7]).unwrap();
        let mut state = holding(25);

        let result = liquidate(&mut book, &mut state);

        assert_eq!(result.filled, 10);
        assert_eq!(result.residual, 15);
        assert!(!result.is_complete());
        assert_eq!(book.volumes(), &[0, 0, 0, 7]);
        assert_eq!(book.best_bid(), 0);
    }

    #[test]
    fn test_empty_book_terminates() {
        let mut book = OrderBook::new(6).unwrap();
        let mut state = holding(-400);

        let result = liquidate(&mut book, &mut state);
        assert_eq!(result.residual, -400);
        assert_eq!(result.proceeds, Cash::ZERO);
        assert!(book.is_empty());
    }
}
