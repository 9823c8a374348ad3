//! Fill checks for the agent's two pegged quotes.
//!
//! Each tick the quotes are re-pegged to the cached touch using the epoch's
//! fixed action and filled against whatever resting depth sits at the pegged
//! level:
//!
//! ```text
//! ask leg: level = best_ask - bid_shift   fills against bid depth (volume < 0)
//! bid leg: level = best_bid + ask_shift   fills against ask depth (volume > 0)
//! ```
//!
//! The ask leg is pegged with the *bid* shift and the bid leg with the *ask*
//! shift. This cross-wiring is kept as-is and pinned by tests; changing it
//! alters what the learned policy means.
//!
//! A pegged level off the grid means no fill.

use sim_core::OrderBook;
use types::{Level, QuoteAction, Volume};

use crate::state::AgentState;

/// A single fill against one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub level: Level,
    pub quantity: Volume,
}

/// Fills produced by one execution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteFills {
    pub ask_leg: Option<Fill>,
    pub bid_leg: Option<Fill>,
}

impl QuoteFills {
    /// Check if neither leg filled.
    pub fn is_empty(&self) -> bool {
        self.ask_leg.is_none() && self.bid_leg.is_none()
    }

    /// Net inventory change from these fills.
    pub fn inventory_delta(&self) -> Volume {
        self.ask_leg.map_or(0, |f| f.quantity) - self.bid_leg.map_or(0, |f| f.quantity)
    }
}

/// Applies the agent's pegged quotes against the book.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentQuoteExecutor;

impl AgentQuoteExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Level the ask leg is pegged to, if on the grid.
    pub fn ask_leg_level(book: &OrderBook, action: QuoteAction) -> Option<Level> {
        let level = book.best_ask().checked_sub(action.bid_shift)?;
        (1..=book.levels()).contains(&level).then_some(level)
    }

    /// Level the bid leg is pegged to, if on the grid.
    pub fn bid_leg_level(book: &OrderBook, action: QuoteAction) -> Option<Level> {
        let level = book.best_bid().checked_add(action.ask_shift)?;
        (1..=book.levels()).contains(&level).then_some(level)
    }

    /// Run both fill checks, ask leg first.
    pub fn execute(
        &self,
        book: &mut OrderBook,
        state: &mut AgentState,
        action: QuoteAction,
    ) -> QuoteFills {
        QuoteFills {
            ask_leg: self.fill_ask_leg(book, state, action),
            bid_leg: self.fill_bid_leg(book, state, action),
        }
    }

    fn fill_ask_leg(
        &self,
        book: &mut OrderBook,
        state: &mut AgentState,
        action: QuoteAction,
    ) -> Option<Fill> {
        if state.remaining_ask() <= 0 {
            return None;
        }
        let level = Self::ask_leg_level(book, action)?;
        let resting = book.volume(level)?;
        if resting >= 0 {
            return None;
        }

        let quantity = resting.abs().min(state.remaining_ask());
        book.adjust(level, quantity);
        state.on_buy(level, quantity);
        state.consume_ask(quantity);
        Some(Fill { level, quantity })
    }

    fn fill_bid_leg(
        &self,
        book: &mut OrderBook,
        state: &mut AgentState,
        action: QuoteAction,
    ) -> Option<Fill> {
        if state.remaining_bid() <= 0 {
            return None;
        }
        let level = Self::bid_leg_level(book, action)?;
        let resting = book.volume(level)?;
        if resting <= 0 {
            return None;
        }

        let quantity = resting.min(state.remaining_bid());
        book.adjust(level, -quantity);
        state.on_sell(level, quantity);
        state.consume_bid(quantity);
        Some(Fill { level, quantity })
    }
}
