//! Agent account state.
//!
//! Tracks the quoting agent's signed inventory, cash, and the unfilled size
//! left on each of its two pegged quotes. Remaining sizes are topped back up
//! to the quote size at the start of every decision epoch.
//!
//! ## Mark-to-market
//!
//! A long position is valued at the best bid, anything else at the best ask:
//! `value = inventory * touch + cash`.

use types::{Cash, Level, Volume};

/// Inventory, cash, and quote state of the market-making agent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentState {
    /// Signed position (positive = long, negative = short).
    inventory: Volume,
    /// Accumulated signed cash from fills.
    cash: Cash,
    /// Unfilled size on the ask leg.
    remaining_ask: Volume,
    /// Unfilled size on the bid leg.
    remaining_bid: Volume,
    /// Fills received since the last reset.
    fills_received: u64,
}

impl AgentState {
    /// Create a flat agent with no quotes posted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current inventory.
    pub fn inventory(&self) -> Volume {
        self.inventory
    }

    /// Get current cash balance.
    pub fn cash(&self) -> Cash {
        self.cash
    }

    /// Unfilled size on the ask leg.
    pub fn remaining_ask(&self) -> Volume {
        self.remaining_ask
    }

    /// Unfilled size on the bid leg.
    pub fn remaining_bid(&self) -> Volume {
        self.remaining_bid
    }

    /// Get total fills received.
    pub fn fills_received(&self) -> u64 {
        self.fills_received
    }

    /// Re-post both legs at full size.
    pub fn reset_quotes(&mut self, size: Volume) {
        self.remaining_ask = size;
        self.remaining_bid = size;
    }

    /// Consume ask-leg size after a fill.
    pub fn consume_ask(&mut self, quantity: Volume) {
        self.remaining_ask -= quantity;
    }

    /// Consume bid-leg size after a fill.
    pub fn consume_bid(&mut self, quantity: Volume) {
        self.remaining_bid -= quantity;
    }

    /// Update state after buying `quantity` at `level`.
    pub fn on_buy(&mut self, level: Level, quantity: Volume) {
        self.inventory += quantity;
        self.cash -= Cash::notional(level, quantity);
        self.fills_received += 1;
    }

    /// Update state after selling `quantity` at `level`.
    pub fn on_sell(&mut self, level: Level, quantity: Volume) {
        self.inventory -= quantity;
        self.cash += Cash::notional(level, quantity);
        self.fills_received += 1;
    }

    /// Value of the position at the current touch plus cash.
    pub fn mark_to_market(&self, best_bid: Level, best_ask: Level) -> Cash {
        let touch = if self.inventory > 0 { best_bid } else { best_ask };
        Cash::notional(touch, self.inventory) + self.cash
    }

    /// Return to a flat, quote-less state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
