//! Quote actions and the dense action index space.
//!
//! An action is a pair of shifts, each in `[0, width)` where `width = n / 2`.
//! The flat index used by the Q-table is `bid_shift * width + ask_shift`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offsets from the touch at which the agent pegs its two resting quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QuoteAction {
    pub bid_shift: usize,
    pub ask_shift: usize,
}

impl QuoteAction {
    pub fn new(bid_shift: usize, ask_shift: usize) -> Self {
        Self {
            bid_shift,
            ask_shift,
        }
    }
}

impl fmt::Display for QuoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(bid+{}, ask+{})", self.bid_shift, self.ask_shift)
    }
}

/// The `width × width` grid of quote actions for a book with `n` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    width: usize,
}

impl ActionSpace {
    /// Action space for a book with `levels` price levels (`width = levels / 2`).
    pub fn for_levels(levels: usize) -> Self {
        Self { width: levels / 2 }
    }

    /// Number of distinct shifts per leg.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of actions (`width²`).
    pub fn len(&self) -> usize {
        self.width * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// Flat index of an action, or `None` if either shift is out of range.
    pub fn encode(&self, action: QuoteAction) -> Option<usize> {
        if action.bid_shift >= self.width || action.ask_shift >= self.width {
            return None;
        }
        Some(action.bid_shift * self.width + action.ask_shift)
    }

    /// Decode a flat index, or `None` if it lies outside the space.
    pub fn decode(&self, index: usize) -> Option<QuoteAction> {
        if index >= self.len() {
            return None;
        }
        Some(QuoteAction::new(index / self.width, index % self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_space_size() {
        let space = ActionSpace::for_levels(20);
        assert_eq!(space.width(), 10);
        assert_eq!(space.len(), 100);

        // Odd level counts round the width down
        assert_eq!(ActionSpace::for_levels(5).len(), 4);
        assert!(ActionSpace::for_levels(1).is_empty());
    }

    #[test]
    fn test_decode_layout() {
        let space = ActionSpace::for_levels(10);
        assert_eq!(space.decode(0), Some(QuoteAction::new(0, 0)));
        assert_eq!(space.decode(7), Some(QuoteAction::new(1, 2)));
        assert_eq!(space.decode(24), Some(QuoteAction::new(4, 4)));
        assert_eq!(space.decode(25), None);
    }

    #[test]
    fn test_encode_inverts_decode() {
        let space = ActionSpace::for_levels(8);
        for index in 0..space.len() {
            let action = space.decode(index).unwrap();
            assert_eq!(space.encode(action), Some(index));
        }
        assert_eq!(space.encode(QuoteAction::new(4, 0)), None);
    }
}
