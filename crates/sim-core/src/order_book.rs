//! Net-volume order book over a fixed grid of price levels.
//!
//! The book keeps one signed integer per level instead of individual orders:
//! negative volume is resting bid depth, positive volume is resting ask depth.
//! The touch (`best_bid`, `best_ask`) is cached and only recomputed through
//! [`OrderBook::refresh_touch`], so every placement within a tick is guarded
//! against the touch as it stood at the start of that tick.
//!
//! Invalid placements (wrong side of the touch, level off the grid, empty
//! side for a market order) are dropped silently and reported as `false`.

use types::{BookSnapshot, ConfigError, Level, Tick, Volume};

/// Order book for a single instrument on levels `1..=n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    /// Net signed volume, index `i` holding level `i + 1`.
    volumes: Vec<Volume>,
    /// Lowest level with positive volume, or `n + 1`.
    best_ask: Level,
    /// Highest level with negative volume, or `0`.
    best_bid: Level,
}

impl OrderBook {
    /// Create an empty book with `levels` price levels.
    pub fn new(levels: usize) -> Result<Self, ConfigError> {
        if levels == 0 {
            return Err(ConfigError::TooFewLevels { got: 0, min: 1 });
        }
        Ok(Self {
            volumes: vec![0; levels],
            best_ask: levels + 1,
            best_bid: 0,
        })
    }

    /// Build a book from explicit volumes, with the touch recomputed.
    pub fn from_volumes(volumes: Vec<Volume>) -> Result<Self, ConfigError> {
        let mut book = Self::new(volumes.len())?;
        book.volumes = volumes;
        book.refresh_touch();
        Ok(book)
    }

    /// Number of price levels `n`.
    pub fn levels(&self) -> usize {
        self.volumes.len()
    }

    /// Cached best ask (`n + 1` when no ask is resting).
    pub fn best_ask(&self) -> Level {
        self.best_ask
    }

    /// Cached best bid (`0` when no bid is resting).
    pub fn best_bid(&self) -> Level {
        self.best_bid
    }

    /// Net volume at a 1-based level, `None` off the grid.
    pub fn volume(&self, level: Level) -> Option<Volume> {
        self.index_of(level).map(|i| self.volumes[i])
    }

    /// All level volumes, index `i` holding level `i + 1`.
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    fn index_of(&self, level: Level) -> Option<usize> {
        if (1..=self.volumes.len()).contains(&level) {
            Some(level - 1)
        } else {
            None
        }
    }

    fn add(&mut self, level: Level, delta: Volume) -> bool {
        match self.index_of(level) {
            Some(i) => {
                self.volumes[i] += delta;
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Placement primitives
    // ─────────────────────────────────────────────────────────────────────────

    /// Rest `count` units of buy interest at `price` if it is below the ask.
    pub fn place_limit_buy(&mut self, price: Level, count: Volume) -> bool {
        price < self.best_ask && self.add(price, -count)
    }

    /// Rest `count` units of sell interest at `price` if it is above the bid.
    pub fn place_limit_sell(&mut self, price: Level, count: Volume) -> bool {
        price > self.best_bid && self.add(price, count)
    }

    /// Withdraw `count` units of buy interest at `price` (same guard as placing).
    pub fn cancel_limit_buy(&mut self, price: Level, count: Volume) -> bool {
        price < self.best_ask && self.add(price, count)
    }

    /// Withdraw `count` units of sell interest at `price` (same guard as placing).
    pub fn cancel_limit_sell(&mut self, price: Level, count: Volume) -> bool {
        price > self.best_bid && self.add(price, -count)
    }

    /// Lift `count` units at the best ask.
    ///
    /// There is no liquidity cap: a count larger than the resting ask volume
    /// drives the level negative, flipping it to bid-side depth.
    pub fn place_market_buy(&mut self, count: Volume) -> bool {
        self.best_ask <= self.levels() && self.add(self.best_ask, -count)
    }

    /// Hit `count` units at the best bid, uncapped like [`Self::place_market_buy`].
    pub fn place_market_sell(&mut self, count: Volume) -> bool {
        self.best_bid > 0 && self.add(self.best_bid, count)
    }

    /// Apply an unguarded signed adjustment at a level.
    ///
    /// Used for agent fills and liquidation, which trade against resting
    /// depth directly rather than through the touch guards.
    pub fn adjust(&mut self, level: Level, delta: Volume) -> bool {
        self.add(level, delta)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Touch discovery
    // ─────────────────────────────────────────────────────────────────────────

    /// Smallest level holding positive volume, or `n + 1`.
    pub fn find_ask(&self) -> Level {
        self.volumes
            .iter()
            .position(|v| *v > 0)
            .map_or(self.levels() + 1, |i| i + 1)
    }

    /// Largest level holding negative volume, or `0`.
    pub fn find_bid(&self) -> Level {
        self.volumes
            .iter()
            .rposition(|v| *v < 0)
            .map_or(0, |i| i + 1)
    }

    /// Recompute the cached touch from current volumes.
    pub fn refresh_touch(&mut self) {
        self.best_ask = self.find_ask();
        self.best_bid = self.find_bid();
    }

    /// Spread in levels when both sides are occupied.
    pub fn spread(&self) -> Option<usize> {
        if self.best_bid > 0 && self.best_ask <= self.levels() {
            Some(self.best_ask.saturating_sub(self.best_bid))
        } else {
            None
        }
    }

    /// Mid level when both sides are occupied.
    pub fn mid(&self) -> Option<f64> {
        self.spread()
            .map(|_| (self.best_bid + self.best_ask) as f64 / 2.0)
    }

    /// Total resting bid depth (absolute).
    pub fn bid_depth(&self) -> Volume {
        self.volumes.iter().filter(|v| **v < 0).map(|v| -v).sum()
    }

    /// Total resting ask depth.
    pub fn ask_depth(&self) -> Volume {
        self.volumes.iter().filter(|v| **v > 0).sum()
    }

    /// Check if no level holds any volume.
    pub fn is_empty(&self) -> bool {
        self.volumes.iter().all(|v| *v == 0)
    }

    /// Discard all volume and reset the touch to its sentinels.
    pub fn flush(&mut self) {
        self.volumes.iter_mut().for_each(|v| *v = 0);
        self.best_ask = self.levels() + 1;
        self.best_bid = 0;
    }

    /// Owned state dump for observers.
    pub fn snapshot(&self, tick: Tick) -> BookSnapshot {
        BookSnapshot {
            tick,
            volumes: self.volumes.clone(),
            best_bid: self.best_bid,
            best_ask: self.best_ask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_book() {
        let book = OrderBook::new(5).unwrap();
        assert!(book.is_empty());
        assert_eq!(book.levels(), 5);
        assert_eq!(book.best_ask(), 6);
        assert_eq!(book.best_bid(), 0);
        assert_eq!(book.find_ask(), 6);
        assert_eq!(book.find_bid(), 0);
        assert_eq!(book.spread(), None);
    }

    #[test]
    fn test_zero_levels_rejected() {
        assert!(matches!(
            OrderBook::new(0),
            Err(ConfigError::TooFewLevels { got: 0, .. })
        ));
    }

    #[test]
    fn test_worked_example() {
        let mut book = OrderBook::new(5).unwrap();

        assert!(book.place_limit_buy(3, 10));
        assert_eq!(book.volumes(), &[0, 0, -10, 0, 0]);
        assert_eq!(book.find_bid(), 3);
        book.refresh_touch();

        assert!(book.place_limit_sell(4, 5));
        assert_eq!(book.volumes(), &[0, 0, -10, 5, 0]);
        assert_eq!(book.find_ask(), 4);
        book.refresh_touch();
        assert_eq!(book.best_ask(), 4);

        // Overselling flips the ask level to bid depth
        assert!(book.place_market_buy(7));
        assert_eq!(book.volumes(), &[0, 0, -10, -2, 0]);

        book.refresh_touch();
        assert_eq!(book.best_bid(), 4);
        assert_eq!(book.best_ask(), 6);
    }

    #[test]
    fn test_limit_buy_at_or_above_ask_dropped() {
        let mut book = OrderBook::from_volumes(vec![0, 0, -10, 5, 0]).unwrap();
        let before = book.volumes().to_vec();

        assert!(!book.place_limit_buy(4, 3));
        assert!(!book.place_limit_buy(5, 3));
        assert_eq!(book.volumes(), before.as_slice());
    }

    #[test]
    fn test_limit_sell_at_or_below_bid_dropped() {
        let mut book = OrderBook::from_volumes(vec![0, 0, -10, 5, 0]).unwrap();
        let before = book.volumes().to_vec();

        assert!(!book.place_limit_sell(3, 3));
        assert!(!book.place_limit_sell(1, 3));
        assert_eq!(book.volumes(), before.as_slice());
    }

    #[test]
    fn test_cancellations_invert_placements() {
        let mut book = OrderBook::from_volumes(vec![0, -6, 0, 4, 0]).unwrap();

        assert!(book.cancel_limit_buy(2, 2));
        assert!(book.cancel_limit_sell(4, 1));
        assert_eq!(book.volumes(), &[0, -4, 0, 3, 0]);

        // Same guards as placement
        assert!(!book.cancel_limit_buy(4, 1));
        assert!(!book.cancel_limit_sell(2, 1));
        assert_eq!(book.volumes(), &[0, -4, 0, 3, 0]);
    }

    #[test]
    fn test_market_orders_on_empty_book_dropped() {
        let mut book = OrderBook::new(4).unwrap();
        assert!(!book.place_market_buy(5));
        assert!(!book.place_market_sell(5));
        assert!(book.is_empty());
    }

    #[test]
    fn test_market_sell_oversells_bid() {
        let mut book = OrderBook::from_volumes(vec![-3, 0, 0, 2]).unwrap();
        assert_eq!(book.best_bid(), 1);

        assert!(book.place_market_sell(5));
        assert_eq!(book.volume(1), Some(2));
    }

    #[test]
    fn test_off_grid_levels_dropped() {
        let mut book = OrderBook::new(4).unwrap();
        assert!(!book.place_limit_buy(0, 1));
        assert!(!book.place_limit_sell(5, 1));
        assert!(!book.adjust(9, 1));
        assert_eq!(book.volume(0), None);
        assert!(book.is_empty());
    }

    #[test]
    fn test_touch_is_cached_until_refresh() {
        let mut book = OrderBook::new(5).unwrap();
        book.place_limit_sell(2, 4);
        assert_eq!(book.best_ask(), 6);

        // Still guarded by the stale ask: a buy above level 2 is accepted
        assert!(book.place_limit_buy(3, 1));

        book.refresh_touch();
        assert_eq!(book.best_ask(), 2);
        assert!(!book.place_limit_buy(3, 1));
    }

    #[test]
    fn test_spread_and_depth() {
        let book = OrderBook::from_volumes(vec![-1, -4, 0, 0, 3, 7]).unwrap();
        assert_eq!(book.best_bid(), 2);
        assert_eq!(book.best_ask(), 5);
        assert_eq!(book.spread(), Some(3));
        assert_eq!(book.mid(), Some(3.5));
        assert_eq!(book.bid_depth(), 5);
        assert_eq!(book.ask_depth(), 10);
    }

    #[test]
    fn test_flush_resets_everything() {
        let mut book = OrderBook::from_volumes(vec![-1, 2, -3, 4]).unwrap();
        book.flush();

        assert!(book.is_empty());
        assert_eq!(book.best_ask(), 5);
        assert_eq!(book.best_bid(), 0);

        // Idempotent
        book.flush();
        assert_eq!(book, OrderBook::new(4).unwrap());
    }

    #[test]
    fn test_snapshot() {
        let book = OrderBook::from_volumes(vec![-2, 0, 3]).unwrap();
        let snap = book.snapshot(7);
        assert_eq!(snap.tick, 7);
        assert_eq!(snap.volumes, vec![-2, 0, 3]);
        assert_eq!(snap.best_bid, 1);
        assert_eq!(snap.best_ask, 3);
    }
}
