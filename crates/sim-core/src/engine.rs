//! One tick of order flow against the book.
//!
//! # Tick order
//!
//! ```text
//! for level in 1..=n (ascending):
//!     rates  = ArrivalRateModel(level, touch at tick start)
//!     counts = 4 Poisson draws (limit buy, limit sell, cancel buy, cancel sell)
//!     apply in that order
//! market buy  = Poisson(μ)
//! market sell = Poisson(μ)
//! refresh touch
//! ```
//!
//! [`MarketStepEngine::apply_flow`] stops before the touch refresh so the
//! driver can slot agent fills between the flow and the refresh.

use types::Volume;

use crate::order_book::OrderBook;
use crate::rates::ArrivalRateModel;
use crate::source::EventSource;

/// Event counts drawn during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSummary {
    pub limit_buys: u64,
    pub limit_sells: u64,
    pub cancel_buys: u64,
    pub cancel_sells: u64,
    pub market_buys: u64,
    pub market_sells: u64,
    /// Draws that hit a guard and were dropped.
    pub dropped: u64,
}

impl FlowSummary {
    /// Total number of events drawn.
    pub fn total(&self) -> u64 {
        self.limit_buys
            + self.limit_sells
            + self.cancel_buys
            + self.cancel_sells
            + self.market_buys
            + self.market_sells
    }

    fn record(&mut self, count: u64, accepted: bool) {
        if count > 0 && !accepted {
            self.dropped += count;
        }
    }
}

/// Drives per-tick order flow from an [`ArrivalRateModel`].
#[derive(Debug, Clone, Copy)]
pub struct MarketStepEngine {
    rates: ArrivalRateModel,
}

impl MarketStepEngine {
    pub fn new(rates: ArrivalRateModel) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &ArrivalRateModel {
        &self.rates
    }

    /// Apply one tick of limit, cancel, and market flow without refreshing the touch.
    pub fn apply_flow<S: EventSource + ?Sized>(
        &self,
        book: &mut OrderBook,
        source: &mut S,
    ) -> FlowSummary {
        let mut summary = FlowSummary::default();

        for price in 1..=book.levels() {
            let rates = self.rates.compute_rates(book, price);
            let limit_buy = source.poisson(rates.limit_buy);
            let limit_sell = source.poisson(rates.limit_sell);
            let cancel_buy = source.poisson(rates.cancel_buy);
            let cancel_sell = source.poisson(rates.cancel_sell);

            // Cancels see the volume left by this tick's placements at the same level
            let ok = book.place_limit_buy(price, limit_buy as Volume);
            summary.record(limit_buy, ok);
            let ok = book.place_limit_sell(price, limit_sell as Volume);
            summary.record(limit_sell, ok);
            let ok = book.cancel_limit_buy(price, cancel_buy as Volume);
            summary.record(cancel_buy, ok);
            let ok = book.cancel_limit_sell(price, cancel_sell as Volume);
            summary.record(cancel_sell, ok);

            summary.limit_buys += limit_buy;
            summary.limit_sells += limit_sell;
            summary.cancel_buys += cancel_buy;
            summary.cancel_sells += cancel_sell;
        }

        let market_buy = source.poisson(self.rates.market_rate());
        let market_sell = source.poisson(self.rates.market_rate());
        let ok = book.place_market_buy(market_buy as Volume);
        summary.record(market_buy, ok);
        let ok = book.place_market_sell(market_sell as Volume);
        summary.record(market_sell, ok);
        summary.market_buys = market_buy;
        summary.market_sells = market_sell;

        summary
    }

    /// Apply one full tick: flow followed by a touch refresh.
    pub fn step<S: EventSource + ?Sized>(
        &self,
        book: &mut OrderBook,
        source: &mut S,
    ) -> FlowSummary {
        let summary = self.apply_flow(book, source);
        book.refresh_touch();
        summary
    }
}

impl From<ArrivalRateModel> for MarketStepEngine {
    fn from(rates: ArrivalRateModel) -> Self {
        Self::new(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{PoissonSource, ScriptedSource};

    fn engine() -> MarketStepEngine {
        MarketStepEngine::new(ArrivalRateModel::new(1.0, 0.5, 2.0))
    }

    #[test]
    fn test_draw_order_and_count() {
        let mut book = OrderBook::new(3).unwrap();
        let mut source = ScriptedSource::silent();

        engine().step(&mut book, &mut source);

        // 4 draws per level plus 2 market draws
        let rates = source.requested_rates();
        assert_eq!(rates.len(), 3 * 4 + 2);

        // Level 1 on an empty book: ask sentinel 4, bid sentinel 0
        assert_eq!(&rates[0..4], &[3.0, 1.0, 0.0, 0.0]);
        assert_eq!(&rates[12..14], &[2.0, 2.0]);
        assert!(book.is_empty());
    }

    #[test]
    fn test_scripted_tick_builds_book() {
        let mut book = OrderBook::new(3).unwrap();
        // level 1: 5 buys; level 2: nothing; level 3: 4 sells
        let mut source = ScriptedSource::new([5, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0]);

        let summary = engine().step(&mut book, &mut source);

        assert_eq!(book.volumes(), &[-5, 0, 4]);
        assert_eq!(book.best_bid(), 1);
        assert_eq!(book.best_ask(), 3);
        assert_eq!(summary.limit_buys, 5);
        assert_eq!(summary.limit_sells, 4);
        assert_eq!(summary.dropped, 0);
    }

    #[test]
    fn test_cancel_applies_after_same_level_placement() {
        let mut book = OrderBook::new(2).unwrap();
        // level 1: 3 buys then 2 buy cancels
        let mut source = ScriptedSource::new([3, 0, 2, 0]);

        engine().step(&mut book, &mut source);

        assert_eq!(book.volume(1), Some(-1));
    }

    #[test]
    fn test_market_orders_hit_touch_from_tick_start() {
        let mut book = OrderBook::from_volumes(vec![-3, 0, 2]).unwrap();
        let mut counts = vec![0; 12];
        counts.extend([5, 1]);
        let mut source = ScriptedSource::new(counts);

        let summary = engine().step(&mut book, &mut source);

        // Buy oversells the ask at 3, sell eats into the bid at 1
        assert_eq!(book.volumes(), &[-2, 0, -3]);
        assert_eq!(book.best_bid(), 3);
        assert_eq!(book.best_ask(), 4);
        assert_eq!(summary.market_buys, 5);
        assert_eq!(summary.market_sells, 1);
    }

    #[test]
    fn test_market_orders_on_empty_book_counted_as_dropped() {
        let mut book = OrderBook::new(2).unwrap();
        let mut counts = vec![0; 8];
        counts.extend([2, 3]);
        let mut source = ScriptedSource::new(counts);

        let summary = engine().step(&mut book, &mut source);
        assert_eq!(summary.dropped, 5);
        assert!(book.is_empty());
    }

    #[test]
    fn test_apply_flow_leaves_touch_stale() {
        let mut book = OrderBook::new(2).unwrap();
        let mut source = ScriptedSource::new([0, 0, 0, 0, 0, 6, 0, 0]);

        engine().apply_flow(&mut book, &mut source);
        assert_eq!(book.volume(2), Some(6));
        assert_eq!(book.best_ask(), 3);

        book.refresh_touch();
        assert_eq!(book.best_ask(), 2);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let run = |seed| {
            let mut book = OrderBook::new(10).unwrap();
            let mut source = PoissonSource::new(seed);
            let engine = MarketStepEngine::new(ArrivalRateModel::new(1.85, 0.71, 2.0));
            for _ in 0..200 {
                engine.step(&mut book, &mut source);
            }
            book
        };

        let a = run(11);
        let b = run(11);
        assert_eq!(a.volumes(), b.volumes());
        assert_eq!(a.best_bid(), b.best_bid());
        assert_eq!(a.best_ask(), b.best_ask());
    }

    #[test]
    fn test_random_flow_populates_book() {
        let mut book = OrderBook::new(20).unwrap();
        let mut source = PoissonSource::new(5);
        let engine = MarketStepEngine::new(ArrivalRateModel::new(1.85, 0.71, 2.0));

        for _ in 0..100 {
            engine.step(&mut book, &mut source);
            assert!(book.best_bid() <= book.levels());
            assert!(book.best_ask() >= 1 && book.best_ask() <= book.levels() + 1);
        }
        assert!(!book.is_empty());
    }
}
