//! Episode driver: the order book, the learning agent, and the shared event
//! source, stepped together.
//!
//! # Training episode
//!
//! ```text
//! for epoch in 1..=timesteps:
//!     s      = state(inventory, epoch)
//!     action = choose_action(s, ε)           ← one unit() draw (+2 when exploring)
//!     repost both legs at quote size
//!     decision tick: flow → quote fills → refresh touch
//!     TD update with s' = state(inventory, epoch)
//!     market_ticks_per_epoch more ticks: flow → quote fills → refresh touch
//! liquidate residual inventory
//! terminal update on state(inventory before liquidation, timesteps + 1)
//! ```
//!
//! The quotes keep draining on every tick of the epoch but are only
//! re-posted at the next decision.

use std::sync::Arc;

use agents::{AgentQuoteExecutor, AgentState, QLearningAgent, QTable, Transition, liquidate};
use sim_core::{ArrivalRateModel, EventSource, MarketStepEngine, OrderBook, PoissonSource};
use tracing::{debug, info};
use types::{Cash, ConfigError, QuoteAction, Tick, Volume};

use crate::config::SimulationConfig;
use crate::episode::EpisodeSummary;
use crate::hooks::{HookRunner, SimulationHook};

/// The order book gym.
///
/// Owns every piece of mutable state; nothing is global. The event source is
/// generic so tests can script the exact draw sequence.
pub struct Simulation<S: EventSource = PoissonSource> {
    config: SimulationConfig,
    book: OrderBook,
    engine: MarketStepEngine,
    executor: AgentQuoteExecutor,
    agent: QLearningAgent,
    account: AgentState,
    source: S,
    hooks: HookRunner,
    tick: Tick,
    epoch: usize,
    episodes: u64,
    last_episode: Option<EpisodeSummary>,
}

impl Simulation<PoissonSource> {
    /// Build a simulation seeded from `config.seed`, or from entropy.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let source = match config.seed {
            Some(seed) => PoissonSource::new(seed),
            None => PoissonSource::from_entropy(),
        };
        Self::with_source(config, source)
    }

    /// Build from the bare construction parameters `(n, λ, θ, μ, timesteps)`.
    pub fn construct(
        levels: usize,
        lambda: f64,
        theta: f64,
        mu: f64,
        timesteps: usize,
    ) -> Result<Self, ConfigError> {
        Self::new(SimulationConfig::new(levels, lambda, theta, mu, timesteps))
    }
}

impl<S: EventSource> Simulation<S> {
    /// Build a simulation drawing from a caller-supplied source.
    pub fn with_source(config: SimulationConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let book = OrderBook::new(config.levels())?;
        let engine = MarketStepEngine::new(ArrivalRateModel::from(&config.book));
        let agent = QLearningAgent::new(config.levels(), config.learning.clone())?;

        Ok(Self {
            config,
            book,
            engine,
            executor: AgentQuoteExecutor::new(),
            agent,
            account: AgentState::new(),
            source,
            hooks: HookRunner::new(),
            tick: 0,
            epoch: 1,
            episodes: 0,
            last_episode: None,
        })
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    /// Register an observer. Hooks are called in registration order.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Ticks since construction or the last flush.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Current decision epoch (1-based).
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn account(&self) -> &AgentState {
        &self.account
    }

    pub fn q_table(&self) -> &QTable {
        self.agent.q_table()
    }

    /// The agent's cash balance.
    pub fn cash(&self) -> Cash {
        self.account.cash()
    }

    /// The agent's signed inventory.
    pub fn inventory(&self) -> Volume {
        self.account.inventory()
    }

    /// Number of episodes trained.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn last_episode(&self) -> Option<&EpisodeSummary> {
        self.last_episode.as_ref()
    }

    // =========================================================================
    // Market-only runs
    // =========================================================================

    /// Run `steps` ticks of order flow with no agent.
    ///
    /// With `with_logging`, hooks see the run start, every tick, and the run
    /// end; otherwise they are not called. Returns the tick counter.
    pub fn run_market_only(&mut self, steps: u64, with_logging: bool) -> Tick {
        let notify = with_logging && !self.hooks.is_empty();
        if notify {
            self.hooks.on_run_start(self.book.levels());
        }

        for _ in 0..steps {
            self.engine.step(&mut self.book, &mut self.source);
            self.tick += 1;
            if notify {
                self.hooks.on_tick_end(&self.book.snapshot(self.tick));
            }
        }

        if notify {
            self.hooks.on_run_end(steps);
        }
        self.tick
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Train one episode with exploration probability `epsilon`.
    ///
    /// Returns the realized profit after terminal liquidation.
    pub fn train_episode(&mut self, epsilon: f64) -> Cash {
        let timesteps = self.config.learning.timesteps;
        let start_tick = self.tick;
        let start_fills = self.account.fills_received();

        self.epoch = 1;
        for _ in 0..timesteps {
            self.run_epoch(epsilon);
            self.epoch += 1;
        }

        let terminal_state = self.agent.state_index(self.account.inventory(), self.epoch);
        let trading_cash = self.account.cash();
        let fills = self.account.fills_received() - start_fills;
        let liquidation = liquidate(&mut self.book, &mut self.account);
        let profit = self.account.cash();
        let utility_reward = self.agent.terminal_update(terminal_state, profit);

        self.episodes += 1;
        let summary = EpisodeSummary {
            episode: self.episodes,
            epsilon,
            profit,
            utility_reward,
            trading_cash,
            liquidation_proceeds: liquidation.proceeds,
            residual_inventory: liquidation.residual,
            epochs: timesteps,
            ticks: self.tick - start_tick,
            fills,
        };
        info!(
            episode = summary.episode,
            epsilon,
            profit = %profit,
            utility = utility_reward,
            residual = liquidation.residual,
            "episode complete"
        );

        self.hooks.on_episode_end(&summary);
        self.last_episode = Some(summary);
        profit
    }

    /// Return book, account, tick counter, and epoch to their initial values.
    ///
    /// The Q-table is kept.
    pub fn flush(&mut self) {
        self.book.flush();
        self.account.reset();
        self.tick = 0;
        self.epoch = 1;
    }

    fn run_epoch(&mut self, epsilon: f64) {
        let epoch = self.epoch;
        let state = self.agent.state_index(self.account.inventory(), epoch);
        let action = self.agent.choose_action(state, epsilon, &mut self.source);
        self.account.reset_quotes(self.config.learning.quote_size);

        let old_value = self.mark_to_market();
        let old_inventory = self.account.inventory();

        self.agent_tick(action);

        let new_inventory = self.account.inventory();
        let transition = Transition {
            state,
            action,
            next_state: self.agent.state_index(new_inventory, epoch),
            old_value,
            new_value: self.mark_to_market(),
            old_inventory,
            new_inventory,
            epoch,
        };
        self.agent.update_q(&transition);

        for _ in 0..self.config.learning.market_ticks_per_epoch {
            self.agent_tick(action);
        }
        debug!(
            epoch,
            %action,
            inventory = self.account.inventory(),
            cash = %self.account.cash(),
            "epoch complete"
        );
    }

    /// One tick with the agent's quotes live: flow, fills, then the touch refresh.
    fn agent_tick(&mut self, action: QuoteAction) {
        self.engine.apply_flow(&mut self.book, &mut self.source);
        self.executor.execute(&mut self.book, &mut self.account, action);
        self.book.refresh_touch();
        self.tick += 1;
    }

    fn mark_to_market(&self) -> Cash {
        let (bid, ask) = (self.book.best_bid(), self.book.best_ask());
        self.account.mark_to_market(bid, ask)
    }
}

impl<S: EventSource> std::fmt::Debug for Simulation<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("levels", &self.book.levels())
            .field("tick", &self.tick)
            .field("epoch", &self.epoch)
            .field("episodes", &self.episodes)
            .field("hooks", &self.hooks)
            .finish()
    }
}
