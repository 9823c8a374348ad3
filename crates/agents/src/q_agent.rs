//! Tabular Q-learning market maker.
//!
//! # State encoding
//!
//! ```text
//! tier  = min(inventory div tier_width, tiers - 1)
//! state = tier * epoch_stride + (epoch - 1)
//! ```
//!
//! A short position (negative tier), epoch 0, or an index past the end of the
//! table has no state. Updates against a missing state are skipped and
//! greedy selection falls back to action 0.
//!
//! # Rewards
//!
//! Per decision epoch:
//!
//! ```text
//! r = a * (mark_new - mark_old) + exp(b * (timesteps - epoch)) * sign(|inv_new| - |inv_old|)
//! Q[s][a] = (1 - lr) * Q[s][a] + lr * (r + γ * max Q[s'])
//! ```
//!
//! At episode end the CARA utility `α - exp(-risk * profit)` is blended into
//! every action of the terminal state.

use serde::{Deserialize, Serialize};
use sim_core::EventSource;
use tracing::debug;
use types::{ActionSpace, Cash, ConfigError, LearningConfig, QuoteAction, Volume};

use crate::q_table::QTable;

/// Running counters for the learning loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub explorations: u64,
    pub exploitations: u64,
    pub updates_applied: u64,
    pub updates_skipped: u64,
    pub terminal_updates: u64,
    pub cumulative_shaping: f64,
}

impl AgentStats {
    /// Fraction of choices that were random.
    pub fn exploration_rate(&self) -> f64 {
        let total = self.explorations + self.exploitations;
        if total == 0 {
            0.0
        } else {
            self.explorations as f64 / total as f64
        }
    }
}

/// Everything observed across one decision tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// State held when the action was chosen.
    pub state: Option<usize>,
    pub action: QuoteAction,
    /// State recomputed after the tick.
    pub next_state: Option<usize>,
    pub old_value: Cash,
    pub new_value: Cash,
    pub old_inventory: Volume,
    pub new_inventory: Volume,
    /// Epoch the action was taken in.
    pub epoch: usize,
}

/// Epsilon-greedy quoting agent over a dense Q-table.
///
/// The table is created once, all zero, and survives every episode reset.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: LearningConfig,
    actions: ActionSpace,
    table: QTable,
    stats: AgentStats,
}

impl QLearningAgent {
    pub fn new(levels: usize, config: LearningConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if levels < 2 {
            return Err(ConfigError::TooFewLevels {
                got: levels,
                min: 2,
            });
        }

        let actions = ActionSpace::for_levels(levels);
        let table = QTable::new(config.state_count(), actions.len());
        Ok(Self {
            config,
            actions,
            table,
            stats: AgentStats::default(),
        })
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn action_space(&self) -> ActionSpace {
        self.actions
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    /// Discretize `(inventory, epoch)` into a table row.
    pub fn state_index(&self, inventory: Volume, epoch: usize) -> Option<usize> {
        if epoch == 0 {
            return None;
        }
        let tier = inventory.div_euclid(self.config.inventory_tier_width);
        if tier < 0 {
            return None;
        }
        let tier = (tier as usize).min(self.config.inventory_tiers.saturating_sub(1));
        let index = tier * self.config.epoch_stride + (epoch - 1);
        (index < self.table.rows()).then_some(index)
    }

    /// Pick the quote for the coming epoch.
    ///
    /// Always consumes one `unit()` draw; exploring consumes two more
    /// `below(width)` draws (bid shift, then ask shift).
    pub fn choose_action<S: EventSource + ?Sized>(
        &mut self,
        state: Option<usize>,
        epsilon: f64,
        source: &mut S,
    ) -> QuoteAction {
        let width = self.actions.width();
        if source.unit() < epsilon {
            self.stats.explorations += 1;
            let bid_shift = source.below(width);
            let ask_shift = source.below(width);
            let action = QuoteAction::new(bid_shift, ask_shift);
            debug!(?state, %action, "explore");
            return action;
        }

        self.stats.exploitations += 1;
        let action = state
            .and_then(|s| self.table.best_action(s))
            .and_then(|index| self.actions.decode(index))
            .unwrap_or_default();
        debug!(?state, %action, "exploit");
        action
    }

    /// Shaping reward for one decision tick.
    pub fn shaping_reward(
        &self,
        old_value: Cash,
        new_value: Cash,
        old_inventory: Volume,
        new_inventory: Volume,
        epoch: usize,
    ) -> f64 {
        let value_change = (new_value - old_value).to_float();
        let time_to_go = self.config.timesteps as f64 - epoch as f64;
        let exposure = (new_inventory.abs() - old_inventory.abs()).signum() as f64;
        self.config.value_weight * value_change
            + (self.config.inventory_weight * time_to_go).exp() * exposure
    }

    /// One-step TD update. Returns `false` if any index was out of range.
    pub fn update_q(&mut self, transition: &Transition) -> bool {
        let reward = self.shaping_reward(
            transition.old_value,
            transition.new_value,
            transition.old_inventory,
            transition.new_inventory,
            transition.epoch,
        );

        let next_best = transition.next_state.and_then(|s| self.table.max_value(s));
        let applied = match (
            transition.state,
            self.actions.encode(transition.action),
            next_best,
        ) {
            (Some(state), Some(action), Some(next_best)) => {
                let target = reward + self.config.discount * next_best;
                self.table.blend(state, action, target, self.config.learning_rate)
            }
            _ => false,
        };

        if applied {
            self.stats.updates_applied += 1;
            self.stats.cumulative_shaping += reward;
        } else {
            self.stats.updates_skipped += 1;
            debug!(
                state = ?transition.state,
                next_state = ?transition.next_state,
                action = %transition.action,
                "skipped Q update"
            );
        }
        applied
    }

    /// CARA utility of a realized profit.
    pub fn cara_utility(&self, profit: Cash) -> f64 {
        self.config.cara_alpha - (-self.config.risk_aversion * profit.to_float()).exp()
    }

    /// Blend the terminal reward into every action of `state`.
    ///
    /// Returns the utility reward, whether or not the row existed.
    pub fn terminal_update(&mut self, state: Option<usize>, profit: Cash) -> f64 {
        let reward = self.cara_utility(profit);
        let row_best = state.and_then(|s| self.table.max_value(s).map(|best| (s, best)));
        match row_best {
            Some((s, best)) => {
                let target = reward + self.config.discount * best;
                self.table.blend_row(s, target, self.config.learning_rate);
                self.stats.terminal_updates += 1;
            }
            None => {
                self.stats.updates_skipped += 1;
                debug!(?state, "skipped terminal update");
            }
        }
        reward
    }
}
