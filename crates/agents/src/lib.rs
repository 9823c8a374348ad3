//! Agents crate: the learning market maker for the order book gym.
//!
//! This crate provides:
//! - `AgentState` for inventory, cash, and remaining quote sizes
//! - `AgentQuoteExecutor` for filling the two pegged quotes each tick
//! - `QLearningAgent` with its dense `QTable`, epsilon-greedy choice and TD updates
//! - `liquidate` for the forced close-out at episode end
//!
//! # Architecture
//! The agent never owns the book. The episode driver lends it the book each
//! tick: the executor fills quotes against it, the agent reads the touch to
//! mark its position, and at episode end `liquidate` crosses whatever depth
//! is left.

mod executor;
mod liquidation;
mod q_agent;
mod q_table;
mod state;

pub use executor::{AgentQuoteExecutor, Fill, QuoteFills};
pub use liquidation::{Liquidation, liquidate};
pub use q_agent::{AgentStats, QLearningAgent, Transition};
pub use q_table::QTable;
pub use state::AgentState;
