//! Game session state for idlebot.
//!
//! This crate owns everything that has to stay consistent across packets:
//!
//! 1. **Roster** ([`Roster`]): who is in the game right now
//! 2. **Phase** ([`SessionPhase`]): not in game → in game → exiting
//! 3. **Handlers**: party invites/accepts and master chat commands
//!
//! Handlers never perform I/O. Each returns the [`Effect`]s it wants
//! carried out (packets to send, [`SessionEvent`]s to report), in order.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client task (above)  ← feeds packets in order, performs effects
//!     ↕
//! Session Layer (this crate)  ← roster, phase, dispatch
//!     ↕
//! Protocol Layer (below)  ← decodes packets, encodes replies
//! ```

mod chat;
mod config;
mod effect;
mod error;
mod party;
mod roster;
mod session;

pub use chat::{EXIT_COMMAND, FAREWELL};
pub use config::{DEFAULT_MAX_PLAYERS, SessionConfig};
pub use effect::{Effect, PlayerCount, SessionEvent};
pub use error::SessionError;
pub use party::{RELATION_ACTION_INVITE, RELATION_ENTITY_PARTY};
pub use roster::{PlayerRecord, Roster};
pub use session::{GameSession, LeaveReason, RosterChange, SessionPhase};
