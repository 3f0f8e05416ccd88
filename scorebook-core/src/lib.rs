//! Scorebook Core
//!
//! Live basketball scorekeeping: a stats ledger with snapshot undo and
//! write-through persistence.
//!
//! # Architecture
//!
//! - **Ledger**: mutations over one [`GameState`], each followed by a full
//!   recalculation of derived values
//! - **Undo**: a bounded stack of whole-state snapshots, one per call
//! - **Storage**: two independent JSON files, state and history
//! - **Queries**: pure views (standings, team totals, quarter breakdown)
//! - **Session**: [`Scorebook`] owns all of the above and notifies observers
//!
//! # Invariants
//!
//! - Attempts ≥ makes for every shot type of every player
//! - Player points = 1·FT + 2·2P + 3·3P makes
//! - Home score = Σ home player points
//! - Quarter delta = cumulative - previous cumulative

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod types;
pub mod period;
pub mod ledger;
pub mod history;
pub mod storage;
pub mod query;
pub mod session;
pub mod clock;
pub mod command;
pub mod report;
pub mod error;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    GameState, Player, ReboundKey, Score, ShotType, Side, StatKey, StatLine, TeamRebounds,
    HOME_TEAM,
};
pub use period::{Period, PeriodScore, QuarterTable};
pub use history::History;
pub use storage::Storage;
pub use session::{LedgerChange, LedgerObserver, Scorebook};
pub use config::Config;
