//! Session controller
//!
//! [`Scorebook`] owns the one [`GameState`] of the process together with its
//! undo history and storage. Every mutation goes through the same pipeline:
//!
//! 1. snapshot the current state
//! 2. apply the ledger operation (which validates first and recalculates last)
//! 3. push the snapshot onto the history, unless the operation failed
//! 4. write history and game state to disk
//! 5. notify observers
//!
//! Write failures are logged and counted but never fail the call: the
//! in-memory state stays authoritative for the rest of the session.

use crate::{
    history::History,
    metrics::Metrics,
    period::{next_period, previous_period},
    query::{self, PeriodLine, PlayerLine, Shooting},
    storage::{is_missing, Storage},
    types::{GameState, Player, ReboundKey, Score, Side, StatKey, StatLine},
    Config, Result,
};

/// What a successful call changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerChange {
    /// Player counter changed
    PlayerStat {
        /// Player name
        player: String,
        /// Counter
        key: StatKey,
        /// Amount added
        delta: i32,
    },
    /// Home team rebound changed
    TeamRebound {
        /// Counter
        key: ReboundKey,
        /// Amount added
        delta: i32,
    },
    /// Opponent counter changed
    OpponentStat {
        /// Counter
        key: StatKey,
        /// Amount added
        delta: i32,
    },
    /// Current period set
    Period(String),
    /// End-of-period score recorded
    EndOfPeriod(String),
    /// Player added or edited
    Roster(String),
    /// Player removed
    PlayerRemoved(String),
    /// Last change reverted
    Undo,
    /// Game reset to defaults
    Reset,
}

/// Receives a notification after every state change
///
/// The state passed in is the new current state; views that depend on shared
/// aggregates (score, standings, team totals) should re-render from it.
pub trait LedgerObserver {
    /// Called once per successful mutation, undo or reset
    fn on_change(&self, change: &LedgerChange, state: &GameState);
}

impl<F> LedgerObserver for F
where
    F: Fn(&LedgerChange, &GameState),
{
    fn on_change(&self, change: &LedgerChange, state: &GameState) {
        self(change, state)
    }
}

/// The scorekeeping session
pub struct Scorebook {
    state: GameState,
    history: History,
    storage: Storage,
    metrics: Metrics,
    observers: Vec<Box<dyn LedgerObserver>>,
    config: Config,
}

impl Scorebook {
    /// Open the session, loading state and history from the data directory
    ///
    /// A missing, unparseable or incomplete game state file is replaced with
    /// the default game. A missing or corrupt history file starts an empty
    /// history. Only failing to create the data directory is an error.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Storage::open(&config)?;
        let metrics = Metrics::new()?;

        let (mut state, fresh) = match storage.load_state() {
            Ok(state) => (state, false),
            Err(e) if is_missing(&e) => {
                tracing::info!("No saved game found, starting with default data");
                (GameState::default(), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Saved game is corrupt or incomplete, reverting to default data");
                (GameState::default(), true)
            }
        };
        state.recalculate_all();

        let history = match storage.load_history() {
            Ok(snapshots) => History::from_snapshots(snapshots, config.history.max_entries),
            Err(e) => {
                if !is_missing(&e) {
                    tracing::warn!(error = %e, "Undo history is unreadable, starting with empty history");
                }
                History::new(config.history.max_entries)
            }
        };
        metrics.update_history_depth(history.len());

        let scorebook = Self {
            state,
            history,
            storage,
            metrics,
            observers: Vec::new(),
            config,
        };

        if fresh {
            scorebook.save_state();
        }

        tracing::info!(
            score = %scorebook.state.team_score,
            period = %scorebook.state.current_period,
            history = scorebook.history.len(),
            "Scorebook opened"
        );

        Ok(scorebook)
    }

    /// Register an observer
    pub fn subscribe(&mut self, observer: impl LedgerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // Mutations

    /// Add `delta` to a player's counter (a make also counts an attempt)
    pub fn record_player_stat(&mut self, player: &str, key: StatKey, delta: i32) -> Result<()> {
        let change = LedgerChange::PlayerStat {
            player: player.to_string(),
            key,
            delta,
        };
        self.apply(change, |state| state.record_player_stat(player, key, delta))
    }

    /// Add `delta` to a home team rebound counter
    pub fn record_team_rebound(&mut self, key: ReboundKey, delta: i32) -> Result<()> {
        self.apply(LedgerChange::TeamRebound { key, delta }, |state| {
            state.record_team_rebound(key, delta);
            Ok(())
        })
    }

    /// Add `delta` to an opponent counter (a make also adds points)
    pub fn record_opponent_stat(&mut self, key: StatKey, delta: i32) -> Result<()> {
        self.apply(LedgerChange::OpponentStat { key, delta }, |state| {
            state.record_opponent_stat(key, delta);
            Ok(())
        })
    }

    /// Set the current period label
    pub fn set_period(&mut self, label: &str) -> Result<()> {
        self.apply(LedgerChange::Period(label.to_string()), |state| {
            state.set_period(label);
            Ok(())
        })
    }

    /// Move to the period after the current one and return its label
    pub fn advance_period(&mut self) -> Result<String> {
        let next = next_period(&self.state.current_period, self.state.next_ot_num)?;
        self.set_period(&next)?;
        Ok(next)
    }

    /// Move to the period before the current one
    ///
    /// Returns `None`, without recording anything, when already at `Q1`.
    pub fn revert_period(&mut self) -> Result<Option<String>> {
        match previous_period(&self.state.current_period)? {
            Some(prev) => {
                self.set_period(&prev)?;
                Ok(Some(prev))
            }
            None => Ok(None),
        }
    }

    /// Record the cumulative score at the end of `label`
    pub fn record_end_of_period_score(
        &mut self,
        label: &str,
        home_cumulative: i32,
        opponent_cumulative: i32,
    ) -> Result<()> {
        self.apply(LedgerChange::EndOfPeriod(label.to_string()), |state| {
            state.record_end_of_period_score(label, home_cumulative, opponent_cumulative)
        })
    }

    /// Add or edit a roster entry
    pub fn upsert_roster(&mut self, name: &str, team: &str, number: u32, starter: bool) -> Result<()> {
        self.apply(LedgerChange::Roster(name.to_string()), |state| {
            state.upsert_roster(name, team, number, starter);
            Ok(())
        })
    }

    /// Remove a player and their stats
    pub fn remove_player(&mut self, name: &str) -> Result<()> {
        self.apply(LedgerChange::PlayerRemoved(name.to_string()), |state| {
            state.remove_player(name)
        })
    }

    /// Revert the most recent change
    ///
    /// Returns `false`, changing nothing, when the history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            tracing::info!("Nothing to undo");
            return false;
        };

        self.state = previous;
        self.metrics.record_undo();
        self.metrics.update_history_depth(self.history.len());
        self.persist();

        tracing::info!(
            score = %self.state.team_score,
            history = self.history.len(),
            "Last action reverted"
        );
        self.notify(&LedgerChange::Undo);
        true
    }

    /// Discard the game and its history and start over with defaults
    pub fn reset(&mut self) {
        self.state = GameState::default();
        self.history.clear();
        self.metrics.update_history_depth(0);

        if let Err(e) = self.storage.clear() {
            self.metrics.record_persist_failure();
            tracing::error!(error = %e, "Failed to remove saved game files");
        }

        self.state.recalculate_all();
        self.save_state();

        tracing::info!("All game data reset");
        self.notify(&LedgerChange::Reset);
    }

    // Queries

    /// Current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Running score
    pub fn current_score(&self) -> Score {
        self.state.team_score
    }

    /// Current period label
    pub fn current_period(&self) -> &str {
        &self.state.current_period
    }

    /// Home player display records, in roster order
    pub fn player_standings(&self) -> Vec<PlayerLine> {
        query::player_standings(&self.state)
    }

    /// Team totals of one side
    pub fn team_totals(&self, side: Side) -> StatLine {
        query::team_totals(&self.state, side)
    }

    /// Team shooting percentages of one side
    pub fn team_shooting(&self, side: Side) -> Shooting {
        query::team_shooting(&self.state, side)
    }

    /// Quarter table in natural period order
    pub fn period_breakdown(&self) -> Vec<PeriodLine> {
        query::period_breakdown(&self.state)
    }

    /// Roster of `team`
    pub fn roster(&self, team: &str) -> &[Player] {
        query::roster(&self.state, team)
    }

    /// Check a proposed end-of-period score against the live score
    pub fn check_end_of_period(&self, home_cumulative: i32, opponent_cumulative: i32) -> Result<()> {
        query::check_end_of_period(&self.state, home_cumulative, opponent_cumulative)
    }

    /// Number of undo snapshots
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Session metrics
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Session configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // Pipeline

    fn apply<F>(&mut self, change: LedgerChange, op: F) -> Result<()>
    where
        F: FnOnce(&mut GameState) -> Result<()>,
    {
        let snapshot = self.state.clone();
        if let Err(e) = op(&mut self.state) {
            tracing::warn!(error = %e, ?change, "Ledger operation rejected");
            return Err(e);
        }

        if self.history.push(snapshot).is_some() {
            tracing::debug!(capacity = self.history.capacity(), "Oldest undo snapshot evicted");
        }
        self.metrics.record_mutation();
        self.metrics.update_history_depth(self.history.len());

        self.persist();
        self.notify(&change);
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save_history(&self.history) {
            self.metrics.record_persist_failure();
            tracing::error!(error = %e, "Failed to save undo history");
        }
        self.save_state();
    }

    fn save_state(&self) {
        if let Err(e) = self.storage.save_state(&self.state) {
            self.metrics.record_persist_failure();
            tracing::error!(error = %e, "Failed to save game state");
        }
    }

    fn notify(&self, change: &LedgerChange) {
        for observer in &self.observers {
            observer.on_change(change, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HOME_TEAM;
    use crate::Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn open_in(dir: &std::path::Path) -> Scorebook {
        let mut config = Config::default();
        config.data_dir = dir.to_path_buf();
        Scorebook::open(config).unwrap()
    }

    #[test]
    fn test_open_fresh_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let book = open_in(dir.path());

        assert_eq!(book.state(), &GameState::default());
        assert!(book.config().stats_path().exists());
        assert_eq!(book.history_len(), 0);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut book = open_in(dir.path());
            book.record_player_stat("Player A", StatKey::P3Made, 2).unwrap();
            book.set_period("Q2").unwrap();
        }

        let mut book = open_in(dir.path());
        assert_eq!(book.current_score().home, 6);
        assert_eq!(book.current_period(), "Q2");
        assert_eq!(book.history_len(), 2);

        // Undo works across sessions
        assert!(book.undo());
        assert_eq!(book.current_period(), "Q1");
    }

    #[test]
    fn test_corrupt_state_reverts_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = dir.path().to_path_buf();
        std::fs::write(config.stats_path(), "{ not json").unwrap();
        std::fs::write(config.history_path(), "[1, 2").unwrap();

        let book = Scorebook::open(config.clone()).unwrap();
        assert_eq!(book.state(), &GameState::default());
        assert_eq!(book.history_len(), 0);

        // The corrupt file was overwritten with the defaults
        let raw = std::fs::read_to_string(config.stats_path()).unwrap();
        let reloaded: GameState = serde_json::from_str(&raw).unwrap();
        assert_eq!(reloaded, GameState::default());
    }

    #[test]
    fn test_rejected_operation_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = open_in(dir.path());

        let err = book.record_end_of_period_score("Q7", 10, 10).unwrap_err();
        assert!(matches!(err, Error::UnknownPeriod(_)));
        assert!(book.remove_player("Nobody").is_err());
        assert_eq!(book.history_len(), 0);
        assert_eq!(book.metrics().mutations_total.get(), 0);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = open_in(dir.path());
        assert!(!book.undo());
        assert_eq!(book.state(), &GameState::default());
    }

    #[test]
    fn test_advance_and_revert_period() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = open_in(dir.path());

        for expected in ["Q2", "Q3", "Q4", "OT1"] {
            assert_eq!(book.advance_period().unwrap(), expected);
        }
        assert_eq!(book.revert_period().unwrap().as_deref(), Some("Q4"));

        book.set_period("Q1").unwrap();
        let depth = book.history_len();
        assert_eq!(book.revert_period().unwrap(), None);
        assert_eq!(book.history_len(), depth);
    }

    #[test]
    fn test_reset_clears_history_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = open_in(dir.path());
        book.upsert_roster("Player C", HOME_TEAM, 9, true).unwrap();
        book.record_opponent_stat(StatKey::P2Made, 1).unwrap();

        book.reset();
        assert_eq!(book.state(), &GameState::default());
        assert_eq!(book.history_len(), 0);
        assert!(!book.config().history_path().exists());
        assert!(book.config().stats_path().exists());
        assert!(!book.undo());
    }

    #[test]
    fn test_observers_see_every_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = open_in(dir.path());

        let seen: Rc<RefCell<Vec<(LedgerChange, i32)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        book.subscribe(move |change: &LedgerChange, state: &GameState| {
            sink.borrow_mut().push((change.clone(), state.team_score.home));
        });

        book.record_player_stat("Player B", StatKey::P2Made, 1).unwrap();
        let _ = book.record_player_stat("Ghost", StatKey::P2Made, 1);
        book.undo();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, 2);
        assert_eq!(seen[1], (LedgerChange::Undo, 0));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = open_in(dir.path());

        // A directory where the state file should be makes every write fail
        let stats_path = book.config().stats_path();
        std::fs::remove_file(&stats_path).unwrap();
        std::fs::create_dir(&stats_path).unwrap();

        book.record_player_stat("Player A", StatKey::FtMade, 1).unwrap();
        assert_eq!(book.current_score().home, 1);
        assert!(book.metrics().persist_failures_total.get() >= 1);
    }
}
