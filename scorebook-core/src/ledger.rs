//! Ledger mutations over the game state
//!
//! Every operation validates its input before touching the state, so an
//! `Err` always means the state is exactly as it was. That lets the session
//! take the undo snapshot up front and simply discard it on failure.
//!
//! Derived values are rebuilt by [`GameState::recalculate_all`] at the end of
//! every operation:
//!
//! - player `Points` = 1·FT made + 2·2P made + 3·3P made
//! - every attempt counter is raised to at least its make counter
//! - home score = Σ Points of the home roster
//! - opponent score = opponent `Points`, which is accumulated per make and
//!   never recomputed from the opponent's make counters

use crate::{
    period::Period,
    types::{GameState, Player, ReboundKey, StatKey, StatLine},
    Error, Result,
};

impl GameState {
    /// Add `delta` to a player's counter
    ///
    /// A make also adds `delta` to the paired attempt counter. The player must
    /// be on a roster; a rostered player without a stat record gets a zeroed
    /// one.
    pub fn record_player_stat(&mut self, player: &str, key: StatKey, delta: i32) -> Result<()> {
        if !self.is_rostered(player) {
            return Err(Error::UnknownPlayer(player.to_string()));
        }

        let stats = self.player_stats.entry(player.to_string()).or_default();
        stats.add(key, delta);
        if let Some(shot) = key.made_shot() {
            stats.add(shot.attempt_key(), delta);
        }

        tracing::debug!(player = %player, key = %key, delta, "Player stat recorded");
        self.recalculate_all();
        Ok(())
    }

    /// Add `delta` to the home team's own rebound counter
    pub fn record_team_rebound(&mut self, key: ReboundKey, delta: i32) {
        self.team_rebounds.add(key, delta);
        tracing::debug!(?key, delta, "Team rebound recorded");
        self.recalculate_all();
    }

    /// Add `delta` to an opponent counter
    ///
    /// A make adds its point value to the opponent's `Points` and raises the
    /// paired attempt counter to the new make count, without otherwise
    /// incrementing it.
    pub fn record_opponent_stat(&mut self, key: StatKey, delta: i32) {
        self.opponent.add(key, delta);
        if let Some(shot) = key.made_shot() {
            self.opponent.points = self
                .opponent
                .points
                .saturating_add(shot.points().saturating_mul(delta));
            self.opponent.clamp_attempts_for(shot);
        }

        tracing::debug!(key = %key, delta, "Opponent stat recorded");
        self.recalculate_all();
    }

    /// Set the current period label (no sequencing checks)
    pub fn set_period(&mut self, label: &str) {
        self.current_period = label.to_string();
        self.recalculate_all();
    }

    /// Record the cumulative score at the end of `label`
    ///
    /// Recording the overtime that matches `next_ot_num` opens the next one.
    pub fn record_end_of_period_score(
        &mut self,
        label: &str,
        home_cumulative: i32,
        opponent_cumulative: i32,
    ) -> Result<()> {
        self.quarter_table
            .record(label, home_cumulative, opponent_cumulative)?;

        if let Some(Period::Overtime(n)) = Period::parse(label) {
            if n == self.next_ot_num {
                self.next_ot_num = self.next_ot_num.saturating_add(1);
            }
        }

        tracing::debug!(
            period = %label,
            home_cumulative,
            opponent_cumulative,
            "End-of-period score recorded"
        );
        self.recalculate_all();
        Ok(())
    }

    /// Add a player, or replace the roster entry with the same name
    ///
    /// Names are unique across teams: an entry with this name on another team
    /// is moved. Existing stats are kept; new players get a zeroed record.
    pub fn upsert_roster(&mut self, name: &str, team: &str, number: u32, starter: bool) {
        let player = Player::new(name, team, number, starter);

        for (roster_team, players) in self.roster.iter_mut() {
            if roster_team != team {
                players.retain(|p| p.name != name);
            }
        }

        let players = self.roster.entry(team.to_string()).or_default();
        match players.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = player,
            None => players.push(player),
        }

        self.player_stats.entry(name.to_string()).or_default();

        tracing::debug!(player = %name, team = %team, number, starter, "Roster updated");
        self.recalculate_all();
    }

    /// Remove a player and their stat record
    pub fn remove_player(&mut self, name: &str) -> Result<()> {
        if !self.is_rostered(name) {
            return Err(Error::UnknownPlayer(name.to_string()));
        }

        for players in self.roster.values_mut() {
            players.retain(|p| p.name != name);
        }
        self.player_stats.remove(name);

        tracing::debug!(player = %name, "Player removed");
        self.recalculate_all();
        Ok(())
    }

    /// Rebuild every derived field
    pub fn recalculate_all(&mut self) {
        for name in self.home_players().iter().map(|p| p.name.clone()).collect::<Vec<_>>() {
            self.player_stats.entry(name).or_default();
        }

        for stats in self.player_stats.values_mut() {
            Self::recalculate_player(stats);
        }

        let home: i32 = self
            .home_players()
            .iter()
            .filter_map(|p| self.player_stats.get(&p.name))
            .map(|s| s.points)
            .fold(0, i32::saturating_add);

        self.team_score.home = home;
        self.team_score.opponent = self.opponent.points;
    }

    fn recalculate_player(stats: &mut StatLine) {
        stats.clamp_attempts();
        stats.points = stats.points_from_makes();
    }
}
