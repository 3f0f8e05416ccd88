//! Read-side views over the game state
//!
//! Everything here is a pure function of a [`GameState`]; callers re-query
//! after each mutation.

use crate::{
    period::PeriodScore,
    types::{GameState, Player, ShotType, Side, StatLine},
    Error, Result,
};
use serde::Serialize;

/// `made / attempted * 100` rounded to one decimal, `0.0` with no attempts
pub fn shooting_pct(made: i32, attempted: i32) -> f64 {
    if attempted > 0 {
        (f64::from(made) / f64::from(attempted) * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Shooting percentages for the three shot types
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Shooting {
    /// Free-throw percentage
    pub ft_pct: f64,
    /// Two-point percentage
    pub p2_pct: f64,
    /// Three-point percentage
    pub p3_pct: f64,
}

impl Shooting {
    /// Percentages of a stat line
    pub fn of(line: &StatLine) -> Self {
        let pct = |shot: ShotType| {
            let (made, attempted) = line.shots(shot);
            shooting_pct(made, attempted)
        };
        Self {
            ft_pct: pct(ShotType::FreeThrow),
            p2_pct: pct(ShotType::TwoPoint),
            p3_pct: pct(ShotType::ThreePoint),
        }
    }

    /// Percentage of one shot type
    pub fn get(&self, shot: ShotType) -> f64 {
        match shot {
            ShotType::FreeThrow => self.ft_pct,
            ShotType::TwoPoint => self.p2_pct,
            ShotType::ThreePoint => self.p3_pct,
        }
    }
}

/// Display record of one home player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerLine {
    /// Roster entry
    #[serde(flatten)]
    pub player: Player,

    /// Raw counters
    pub stats: StatLine,

    /// Derived percentages
    pub shooting: Shooting,
}

/// Per-player display records of the home roster, in roster order
pub fn player_standings(state: &GameState) -> Vec<PlayerLine> {
    state
        .home_players()
        .iter()
        .map(|player| {
            let stats = state
                .player_stats
                .get(&player.name)
                .cloned()
                .unwrap_or_default();
            PlayerLine {
                player: player.clone(),
                shooting: Shooting::of(&stats),
                stats,
            }
        })
        .collect()
}

/// Display ordering: points, then assists, then defensive rebounds, all descending
pub fn sort_standings(lines: &mut [PlayerLine]) {
    lines.sort_by(|a, b| {
        b.stats
            .points
            .cmp(&a.stats.points)
            .then(b.stats.assists.cmp(&a.stats.assists))
            .then(b.stats.def_rebounds.cmp(&a.stats.def_rebounds))
    });
}

/// Team totals
///
/// Home sums the rostered players and adds the team rebounds; the opponent
/// is its aggregate as recorded.
pub fn team_totals(state: &GameState, side: Side) -> StatLine {
    match side {
        Side::Home => {
            let mut totals = StatLine::default();
            for player in state.home_players() {
                if let Some(stats) = state.player_stats.get(&player.name) {
                    totals.accumulate(stats);
                }
            }
            totals.off_rebounds = totals.off_rebounds.saturating_add(state.team_rebounds.offensive);
            totals.def_rebounds = totals.def_rebounds.saturating_add(state.team_rebounds.defensive);
            totals
        }
        Side::Opponent => state.opponent.clone(),
    }
}

/// Team shooting percentages
pub fn team_shooting(state: &GameState, side: Side) -> Shooting {
    Shooting::of(&team_totals(state, side))
}

/// One row of the quarter breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodLine {
    /// Period label
    pub label: String,

    /// Scores recorded for the period
    #[serde(flatten)]
    pub score: PeriodScore,
}

/// Quarter table in natural order: `Q1..Q4`, then overtimes by number
pub fn period_breakdown(state: &GameState) -> Vec<PeriodLine> {
    state
        .quarter_table
        .ordered()
        .into_iter()
        .map(|(period, score)| PeriodLine {
            label: period.to_string(),
            score: *score,
        })
        .collect()
}

/// Roster of `team`
pub fn roster<'a>(state: &'a GameState, team: &str) -> &'a [Player] {
    state.roster.get(team).map(Vec::as_slice).unwrap_or(&[])
}

/// Caller-side check that an end-of-period score does not go below the live score
pub fn check_end_of_period(state: &GameState, home_cumulative: i32, opponent_cumulative: i32) -> Result<()> {
    let live = state.team_score;
    if home_cumulative < live.home {
        return Err(Error::ScoreBelowLive {
            side: Side::Home.label(),
            given: home_cumulative,
            live: live.home,
        });
    }
    if opponent_cumulative < live.opponent {
        return Err(Error::ScoreBelowLive {
            side: Side::Opponent.label(),
            given: opponent_cumulative,
            live: live.opponent,
        });
    }
    Ok(())
}
