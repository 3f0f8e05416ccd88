//! Core types for the scorebook
//!
//! Every record serializes with the key names of the on-disk game state file,
//! so a state written by one session loads unchanged in the next.

use crate::period::QuarterTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Roster key of the home team (the team tracked player by player)
pub const HOME_TEAM: &str = "Team1";

/// Roster of every team, keyed by team name
pub type Roster = BTreeMap<String, Vec<Player>>;

/// Shot category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotType {
    /// Free throw (1 point)
    FreeThrow,
    /// Two-point field goal
    TwoPoint,
    /// Three-point field goal
    ThreePoint,
}

impl ShotType {
    /// All shot types in display order
    pub const ALL: [ShotType; 3] = [ShotType::FreeThrow, ShotType::TwoPoint, ShotType::ThreePoint];

    /// Points awarded per make
    pub fn points(&self) -> i32 {
        match self {
            ShotType::FreeThrow => 1,
            ShotType::TwoPoint => 2,
            ShotType::ThreePoint => 3,
        }
    }

    /// Counter of makes
    pub fn made_key(&self) -> StatKey {
        match self {
            ShotType::FreeThrow => StatKey::FtMade,
            ShotType::TwoPoint => StatKey::P2Made,
            ShotType::ThreePoint => StatKey::P3Made,
        }
    }

    /// Counter of attempts paired with [`ShotType::made_key`]
    pub fn attempt_key(&self) -> StatKey {
        match self {
            ShotType::FreeThrow => StatKey::FtAttempted,
            ShotType::TwoPoint => StatKey::P2Attempted,
            ShotType::ThreePoint => StatKey::P3Attempted,
        }
    }

    /// Short label (`FT`, `2P`, `3P`)
    pub fn label(&self) -> &'static str {
        match self {
            ShotType::FreeThrow => "FT",
            ShotType::TwoPoint => "2P",
            ShotType::ThreePoint => "3P",
        }
    }
}

/// A recordable counting stat
///
/// There is no `Points` key: points are derived from makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    /// Free throws made
    #[serde(rename = "FT_Made")]
    FtMade,
    /// Free throws attempted
    #[serde(rename = "FT_Attempted")]
    FtAttempted,
    /// Two-pointers made
    #[serde(rename = "2P_Made")]
    P2Made,
    /// Two-pointers attempted
    #[serde(rename = "2P_Attempted")]
    P2Attempted,
    /// Three-pointers made
    #[serde(rename = "3P_Made")]
    P3Made,
    /// Three-pointers attempted
    #[serde(rename = "3P_Attempted")]
    P3Attempted,
    /// Offensive rebounds
    #[serde(rename = "Off_Rebounds")]
    OffRebounds,
    /// Defensive rebounds
    #[serde(rename = "Def_Rebounds")]
    DefRebounds,
    /// Assists
    Assists,
    /// Steals
    Steals,
    /// Blocks
    Blocks,
    /// Turnovers
    Turnovers,
    /// Personal fouls
    Fouls,
}

impl StatKey {
    /// Every recordable key
    pub const ALL: [StatKey; 13] = [
        StatKey::FtMade,
        StatKey::FtAttempted,
        StatKey::P2Made,
        StatKey::P2Attempted,
        StatKey::P3Made,
        StatKey::P3Attempted,
        StatKey::OffRebounds,
        StatKey::DefRebounds,
        StatKey::Assists,
        StatKey::Steals,
        StatKey::Blocks,
        StatKey::Turnovers,
        StatKey::Fouls,
    ];

    /// Persisted key name
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::FtMade => "FT_Made",
            StatKey::FtAttempted => "FT_Attempted",
            StatKey::P2Made => "2P_Made",
            StatKey::P2Attempted => "2P_Attempted",
            StatKey::P3Made => "3P_Made",
            StatKey::P3Attempted => "3P_Attempted",
            StatKey::OffRebounds => "Off_Rebounds",
            StatKey::DefRebounds => "Def_Rebounds",
            StatKey::Assists => "Assists",
            StatKey::Steals => "Steals",
            StatKey::Blocks => "Blocks",
            StatKey::Turnovers => "Turnovers",
            StatKey::Fouls => "Fouls",
        }
    }

    /// Parse a persisted key name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
    }

    /// Shot type if this key counts makes
    pub fn made_shot(&self) -> Option<ShotType> {
        match self {
            StatKey::FtMade => Some(ShotType::FreeThrow),
            StatKey::P2Made => Some(ShotType::TwoPoint),
            StatKey::P3Made => Some(ShotType::ThreePoint),
            _ => None,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team rebound category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReboundKey {
    /// Offensive rebound
    #[serde(rename = "Off_Rebounds")]
    Offensive,
    /// Defensive rebound
    #[serde(rename = "Def_Rebounds")]
    Defensive,
}

impl ReboundKey {
    /// Parse `off`/`def` or the persisted key name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "off_rebounds" | "offensive" => Some(ReboundKey::Offensive),
            "def" | "def_rebounds" | "defensive" => Some(ReboundKey::Defensive),
            _ => None,
        }
    }
}

/// Which team a query concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Tracked team (per-player stats)
    Home,
    /// Opposing team (flat aggregate)
    Opponent,
}

impl Side {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Opponent => "opponent",
        }
    }
}

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player name
    pub name: String,

    /// Team the player belongs to
    pub team: String,

    /// Jersey number
    pub number: u32,

    /// In the starting five
    pub starter: bool,
}

impl Player {
    /// Create a roster entry
    pub fn new(name: impl Into<String>, team: impl Into<String>, number: u32, starter: bool) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            number,
            starter,
        }
    }
}

/// Counting stats of one player, or of the opponent as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    /// Free throws made
    #[serde(rename = "FT_Made")]
    pub ft_made: i32,
    /// Free throws attempted
    #[serde(rename = "FT_Attempted")]
    pub ft_attempted: i32,
    /// Two-pointers made
    #[serde(rename = "2P_Made")]
    pub p2_made: i32,
    /// Two-pointers attempted
    #[serde(rename = "2P_Attempted")]
    pub p2_attempted: i32,
    /// Three-pointers made
    #[serde(rename = "3P_Made")]
    pub p3_made: i32,
    /// Three-pointers attempted
    #[serde(rename = "3P_Attempted")]
    pub p3_attempted: i32,
    /// Points
    #[serde(rename = "Points")]
    pub points: i32,
    /// Offensive rebounds
    #[serde(rename = "Off_Rebounds")]
    pub off_rebounds: i32,
    /// Defensive rebounds
    #[serde(rename = "Def_Rebounds")]
    pub def_rebounds: i32,
    /// Assists
    #[serde(rename = "Assists")]
    pub assists: i32,
    /// Steals
    #[serde(rename = "Steals")]
    pub steals: i32,
    /// Blocks
    #[serde(rename = "Blocks")]
    pub blocks: i32,
    /// Turnovers
    #[serde(rename = "Turnovers")]
    pub turnovers: i32,
    /// Personal fouls
    #[serde(rename = "Fouls")]
    pub fouls: i32,
}

impl StatLine {
    /// Read a counter
    pub fn get(&self, key: StatKey) -> i32 {
        match key {
            StatKey::FtMade => self.ft_made,
            StatKey::FtAttempted => self.ft_attempted,
            StatKey::P2Made => self.p2_made,
            StatKey::P2Attempted => self.p2_attempted,
            StatKey::P3Made => self.p3_made,
            StatKey::P3Attempted => self.p3_attempted,
            StatKey::OffRebounds => self.off_rebounds,
            StatKey::DefRebounds => self.def_rebounds,
            StatKey::Assists => self.assists,
            StatKey::Steals => self.steals,
            StatKey::Blocks => self.blocks,
            StatKey::Turnovers => self.turnovers,
            StatKey::Fouls => self.fouls,
        }
    }

    fn get_mut(&mut self, key: StatKey) -> &mut i32 {
        match key {
            StatKey::FtMade => &mut self.ft_made,
            StatKey::FtAttempted => &mut self.ft_attempted,
            StatKey::P2Made => &mut self.p2_made,
            StatKey::P2Attempted => &mut self.p2_attempted,
            StatKey::P3Made => &mut self.p3_made,
            StatKey::P3Attempted => &mut self.p3_attempted,
            StatKey::OffRebounds => &mut self.off_rebounds,
            StatKey::DefRebounds => &mut self.def_rebounds,
            StatKey::Assists => &mut self.assists,
            StatKey::Steals => &mut self.steals,
            StatKey::Blocks => &mut self.blocks,
            StatKey::Turnovers => &mut self.turnovers,
            StatKey::Fouls => &mut self.fouls,
        }
    }

    /// Add `delta` to a single counter
    pub fn add(&mut self, key: StatKey, delta: i32) {
        let counter = self.get_mut(key);
        *counter = counter.saturating_add(delta);
    }

    /// `(made, attempted)` for a shot type
    pub fn shots(&self, shot: ShotType) -> (i32, i32) {
        (self.get(shot.made_key()), self.get(shot.attempt_key()))
    }

    /// Points implied by the make counters
    pub fn points_from_makes(&self) -> i32 {
        ShotType::ALL
            .iter()
            .map(|shot| self.get(shot.made_key()).saturating_mul(shot.points()))
            .fold(0, i32::saturating_add)
    }

    /// Raise the attempt counter of `shot` to its make count
    pub fn clamp_attempts_for(&mut self, shot: ShotType) {
        let made = self.get(shot.made_key());
        let attempted = self.get_mut(shot.attempt_key());
        *attempted = (*attempted).max(made);
    }

    /// Raise every attempt counter to its make count
    pub fn clamp_attempts(&mut self) {
        for shot in ShotType::ALL {
            self.clamp_attempts_for(shot);
        }
    }

    /// Add every counter of `other`, `points` included
    pub fn accumulate(&mut self, other: &StatLine) {
        for key in StatKey::ALL {
            self.add(key, other.get(key));
        }
        self.points = self.points.saturating_add(other.points);
    }
}

/// Rebounds credited to the home team rather than a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRebounds {
    /// Offensive team rebounds
    #[serde(rename = "Off_Rebounds")]
    pub offensive: i32,

    /// Defensive team rebounds
    #[serde(rename = "Def_Rebounds")]
    pub defensive: i32,
}

impl TeamRebounds {
    /// Add `delta` to one counter
    pub fn add(&mut self, key: ReboundKey, delta: i32) {
        match key {
            ReboundKey::Offensive => self.offensive = self.offensive.saturating_add(delta),
            ReboundKey::Defensive => self.defensive = self.defensive.saturating_add(delta),
        }
    }
}

/// Running score (derived, never ground truth)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Home points
    #[serde(rename = "Team1")]
    pub home: i32,

    /// Opponent points
    #[serde(rename = "Team2")]
    pub opponent: i32,
}

impl Score {
    /// Points of one side
    pub fn of(&self, side: Side) -> i32 {
        match side {
            Side::Home => self.home,
            Side::Opponent => self.opponent,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.opponent)
    }
}

/// Complete state of the current game
///
/// Replaced wholesale on load, reset and undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Players by team
    pub roster: Roster,

    /// Per-player counting stats, keyed by player name
    pub player_stats: BTreeMap<String, StatLine>,

    /// Running score
    pub team_score: Score,

    /// Team rebounds of the home side
    #[serde(rename = "team1_team_rebounds")]
    pub team_rebounds: TeamRebounds,

    /// Opponent aggregate
    #[serde(rename = "team2_generic_stats")]
    pub opponent: StatLine,

    /// Current period label
    #[serde(rename = "current_quarter")]
    pub current_period: String,

    /// End-of-period scores
    #[serde(rename = "quarterly_scores")]
    pub quarter_table: QuarterTable,

    /// Number of the next overtime period to be opened
    pub next_ot_num: u32,
}

impl Default for GameState {
    fn default() -> Self {
        let home = vec![
            Player::new("Player A", HOME_TEAM, 1, true),
            Player::new("Player B", HOME_TEAM, 5, true),
        ];

        let player_stats = home
            .iter()
            .map(|p| (p.name.clone(), StatLine::default()))
            .collect();
        let mut roster = Roster::new();
        roster.insert(HOME_TEAM.to_string(), home);

        Self {
            roster,
            player_stats,
            team_score: Score::default(),
            team_rebounds: TeamRebounds::default(),
            opponent: StatLine::default(),
            current_period: "Q1".to_string(),
            quarter_table: QuarterTable::regulation(),
            next_ot_num: 1,
        }
    }
}

impl GameState {
    /// Home-team players in roster order
    pub fn home_players(&self) -> &[Player] {
        self.roster.get(HOME_TEAM).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `name` is on any roster
    pub fn is_rostered(&self, name: &str) -> bool {
        self.roster
            .values()
            .any(|players| players.iter().any(|p| p.name == name))
    }
}
