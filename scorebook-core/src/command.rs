//! Line-oriented commands
//!
//! The text front end for the scorebook. Each line parses into one
//! [`Command`]; ledger commands map to exactly one session call, so one line
//! is one undo step.
//!
//! ```text
//! stat <player name> <KEY> <delta>     stat Player A 3P_Made 1
//! opp <KEY> <delta>                    opp FT_Made 1
//! teamreb <off|def> <delta>            teamreb def 1
//! period <label> | next | prev
//! eop [label] <home> <opponent>        eop 18 16
//! roster <number> <yes|no> <name>      roster 23 yes Player C
//! remove <name>
//! undo | reset | box | metrics | help | quit
//! clock <seconds|preset>               clock halftime
//! ```

use crate::{
    clock::IntermissionPreset,
    session::Scorebook,
    types::{ReboundKey, StatKey, HOME_TEAM},
    Error, Result,
};

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change a home player's counter
    PlayerStat {
        /// Player name
        player: String,
        /// Counter
        key: StatKey,
        /// Amount to add
        delta: i32,
    },
    /// Change an opponent counter
    OpponentStat {
        /// Counter
        key: StatKey,
        /// Amount to add
        delta: i32,
    },
    /// Change a home team rebound counter
    TeamRebound {
        /// Counter
        key: ReboundKey,
        /// Amount to add
        delta: i32,
    },
    /// Set the period label directly
    SetPeriod(String),
    /// Advance to the next period
    NextPeriod,
    /// Go back one period
    PreviousPeriod,
    /// Record an end-of-period cumulative score
    EndOfPeriod {
        /// Period label, the current period when absent
        label: Option<String>,
        /// Home cumulative score
        home: i32,
        /// Opponent cumulative score
        opponent: i32,
    },
    /// Add or edit a home player
    Roster {
        /// Player name
        name: String,
        /// Jersey number
        number: u32,
        /// Starter flag
        starter: bool,
    },
    /// Remove a player
    Remove(String),
    /// Revert the last change
    Undo,
    /// Start over
    Reset,
    /// Print the box score
    BoxScore,
    /// Start an intermission countdown
    Clock(u32),
    /// Print metrics
    Metrics,
    /// Print usage
    Help,
    /// Leave
    Quit,
}

/// Result of applying a command to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The game state changed; views should refresh
    Changed(String),
    /// Nothing changed
    Unchanged(String),
    /// Not a ledger command; handled by the front end
    Passthrough(Command),
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Err(Error::InvalidCommand("empty line".to_string()));
        };

        let command = match (verb.to_ascii_lowercase().as_str(), args) {
            ("stat", [name @ .., key, delta]) if !name.is_empty() => Command::PlayerStat {
                player: name.join(" "),
                key: parse_stat_key(key)?,
                delta: parse_number(delta)?,
            },
            ("opp", [key, delta]) => Command::OpponentStat {
                key: parse_stat_key(key)?,
                delta: parse_number(delta)?,
            },
            ("teamreb", [key, delta]) => Command::TeamRebound {
                key: ReboundKey::parse(key)
                    .ok_or_else(|| Error::InvalidCommand(format!("unknown rebound kind {}", key)))?,
                delta: parse_number(delta)?,
            },
            ("period", [label]) => Command::SetPeriod(label.to_string()),
            ("next", []) => Command::NextPeriod,
            ("prev", []) => Command::PreviousPeriod,
            ("eop", [home, opponent]) => Command::EndOfPeriod {
                label: None,
                home: parse_number(home)?,
                opponent: parse_number(opponent)?,
            },
            ("eop", [label, home, opponent]) => Command::EndOfPeriod {
                label: Some(label.to_string()),
                home: parse_number(home)?,
                opponent: parse_number(opponent)?,
            },
            ("roster", [number, starter, name @ ..]) if !name.is_empty() => Command::Roster {
                name: name.join(" "),
                number: parse_number(number)?,
                starter: parse_flag(starter)?,
            },
            ("remove", name) if !name.is_empty() => Command::Remove(name.join(" ")),
            ("undo", []) => Command::Undo,
            ("reset", []) => Command::Reset,
            ("box", []) => Command::BoxScore,
            ("clock", [length]) => Command::Clock(
                IntermissionPreset::parse(length)
                    .map(|p| p.seconds())
                    .map_or_else(|| parse_number(length), Ok)?,
            ),
            ("metrics", []) => Command::Metrics,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(Error::InvalidCommand(line.trim().to_string())),
        };

        Ok(command)
    }

    /// Apply a ledger command to the session
    ///
    /// End-of-period scores are checked against the live score before they
    /// are recorded. Front-end commands come back as
    /// [`Outcome::Passthrough`].
    pub fn apply(self, book: &mut Scorebook) -> Result<Outcome> {
        let outcome = match self {
            Command::PlayerStat { player, key, delta } => {
                book.record_player_stat(&player, key, delta)?;
                Outcome::Changed(format!("{} {} {:+}", player, key, delta))
            }
            Command::OpponentStat { key, delta } => {
                book.record_opponent_stat(key, delta)?;
                Outcome::Changed(format!("Opponent {} {:+}", key, delta))
            }
            Command::TeamRebound { key, delta } => {
                book.record_team_rebound(key, delta)?;
                Outcome::Changed(format!("Team rebound {:?} {:+}", key, delta))
            }
            Command::SetPeriod(label) => {
                book.set_period(&label)?;
                Outcome::Changed(format!("Period set to {}", label))
            }
            Command::NextPeriod => {
                let next = book.advance_period()?;
                Outcome::Changed(format!("Advanced to {}", next))
            }
            Command::PreviousPeriod => match book.revert_period()? {
                Some(prev) => Outcome::Changed(format!("Reverted to {}", prev)),
                None => Outcome::Unchanged("Already in Q1".to_string()),
            },
            Command::EndOfPeriod { label, home, opponent } => {
                let label = label.unwrap_or_else(|| book.current_period().to_string());
                book.check_end_of_period(home, opponent)?;
                book.record_end_of_period_score(&label, home, opponent)?;
                Outcome::Changed(format!("Cumulative score {}-{} recorded for end of {}", home, opponent, label))
            }
            Command::Roster { name, number, starter } => {
                book.upsert_roster(&name, HOME_TEAM, number, starter)?;
                Outcome::Changed(format!("Player '{}' added/updated", name))
            }
            Command::Remove(name) => {
                book.remove_player(&name)?;
                Outcome::Changed(format!("Player '{}' removed", name))
            }
            Command::Undo => {
                if book.undo() {
                    Outcome::Changed("Last action reverted".to_string())
                } else {
                    Outcome::Unchanged("Action history is empty".to_string())
                }
            }
            Command::Reset => {
                book.reset();
                Outcome::Changed("All game data reset".to_string())
            }
            other => Outcome::Passthrough(other),
        };
        Ok(outcome)
    }
}

/// Usage text
pub const HELP: &str = "\
stat <player> <KEY> <delta>    player counter (KEY: FT_Made, 2P_Attempted, Assists, ...)
opp <KEY> <delta>              opponent counter
teamreb <off|def> <delta>      home team rebound
period <label> | next | prev   period navigation
eop [label] <home> <opp>       end-of-period cumulative score
roster <number> <yes|no> <name> add or edit a player
remove <name>                  remove a player and their stats
undo | reset                   history
box | metrics                  views
clock <seconds|intermission|halftime|timeout|half-timeout>
quit";

fn parse_stat_key(s: &str) -> Result<StatKey> {
    StatKey::parse(s).ok_or_else(|| Error::InvalidCommand(format!("unknown stat {}", s)))
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T> {
    s.trim_start_matches('+')
        .parse()
        .map_err(|_| Error::InvalidCommand(format!("not a number: {}", s)))
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "starter" => Ok(true),
        "no" | "n" | "false" | "bench" => Ok(false),
        _ => Err(Error::InvalidCommand(format!("expected yes/no, got {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_parse_player_stat_with_spaces() {
        let cmd = Command::parse("stat Player A 3P_Made +1").unwrap();
        assert_eq!(
            cmd,
            Command::PlayerStat {
                player: "Player A".to_string(),
                key: StatKey::P3Made,
                delta: 1,
            }
        );
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            Command::parse("opp ft_made -1").unwrap(),
            Command::OpponentStat { key: StatKey::FtMade, delta: -1 }
        );
        assert_eq!(
            Command::parse("eop Q2 35 30").unwrap(),
            Command::EndOfPeriod { label: Some("Q2".to_string()), home: 35, opponent: 30 }
        );
        assert_eq!(
            Command::parse("roster 23 no Player C").unwrap(),
            Command::Roster { name: "Player C".to_string(), number: 23, starter: false }
        );
        assert_eq!(Command::parse("clock halftime").unwrap(), Command::Clock(600));
        assert_eq!(Command::parse("clock 45").unwrap(), Command::Clock(45));
        assert_eq!(Command::parse("EXIT").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("stat Player A Points 1").is_err());
        assert!(Command::parse("stat 3P_Made 1").is_err());
        assert!(Command::parse("teamreb side 1").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn test_apply_end_of_period_checks_live_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = dir.path().to_path_buf();
        let mut book = Scorebook::open(config).unwrap();

        Command::parse("stat Player A 2P_Made 3").unwrap().apply(&mut book).unwrap();
        let err = Command::parse("eop 4 0").unwrap().apply(&mut book).unwrap_err();
        assert!(matches!(err, Error::ScoreBelowLive { .. }));

        let outcome = Command::parse("eop 6 2").unwrap().apply(&mut book).unwrap();
        assert!(matches!(outcome, Outcome::Changed(_)));
        assert_eq!(book.state().quarter_table.get("Q1").unwrap().home_cumulative, 6);
    }

    #[test]
    fn test_apply_passthrough_and_undo() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = dir.path().to_path_buf();
        let mut book = Scorebook::open(config).unwrap();

        let outcome = Command::BoxScore.apply(&mut book).unwrap();
        assert_eq!(outcome, Outcome::Passthrough(Command::BoxScore));

        let outcome = Command::Undo.apply(&mut book).unwrap();
        assert!(matches!(outcome, Outcome::Unchanged(_)));
    }
}
