//! Plain-text box score

use crate::{
    query::{period_breakdown, player_standings, sort_standings, team_totals, Shooting},
    types::{GameState, ShotType, Side, StatLine},
};
use std::fmt::Write;

/// Full box score: score line, quarter breakdown, players, team comparison
pub fn box_score(state: &GameState) -> String {
    let mut out = String::new();
    let score = state.team_score;

    let _ = writeln!(out, "Home {} - {} Opponent   ({})", score.home, score.opponent, state.current_period);
    out.push('\n');

    out.push_str(&quarter_breakdown(state));
    out.push('\n');
    out.push_str(&player_table(state));
    out.push('\n');
    out.push_str(&team_comparison(state));
    out
}

/// Per-period and cumulative scores
pub fn quarter_breakdown(state: &GameState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6}{:>6}{:>6}{:>8}{:>8}", "Per", "Home", "Opp", "Cum H", "Cum O");
    for line in period_breakdown(state) {
        let s = line.score;
        let _ = writeln!(
            out,
            "{:<6}{:>6}{:>6}{:>8}{:>8}",
            line.label, s.home_delta, s.opponent_delta, s.home_cumulative, s.opponent_cumulative
        );
    }
    out
}

/// Home players in display order
pub fn player_table(state: &GameState) -> String {
    let mut lines = player_standings(state);
    sort_standings(&mut lines);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<3}{:<18}{:>5}{:>4}{:>4}{:>4}{:>4}{:>6}{:>4}{:>4}{:>6}{:>6}{:>6}",
        "#", "Player", "PTS", "A", "STL", "BLK", "TO", "Fouls", "ORB", "DRB", "FT%", "2P%", "3P%"
    );
    for line in &lines {
        let s = &line.stats;
        let name: String = line.player.name.chars().take(17).collect();
        let starter = if line.player.starter { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:<3}{:<18}{:>5}{:>4}{:>4}{:>4}{:>4}{:>6}{:>4}{:>4}{:>6.1}{:>6.1}{:>6.1}",
            line.player.number,
            format!("{}{}", name, starter),
            s.points,
            s.assists,
            s.steals,
            s.blocks,
            s.turnovers,
            s.fouls,
            s.off_rebounds,
            s.def_rebounds,
            line.shooting.ft_pct,
            line.shooting.p2_pct,
            line.shooting.p3_pct,
        );
    }
    out
}

/// Side-by-side team totals
pub fn team_comparison(state: &GameState) -> String {
    let home = team_totals(state, Side::Home);
    let opponent = team_totals(state, Side::Opponent);

    let mut out = String::new();
    let _ = writeln!(out, "{:<14}{:>12}{:>12}", "Team totals", "Home", "Opponent");

    let rows: [(&str, fn(&StatLine) -> i32); 8] = [
        ("Points", |s| s.points),
        ("Off rebounds", |s| s.off_rebounds),
        ("Def rebounds", |s| s.def_rebounds),
        ("Assists", |s| s.assists),
        ("Steals", |s| s.steals),
        ("Blocks", |s| s.blocks),
        ("Turnovers", |s| s.turnovers),
        ("Fouls", |s| s.fouls),
    ];
    for (label, get) in rows {
        let _ = writeln!(out, "{:<14}{:>12}{:>12}", label, get(&home), get(&opponent));
    }

    for shot in ShotType::ALL {
        let _ = writeln!(
            out,
            "{:<14}{:>12}{:>12}",
            format!("{} M/A", shot.label()),
            shot_cell(&home, shot),
            shot_cell(&opponent, shot),
        );
    }
    out
}

fn shot_cell(line: &StatLine, shot: ShotType) -> String {
    let (made, attempted) = line.shots(shot);
    format!("{}/{} {:.1}%", made, attempted, Shooting::of(line).get(shot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatKey;

    #[test]
    fn test_box_score_lists_leader_first() {
        let mut state = GameState::default();
        state.record_player_stat("Player B", StatKey::P3Made, 2).unwrap();
        state.record_player_stat("Player A", StatKey::FtMade, 1).unwrap();
        state.record_opponent_stat(StatKey::P2Made, 1);

        let text = box_score(&state);
        assert!(text.starts_with("Home 7 - 2 Opponent   (Q1)"));

        let b = text.find("Player B").unwrap();
        let a = text.find("Player A").unwrap();
        assert!(b < a);
        assert!(text.contains("3P M/A"));
        assert!(text.contains("2/2 100.0%"));
    }

    #[test]
    fn test_quarter_breakdown_rows() {
        let mut state = GameState::default();
        state.record_end_of_period_score("Q1", 18, 16).unwrap();
        let text = quarter_breakdown(&state);
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().nth(1).unwrap().starts_with("Q1"));
    }
}
