//! End-to-end game scenarios against an on-disk scorebook

use scorebook_core::{Config, Error, GameState, Scorebook, Side, StatKey, HOME_TEAM};

fn open_in(dir: &tempfile::TempDir) -> Scorebook {
    let mut config = Config::default();
    config.data_dir = dir.path().to_path_buf();
    Scorebook::open(config).unwrap()
}

#[test]
fn test_first_half_scoring_and_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);

    book.record_player_stat("Player A", StatKey::P3Made, 2).unwrap();
    book.record_player_stat("Player B", StatKey::P2Made, 6).unwrap();
    book.record_opponent_stat(StatKey::P2Made, 8).unwrap();
    assert_eq!(book.current_score().home, 18);
    assert_eq!(book.current_score().opponent, 16);

    book.record_end_of_period_score("Q1", 18, 16).unwrap();
    assert_eq!(book.advance_period().unwrap(), "Q2");
    book.record_end_of_period_score("Q2", 35, 30).unwrap();

    let lines = book.period_breakdown();
    let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["Q1", "Q2", "Q3", "Q4"]);

    let q2 = &lines[1].score;
    assert_eq!((q2.home_delta, q2.opponent_delta), (17, 14));
    assert_eq!((q2.home_cumulative, q2.opponent_cumulative), (35, 30));
}

#[test]
fn test_overtime_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);

    book.set_period("Q4").unwrap();
    assert_eq!(book.advance_period().unwrap(), "OT1");
    book.record_end_of_period_score("OT1", 90, 90).unwrap();
    assert_eq!(book.state().next_ot_num, 2);
    assert_eq!(book.advance_period().unwrap(), "OT2");

    assert_eq!(book.revert_period().unwrap().as_deref(), Some("OT1"));
    assert_eq!(book.revert_period().unwrap().as_deref(), Some("Q4"));

    let labels: Vec<String> = book.period_breakdown().into_iter().map(|l| l.label).collect();
    assert_eq!(labels, vec!["Q1", "Q2", "Q3", "Q4", "OT1"]);
}

#[test]
fn test_end_of_period_below_live_score_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);

    book.record_player_stat("Player A", StatKey::P2Made, 5).unwrap();
    let err = book.check_end_of_period(9, 0).unwrap_err();
    assert!(matches!(err, Error::ScoreBelowLive { side: "home", given: 9, live: 10 }));
    assert!(book.check_end_of_period(10, 0).is_ok());
}

#[test]
fn test_removed_player_leaves_team_totals() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);

    book.upsert_roster("Player C", HOME_TEAM, 23, false).unwrap();
    book.record_player_stat("Player C", StatKey::Assists, 4).unwrap();
    book.record_player_stat("Player C", StatKey::FtMade, 3).unwrap();
    assert_eq!(book.team_totals(Side::Home).assists, 4);

    book.remove_player("Player C").unwrap();
    let totals = book.team_totals(Side::Home);
    assert_eq!(totals.assists, 0);
    assert_eq!(totals.points, 0);
    assert_eq!(book.current_score().home, 0);
    assert!(book.roster(HOME_TEAM).iter().all(|p| p.name != "Player C"));

    assert!(book.undo());
    assert_eq!(book.team_totals(Side::Home).assists, 4);
    assert_eq!(book.current_score().home, 3);
}

#[test]
fn test_attempt_edit_clamps_to_makes() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);

    book.record_player_stat("Player A", StatKey::FtMade, 3).unwrap();
    book.record_player_stat("Player A", StatKey::FtAttempted, -2).unwrap();

    let stats = &book.state().player_stats["Player A"];
    assert_eq!(stats.ft_made, 3);
    assert_eq!(stats.ft_attempted, 3);
}

#[test]
fn test_default_history_evicts_oldest_after_fifty() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);

    for _ in 0..51 {
        book.record_player_stat("Player A", StatKey::Steals, 1).unwrap();
    }
    assert_eq!(book.history_len(), 50);

    while book.undo() {}
    // The snapshot taken before the first steal was evicted
    assert_eq!(book.state().player_stats["Player A"].steals, 1);
}

#[test]
fn test_game_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut book = open_in(&dir);
        book.record_player_stat("Player B", StatKey::P3Made, 1).unwrap();
        book.record_opponent_stat(StatKey::FtMade, 2).unwrap();
        book.advance_period().unwrap();
    }

    let mut book = open_in(&dir);
    assert_eq!(book.current_score().to_string(), "3-2");
    assert_eq!(book.current_period(), "Q2");
    assert_eq!(book.history_len(), 3);

    assert!(book.undo());
    assert_eq!(book.current_period(), "Q1");
}

#[test]
fn test_oversized_delta_is_recorded_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut book = open_in(&dir);
        book.record_player_stat("Player A", StatKey::P3Made, 1_000_000_000).unwrap();
        assert_eq!(book.current_score().home, i32::MAX);
        assert_eq!(book.history_len(), 1);
    }

    let mut book = open_in(&dir);
    assert_eq!(book.state().player_stats["Player A"].p3_made, 1_000_000_000);
    assert!(book.undo());
    assert_eq!(book.current_score().home, 0);
}

#[test]
fn test_fresh_game_undoes_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut book = open_in(&dir);
    assert_eq!(book.state(), &GameState::default());

    book.record_player_stat("Player B", StatKey::Fouls, 1).unwrap();
    assert!(book.undo());
    assert_eq!(book.state(), &GameState::default());
}
