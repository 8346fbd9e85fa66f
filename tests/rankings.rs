use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use scout_terminal::rankings::{metric_rank, team_profile, RankError};
use scout_terminal::state::TeamRecord;
use scout_terminal::stats_fetch::parse_team_stats_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_records() -> Vec<TeamRecord> {
    parse_team_stats_json(&read_fixture("team_stats.json")).expect("fixture should parse")
}

/// Twenty teams with goals descending and ppda ascending down the table,
/// so team N sits at rank N on both metrics.
fn league_of_twenty() -> Vec<TeamRecord> {
    (1..=20)
        .map(|n| {
            let mut metrics = HashMap::new();
            metrics.insert(
                "team_season_goals_pg".to_string(),
                Some(2.0 - 0.05 * n as f64),
            );
            metrics.insert("team_season_ppda".to_string(), Some(6.0 + 0.5 * n as f64));
            TeamRecord {
                team_name: format!("Team {n:02}"),
                metrics,
            }
        })
        .collect()
}

#[test]
fn highest_goals_ranks_first() {
    let records = league_of_twenty();
    assert_eq!(
        metric_rank(&records, "Team 01", "team_season_goals_pg"),
        Some(1)
    );
    assert_eq!(
        metric_rank(&records, "Team 20", "team_season_goals_pg"),
        Some(20)
    );
}

#[test]
fn lowest_ppda_ranks_first() {
    let records = league_of_twenty();
    assert_eq!(metric_rank(&records, "Team 01", "team_season_ppda"), Some(1));
    assert_eq!(
        metric_rank(&records, "Team 20", "team_season_ppda"),
        Some(20)
    );
}

#[test]
fn every_rank_stays_inside_the_table() {
    let records = league_of_twenty();
    for record in &records {
        let rank = metric_rank(&records, &record.team_name, "team_season_goals_pg")
            .expect("every team should rank");
        assert!((1..=records.len()).contains(&rank), "rank {rank} out of range");
    }
}

#[test]
fn mid_table_ranks_are_left_out_of_the_profile() {
    let records = league_of_twenty();
    // Team 12 ranks 12th on both metrics; neither lands in the top-5 or
    // bottom-5 band of a 20-team league.
    let profile = team_profile(&records, "Team 12").expect("team should exist");
    assert!(profile.strengths.is_empty());
    assert!(profile.weaknesses.is_empty());
}

#[test]
fn band_membership_splits_strengths_from_weaknesses() {
    let records = league_of_twenty();
    let profile = team_profile(&records, "Team 03").expect("team should exist");
    let strengths: Vec<_> = profile.strengths.iter().map(|e| (e.metric, e.rank)).collect();
    let weaknesses: Vec<_> = profile
        .weaknesses
        .iter()
        .map(|e| (e.metric, e.rank))
        .collect();
    assert_eq!(strengths, vec![("team_season_goals_pg", 3), ("team_season_ppda", 3)]);
    assert!(weaknesses.is_empty());

    let profile = team_profile(&records, "Team 18").expect("team should exist");
    assert!(profile.strengths.is_empty());
    assert_eq!(
        profile
            .weaknesses
            .iter()
            .map(|e| (e.metric, e.rank))
            .collect::<Vec<_>>(),
        vec![("team_season_goals_pg", 18), ("team_season_ppda", 18)]
    );
}

#[test]
fn small_league_bands_overlap_and_cover_every_metric() {
    // Eight teams: ranks 1-5 are strengths, 6-8 weaknesses, so all six
    // rankable fixture metrics show up in every profile.
    let records = fixture_records();
    assert_eq!(records.len(), 8);
    for record in &records {
        let profile = team_profile(&records, &record.team_name).expect("team should exist");
        assert_eq!(
            profile.strengths.len() + profile.weaknesses.len(),
            6,
            "{} should qualify on every rankable metric",
            record.team_name
        );
        for entry in profile.strengths.iter() {
            assert!(entry.rank <= 5);
        }
        for entry in profile.weaknesses.iter() {
            assert!(entry.rank > 3, "weakness rank {} above band", entry.rank);
        }
    }
}

#[test]
fn fixture_top_team_is_all_strengths() {
    let records = fixture_records();
    let profile = team_profile(&records, "Avonford Rovers").expect("team should exist");
    assert_eq!(profile.total_teams, 8);
    assert_eq!(profile.strengths.len(), 6);
    assert!(profile.weaknesses.is_empty());

    let goals = profile
        .strengths
        .iter()
        .find(|e| e.metric == "team_season_goals_pg")
        .expect("goals should be a strength");
    assert_eq!(goals.rank, 1);
    assert_eq!(goals.value, Some(2.1));

    // Ascending by rank; the press metric is the team's softest strength.
    let ranks: Vec<usize> = profile.strengths.iter().map(|e| e.rank).collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);
    assert_eq!(profile.strengths.last().map(|e| e.metric), Some("team_season_ppda"));
}

#[test]
fn null_metric_ranks_dead_last_not_first() {
    let records = fixture_records();
    // Hatton Albion's xg is null in the payload; a gap must read as the
    // worst xg in the league, never the best.
    assert_eq!(
        metric_rank(&records, "Hatton Albion", "team_season_xg_pg"),
        Some(8)
    );
    let profile = team_profile(&records, "Hatton Albion").expect("team should exist");
    let xg = profile
        .weaknesses
        .iter()
        .find(|e| e.metric == "team_season_xg_pg")
        .expect("xg should be a weakness");
    assert_eq!(xg.rank, 8);
    assert_eq!(xg.value, None);
}

#[test]
fn absent_field_ranks_dead_last_not_first() {
    let records = fixture_records();
    // Gorsehill City's record has no possession field at all.
    assert_eq!(
        metric_rank(&records, "Gorsehill City", "team_season_possession"),
        Some(8)
    );
    let profile = team_profile(&records, "Gorsehill City").expect("team should exist");
    assert!(profile.strengths.is_empty());
    let possession = profile
        .weaknesses
        .iter()
        .find(|e| e.metric == "team_season_possession")
        .expect("possession should be a weakness");
    assert_eq!(possession.rank, 8);
    assert_eq!(possession.value, None);
}

#[test]
fn tied_values_rank_in_response_order() {
    let records = fixture_records();
    // Durnsley and Eastmoor both score 1.45 goals per game; the earlier
    // response row takes the better rank.
    assert_eq!(
        metric_rank(&records, "Durnsley FC", "team_season_goals_pg"),
        Some(4)
    );
    assert_eq!(
        metric_rank(&records, "Eastmoor United", "team_season_goals_pg"),
        Some(5)
    );
}

#[test]
fn profiles_are_stable_across_recomputation() {
    let records = fixture_records();
    let first = team_profile(&records, "Carden Town").expect("team should exist");
    let second = team_profile(&records, "Carden Town").expect("team should exist");
    assert_eq!(first, second);
}

#[test]
fn unknown_team_is_an_explicit_error() {
    let records = fixture_records();
    let err = team_profile(&records, "Zetland Corinthians").expect_err("team should be unknown");
    assert_eq!(
        err,
        RankError::TeamNotFound {
            team: "Zetland Corinthians".to_string()
        }
    );
    assert!(err.to_string().contains("Zetland Corinthians"));
}

#[test]
fn empty_response_reports_team_not_found() {
    let err = team_profile(&[], "Avonford Rovers").expect_err("no team can match");
    assert!(matches!(err, RankError::TeamNotFound { .. }));
}

#[test]
fn unlisted_metric_never_ranks() {
    let records = fixture_records();
    // Every fixture record carries team_season_made_up_index, but the
    // schema does not list it.
    assert_eq!(
        metric_rank(&records, "Avonford Rovers", "team_season_made_up_index"),
        None
    );
    for record in &records {
        let profile = team_profile(&records, &record.team_name).expect("team should exist");
        assert!(profile
            .strengths
            .iter()
            .chain(profile.weaknesses.iter())
            .all(|e| e.metric != "team_season_made_up_index"));
    }
}
