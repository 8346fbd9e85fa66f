use std::fmt;

use crate::metric_schema::{self, Direction};
use crate::state::TeamRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub metric: &'static str,
    pub rank: usize,
    pub value: Option<f64>,
}

/// Ranked season profile for one team: the metrics where it sits in the
/// league-wide top five or bottom five, split into the two panels and
/// sorted ascending by rank.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamProfile {
    pub team: String,
    pub total_teams: usize,
    pub strengths: Vec<RankEntry>,
    pub weaknesses: Vec<RankEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    TeamNotFound { team: String },
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankError::TeamNotFound { team } => {
                write!(f, "team not found in fetched stats: {team}")
            }
        }
    }
}

impl std::error::Error for RankError {}

/// Sort key that orders "better" first for either direction and pushes a
/// missing value behind every real one, so absence can never rank as a
/// strength.
fn sort_value(value: Option<f64>, dir: Direction) -> f64 {
    match (value, dir) {
        (Some(v), Direction::HigherBetter) => -v,
        (Some(v), Direction::LowerBetter) => v,
        (None, _) => f64::INFINITY,
    }
}

fn sorted_order(records: &[TeamRecord], key: &str, dir: Direction) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    // Stable sort; tied values keep response order, like the rank contract
    // requires.
    order.sort_by(|&a, &b| {
        sort_value(records[a].metric(key), dir)
            .total_cmp(&sort_value(records[b].metric(key), dir))
    });
    order
}

/// 1-based rank of `team` for one schema metric, or None when the metric
/// is unknown to the schema or the team is absent.
pub fn metric_rank(records: &[TeamRecord], team: &str, key: &str) -> Option<usize> {
    let dir = metric_schema::direction_of(key)?;
    let order = sorted_order(records, key, dir);
    order
        .iter()
        .position(|&idx| records[idx].team_name == team)
        .map(|pos| pos + 1)
}

/// Rank `team` on every rankable metric and keep the ones falling in the
/// top-5 or bottom-5 band. With ten or fewer teams the bands cover the
/// whole table and every metric qualifies.
pub fn team_profile(records: &[TeamRecord], team: &str) -> Result<TeamProfile, RankError> {
    if !records.iter().any(|r| r.team_name == team) {
        return Err(RankError::TeamNotFound {
            team: team.to_string(),
        });
    }

    let total_teams = records.len();
    let floor = total_teams.saturating_sub(5);
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for (key, dir) in metric_schema::rankable_metrics(records) {
        let order = sorted_order(records, key, dir);
        let Some(pos) = order
            .iter()
            .position(|&idx| records[idx].team_name == team)
        else {
            continue;
        };
        let rank = pos + 1;
        if rank <= 5 || rank > floor {
            let entry = RankEntry {
                metric: key,
                rank,
                value: records[order[pos]].metric(key),
            };
            if rank <= 5 {
                strengths.push(entry);
            } else {
                weaknesses.push(entry);
            }
        }
    }

    strengths.sort_by_key(|entry| entry.rank);
    weaknesses.sort_by_key(|entry| entry.rank);

    Ok(TeamProfile {
        team: team.to_string(),
        total_teams,
        strengths,
        weaknesses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(name: &str, key: &str, value: Option<f64>) -> TeamRecord {
        let mut metrics = HashMap::new();
        metrics.insert(key.to_string(), value);
        TeamRecord {
            team_name: name.to_string(),
            metrics,
        }
    }

    #[test]
    fn sort_value_orders_better_first() {
        assert!(
            sort_value(Some(2.0), Direction::HigherBetter)
                < sort_value(Some(1.0), Direction::HigherBetter)
        );
        assert!(
            sort_value(Some(1.0), Direction::LowerBetter)
                < sort_value(Some(2.0), Direction::LowerBetter)
        );
    }

    #[test]
    fn missing_sorts_behind_any_real_value_in_both_directions() {
        assert!(
            sort_value(Some(-1000.0), Direction::HigherBetter)
                < sort_value(None, Direction::HigherBetter)
        );
        assert!(
            sort_value(Some(1000.0), Direction::LowerBetter)
                < sort_value(None, Direction::LowerBetter)
        );
    }

    #[test]
    fn ties_keep_response_order() {
        let key = "team_season_goals_pg";
        let records = vec![
            record("First", key, Some(1.5)),
            record("Second", key, Some(1.5)),
            record("Third", key, Some(1.5)),
        ];
        let order = sorted_order(&records, key, Direction::HigherBetter);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_names_resolve_to_the_better_ranked_record() {
        let key = "team_season_goals_pg";
        let records = vec![
            record("Twin", key, Some(0.5)),
            record("Other", key, Some(1.0)),
            record("Twin", key, Some(2.0)),
        ];
        assert_eq!(metric_rank(&records, "Twin", key), Some(1));
    }
}
