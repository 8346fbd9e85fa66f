use crate::state::TeamRecord;

/// Bumped whenever the metric table below changes shape or vocabulary.
pub const SCHEMA_VERSION: u32 = 1;

pub const METRIC_PREFIX: &str = "team_season_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

/// Season metrics the dashboard knows how to rank, with the direction that
/// counts as "better". The StatsBomb team-stats payload carries more fields
/// than these; anything not listed here is ignored by ranking and reported
/// by `validate_records`.
pub const METRICS: &[(&str, Direction)] = &[
    ("team_season_goals_pg", Direction::HigherBetter),
    ("team_season_xg_pg", Direction::HigherBetter),
    ("team_season_np_xg_pg", Direction::HigherBetter),
    ("team_season_np_shots_pg", Direction::HigherBetter),
    ("team_season_np_xg_per_shot", Direction::HigherBetter),
    ("team_season_op_shots_pg", Direction::HigherBetter),
    ("team_season_op_xg_pg", Direction::HigherBetter),
    ("team_season_op_shots_outside_box_pg", Direction::HigherBetter),
    ("team_season_op_passes_pg", Direction::HigherBetter),
    ("team_season_passes_pg", Direction::HigherBetter),
    ("team_season_successful_passes_pg", Direction::HigherBetter),
    ("team_season_possession", Direction::HigherBetter),
    ("team_season_aggression", Direction::HigherBetter),
    ("team_season_defensive_action_regains_pg", Direction::HigherBetter),
    ("team_season_deep_progressions_pg", Direction::HigherBetter),
    ("team_season_deep_completions_pg", Direction::HigherBetter),
    ("team_season_completed_dribbles_pg", Direction::HigherBetter),
    ("team_season_counter_attacking_shots_pg", Direction::HigherBetter),
    ("team_season_high_press_shots_pg", Direction::HigherBetter),
    ("team_season_shots_in_clear_pg", Direction::HigherBetter),
    ("team_season_corners_pg", Direction::HigherBetter),
    ("team_season_corner_goal_ratio", Direction::HigherBetter),
    ("team_season_corner_shot_ratio", Direction::HigherBetter),
    ("team_season_goals_from_corners_pg", Direction::HigherBetter),
    ("team_season_shots_from_corners_pg", Direction::HigherBetter),
    ("team_season_xg_per_corner", Direction::HigherBetter),
    ("team_season_free_kicks_pg", Direction::HigherBetter),
    ("team_season_free_kick_goal_ratio", Direction::HigherBetter),
    ("team_season_free_kick_shot_ratio", Direction::HigherBetter),
    ("team_season_free_kick_xg_pg", Direction::HigherBetter),
    ("team_season_goals_from_free_kicks_pg", Direction::HigherBetter),
    ("team_season_shots_from_free_kicks_pg", Direction::HigherBetter),
    ("team_season_xg_per_free_kick", Direction::HigherBetter),
    ("team_season_direct_free_kicks_pg", Direction::HigherBetter),
    ("team_season_direct_free_kick_goal_ratio", Direction::HigherBetter),
    ("team_season_direct_free_kick_shot_ratio", Direction::HigherBetter),
    ("team_season_direct_free_kick_xg_pg", Direction::HigherBetter),
    ("team_season_direct_free_kick_goals_pg", Direction::HigherBetter),
    (
        "team_season_shots_from_direct_free_kicks_pg",
        Direction::HigherBetter,
    ),
    ("team_season_xg_per_direct_free_kick", Direction::HigherBetter),
    ("team_season_goals_from_throw_ins_pg", Direction::HigherBetter),
    ("team_season_shots_from_throw_ins_pg", Direction::HigherBetter),
    ("team_season_xg_per_throw_in", Direction::HigherBetter),
    ("team_season_sp_pg", Direction::HigherBetter),
    ("team_season_sp_goals_pg", Direction::HigherBetter),
    ("team_season_sp_goal_ratio", Direction::HigherBetter),
    ("team_season_sp_shot_ratio", Direction::HigherBetter),
    ("team_season_xg_per_sp", Direction::HigherBetter),
    ("team_season_penalties_pg", Direction::HigherBetter),
    ("team_season_penalty_goals_pg", Direction::HigherBetter),
    ("team_season_obv_pg", Direction::HigherBetter),
    ("team_season_obv_defensive_action_pg", Direction::HigherBetter),
    ("team_season_obv_dribble_carry_pg", Direction::HigherBetter),
    ("team_season_obv_gk_pg", Direction::HigherBetter),
    ("team_season_obv_pass_pg", Direction::HigherBetter),
    ("team_season_obv_shot_pg", Direction::HigherBetter),
    ("team_season_ppda", Direction::LowerBetter),
    (
        "team_season_completed_dribbles_conceded_pg",
        Direction::LowerBetter,
    ),
    ("team_season_corner_goal_ratio_conceded", Direction::LowerBetter),
    ("team_season_corner_shot_ratio_conceded", Direction::LowerBetter),
    ("team_season_corners_conceded_pg", Direction::LowerBetter),
    (
        "team_season_counter_attacking_shots_conceded_pg",
        Direction::LowerBetter,
    ),
    ("team_season_deep_completions_conceded_pg", Direction::LowerBetter),
    (
        "team_season_deep_progressions_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_direct_free_kick_goal_ratio_conceded",
        Direction::LowerBetter,
    ),
    (
        "team_season_direct_free_kick_goals_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_direct_free_kick_shot_ratio_conceded",
        Direction::LowerBetter,
    ),
    (
        "team_season_direct_free_kick_xg_conceded_pg",
        Direction::LowerBetter,
    ),
    ("team_season_direct_free_kicks_conceded_pg", Direction::LowerBetter),
    ("team_season_failed_dribbles_conceded_pg", Direction::LowerBetter),
    ("team_season_free_kick_goal_ratio_conceded", Direction::LowerBetter),
    ("team_season_free_kick_shot_ratio_conceded", Direction::LowerBetter),
    ("team_season_free_kick_xg_conceded_pg", Direction::LowerBetter),
    ("team_season_free_kicks_conceded_pg", Direction::LowerBetter),
    ("team_season_goals_conceded_pg", Direction::LowerBetter),
    (
        "team_season_goals_from_corners_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_goals_from_free_kicks_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_goals_from_throw_ins_conceded_pg",
        Direction::LowerBetter,
    ),
    ("team_season_high_press_shots_conceded_pg", Direction::LowerBetter),
    ("team_season_np_shots_conceded_pg", Direction::LowerBetter),
    ("team_season_np_xg_conceded_pg", Direction::LowerBetter),
    ("team_season_np_xg_per_shot_conceded", Direction::LowerBetter),
    ("team_season_np_shot_distance_conceded", Direction::LowerBetter),
    ("team_season_obv_conceded_pg", Direction::LowerBetter),
    (
        "team_season_obv_defensive_action_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_obv_dribble_carry_conceded_pg",
        Direction::LowerBetter,
    ),
    ("team_season_obv_gk_conceded_pg", Direction::LowerBetter),
    ("team_season_obv_pass_conceded_pg", Direction::LowerBetter),
    ("team_season_obv_shot_conceded_pg", Direction::LowerBetter),
    (
        "team_season_op_shots_conceded_outside_box_pg",
        Direction::LowerBetter,
    ),
    ("team_season_op_shots_conceded_pg", Direction::LowerBetter),
    ("team_season_op_xg_conceded_pg", Direction::LowerBetter),
    ("team_season_op_shot_distance_conceded", Direction::LowerBetter),
    ("team_season_op_passes_conceded_pg", Direction::LowerBetter),
    ("team_season_passes_conceded_pg", Direction::LowerBetter),
    ("team_season_penalties_conceded_pg", Direction::LowerBetter),
    ("team_season_penalty_goals_conceded_pg", Direction::LowerBetter),
    (
        "team_season_shots_from_corners_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_shots_from_direct_free_kicks_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_shots_from_free_kicks_conceded_pg",
        Direction::LowerBetter,
    ),
    (
        "team_season_shots_from_throw_ins_conceded_pg",
        Direction::LowerBetter,
    ),
    ("team_season_shots_in_clear_conceded_pg", Direction::LowerBetter),
    ("team_season_sp_goals_pg_conceded", Direction::LowerBetter),
    ("team_season_sp_goal_ratio_conceded", Direction::LowerBetter),
    ("team_season_sp_pg_conceded", Direction::LowerBetter),
    ("team_season_sp_shot_ratio_conceded", Direction::LowerBetter),
    ("team_season_xg_per_corner_conceded", Direction::LowerBetter),
    (
        "team_season_xg_per_direct_free_kick_conceded",
        Direction::LowerBetter,
    ),
    ("team_season_xg_per_free_kick_conceded", Direction::LowerBetter),
    ("team_season_xg_per_sp_conceded", Direction::LowerBetter),
    ("team_season_xg_per_throw_in_conceded", Direction::LowerBetter),
    ("team_season_successful_passes_conceded_pg", Direction::LowerBetter),
    ("team_season_yellow_cards_pg", Direction::LowerBetter),
    ("team_season_red_cards_pg", Direction::LowerBetter),
];

pub fn direction_of(key: &str) -> Option<Direction> {
    METRICS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, dir)| *dir)
}

/// Display label: prefix stripped, underscores to spaces, one trailing
/// " pg" trimmed. A mid-name "pg" stays ("sp goals pg conceded").
pub fn metric_label(key: &str) -> String {
    let trimmed = key.strip_prefix(METRIC_PREFIX).unwrap_or(key);
    let mut label = trimmed.replace('_', " ");
    if let Some(stripped) = label.strip_suffix(" pg") {
        label = stripped.to_string();
    }
    label
}

#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    /// Schema metrics the response does not carry; excluded from ranking.
    pub missing: Vec<&'static str>,
    /// Response season-metric fields the schema does not list; ignored.
    pub unlisted: Vec<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unlisted.is_empty()
    }
}

/// Compare the schema against the first record's field set. The response
/// never fails validation outright; discrepancies are reported so the
/// provider can surface them in the console.
pub fn validate_records(records: &[TeamRecord]) -> SchemaReport {
    let Some(sample) = records.first() else {
        return SchemaReport {
            missing: METRICS.iter().map(|(key, _)| *key).collect(),
            unlisted: Vec::new(),
        };
    };

    let mut report = SchemaReport::default();
    for (key, _) in METRICS {
        if !sample.metrics.contains_key(*key) {
            report.missing.push(key);
        }
    }
    let mut unlisted: Vec<String> = sample
        .metrics
        .keys()
        .filter(|key| direction_of(key).is_none())
        .cloned()
        .collect();
    unlisted.sort();
    report.unlisted = unlisted;
    report
}

/// Schema metrics the response actually carries, in schema order. A metric
/// counts as carried when the first record has the key at all, null value
/// included.
pub fn rankable_metrics(records: &[TeamRecord]) -> Vec<(&'static str, Direction)> {
    let Some(sample) = records.first() else {
        return Vec::new();
    };
    METRICS
        .iter()
        .filter(|(key, _)| sample.metrics.contains_key(*key))
        .copied()
        .collect()
}
