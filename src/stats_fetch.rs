use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;
use crate::metric_schema::METRIC_PREFIX;
use crate::state::{League, Season, StatsQuery, TeamRecord};
use crate::stats_cache::{self, StatsKey};

const DEFAULT_API_BASE: &str = "https://data.statsbomb.com";

/// The one fetch failure the dashboard distinguishes: a non-success HTTP
/// status, surfaced verbatim. Transport and body-decode problems carry
/// their message instead of a code.
#[derive(Debug, Clone)]
pub enum FetchError {
    Status(u16),
    Transport(String),
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            FetchError::Transport(_) | FetchError::Decode(_) => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "API fetch failed with status {code}"),
            FetchError::Transport(msg) => write!(f, "API fetch failed: {msg}"),
            FetchError::Decode(msg) => write!(f, "API fetch failed: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone)]
pub struct StatsPayload {
    pub records: Vec<TeamRecord>,
    pub fetched_at: u64,
    pub from_cache: bool,
}

pub fn api_base() -> String {
    env::var("STATS_API_BASE")
        .ok()
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

pub fn team_stats_url(base: &str, league: League, season: Season) -> String {
    format!(
        "{}/api/v2/competitions/{}/seasons/{}/team-stats",
        base.trim_end_matches('/'),
        league.id(),
        season.id()
    )
}

/// One authenticated GET per (credentials, league, season), memoized in
/// the session cache for the life of the process. Failures are never
/// cached; no retry, no backoff.
pub fn fetch_team_stats(query: &StatsQuery) -> Result<StatsPayload, FetchError> {
    let key = StatsKey::for_query(query);
    if let Some(hit) = stats_cache::session().lookup(&key) {
        return Ok(StatsPayload {
            records: hit.records,
            fetched_at: hit.fetched_at,
            from_cache: true,
        });
    }

    let client = http_client().map_err(|err| FetchError::Transport(err.to_string()))?;
    let url = team_stats_url(&api_base(), query.league, query.season);
    let response = client
        .get(&url)
        .basic_auth(&query.username, Some(&query.password))
        .send()
        .map_err(|err| FetchError::Transport(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|err| FetchError::Transport(err.to_string()))?;
    let records =
        parse_team_stats_json(&body).map_err(|err| FetchError::Decode(err.to_string()))?;
    let fetched_at = unix_now();
    stats_cache::session().store(key, records.clone(), fetched_at);

    Ok(StatsPayload {
        records,
        fetched_at,
        from_cache: false,
    })
}

#[derive(Debug, Deserialize)]
struct RawTeamRecord {
    #[serde(default)]
    team_name: Option<String>,
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

/// Body must be a JSON array of per-team objects. Rows without a team
/// name are dropped; season-metric fields keep numbers as values and
/// nulls as explicit gaps, everything else is ignored.
pub fn parse_team_stats_json(raw: &str) -> Result<Vec<TeamRecord>> {
    let rows: Vec<RawTeamRecord> =
        serde_json::from_str(raw).context("team stats body is not a JSON array of objects")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(team_name) = row.team_name.filter(|name| !name.is_empty()) else {
            continue;
        };
        let mut metrics = HashMap::with_capacity(row.fields.len());
        for (key, value) in row.fields {
            if !key.starts_with(METRIC_PREFIX) {
                continue;
            }
            match value {
                Value::Null => {
                    metrics.insert(key, None);
                }
                Value::Number(num) => {
                    if let Some(v) = num.as_f64() {
                        metrics.insert(key, Some(v));
                    }
                }
                _ => {}
            }
        }
        records.push(TeamRecord { team_name, metrics });
    }
    Ok(records)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_interpolates_league_and_season_ids() {
        let url = team_stats_url("https://data.statsbomb.com", League::EnglishPl, Season::Y2024_25);
        assert_eq!(
            url,
            "https://data.statsbomb.com/api/v2/competitions/2/seasons/317/team-stats"
        );
        let url = team_stats_url("http://localhost:8080/", League::Ligue1, Season::Y2023_24);
        assert_eq!(
            url,
            "http://localhost:8080/api/v2/competitions/7/seasons/281/team-stats"
        );
    }

    #[test]
    fn status_accessor_only_reports_http_codes() {
        assert_eq!(FetchError::Status(401).status(), Some(401));
        assert_eq!(FetchError::Transport("timed out".to_string()).status(), None);
    }

    #[test]
    fn fetch_failure_message_carries_the_code_verbatim() {
        let shown = FetchError::Status(401).to_string();
        assert!(shown.contains("401"), "got {shown}");
    }
}
