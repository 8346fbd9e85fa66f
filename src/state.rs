use std::collections::{HashMap, VecDeque};
use std::env;

use crate::rankings::{self, TeamProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Teams,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    EnglishPl,
    Ligue1,
}

pub const LEAGUES: [League; 2] = [League::EnglishPl, League::Ligue1];

impl League {
    pub fn id(self) -> u32 {
        match self {
            League::EnglishPl => 2,
            League::Ligue1 => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Y2024_25,
    Y2023_24,
}

pub const SEASONS: [Season; 2] = [Season::Y2024_25, Season::Y2023_24];

impl Season {
    pub fn id(self) -> u32 {
        match self {
            Season::Y2024_25 => 317,
            Season::Y2023_24 => 281,
        }
    }
}

pub fn league_label(league: League) -> &'static str {
    match league {
        League::EnglishPl => "English PL",
        League::Ligue1 => "Ligue 1",
    }
}

pub fn season_label(season: Season) -> &'static str {
    match season {
        Season::Y2024_25 => "2024-25",
        Season::Y2023_24 => "2023-24",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Username,
    Password,
    League,
    Season,
}

const SETUP_FIELDS: [SetupField; 4] = [
    SetupField::Username,
    SetupField::Password,
    SetupField::League,
    SetupField::Season,
];

/// One team's season aggregates. `metrics` holds every `team_season_*`
/// field the response carried for this team; a JSON null is `None`, an
/// absent field has no entry at all.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub team_name: String,
    pub metrics: HashMap<String, Option<f64>>,
}

impl TeamRecord {
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied().flatten()
    }
}

#[derive(Debug, Clone)]
pub struct StatsQuery {
    pub username: String,
    pub password: String,
    pub league: League,
    pub season: Season,
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchStats { query: StatsQuery },
}

#[derive(Debug, Clone)]
pub enum Delta {
    StatsLoaded {
        league: League,
        season: Season,
        teams: Vec<TeamRecord>,
        fetched_at: u64,
        from_cache: bool,
    },
    StatsFailed {
        status: Option<u16>,
        message: String,
    },
    Log(String),
}

pub struct AppState {
    pub screen: Screen,
    pub setup_field: SetupField,
    pub username: String,
    pub password: String,
    pub league: League,
    pub season: Season,
    pub records: Vec<TeamRecord>,
    pub loaded_league: Option<League>,
    pub loaded_season: Option<Season>,
    pub team_selected: usize,
    pub profile: Option<TeamProfile>,
    pub stats_loading: bool,
    pub stats_error: Option<String>,
    pub fetched_at: Option<u64>,
    pub from_cache: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let username = env::var("STATS_USERNAME").unwrap_or_default();
        let password = env::var("STATS_PASSWORD").unwrap_or_default();
        Self {
            screen: Screen::Setup,
            setup_field: SetupField::Username,
            username,
            password,
            league: League::EnglishPl,
            season: Season::Y2024_25,
            records: Vec::new(),
            loaded_league: None,
            loaded_season: None,
            team_selected: 0,
            profile: None,
            stats_loading: false,
            stats_error: None,
            fetched_at: None,
            from_cache: false,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn submit_ready(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn current_query(&self) -> StatsQuery {
        StatsQuery {
            username: self.username.clone(),
            password: self.password.clone(),
            league: self.league,
            season: self.season,
        }
    }

    pub fn setup_field_next(&mut self) {
        self.setup_field = cycled(&SETUP_FIELDS, self.setup_field, true);
    }

    pub fn setup_field_prev(&mut self) {
        self.setup_field = cycled(&SETUP_FIELDS, self.setup_field, false);
    }

    pub fn setup_insert(&mut self, ch: char) {
        match self.setup_field {
            SetupField::Username => self.username.push(ch),
            SetupField::Password => self.password.push(ch),
            SetupField::League | SetupField::Season => {}
        }
    }

    pub fn setup_backspace(&mut self) {
        match self.setup_field {
            SetupField::Username => {
                self.username.pop();
            }
            SetupField::Password => {
                self.password.pop();
            }
            SetupField::League | SetupField::Season => {}
        }
    }

    pub fn setup_cycle(&mut self, forward: bool) {
        match self.setup_field {
            SetupField::League => self.league = cycled(&LEAGUES, self.league, forward),
            SetupField::Season => self.season = cycled(&SEASONS, self.season, forward),
            SetupField::Username | SetupField::Password => {}
        }
    }

    pub fn select_next_team(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.team_selected = (self.team_selected + 1).min(self.records.len() - 1);
    }

    pub fn select_prev_team(&mut self) {
        self.team_selected = self.team_selected.saturating_sub(1);
    }

    pub fn selected_team_name(&self) -> Option<&str> {
        self.records
            .get(self.team_selected)
            .map(|record| record.team_name.as_str())
    }

    /// Compute the ranked profile for the highlighted team and switch to
    /// the profile screen. Recomputed on every selection, never cached.
    pub fn open_selected_team(&mut self) {
        let Some(team) = self.selected_team_name().map(str::to_string) else {
            self.push_log("[INFO] No team selected");
            return;
        };
        match rankings::team_profile(&self.records, &team) {
            Ok(profile) => {
                self.profile = Some(profile);
                self.screen = Screen::Profile;
            }
            Err(err) => {
                self.profile = None;
                self.push_log(format!("[WARN] {err}"));
            }
        }
    }
}

fn cycled<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let idx = options.iter().position(|opt| *opt == current).unwrap_or(0);
    let len = options.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    options[next]
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::StatsLoaded {
            league,
            season,
            teams,
            fetched_at,
            from_cache,
        } => {
            let prev_team = state.profile.as_ref().map(|p| p.team.clone());
            state.stats_loading = false;
            state.stats_error = None;
            state.records = teams;
            state.loaded_league = Some(league);
            state.loaded_season = Some(season);
            state.fetched_at = Some(fetched_at);
            state.from_cache = from_cache;
            state.profile = None;
            state.team_selected = state
                .team_selected
                .min(state.records.len().saturating_sub(1));
            let source = if from_cache { "cache" } else { "api" };
            state.push_log(format!(
                "[INFO] Loaded {} teams for {} {} ({source})",
                state.records.len(),
                league_label(league),
                season_label(season),
            ));
            match state.screen {
                Screen::Setup => state.screen = Screen::Teams,
                Screen::Profile => {
                    // A refresh landed while a team was open; re-rank the
                    // same team against the new records if it survived.
                    let kept = prev_team.and_then(|name| {
                        state.records.iter().position(|r| r.team_name == name)
                    });
                    match kept {
                        Some(idx) => {
                            state.team_selected = idx;
                            state.open_selected_team();
                        }
                        None => state.screen = Screen::Teams,
                    }
                }
                Screen::Teams => {}
            }
        }
        Delta::StatsFailed { status, message } => {
            state.stats_loading = false;
            state.records.clear();
            state.profile = None;
            state.loaded_league = None;
            state.loaded_season = None;
            state.fetched_at = None;
            state.from_cache = false;
            let shown = match status {
                Some(code) => {
                    format!("Error fetching data from StatsBomb API: {code}")
                }
                None => format!("Error fetching data from StatsBomb API: {message}"),
            };
            state.push_log(format!("[WARN] {shown}"));
            state.stats_error = Some(shown);
            state.screen = Screen::Setup;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
