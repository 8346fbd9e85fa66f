use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{Local, TimeZone};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use scout_terminal::gradient;
use scout_terminal::metric_schema;
use scout_terminal::rankings::RankEntry;
use scout_terminal::state::{
    self, apply_delta, league_label, season_label, AppState, Screen, SetupField,
};
use scout_terminal::{feed, sample_feed};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.state.screen {
            Screen::Setup => self.on_setup_key(key),
            Screen::Teams => self.on_teams_key(key),
            Screen::Profile => self.on_profile_key(key),
        }
    }

    fn on_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.state.setup_field_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.setup_field_prev(),
            KeyCode::Left => self.state.setup_cycle(false),
            KeyCode::Right => self.state.setup_cycle(true),
            KeyCode::Enter => self.request_stats(),
            KeyCode::Backspace => self.state.setup_backspace(),
            KeyCode::Char(ch) => self.state.setup_insert(ch),
            _ => {}
        }
    }

    fn on_teams_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_team(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_team(),
            KeyCode::Enter => self.state.open_selected_team(),
            KeyCode::Char('r') => self.request_stats(),
            KeyCode::Char('c') | KeyCode::Char('b') | KeyCode::Esc => {
                self.state.screen = Screen::Setup;
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_profile_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Teams,
            KeyCode::Char('r') => self.request_stats(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_stats(&mut self) {
        if !self.state.submit_ready() {
            self.state
                .push_log("[WARN] Username and password are required");
            return;
        }
        if self.state.stats_loading {
            self.state.push_log("[INFO] Fetch already in flight");
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Stats fetch unavailable");
            return;
        };
        let query = self.state.current_query();
        if tx
            .send(state::ProviderCommand::FetchStats { query })
            .is_err()
        {
            self.state.push_log("[WARN] Stats request failed");
        } else {
            self.state.stats_loading = true;
            self.state.stats_error = None;
            self.state.push_log("[INFO] Fetching team stats...");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if sample_feed::demo_mode() {
        sample_feed::spawn_sample_provider(tx, cmd_rx);
    } else {
        feed::spawn_provider(tx, cmd_rx);
    }

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Setup => render_setup(frame, chunks[1], &app.state),
        Screen::Teams => render_teams(frame, chunks[1], &app.state),
        Screen::Profile => render_profile(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Setup => format!(
            "SCOUT TERMINAL | Setup | {} {}",
            league_label(state.league),
            season_label(state.season)
        ),
        Screen::Teams => format!(
            "SCOUT TERMINAL | Teams | {} | {} teams",
            loaded_context(state),
            state.records.len()
        ),
        Screen::Profile => {
            let team = state
                .profile
                .as_ref()
                .map(|p| p.team.as_str())
                .unwrap_or("-");
            format!(
                "SCOUT TERMINAL | {team} | {} | {} teams",
                loaded_context(state),
                state.records.len()
            )
        }
    };
    let status = if state.stats_loading {
        "Fetching team stats...".to_string()
    } else {
        fetched_marker(state)
    };
    // Two content lines; the block border takes the third row.
    format!(" {title}\n {status}")
}

fn loaded_context(state: &AppState) -> String {
    match (state.loaded_league, state.loaded_season) {
        (Some(league), Some(season)) => {
            format!("{} {}", league_label(league), season_label(season))
        }
        _ => "no data".to_string(),
    }
}

fn fetched_marker(state: &AppState) -> String {
    let Some(ts) = state.fetched_at else {
        return String::new();
    };
    let stamp = Local
        .timestamp_opt(ts as i64, 0)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    if state.from_cache {
        format!("fetched {stamp} (cache)")
    } else {
        format!("fetched {stamp}")
    }
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Setup => {
            "Tab/↑/↓ Field | ←/→ Option | Enter Fetch | Esc Quit".to_string()
        }
        Screen::Teams => {
            "j/k/↑/↓ Move | Enter Profile | r Refresh | c Credentials | ? Help | q Quit"
                .to_string()
        }
        Screen::Profile => "b/Esc Back | r Refresh | ? Help | q Quit".to_string(),
    }
}

fn render_setup(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = centered_rect(70, 70, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(form);

    render_form_line(
        frame,
        rows[0],
        "Username",
        &state.username,
        state.setup_field == SetupField::Username,
        false,
    );
    render_form_line(
        frame,
        rows[1],
        "Password",
        &state.password,
        state.setup_field == SetupField::Password,
        true,
    );
    render_form_line(
        frame,
        rows[2],
        "League",
        league_label(state.league),
        state.setup_field == SetupField::League,
        false,
    );
    render_form_line(
        frame,
        rows[3],
        "Season",
        season_label(state.season),
        state.setup_field == SetupField::Season,
        false,
    );

    let hint = if state.submit_ready() {
        Paragraph::new("Enter to fetch team stats").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new("Enter StatsBomb credentials to begin")
            .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(hint, rows[5]);

    if let Some(err) = &state.stats_error {
        let error = Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(error, rows[6]);
    }
}

fn render_form_line(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    masked: bool,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(10)])
        .split(area);

    let label_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(format!("{label}:")).style(label_style), cols[0]);

    let mut shown = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    if focused {
        shown.push('_');
    }
    let value_style = if focused {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(shown).style(value_style), cols[1]);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(rows[0]);

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    frame.render_widget(
        Paragraph::new("  Select your team").style(header_style),
        sections[0],
    );

    let list_area = sections[1];
    if state.records.is_empty() {
        let empty =
            Paragraph::new("No teams loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
    } else if list_area.height > 0 {
        let visible = list_area.height as usize;
        let (start, end) = visible_range(state.team_selected, state.records.len(), visible);
        for (i, idx) in (start..end).enumerate() {
            let row_area = Rect {
                x: list_area.x,
                y: list_area.y + i as u16,
                width: list_area.width,
                height: 1,
            };
            let selected = idx == state.team_selected;
            let row_style = if selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let prefix = if selected { "> " } else { "  " };
            let line = format!("{prefix}{}", state.records[idx].team_name);
            frame.render_widget(Paragraph::new(line).style(row_style), row_area);
        }
    }

    render_console(frame, rows[1], state);
}

fn render_profile(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let Some(profile) = &state.profile else {
        let empty =
            Paragraph::new("No team profile computed").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, rows[0]);
        render_console(frame, rows[1], state);
        return;
    };

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_rank_table(
        frame,
        panels[0],
        "Strengths - Top 5 metrics",
        &profile.strengths,
        Panel::Strengths,
        profile.total_teams,
    );
    render_rank_table(
        frame,
        panels[1],
        "Weaknesses - Bottom 5 metrics",
        &profile.weaknesses,
        Panel::Weaknesses,
        profile.total_teams,
    );

    render_console(frame, rows[1], state);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Panel {
    Strengths,
    Weaknesses,
}

fn render_rank_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[RankEntry],
    panel: Panel,
    total_teams: usize,
) {
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let widths = rank_table_columns();
    let header_area = Rect {
        height: 1,
        ..inner
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(header_area);
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, cols[0], "Metric", header_style);
    render_cell_text(frame, cols[1], "Rank", header_style);
    render_cell_text(frame, cols[2], "Value", header_style);

    let body_height = inner.height.saturating_sub(1) as usize;
    for (i, entry) in entries.iter().take(body_height).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + 1 + i as u16,
            width: inner.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let label = metric_schema::metric_label(entry.metric);
        render_cell_text(frame, cols[0], &label, Style::default());

        let rank_bg = match panel {
            Panel::Strengths => gradient::strength_color(entry.rank),
            Panel::Weaknesses => gradient::weakness_color(entry.rank, total_teams),
        };
        let rank_style = Style::default().fg(Color::White).bg(rank_bg);
        render_cell_text(frame, cols[1], &format!(" {}", entry.rank), rank_style);

        let value = format!("{:.2}", entry.value.unwrap_or(0.0));
        render_cell_text(frame, cols[2], &value, Style::default());
    }
}

fn rank_table_columns() -> [Constraint; 3] {
    [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(10),
    ]
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scout Terminal - Help",
        "",
        "Setup:",
        "  Tab or ↑/↓   Move between fields",
        "  ←/→          Cycle league/season",
        "  Enter        Fetch team stats",
        "  Esc          Quit",
        "",
        "Teams:",
        "  j/k or ↑/↓   Move",
        "  Enter        Open team profile",
        "  r            Refresh stats",
        "  c            Back to credentials",
        "",
        "Profile:",
        "  b / Esc      Back to team list",
        "  r            Refresh stats",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
