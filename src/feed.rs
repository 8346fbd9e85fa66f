use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::metric_schema::{self, SCHEMA_VERSION};
use crate::state::{Delta, ProviderCommand, StatsQuery, TeamRecord};
use crate::stats_fetch;

/// Background worker owning all network traffic. Commands arrive over
/// `cmd_rx`; state updates flow back as deltas. The thread exits when the
/// command sender is dropped.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchStats { query } => handle_fetch(&tx, query),
            }
        }
    });
}

fn handle_fetch(tx: &Sender<Delta>, query: StatsQuery) {
    let league = query.league;
    let season = query.season;
    match stats_fetch::fetch_team_stats(&query) {
        Ok(payload) => {
            // Cache hits were already validated when first fetched.
            if !payload.from_cache {
                report_schema(tx, &payload.records);
            }
            let _ = tx.send(Delta::StatsLoaded {
                league,
                season,
                teams: payload.records,
                fetched_at: payload.fetched_at,
                from_cache: payload.from_cache,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::StatsFailed {
                status: err.status(),
                message: err.to_string(),
            });
        }
    }
}

/// Console warnings when the response vocabulary drifts from the schema.
fn report_schema(tx: &Sender<Delta>, records: &[TeamRecord]) {
    let report = metric_schema::validate_records(records);
    if report.is_clean() {
        return;
    }
    if !report.missing.is_empty() {
        let _ = tx.send(Delta::Log(format!(
            "[WARN] Schema v{SCHEMA_VERSION}: {} known metrics absent from response (first: {})",
            report.missing.len(),
            report.missing[0],
        )));
    }
    if !report.unlisted.is_empty() {
        let _ = tx.send(Delta::Log(format!(
            "[WARN] Schema v{SCHEMA_VERSION}: ignoring {} unlisted season metrics (first: {})",
            report.unlisted.len(),
            report.unlisted[0],
        )));
    }
}
