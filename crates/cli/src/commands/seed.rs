use docdesk_core::config::{AppConfig, LoadOptions};
use docdesk_core::{DashboardStats, DemoDataset, IssuedDocument, SeededRequestInfo, Session};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedOutput {
    session_id: String,
    school_years: Vec<String>,
    requests: Vec<SeededRequestInfo>,
    documents: Vec<IssuedDocument>,
    stats: DashboardStats,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let mut session = Session::open(&config.portal, "seed");
    let seeded = match DemoDataset::load(&mut session) {
        Ok(seeded) => seeded,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "seed_execution",
                format!("{} ({})", error, error.code()),
                5,
            );
        }
    };

    let stats = session.stats();
    tracing::info!(
        event_name = "cli.seed.loaded",
        session_id = session.id(),
        requests = seeded.len(),
        "demo dataset loaded"
    );

    let output = SeedOutput {
        session_id: session.id().to_string(),
        school_years: session.school_years().labels().to_vec(),
        requests: seeded,
        documents: session.library().documents().to_vec(),
        stats,
    };
    let message = summary_message(&output.requests, stats);

    match serde_json::to_value(&output) {
        Ok(data) => CommandResult::success("seed", message, data),
        Err(error) => CommandResult::failure("seed", "serialization", error.to_string(), 1),
    }
}

fn summary_message(requests: &[SeededRequestInfo], stats: DashboardStats) -> String {
    let lines = requests
        .iter()
        .map(|info| format!("  - {}: {} ({})", info.request_id, info.document_type, info.status))
        .collect::<Vec<_>>();
    format!(
        "demo dataset loaded: {} requests ({} pending, {} approved, {} rejected)\n{}",
        requests.len(),
        stats.pending,
        stats.approved,
        stats.rejected,
        lines.join("\n")
    )
}
