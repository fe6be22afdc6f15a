use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use docdesk_core::config::{AppConfig, LoadOptions};
use docdesk_core::{
    AuditSink, CategoryFilter, CreateRequestInput, DashboardStats, Decision, DemoDataset,
    DocumentRequest, IssuedDocument, LifecycleError, Notification, RequestId, Session,
    StatusFilter,
};
use serde::{Deserialize, Serialize};

use crate::commands::CommandResult;

/// One scripted portal action, tagged by `op`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Submit(CreateRequestInput),
    Cancel(CancelStep),
    Decide(DecideStep),
    List(ListStep),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelStep {
    pub request_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideStep {
    pub request_id: String,
    pub decision: Decision,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListTarget {
    #[default]
    Requests,
    Notifications,
    Documents,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListStep {
    pub target: ListTarget,
    pub status: String,
    pub query: String,
    /// Dashboard chip, only read for `documents`.
    pub category: String,
}

impl ScriptStep {
    fn op(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::Cancel(_) => "cancel",
            Self::Decide(_) => "decide",
            Self::List(_) => "list",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StepFailure {
    code: String,
    level: &'static str,
    message: String,
    detail: String,
}

impl From<LifecycleError> for StepFailure {
    fn from(error: LifecycleError) -> Self {
        Self {
            code: error.code().to_string(),
            level: error.alert_level().as_str(),
            message: error.user_message().to_string(),
            detail: error.to_string(),
        }
    }
}

fn failure(error: impl Into<LifecycleError>) -> StepFailure {
    StepFailure::from(error.into())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StepOutcome {
    index: usize,
    op: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StepFailure>,
}

impl StepOutcome {
    fn ok(index: usize, op: &'static str, request_id: Option<RequestId>) -> Self {
        Self { index, op, status: "ok", request_id, matches: None, error: None }
    }

    fn failed(index: usize, op: &'static str, error: StepFailure) -> Self {
        Self { index, op, status: "error", request_id: None, matches: None, error: Some(error) }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    session_id: String,
    steps: Vec<StepOutcome>,
    requests: Vec<DocumentRequest>,
    notifications: Vec<Notification>,
    documents: Vec<IssuedDocument>,
    stats: DashboardStats,
}

pub fn run(script_path: &Path, seed: bool) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "run",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let steps = match load_script(script_path) {
        Ok(steps) => steps,
        Err(error) => {
            return CommandResult::failure("run", "script_load", format!("{error:#}"), 4);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "run",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let mut session = Session::open(&config.portal, "script");
    if seed {
        if let Err(error) = DemoDataset::load(&mut session) {
            return CommandResult::failure("run", "seed_execution", error.to_string(), 5);
        }
    }

    let latency = Duration::from_millis(config.submission.simulated_latency_ms);
    let outcomes = runtime.block_on(replay(&mut session, &steps, latency));
    let failed = outcomes.iter().filter(|outcome| outcome.status == "error").count();

    tracing::info!(
        event_name = "cli.run.completed",
        session_id = session.id(),
        steps = outcomes.len(),
        failed,
        "script replay completed"
    );

    let output = RunOutput {
        session_id: session.id().to_string(),
        steps: outcomes,
        requests: session.requests().to_vec(),
        notifications: session.notifications().items().to_vec(),
        documents: session.library().documents().to_vec(),
        stats: session.stats(),
    };
    let message = format!("replayed {} steps ({} failed)", output.steps.len(), failed);

    match serde_json::to_value(&output) {
        Ok(data) => CommandResult::success("run", message, data),
        Err(error) => CommandResult::failure("run", "serialization", error.to_string(), 1),
    }
}

pub fn load_script(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read script `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse script `{}`", path.display()))
}

/// Applies each step in order; a failing step is reported and the replay continues.
async fn replay<S>(
    session: &mut Session<S>,
    steps: &[ScriptStep],
    latency: Duration,
) -> Vec<StepOutcome>
where
    S: AuditSink,
{
    let mut outcomes = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let op = step.op();
        let outcome = match step {
            ScriptStep::Submit(input) => {
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                match session.submit(input) {
                    Ok(request) => StepOutcome::ok(index, op, Some(request.id)),
                    Err(error) => StepOutcome::failed(index, op, failure(error)),
                }
            }
            ScriptStep::Cancel(cancel) => {
                let id = RequestId(cancel.request_id.trim().to_string());
                match session.cancel(&id) {
                    Ok(()) => StepOutcome::ok(index, op, Some(id)),
                    Err(error) => StepOutcome::failed(index, op, failure(error)),
                }
            }
            ScriptStep::Decide(decide) => {
                let id = RequestId(decide.request_id.trim().to_string());
                match session.decide(&id, decide.decision, decide.actor.as_deref(), &decide.reason)
                {
                    Ok(request) => StepOutcome::ok(index, op, Some(request.id)),
                    Err(error) => StepOutcome::failed(index, op, failure(error)),
                }
            }
            ScriptStep::List(list) => match list_matches(session, list) {
                Ok(matches) => {
                    StepOutcome { matches: Some(matches), ..StepOutcome::ok(index, op, None) }
                }
                Err(error) => StepOutcome::failed(index, op, error),
            },
        };

        tracing::debug!(
            event_name = "cli.run.step",
            index,
            op,
            status = outcome.status,
            "script step applied"
        );
        outcomes.push(outcome);
    }

    outcomes
}

/// Ids of the listed items, in display order.
fn list_matches<S>(session: &Session<S>, list: &ListStep) -> Result<Vec<String>, StepFailure>
where
    S: AuditSink,
{
    let status = list.status.parse::<StatusFilter>().map_err(|detail| StepFailure {
        code: "invalid_status_filter".to_string(),
        level: "warning",
        message: "Filtre de statut inconnu.".to_string(),
        detail,
    })?;

    let ids: Vec<String> = match list.target {
        ListTarget::Requests => session
            .list(status, &list.query)
            .into_iter()
            .map(|request| request.id.0)
            .collect(),
        ListTarget::Notifications => session
            .notifications()
            .search(status, &list.query)
            .into_iter()
            .map(|notification| notification.id)
            .collect(),
        ListTarget::Documents => {
            let category = list.category.parse::<CategoryFilter>().map_err(|detail| {
                StepFailure {
                    code: "invalid_category_filter".to_string(),
                    level: "warning",
                    message: "Catégorie de document inconnue.".to_string(),
                    detail,
                }
            })?;
            session
                .library()
                .search(category, status, &list.query)
                .into_iter()
                .map(|document| document.id)
                .collect()
        }
    };

    Ok(ids)
}
