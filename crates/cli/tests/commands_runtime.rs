use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use docdesk_cli::commands::{config, run, seed};
use serde_json::Value;

#[test]
fn config_reports_defaults_and_env_sources() {
    with_env(&[("DOCDESK_PORTAL_REVIEWER_NAME", "Scolarité")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0, "expected config inspection success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "ok");

        let reviewer = field(&payload, "portal.reviewer_name");
        assert_eq!(reviewer["value"], "Scolarité");
        assert_eq!(reviewer["source"], "env (DOCDESK_PORTAL_REVIEWER_NAME)");

        let window = field(&payload, "portal.school_year_window");
        assert_eq!(window["value"], "6");
        assert_eq!(window["source"], "default");
    });
}

#[test]
fn config_attributes_logging_alias() {
    with_env(&[("DOCDESK_LOG_FORMAT", "json")], || {
        let result = config::run();
        let payload = parse_payload(&result.output);

        let format = field(&payload, "logging.format");
        assert_eq!(format["value"], "json");
        assert_eq!(format["source"], "env (DOCDESK_LOG_FORMAT)");
    });
}

#[test]
fn config_returns_validation_failure_for_bad_window() {
    with_env(&[("DOCDESK_PORTAL_SCHOOL_YEAR_WINDOW", "0")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn seed_returns_demo_summary() {
    with_env(&[], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected seed success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        let data = &payload["data"];
        assert_eq!(data["requests"].as_array().map(Vec::len), Some(5));
        assert_eq!(data["requests"][0]["requestId"], "r-1001");
        assert_eq!(data["stats"]["pending"], 2);
        assert_eq!(data["stats"]["approved"], 2);
        assert_eq!(data["stats"]["rejected"], 1);
        assert_eq!(data["schoolYears"].as_array().map(Vec::len), Some(6));
        assert_eq!(data["documents"].as_array().map(Vec::len), Some(8));
    });
}

#[test]
fn seed_message_is_stable_across_runs() {
    with_env(&[], || {
        let first = parse_payload(&seed::run().output);
        let second = parse_payload(&seed::run().output);

        assert_eq!(first["message"], second["message"]);
        assert_ne!(first["data"]["sessionId"], second["data"]["sessionId"]);
    });
}

#[test]
fn seed_returns_config_failure_for_bad_env() {
    with_env(&[("DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS", "soon")], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn run_replays_the_request_lifecycle() {
    with_env(&[("DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS", "0")], || {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let script = dir.path().join("steps.json");
        let year = current_school_year();
        fs::write(
            &script,
            format!(
                r#"[
                    {{"op": "submit", "documentType": "Bulletin", "schoolYear": "{year}",
                      "copies": "1", "reason": "Bulletin S1"}},
                    {{"op": "submit", "documentType": "Autre", "schoolYear": "{year}",
                      "copies": "1", "reason": "Erreur de saisie"}},
                    {{"op": "cancel", "requestId": "r-1002"}},
                    {{"op": "decide", "requestId": "r-1001", "decision": "approved",
                      "actor": "Admin", "reason": "Vérifié OK"}},
                    {{"op": "decide", "requestId": "r-1001", "decision": "rejected",
                      "reason": "Trop tard"}},
                    {{"op": "cancel", "requestId": "r-1001"}},
                    {{"op": "list", "status": "validé", "query": "bulletin"}}
                ]"#
            ),
        )
        .expect("script should be written");

        let result = run::run(&script, false);
        assert_eq!(result.exit_code, 0, "expected replay success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "run");
        assert_eq!(payload["message"], "replayed 7 steps (2 failed)");

        let steps = &payload["data"]["steps"];
        assert_eq!(steps[2]["status"], "ok");
        assert_eq!(steps[4]["error"]["code"], "already_finalized");
        assert_eq!(steps[5]["error"]["code"], "not_cancelable");
        assert_eq!(steps[6]["matches"][0], "r-1001");

        let requests = &payload["data"]["requests"];
        assert_eq!(requests.as_array().map(Vec::len), Some(1));
        assert_eq!(requests[0]["status"], "approved");
        assert_eq!(requests[0]["history"].as_array().map(Vec::len), Some(1));

        let notifications = &payload["data"]["notifications"];
        assert_eq!(notifications.as_array().map(Vec::len), Some(3));
        assert_eq!(notifications[0]["title"], "Demande validée");
        assert_eq!(payload["data"]["stats"]["approved"], 1);

        let documents = &payload["data"]["documents"];
        assert_eq!(documents.as_array().map(Vec::len), Some(1));
        assert_eq!(documents[0]["requestId"], "r-1001");
        assert_eq!(documents[0]["status"], "approved");
    });
}

#[test]
fn run_lists_notifications_and_documents() {
    with_env(&[("DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS", "0")], || {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let script = dir.path().join("steps.json");
        fs::write(
            &script,
            r#"[
                {"op": "list", "target": "notifications", "query": "envoyée convention"},
                {"op": "list", "target": "notifications", "status": "validé"},
                {"op": "list", "target": "documents", "category": "Attestation", "query": "pdf"},
                {"op": "list", "target": "documents", "category": "diplôme"}
            ]"#,
        )
        .expect("script should be written");

        let result = run::run(&script, true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let steps = &payload["data"]["steps"];
        assert_eq!(steps[0]["matches"].as_array().map(Vec::len), Some(0));
        assert_eq!(steps[1]["matches"].as_array().map(Vec::len), Some(2));
        let attestations = steps[2]["matches"].as_array().cloned().unwrap_or_default();
        assert_eq!(attestations.len(), 2);
        assert!(attestations.contains(&Value::from("doc-0001")));
        assert_eq!(steps[3]["error"]["code"], "invalid_category_filter");
        assert_eq!(payload["message"], "replayed 4 steps (1 failed)");
    });
}

#[test]
fn run_with_seed_starts_from_demo_requests() {
    with_env(&[("DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS", "0")], || {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let script = dir.path().join("steps.json");
        fs::write(&script, r#"[{"op": "cancel", "requestId": "r-1005"}]"#)
            .expect("script should be written");

        let result = run::run(&script, true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["steps"][0]["status"], "ok");
        assert_eq!(payload["data"]["requests"].as_array().map(Vec::len), Some(4));
        assert_eq!(payload["data"]["stats"]["pending"], 1);
    });
}

#[test]
fn run_reports_unreadable_script() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let result = run::run(&dir.path().join("missing.json"), false);
        assert_eq!(result.exit_code, 4);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "script_load");
        assert!(payload["message"].as_str().unwrap_or_default().contains("could not read script"));
    });
}

#[test]
fn run_reports_unknown_operation() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let script = dir.path().join("steps.json");
        fs::write(&script, r#"[{"op": "archive", "requestId": "r-1001"}]"#)
            .expect("script should be written");

        let result = run::run(&script, false);
        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "script_load");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn field<'a>(payload: &'a Value, key: &str) -> &'a Value {
    payload["data"]
        .as_array()
        .and_then(|fields| fields.iter().find(|field| field["key"] == key))
        .unwrap_or_else(|| panic!("config field `{key}` should be reported"))
}

fn current_school_year() -> String {
    let payload = parse_payload(&seed::run().output);
    payload["data"]["schoolYears"][0].as_str().unwrap_or_default().to_string()
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "DOCDESK_PORTAL_SCHOOL_YEAR_WINDOW",
        "DOCDESK_PORTAL_REVIEWER_NAME",
        "DOCDESK_SUBMISSION_SIMULATED_LATENCY_MS",
        "DOCDESK_LOGGING_LEVEL",
        "DOCDESK_LOGGING_FORMAT",
        "DOCDESK_LOG_LEVEL",
        "DOCDESK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
