use odin_checks::core::{
    Check, CheckContext, CheckDescriptor, CheckError, CheckResult, Issue, Severity, WarmupScope,
};
use odin_checks::report::{ErrorLog, NdjsonSink};
use odin_checks::runner::{EngineConfig, RegistryBuilder, ScanEngine};
use serde_json::{json, Value};
use std::time::Duration;

/// Check returning a fixed set of results, or a fixed failure mode.
struct StaticCheck {
    id: &'static str,
    results: Vec<CheckResult>,
    behavior: Behavior,
}

#[derive(Clone, Copy, PartialEq)]
enum Behavior {
    Ok,
    Fail,
    Panic,
    ObserveDeadline,
}

impl StaticCheck {
    fn ok(id: &'static str, results: Vec<CheckResult>) -> Self {
        Self {
            id,
            results,
            behavior: Behavior::Ok,
        }
    }

    fn failing(id: &'static str) -> Self {
        Self {
            id,
            results: Vec::new(),
            behavior: Behavior::Fail,
        }
    }
}

impl Check for StaticCheck {
    fn descriptor(&self) -> CheckDescriptor {
        CheckDescriptor::new(self.id, Severity::Low, "static test check")
    }

    fn check(&self, ctx: &CheckContext) -> Result<Vec<CheckResult>, CheckError> {
        match self.behavior {
            Behavior::Ok => Ok(self.results.clone()),
            Behavior::Fail => Err(CheckError::Protocol("simulated probe failure".to_string())),
            Behavior::Panic => panic!("simulated probe panic"),
            Behavior::ObserveDeadline => {
                ctx.ensure_active()?;
                Ok(self.results.clone())
            }
        }
    }
}

/// Check that stores data during warmup and surfaces it in its finding.
struct WarmedCheck {
    fail_warmup: bool,
}

impl Check for WarmedCheck {
    fn descriptor(&self) -> CheckDescriptor {
        CheckDescriptor::new("warmed_check", Severity::Info, "warmup exercising check")
    }

    fn warmup(&self, scope: &mut WarmupScope) -> Result<(), CheckError> {
        if self.fail_warmup {
            return Err(CheckError::Other("warmup data unavailable".to_string()));
        }
        scope.set("token", json!("prepared"));
        Ok(())
    }

    fn check(&self, ctx: &CheckContext) -> Result<Vec<CheckResult>, CheckError> {
        let token = ctx
            .warmup_value("token")
            .and_then(Value::as_str)
            .unwrap_or("absent")
            .to_string();
        Ok(vec![CheckResult::new().with_description(token)])
    }
}

fn error_log() -> (tempfile::TempDir, ErrorLog, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("errors.txt");
    let log = ErrorLog::open(&path).unwrap();
    (dir, log, path)
}

fn engine(builder: RegistryBuilder, config: EngineConfig) -> ScanEngine {
    ScanEngine::new(builder.build(), config).unwrap()
}

#[test]
fn failing_check_does_not_affect_siblings() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "t/alpha",
            StaticCheck::ok("alpha", vec![CheckResult::new()]),
        )
        .register("t/broken", StaticCheck::failing("broken"))
        .register(
            "t/omega",
            StaticCheck::ok("omega", vec![CheckResult::new()]),
        );
    let engine = engine(builder, EngineConfig::default());

    let (_dir, errors, errors_path) = error_log();
    let issues = engine.scan_target("http://10.0.0.1:8080", 7, &errors);

    assert_eq!(issues.len(), 2);
    let names: Vec<_> = issues.iter().map(|i| i.name.clone().unwrap()).collect();
    assert!(names.contains(&"alpha".to_string()));
    assert!(names.contains(&"omega".to_string()));

    let log = std::fs::read_to_string(&errors_path).unwrap();
    assert!(log.contains("[WARNING] Error running check broken for http://10.0.0.1:8080"));
}

#[test]
fn panicking_check_is_contained() {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            "t/steady",
            StaticCheck::ok("steady", vec![CheckResult::new()]),
        )
        .register(
            "t/unstable",
            StaticCheck {
                id: "unstable",
                results: Vec::new(),
                behavior: Behavior::Panic,
            },
        );
    let engine = engine(builder, EngineConfig::default());

    let (_dir, errors, errors_path) = error_log();
    let issues = engine.scan_target("http://h", 1, &errors);

    assert_eq!(issues.len(), 1);
    let log = std::fs::read_to_string(&errors_path).unwrap();
    assert!(log.contains("Check unstable panicked for http://h"));
}

fn issue_key(issue: &Issue) -> (String, Option<String>, Option<String>) {
    (issue.target.clone(), issue.name.clone(), issue.poc.clone())
}

#[test]
fn single_worker_yields_same_issue_set_as_parallel() {
    let registry = || {
        let mut builder = RegistryBuilder::new();
        for (path, id) in [("t/a", "a"), ("t/b", "b"), ("t/c", "c"), ("t/d", "d")] {
            builder.register(
                path,
                StaticCheck::ok(
                    id,
                    vec![
                        CheckResult::new().with_description(format!("{id} first")),
                        CheckResult::new().with_description(format!("{id} second")),
                    ],
                ),
            );
        }
        builder
    };

    let parallel = engine(registry(), EngineConfig::default().with_max_workers(8));
    let serial = engine(registry(), EngineConfig::default().with_max_workers(1));
    assert_eq!(serial.workers(), 1);

    let (_dir, errors, _path) = error_log();
    let mut from_parallel: Vec<_> = parallel
        .scan_target("https://t.example", 1, &errors)
        .iter()
        .map(issue_key)
        .collect();
    let mut from_serial: Vec<_> = serial
        .scan_target("https://t.example", 1, &errors)
        .iter()
        .map(issue_key)
        .collect();

    from_parallel.sort();
    from_serial.sort();
    assert_eq!(from_parallel, from_serial);
    assert_eq!(from_parallel.len(), 8);
}

#[test]
fn warmup_data_flows_into_checks_and_failures_keep_the_check_registered() {
    let mut builder = RegistryBuilder::new();
    builder.register("t/warmed", WarmedCheck { fail_warmup: false });
    let mut engine = engine(builder, EngineConfig::default());

    let (_dir, errors, errors_path) = error_log();
    engine.warm_up(&errors);
    let issues = engine.scan_target("http://h", 1, &errors);
    assert_eq!(issues[0].description, "prepared");

    // Failing warmup: logged, check still runs with no warmup data.
    let mut builder = RegistryBuilder::new();
    builder.register("t/warmed", WarmedCheck { fail_warmup: true });
    let mut engine = ScanEngine::new(builder.build(), EngineConfig::default()).unwrap();
    engine.warm_up(&errors);
    let issues = engine.scan_target("http://h", 1, &errors);
    assert_eq!(issues[0].description, "absent");

    let log = std::fs::read_to_string(&errors_path).unwrap();
    assert!(log.contains("[WARNING] Warmup failed for check warmed_check"));
}

#[test]
fn expired_deadline_is_reported_as_timeout() {
    let mut builder = RegistryBuilder::new();
    builder.register(
        "t/slow",
        StaticCheck {
            id: "slow",
            results: vec![CheckResult::new()],
            behavior: Behavior::ObserveDeadline,
        },
    );
    let config = EngineConfig {
        check_timeout: Some(Duration::from_secs(0)),
        ..EngineConfig::default()
    };
    let engine = ScanEngine::new(builder.build(), config).unwrap();

    let (_dir, errors, errors_path) = error_log();
    let issues = engine.scan_target("http://h", 1, &errors);
    assert!(issues.is_empty());

    let log = std::fs::read_to_string(&errors_path).unwrap();
    assert!(log.contains("[WARNING] Check slow timed out for http://h"));
}

#[test]
fn unparseable_target_is_logged_and_yields_nothing() {
    let mut builder = RegistryBuilder::new();
    builder.register("t/a", StaticCheck::ok("a", vec![CheckResult::new()]));
    let engine = engine(builder, EngineConfig::default());

    let (_dir, errors, errors_path) = error_log();
    let issues = engine.scan_target("https://", 1, &errors);
    assert!(issues.is_empty());

    let log = std::fs::read_to_string(&errors_path).unwrap();
    assert!(log.contains("[ERROR] Error processing URL https://"));
}

#[test]
fn empty_registry_is_a_fatal_boundary_condition() {
    let registry = RegistryBuilder::new().build();
    match ScanEngine::new(registry, EngineConfig::default()) {
        Err(odin_checks::EngineError::EmptyRegistry) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("engine built with no checks"),
    }
}

#[test]
fn end_to_end_issue_attribution_and_poc_folding() {
    let target_url = "https://t.example:443";

    let mut builder = RegistryBuilder::new();
    builder
        .register("t/check_a", StaticCheck::ok("check_a", vec![CheckResult::new()]))
        .register(
            "t/check_b",
            StaticCheck::ok(
                "check_b",
                vec![
                    CheckResult::new().with_description("plain finding"),
                    CheckResult::new()
                        .with_url("https://t.example/admin/.env")
                        .with_description("explicit url finding"),
                ],
            ),
        );
    let engine = engine(builder, EngineConfig::default());

    let (_dir, errors, _path) = error_log();
    let issues = engine.scan_target(target_url, 99, &errors);
    assert_eq!(issues.len(), 3);

    // Every issue is attributed to the scanned URL, never the check's own.
    for issue in &issues {
        assert_eq!(issue.target, target_url);
        assert_eq!(issue.program_id, 99);
    }

    let folded = issues
        .iter()
        .find(|i| i.description == "explicit url finding")
        .unwrap();
    let poc: Value = serde_json::from_str(folded.poc.as_deref().unwrap()).unwrap();
    assert_eq!(poc["url"], json!("https://t.example/admin/.env"));

    let plain = issues
        .iter()
        .find(|i| i.description == "plain finding")
        .unwrap();
    assert_eq!(plain.poc, None);
}

#[test]
fn ndjson_round_trip_is_stable() {
    let mut builder = RegistryBuilder::new();
    builder.register(
        "t/check_a",
        StaticCheck::ok(
            "check_a",
            vec![CheckResult::new().with_url("https://t.example/found")],
        ),
    );
    let engine = engine(builder, EngineConfig::default());

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("output.ndjson");
    let sink = NdjsonSink::create(&out_path).unwrap();
    let errors = ErrorLog::open(&dir.path().join("errors.txt")).unwrap();

    for issue in engine.scan_target("https://t.example", 12, &errors) {
        sink.write(&issue).unwrap();
    }

    let data = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(data.lines().count(), 1);
    for line in data.lines() {
        let value: Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["target"], json!("https://t.example"));
        assert_eq!(value["scanner"], json!("OdinTemplatesScanner"));
        assert_eq!(value["program_id"], json!(12));

        // Re-serializing the parsed object changes nothing.
        let reparsed: Value =
            serde_json::from_str(&serde_json::to_string(&value).unwrap()).unwrap();
        assert_eq!(value, reparsed);

        // And the typed round trip holds too.
        let issue: Issue = serde_json::from_str(line).unwrap();
        let again: Value = serde_json::from_str(&serde_json::to_string(&issue).unwrap()).unwrap();
        assert_eq!(value, again);
    }
}
