use daimon_watch::{
    CancellationToken, EventDispatcher, LogScanner, OffsetTracker, PollLoop, PollState,
    EVENT_PATH,
};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_session(root: &Path, project: &str, session: &str, lines: &[&str]) {
    let dir = root.join(project);
    std::fs::create_dir_all(&dir).unwrap();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.jsonl", session)))
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

async fn noesis() -> MockServer {
    slow_noesis(Duration::ZERO).await
}

/// NOESIS that holds every acknowledgement for `delay`
async fn slow_noesis(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVENT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "ok", "stored": true}))
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

fn write_prompts(root: &Path, count: usize) {
    let lines: Vec<String> = (0..count)
        .map(|i| format!(r#"{{"role":"user","content":"explain step {}"}}"#, i))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_session(root, "app", "s1", &refs);
}

#[tokio::test]
async fn test_pass_delivers_one_event_per_human_record() {
    let server = noesis().await;
    let temp = tempfile::TempDir::new().unwrap();
    write_session(
        temp.path(),
        "app",
        "s1",
        &[
            r#"{"role":"user","content":"Fix the crash in main.rs"}"#,
            r#"{"role":"assistant","content":"Looking at main.rs"}"#,
            r#"{"role":"user","content":"Now deploy to production"}"#,
        ],
    );

    let dispatcher = EventDispatcher::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::new(OffsetTracker::new()),
        dispatcher,
        Duration::from_secs(60),
    );

    let report = poll.run_pass().await;
    assert_eq!(report.classified, 2);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.dropped, 0);
    assert_eq!(poll.state(), PollState::Idle);

    let requests = server.received_requests().await.unwrap();
    let mut types: Vec<String> = requests
        .iter()
        .map(|r| r.body_json::<serde_json::Value>().unwrap()["event_type"].to_string())
        .collect();
    types.sort();
    assert_eq!(types, vec!["\"deploy\"", "\"fix\""]);

    let again = poll.run_pass().await;
    assert_eq!(again.classified, 0);
}

#[tokio::test]
async fn test_unreachable_endpoint_does_not_stop_scanning() {
    let temp = tempfile::TempDir::new().unwrap();
    write_session(
        temp.path(),
        "app",
        "s1",
        &[r#"{"role":"user","content":"delete the cache"}"#],
    );

    let dispatcher =
        EventDispatcher::new("http://127.0.0.1:1", Duration::from_millis(300)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::default(),
        dispatcher,
        Duration::from_secs(60),
    );

    let first = poll.run_pass().await;
    assert_eq!(first.classified, 1);
    assert_eq!(first.dropped, 1);

    write_session(
        temp.path(),
        "app",
        "s1",
        &[r#"{"role":"user","content":"explain the cache"}"#],
    );
    let second = poll.run_pass().await;
    assert_eq!(second.classified, 1);
    assert_eq!(second.dropped, 1);
}

#[tokio::test]
async fn test_first_pass_runs_immediately_and_cancel_stops_loop() {
    let server = noesis().await;
    let temp = tempfile::TempDir::new().unwrap();
    write_session(
        temp.path(),
        "app",
        "s1",
        &[r#"{"role":"user","content":"add a login page"}"#],
    );

    let dispatcher = EventDispatcher::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::default(),
        dispatcher,
        Duration::from_secs(3600),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            let report = poll.run(cancel).await;
            (poll, report)
        }
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    cancel.cancel();
    let (poll, report) = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should stop promptly after cancellation")
        .unwrap();

    assert_eq!(report.passes, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(poll.state(), PollState::Stopped);
}

#[tokio::test]
async fn test_cancelled_before_start_runs_no_pass() {
    let temp = tempfile::TempDir::new().unwrap();
    let dispatcher =
        EventDispatcher::new("http://127.0.0.1:1", Duration::from_millis(100)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::default(),
        dispatcher,
        Duration::from_millis(10),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = poll.run(cancel).await;

    assert_eq!(report.passes, 0);
    assert_eq!(poll.state(), PollState::Stopped);
}

#[tokio::test]
async fn test_checkpoints_survive_restart() {
    let server = noesis().await;
    let temp = tempfile::TempDir::new().unwrap();
    let root = temp.path().join("projects");
    let store = temp.path().join("daimon").join("checkpoints.json");
    write_session(
        &root,
        "app",
        "s1",
        &[r#"{"role":"user","content":"write tests for the parser"}"#],
    );

    let dispatcher = EventDispatcher::new(&server.uri(), Duration::from_secs(2)).unwrap();

    let mut first = PollLoop::new(
        &root,
        LogScanner::new(OffsetTracker::load(&store)),
        dispatcher.clone(),
        Duration::from_secs(60),
    );
    assert_eq!(first.run_pass().await.classified, 1);
    drop(first);

    let mut restarted = PollLoop::new(
        &root,
        LogScanner::new(OffsetTracker::load(&store)),
        dispatcher,
        Duration::from_secs(60),
    );
    assert_eq!(restarted.run_pass().await.classified, 0);
    assert_eq!(restarted.scanner().tracker().len(), 1);
}

#[tokio::test]
async fn test_slow_dispatches_overlap_within_pass() {
    let delay = Duration::from_millis(500);
    let server = slow_noesis(delay).await;
    let temp = tempfile::TempDir::new().unwrap();
    write_prompts(temp.path(), 6);

    let dispatcher = EventDispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::default(),
        dispatcher,
        Duration::from_secs(60),
    );

    let started = Instant::now();
    let report = poll.run_pass().await;
    let elapsed = started.elapsed();

    assert_eq!(report.delivered, 6);
    assert!(
        elapsed < delay * 3,
        "six acks of {:?} took {:?}; dispatches ran one after another",
        delay,
        elapsed
    );
}

#[tokio::test]
async fn test_max_inflight_caps_concurrent_dispatches() {
    let delay = Duration::from_millis(300);
    let server = slow_noesis(delay).await;
    let temp = tempfile::TempDir::new().unwrap();
    write_prompts(temp.path(), 8);

    let dispatcher = EventDispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::default(),
        dispatcher,
        Duration::from_secs(60),
    )
    .with_max_inflight(2);

    let started = Instant::now();
    let report = poll.run_pass().await;
    let elapsed = started.elapsed();

    assert_eq!(report.classified, 8);
    assert_eq!(report.delivered, 8);
    // 8 dispatches, 2 at a time: at least 4 rounds of acknowledgements
    assert!(
        elapsed >= delay * 4 - Duration::from_millis(50),
        "limit of 2 not honored: 8 acks of {:?} took only {:?}",
        delay,
        elapsed
    );
}

#[tokio::test]
async fn test_cancel_during_pass_lets_pass_finish() {
    let server = slow_noesis(Duration::from_millis(800)).await;
    let temp = tempfile::TempDir::new().unwrap();
    write_prompts(temp.path(), 3);

    let dispatcher = EventDispatcher::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let mut poll = PollLoop::new(
        temp.path(),
        LogScanner::default(),
        dispatcher,
        Duration::from_secs(3600),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            let report = poll.run(cancel).await;
            (poll, report)
        }
    });

    // Acks are still pending at this point
    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let (poll, report) = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("loop should stop once the pass settles")
        .unwrap();

    assert_eq!(report.passes, 1);
    assert_eq!(report.classified, 3);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.dropped, 0);
    assert_eq!(poll.state(), PollState::Stopped);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
