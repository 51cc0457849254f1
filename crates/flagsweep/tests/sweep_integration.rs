//! Integration tests driving complete sweeps through the public API.
//!
//! These tests script the transport boundary directly, so pagination,
//! partitioning, batched processing, and aggregation are exercised
//! end-to-end without sockets.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use flagsweep::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use flagsweep::retry::RetryConfig;
use flagsweep::sweep::{SweepOptions, run_sweep};
use flagsweep::{FlagsClient, SweepError};

const HOST: &str = "https://flags.test";
const PROJECT: &str = "web-app";
// 2025-07-18T10:30:00Z
const CREATED_MS: i64 = 1_752_834_600_000;

/// Scripted transport: responses registered per method + URL, consumed in
/// FIFO order; a missing script entry surfaces as a transport error.
#[derive(Clone, Default)]
struct ScriptedTransport {
    inner: Arc<Mutex<ScriptedInner>>,
}

#[derive(Default)]
struct ScriptedInner {
    routes: HashMap<(HttpMethod, String), VecDeque<HttpResponse>>,
    requests: Vec<HttpRequest>,
}

impl ScriptedTransport {
    fn stub(&self, method: HttpMethod, url: impl Into<String>, status: u16, body: Vec<u8>) {
        let mut inner = self.inner.lock().expect("lock");
        inner
            .routes
            .entry((method, url.into()))
            .or_default()
            .push_back(HttpResponse { status, body });
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().expect("lock").requests.clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self.inner.lock().expect("lock");
        let key = (request.method, request.url.clone());
        inner.requests.push(request);
        inner
            .routes
            .get_mut(&key)
            .and_then(|q| q.pop_front())
            .ok_or_else(|| HttpError::Transport(format!("no scripted response for {}", key.1)))
    }
}

fn client(transport: &ScriptedTransport) -> FlagsClient {
    FlagsClient::new_with_transport(
        HOST,
        "api-token",
        RetryConfig::default(),
        None,
        Arc::new(transport.clone()),
    )
    .expect("client should build")
}

fn list_url(offset: u64) -> String {
    format!("{HOST}/api/v2/flags/{PROJECT}?limit=50&offset={offset}")
}

fn flag_url(key: &str) -> String {
    format!("{HOST}/api/v2/flags/{PROJECT}/{key}")
}

fn clean_flag(key: &str) -> serde_json::Value {
    serde_json::json!({ "key": key, "name": key, "creationDate": CREATED_MS })
}

fn stub_lookup_and_patch(transport: &ScriptedTransport, key: &str) {
    transport.stub(
        HttpMethod::Get,
        flag_url(key),
        200,
        serde_json::to_vec(&clean_flag(key)).expect("flag serializes"),
    );
    transport.stub(HttpMethod::Patch, flag_url(key), 200, b"{}".to_vec());
}

#[tokio::test(start_paused = true)]
async fn sweep_paginates_partitions_and_patches_everything() {
    let transport = ScriptedTransport::default();

    // Page 1: a full page of clean flags.
    let page1_keys: Vec<String> = (0..50).map(|i| format!("p1-{i}")).collect();
    let page1 = serde_json::json!({
        "items": page1_keys.iter().map(|k| clean_flag(k)).collect::<Vec<_>>(),
        "totalCount": 53
    });
    transport.stub(
        HttpMethod::Get,
        list_url(0),
        200,
        serde_json::to_vec(&page1).expect("page serializes"),
    );

    // Page 2: short page with one already-stamped flag, one with no
    // creation date, one clean.
    let page2 = serde_json::json!({
        "items": [
            {
                "key": "stamped",
                "name": "stamped",
                "creationDate": CREATED_MS,
                "customProperties": {
                    "flag.expiry.date": { "name": "flag.expiry.date", "value": ["01/01/2025"] }
                }
            },
            { "key": "no-creation", "name": "no-creation" },
            clean_flag("p2-clean")
        ],
        "totalCount": 53
    });
    transport.stub(
        HttpMethod::Get,
        list_url(50),
        200,
        serde_json::to_vec(&page2).expect("page serializes"),
    );

    for key in page1_keys.iter().map(String::as_str).chain(["p2-clean"]) {
        stub_lookup_and_patch(&transport, key);
    }

    let result = run_sweep(
        &client(&transport),
        PROJECT,
        &SweepOptions::default(),
        None,
    )
    .await
    .expect("sweep should complete");

    assert_eq!(result.total_found, 53);
    assert_eq!(result.total_processed, 51);
    assert_eq!(result.updated.len(), 51);
    assert_eq!(result.skipped.len(), 2);
    assert!(result.failed.is_empty());
    assert!(result.is_success());

    // Outcomes trace one-to-one to inputs.
    assert_eq!(
        result.updated.len() + result.failed.len(),
        result.total_processed
    );
    assert_eq!(
        result.total_processed + result.skipped.len(),
        result.total_found
    );

    // Every updated flag got the same computed expiry date.
    assert!(result.updated.iter().all(|u| u.expiry_date == "08/17/2025"));

    // 2 list pages + 51 lookups + 51 patches.
    assert_eq!(transport.requests().len(), 104);
}

#[tokio::test(start_paused = true)]
async fn per_flag_write_failures_mark_the_run_failed_but_report_fully() {
    let transport = ScriptedTransport::default();

    let page = serde_json::json!({
        "items": [clean_flag("ok-1"), clean_flag("bad"), clean_flag("ok-2")],
        "totalCount": 3
    });
    transport.stub(
        HttpMethod::Get,
        list_url(0),
        200,
        serde_json::to_vec(&page).expect("page serializes"),
    );

    stub_lookup_and_patch(&transport, "ok-1");
    stub_lookup_and_patch(&transport, "ok-2");
    transport.stub(
        HttpMethod::Get,
        flag_url("bad"),
        200,
        serde_json::to_vec(&clean_flag("bad")).expect("flag serializes"),
    );
    for _ in 0..3 {
        transport.stub(HttpMethod::Patch, flag_url("bad"), 500, Vec::new());
    }

    let result = run_sweep(
        &client(&transport),
        PROJECT,
        &SweepOptions::default(),
        None,
    )
    .await
    .expect("per-flag failures do not abort the run");

    assert!(!result.is_success());
    assert_eq!(result.total_processed, 3);
    let updated: Vec<_> = result.updated.iter().map(|u| u.key.as_str()).collect();
    assert_eq!(updated, vec!["ok-1", "ok-2"]);
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].key, "bad");
    assert!(result.failed[0].error.contains("500"));
}

#[tokio::test(start_paused = true)]
async fn a_persistently_failing_page_aborts_the_whole_run() {
    let transport = ScriptedTransport::default();
    // Nothing scripted: every list request is a transport error, which the
    // executor retries and then surfaces.
    let err = run_sweep(
        &client(&transport),
        PROJECT,
        &SweepOptions::default(),
        None,
    )
    .await
    .expect_err("enumeration failure is run-fatal");

    match err {
        SweepError::Enumeration(e) => assert_eq!(e.offset, 0),
        other => panic!("unexpected error: {other}"),
    }

    // Three attempts on the first page, then the run stopped.
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn dry_run_reports_without_writing() {
    let transport = ScriptedTransport::default();

    let page = serde_json::json!({
        "items": [clean_flag("a"), clean_flag("b")],
        "totalCount": 2
    });
    transport.stub(
        HttpMethod::Get,
        list_url(0),
        200,
        serde_json::to_vec(&page).expect("page serializes"),
    );
    for key in ["a", "b"] {
        transport.stub(
            HttpMethod::Get,
            flag_url(key),
            200,
            serde_json::to_vec(&clean_flag(key)).expect("flag serializes"),
        );
    }

    let options = SweepOptions {
        dry_run: true,
        batch_delay: Duration::ZERO,
        ..SweepOptions::default()
    };

    let result = run_sweep(&client(&transport), PROJECT, &options, None)
        .await
        .expect("dry run should complete");

    assert_eq!(result.updated.len(), 2);
    assert!(
        transport
            .requests()
            .iter()
            .all(|r| r.method == HttpMethod::Get),
        "dry run must not issue PATCH requests"
    );
}
