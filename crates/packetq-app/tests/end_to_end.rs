//! 폴러 통합 테스트
//!
//! Mock packet queue 서버와 실제 HTTP 어댑터, 수집기, 컨트롤러, 폴러를 연결합니다.
//!
//! 실행:
//! ```
//! cargo test -p packetq-app --test end_to_end -- --nocapture
//! ```


use mock_server::MockServer;
use packetq_app::lifecycle::LifecycleManager;
use packetq_app::poller::{ParamCommand, Poller};
use packetq_core::config::PollOverlap;
use packetq_core::models::metric::{MetricKind, Pipe};
use packetq_core::models::params::ParamKey;
use packetq_core::ports::clock::Clock;
use packetq_core::ports::pipe_api::PipeApi;
use packetq_network::http_client::HttpPipeApi;
use packetq_telemetry::ingestor::EventIngestor;
use packetq_telemetry::metric_store::{MetricStore, Point, SharedMetricStore};
use packetq_telemetry::panel::{ParamsPanel, SharedPanel};
use packetq_telemetry::param_controller::{
    ParamController, NETWORK_ERROR_MESSAGE, UPDATE_FAILED_MESSAGE,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct FixedClock(i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// 실행 중인 폴러와 그 공유 상태
struct Running {
    store: SharedMetricStore,
    panel: SharedPanel,
    commands: mpsc::Sender<ParamCommand>,
    lifecycle: LifecycleManager,
    task: JoinHandle<()>,
}

impl Running {
    async fn stop(self) {
        self.lifecycle.shutdown();
        tokio::time::timeout(Duration::from_secs(2), self.task)
            .await
            .expect("폴러가 종료되지 않음")
            .unwrap();
    }
}

fn start(base_url: &str, local_now_millis: i64) -> Running {
    let api: Arc<dyn PipeApi> = Arc::new(HttpPipeApi::new(base_url, None).unwrap());
    let store = MetricStore::shared();
    let panel = ParamsPanel::shared();
    let ingestor = Arc::new(EventIngestor::new(
        api.clone(),
        Arc::new(FixedClock(local_now_millis)),
        store.clone(),
    ));
    let controller = Arc::new(ParamController::new(api, panel.clone()));
    let poller = Poller::new(
        ingestor,
        controller,
        Duration::from_millis(50),
        PollOverlap::Overlap,
    );

    let lifecycle = LifecycleManager::new();
    let (commands, command_rx) = mpsc::channel(8);
    let shutdown_rx = lifecycle.subscribe();
    let task = tokio::spawn(async move { poller.run(command_rx, shutdown_rx).await });

    Running {
        store,
        panel,
        commands,
        lifecycle,
        task,
    }
}

/// 부트스트랩 응답이 반영된 뒤의 폴러.
///
/// 부트스트랩은 폴링과 병렬로 진행되므로 편집 명령보다 늦게 도착하면
/// 입력값을 덮어쓴다. 편집을 다루는 테스트는 반영을 먼저 기다린다.
async fn start_bootstrapped(server: &MockServer) -> Running {
    server.set_params(json!({"bandwidth": 4242, "buffer": -1, "delay": 0.0, "loss": 0.0}));
    let running = start(server.url(), 0);
    let panel = running.panel.clone();
    eventually("부트스트랩", || panel.read().display(ParamKey::Bandwidth) == "4242").await;
    running
}

/// 조건이 참이 될 때까지 최대 2초 대기
async fn eventually(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("시간 내에 조건 충족 안 됨: {what}");
}

#[tokio::test]
async fn polled_drop_events_become_cumulative_series() {
    let server = MockServer::start().await;
    server.queue_events(
        1000.0,
        vec![
            json!({"id": 1, "pipe": "up", "type": "drop", "value": 50, "time": 999.0}),
            json!({"id": 2, "pipe": "up", "type": "drop", "value": 30, "time": 999.5}),
        ],
    );

    let running = start(server.url(), 1_000_000);
    let store = running.store.clone();
    eventually("이벤트 2개 반영", || store.read().total_points() == 2).await;

    assert_eq!(
        store.read().series(Pipe::Up, MetricKind::Drop).points(),
        &[
            Point {
                timestamp_millis: 999_000,
                value: 50.0
            },
            Point {
                timestamp_millis: 999_500,
                value: 80.0
            },
        ]
    );
    running.stop().await;
}

#[tokio::test]
async fn polling_repeats_on_interval() {
    let server = MockServer::start().await;
    let running = start(server.url(), 0);

    // 부트스트랩 1회 + 폴링 여러 번
    eventually("여러 번 폴링", || server.request_count() >= 4).await;

    server.queue_events(
        1.0,
        vec![json!({"pipe": "down", "type": "buffer", "value": 1500, "time": 1.0})],
    );
    let store = running.store.clone();
    eventually("다음 주기에 반영", || {
        store.read().latest(Pipe::Down, MetricKind::Buffer).is_some()
    })
    .await;
    running.stop().await;
}

#[tokio::test]
async fn bootstrap_loads_server_params() {
    let server = MockServer::start().await;
    server.set_params(json!({"bandwidth": 125000, "buffer": 64000, "delay": 0.05, "loss": 0.01}));

    let running = start(server.url(), 0);
    let panel = running.panel.clone();
    eventually("부트스트랩", || panel.read().display(ParamKey::Bandwidth) == "125000").await;

    let panel = running.panel.read().clone();
    assert_eq!(panel.input(ParamKey::Buffer), "64000");
    assert_eq!(panel.display(ParamKey::Delay), "0.05");
    assert_eq!(panel.error(), "");
    running.stop().await;
}

#[tokio::test]
async fn submit_sends_inputs_and_applies_echo() {
    let server = MockServer::start().await;
    let running = start_bootstrapped(&server).await;

    for command in [
        ParamCommand::Set(ParamKey::Bandwidth, "5".to_string()),
        ParamCommand::Set(ParamKey::Buffer, "10".to_string()),
        ParamCommand::Set(ParamKey::Delay, "1.5".to_string()),
        ParamCommand::Set(ParamKey::Loss, "0.1".to_string()),
        ParamCommand::Submit,
    ] {
        running.commands.send(command).await.unwrap();
    }

    let panel = running.panel.clone();
    eventually("echo 반영", || panel.read().display(ParamKey::Loss) == "0.1").await;

    let panel = running.panel.read().clone();
    assert_eq!(panel.display(ParamKey::Bandwidth), "5");
    assert_eq!(panel.display(ParamKey::Buffer), "10");
    assert_eq!(panel.display(ParamKey::Delay), "1.5");
    assert_eq!(
        server.received_puts(),
        vec![json!({"bandwidth": 5, "buffer": 10, "delay": 1.5, "loss": 0.1})]
    );
    running.stop().await;
}

#[tokio::test]
async fn non_numeric_inputs_go_out_as_null() {
    let server = MockServer::start().await;
    let running = start_bootstrapped(&server).await;

    running
        .commands
        .send(ParamCommand::Set(ParamKey::Bandwidth, "fast".to_string()))
        .await
        .unwrap();
    running
        .commands
        .send(ParamCommand::Set(ParamKey::Delay, "soon".to_string()))
        .await
        .unwrap();
    running.commands.send(ParamCommand::Submit).await.unwrap();

    eventually("PUT 수신", || !server.received_puts().is_empty()).await;
    let body = &server.received_puts()[0];
    assert!(body["bandwidth"].is_null());
    assert!(body["delay"].is_null());
    assert_eq!(body["buffer"], -1);
    running.stop().await;
}

#[tokio::test]
async fn empty_put_response_shows_update_failed() {
    let server = MockServer::start().await;
    server
        .state
        .empty_put_response
        .store(true, Ordering::Relaxed);
    let running = start_bootstrapped(&server).await;

    running
        .commands
        .send(ParamCommand::Set(ParamKey::Delay, "0.3".to_string()))
        .await
        .unwrap();
    running.commands.send(ParamCommand::Submit).await.unwrap();

    let panel = running.panel.clone();
    eventually("에러 표시", || panel.read().error() == UPDATE_FAILED_MESSAGE).await;
    assert_eq!(running.panel.read().display(ParamKey::Delay), "0");
    running.stop().await;
}

#[tokio::test]
async fn reset_restores_startup_params() {
    let server = MockServer::start().await;
    server.set_params(json!({"bandwidth": 9, "buffer": 9, "delay": 9.0, "loss": 0.9}));
    let running = start(server.url(), 0);

    let panel = running.panel.clone();
    eventually("부트스트랩", || panel.read().display(ParamKey::Bandwidth) == "9").await;

    running.commands.send(ParamCommand::Reset).await.unwrap();
    eventually("초기화 반영", || panel.read().display(ParamKey::Bandwidth) == "-1").await;

    let panel = running.panel.read().clone();
    assert_eq!(panel.display(ParamKey::Buffer), "-1");
    assert_eq!(panel.display(ParamKey::Delay), "0");
    assert_eq!(panel.display(ParamKey::Loss), "0");
    running.stop().await;
}

#[tokio::test]
async fn unreachable_server_only_fails_submissions() {
    // 바인딩 후 바로 닫아 연결이 거부되는 포트를 얻는다
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let running = start(&format!("http://127.0.0.1:{port}"), 0);
    tokio::time::sleep(Duration::from_millis(120)).await;

    // 부트스트랩/폴링 실패는 조용히 넘어간다
    assert_eq!(running.panel.read().error(), "");
    assert_eq!(running.store.read().total_points(), 0);

    running.commands.send(ParamCommand::Submit).await.unwrap();
    let panel = running.panel.clone();
    eventually("네트워크 에러 표시", || {
        panel.read().error() == NETWORK_ERROR_MESSAGE
    })
    .await;
    running.stop().await;
}

#[tokio::test]
async fn meter_reads_bytes_endpoint() {
    let server = MockServer::start().await;
    *server.state.meter.write() = json!({
        "up_bytes_attempted": 1000,
        "up_bytes_delivered": 900,
        "down_bytes_attempted": 50,
        "down_bytes_delivered": 50
    });

    let api = HttpPipeApi::new(server.url(), None).unwrap();
    let meter = api.fetch_meter().await.unwrap();
    assert_eq!(meter.undelivered(Pipe::Up), 100);
    assert_eq!(meter.undelivered(Pipe::Down), 0);
}
