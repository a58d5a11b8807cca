//! # packetq
//!
//! packet queue 모니터링/제어 클라이언트 진입점.
//! 설정 로드, DI, 태스크 시작, 종료 대기.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use packetq_app::console;
use packetq_app::lifecycle::LifecycleManager;
use packetq_app::poller::{ParamCommand, Poller};
use packetq_app::reporter::StatusReporter;
use packetq_core::config::{AppConfig, PollOverlap};
use packetq_core::config_manager::ConfigManager;
use packetq_core::ports::pipe_api::PipeApi;
use packetq_network::http_client::HttpPipeApi;
use packetq_telemetry::clock_sync::SystemClock;
use packetq_telemetry::ingestor::EventIngestor;
use packetq_telemetry::metric_store::MetricStore;
use packetq_telemetry::panel::ParamsPanel;
use packetq_telemetry::param_controller::ParamController;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// packet queue 모니터링/제어 클라이언트
///
/// 셰이핑 엔진의 이벤트를 폴링해 시계열로 모으고, 셰이핑 파라미터를 조회/변경한다.
#[derive(Parser, Debug)]
#[command(name = "packetq")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: http://localhost:9000)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 이벤트 폴링 간격 (밀리초)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// 대화형 콘솔 비활성화
    #[arg(long)]
    no_console: bool,

    /// 새 폴링 사이클이 시작되면 진행 중인 이전 폴링을 취소
    #[arg(long)]
    cancel_stale_polls: bool,
}

/// 설정 파일 로드. 플랫폼 디렉토리를 쓸 수 없으면 현재 디렉토리로 대체
fn load_config_manager(path: Option<PathBuf>) -> Result<ConfigManager> {
    match path {
        Some(path) => ConfigManager::with_path(path).context("설정 파일 로드 실패"),
        None => ConfigManager::new().or_else(|e| {
            warn!("설정 관리자 초기화 실패, 현재 디렉토리 사용: {e}");
            ConfigManager::with_path(PathBuf::from("packetq.json")).context("설정 파일 로드 실패")
        }),
    }
}

/// CLI 인자로 설정 덮어쓰기
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    if let Some(ms) = args.poll_interval {
        config.poller.poll_interval_ms = ms;
    }
    if args.no_console {
        config.console.enabled = false;
    }
    if args.cancel_stale_polls {
        config.poller.overlap = PollOverlap::CancelStale;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "packetq={},packetq_app={},packetq_core={},packetq_network={},packetq_telemetry={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("packetq 클라이언트 시작");

    // 설정 로드
    let config_manager = load_config_manager(args.config.clone())?;
    info!("설정 파일: {:?}", config_manager.config_path());
    let mut config = config_manager.get();
    apply_overrides(&mut config, &args);
    config.validate().context("잘못된 설정")?;
    info!("서버: {}", config.server.base_url);

    // 1. 서버 어댑터
    let api: Arc<dyn PipeApi> = Arc::new(
        HttpPipeApi::new(&config.server.base_url, config.request_timeout())
            .context("HTTP 클라이언트 생성 실패")?,
    );

    // 2. 공유 상태 (드라이버가 소유)
    let store = MetricStore::shared();
    let panel = ParamsPanel::shared();

    // 3. 수집기 + 컨트롤러
    let ingestor = Arc::new(EventIngestor::new(
        api.clone(),
        Arc::new(SystemClock),
        store.clone(),
    ));
    let controller = Arc::new(
        ParamController::new(api.clone(), panel.clone())
            .with_supersede_stale(config.poller.supersede_stale_submits),
    );

    // 4. 라이프사이클
    let lifecycle = Arc::new(LifecycleManager::new());

    // ── 태스크 시작 ──

    let (command_tx, command_rx) = mpsc::channel::<ParamCommand>(32);
    let poller = Poller::new(
        ingestor,
        controller,
        config.poll_interval(),
        config.poller.overlap,
    );
    let shutdown_rx = lifecycle.subscribe();
    let poller_task = tokio::spawn(async move {
        poller.run(command_rx, shutdown_rx).await;
    });

    let reporter = StatusReporter::new(store, config.report_interval());
    let shutdown_rx = lifecycle.subscribe();
    tokio::spawn(async move {
        reporter.run(shutdown_rx).await;
    });

    if config.console.enabled {
        println!("{}", console::HELP);
        let lc = lifecycle.clone();
        tokio::spawn(async move {
            let stdin = BufReader::new(tokio::io::stdin());
            if console::run(stdin, command_tx).await {
                lc.shutdown();
            }
        });
    } else {
        drop(command_tx);
    }

    info!("packetq 클라이언트 실행 중 (Ctrl+C로 종료)");

    tokio::select! {
        _ = lifecycle.wait_for_signal() => {}
        _ = lifecycle.wait_for_shutdown() => {}
    }
    lifecycle.shutdown();

    // 진행 중인 요청은 기다리지 않는다
    if tokio::time::timeout(Duration::from_secs(2), poller_task)
        .await
        .is_err()
    {
        warn!("폴러 종료 대기 시간 초과");
    }

    info!("packetq 클라이언트 종료");
    Ok(())
}
