//! 폴링 드라이버.
//!
//! 시작 시 파라미터 부트스트랩을 별도 태스크로 한 번 보내고, 응답을 기다리지
//! 않고 즉시 한 번 그리고 이후 `poll_interval`마다 이벤트를 폴링한다. 폴링과 제출은 별도 태스크로
//! 실행되므로 응답이 늦으면 여러 폴링이 동시에 진행될 수 있다.

use std::sync::Arc;
use std::time::Duration;

use packetq_core::config::PollOverlap;
use packetq_core::models::metric::Pipe;
use packetq_core::models::params::ParamKey;
use packetq_telemetry::ingestor::EventIngestor;
use packetq_telemetry::param_controller::{ParamController, SubmitOutcome};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 콘솔 → 드라이버 명령
#[derive(Debug, Clone, PartialEq)]
pub enum ParamCommand {
    /// 편집 입력 변경 (제출 전까지 서버에 보내지 않음)
    Set(ParamKey, String),
    Submit,
    Reset,
    Meter,
    Show,
}

/// 폴링 드라이버
pub struct Poller {
    ingestor: Arc<EventIngestor>,
    controller: Arc<ParamController>,
    poll_interval: Duration,
    overlap: PollOverlap,
}

impl Poller {
    /// 주기는 최소 1ms로 보정한다
    pub fn new(
        ingestor: Arc<EventIngestor>,
        controller: Arc<ParamController>,
        poll_interval: Duration,
        overlap: PollOverlap,
    ) -> Self {
        Self {
            ingestor,
            controller,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            overlap,
        }
    }

    /// 종료 신호까지 실행
    pub async fn run(
        &self,
        mut commands: mpsc::Receiver<ParamCommand>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        info!(
            "폴러 시작: 주기={}ms, 중첩={:?}",
            self.poll_interval.as_millis(),
            self.overlap
        );

        let controller = self.controller.clone();
        tokio::spawn(async move {
            controller.bootstrap().await;
        });

        // 첫 tick은 즉시 발생한다
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut current_cycle: Option<CancellationToken> = None;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.start_cycle(&mut current_cycle);
                }
                Some(command) = commands.recv() => {
                    self.handle(command);
                }
                _ = shutdown_rx.changed() => {
                    if let Some(token) = current_cycle.take() {
                        token.cancel();
                    }
                    info!("폴러 종료");
                    break;
                }
            }
        }
    }

    /// 폴링 사이클 하나를 태스크로 시작
    fn start_cycle(&self, current_cycle: &mut Option<CancellationToken>) {
        let ingestor = self.ingestor.clone();
        match self.overlap {
            PollOverlap::Overlap => {
                tokio::spawn(async move { ingestor.poll().await });
            }
            PollOverlap::CancelStale => {
                if let Some(stale) = current_cycle.take() {
                    stale.cancel();
                }
                let token = CancellationToken::new();
                *current_cycle = Some(token.clone());
                tokio::spawn(async move { ingestor.poll_with_token(token).await });
            }
        }
    }

    /// 명령 처리. 네트워크가 필요한 명령은 태스크로 분리한다.
    fn handle(&self, command: ParamCommand) {
        debug!("명령 수신: {command:?}");
        match command {
            ParamCommand::Set(key, value) => {
                self.controller.panel().write().set_input(key, value);
            }
            ParamCommand::Show => {
                info!("파라미터: {}", self.controller.panel().read().render());
            }
            ParamCommand::Submit => {
                let controller = self.controller.clone();
                tokio::spawn(async move {
                    let outcome = controller.submit().await;
                    log_outcome("제출", outcome, &controller);
                });
            }
            ParamCommand::Reset => {
                let controller = self.controller.clone();
                tokio::spawn(async move {
                    let outcome = controller.reset().await;
                    log_outcome("초기화", outcome, &controller);
                });
            }
            ParamCommand::Meter => {
                let controller = self.controller.clone();
                tokio::spawn(async move {
                    match controller.meter().await {
                        Ok(meter) => info!(
                            "바이트 미터: up {}/{} (미전달 {}), down {}/{} (미전달 {})",
                            meter.up_bytes_delivered,
                            meter.up_bytes_attempted,
                            meter.undelivered(Pipe::Up),
                            meter.down_bytes_delivered,
                            meter.down_bytes_attempted,
                            meter.undelivered(Pipe::Down),
                        ),
                        Err(e) => warn!("바이트 미터 조회 실패: {e}"),
                    }
                });
            }
        }
    }
}

fn log_outcome(action: &str, outcome: SubmitOutcome, controller: &ParamController) {
    let panel = controller.panel().read();
    match outcome {
        SubmitOutcome::Applied(fields) => {
            info!("파라미터 {action} 완료 ({fields}개 필드): {}", panel.render());
        }
        SubmitOutcome::Superseded => debug!("파라미터 {action} 응답 무시 (더 새로운 요청 존재)"),
        SubmitOutcome::UpdateFailed | SubmitOutcome::NetworkError => {
            warn!("{}", panel.error());
        }
    }
}
