use crate::api::ExecutionApi;
use crate::error::ShellError;
use crate::executor::dispatcher::DispatchResult;
use crate::executor::status::{CommandStatus, ObservedStatus, Severity};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 폴링 주기
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// 인스턴스별 상태
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceStatus {
    pub instance_id: String,
    pub current: ObservedStatus,
    /// 마지막 전이 직전의 상태 (전이가 없었으면 None)
    pub previous: Option<ObservedStatus>,
}

/// 상태 전이 이벤트
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub instance_id: String,
    pub previous: ObservedStatus,
    pub current: ObservedStatus,
}

impl StatusTransition {
    pub fn severity(&self) -> Severity {
        self.current.severity()
    }
}

#[derive(Debug)]
pub enum TrackerEvent {
    Transition(StatusTransition),
    /// 일시적인 조회 실패. 해당 인스턴스는 다음 주기에 다시 조회된다
    PollFailed { instance_id: String, error: ShellError },
}

/// 폴링 종료 시점의 결과
#[derive(Debug, Clone)]
pub struct TrackOutcome {
    /// 모든 인스턴스가 종료 상태에 도달했는지 (false면 취소됨)
    pub completed: bool,
    pub cycles: usize,
    /// 디스패치 순서대로 정렬된 최종 상태
    pub statuses: Vec<InstanceStatus>,
    /// 요청했지만 명령을 받지 못한 인스턴스
    pub rejected: Vec<String>,
}

impl TrackOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.completed
            && self.rejected.is_empty()
            && self
                .statuses
                .iter()
                .all(|s| s.current.kind == CommandStatus::Success)
    }

    /// 아직 종료되지 않은 인스턴스
    pub fn unfinished(&self) -> Vec<&InstanceStatus> {
        self.statuses.iter().filter(|s| !s.current.is_terminal()).collect()
    }

    /// Success가 아닌 종료 상태의 인스턴스
    pub fn failed(&self) -> Vec<&InstanceStatus> {
        self.statuses
            .iter()
            .filter(|s| s.current.is_terminal() && s.current.severity() != Severity::Progressing)
            .collect()
    }
}

/// 디스패치된 명령의 인스턴스별 상태를 폴링하며 추적
pub struct StatusTracker {
    command_id: String,
    /// 출력 순서 (디스패치 순서)
    order: Vec<String>,
    entries: HashMap<String, InstanceStatus>,
    /// 다음 주기에 조회할 인스턴스
    active: Vec<String>,
    rejected: Vec<String>,
    interval: Duration,
    cycles: usize,
}

impl StatusTracker {
    pub fn new(dispatch: &DispatchResult) -> Self {
        let initial = ObservedStatus::new(dispatch.initial_status.clone());
        let entries = dispatch
            .targets
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    InstanceStatus {
                        instance_id: id.clone(),
                        current: initial.clone(),
                        previous: None,
                    },
                )
            })
            .collect();

        Self {
            command_id: dispatch.command_id.clone(),
            order: dispatch.targets.clone(),
            entries,
            // 디스패치 응답 상태는 아직 조회 결과가 아니므로 전원 한 번은 조회한다
            active: dispatch.targets.clone(),
            rejected: dispatch.rejected.clone(),
            interval: DEFAULT_POLL_INTERVAL,
            cycles: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn command_id(&self) -> &str {
        &self.command_id
    }

    pub fn active_targets(&self) -> &[String] {
        &self.active
    }

    pub fn is_finished(&self) -> bool {
        self.active.is_empty()
    }

    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn status_of(&self, instance_id: &str) -> Option<&InstanceStatus> {
        self.entries.get(instance_id)
    }

    pub fn statuses(&self) -> Vec<InstanceStatus> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect()
    }

    /// 한 주기: 감시 중인 인스턴스를 순서대로 조회하고 감시 목록을 다시 계산한다
    pub async fn poll_cycle(&mut self, api: &dyn ExecutionApi) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        // 주기 도중 취소되어도 감시 목록은 그대로 남는다
        let watching = self.active.clone();

        for instance_id in &watching {
            let observed = match api.get_invocation_status(&self.command_id, instance_id).await {
                Ok(raw) => ObservedStatus::new(raw),
                Err(e) => {
                    warn!(
                        command_id = %self.command_id,
                        instance = %instance_id,
                        error = %e,
                        "status poll failed, retrying next cycle"
                    );
                    events.push(TrackerEvent::PollFailed {
                        instance_id: instance_id.clone(),
                        error: ShellError::Poll {
                            instance: instance_id.clone(),
                            message: e.to_string(),
                        },
                    });
                    continue;
                }
            };

            let Some(entry) = self.entries.get_mut(instance_id) else {
                continue;
            };

            debug!(instance = %instance_id, status = %observed, "polled");

            if entry.current.raw != observed.raw {
                let previous = std::mem::replace(&mut entry.current, observed.clone());
                entry.previous = Some(previous.clone());
                events.push(TrackerEvent::Transition(StatusTransition {
                    instance_id: instance_id.clone(),
                    previous,
                    current: observed,
                }));
            }
        }

        self.active = watching
            .into_iter()
            .filter(|id| {
                self.entries
                    .get(id)
                    .map(|entry| !entry.current.is_terminal())
                    .unwrap_or(false)
            })
            .collect();
        self.cycles += 1;

        events
    }

    /// 모든 인스턴스가 종료 상태가 되거나 `cancel`이 취소될 때까지 폴링
    pub async fn run<F>(
        &mut self,
        api: &dyn ExecutionApi,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> TrackOutcome
    where
        F: FnMut(&TrackerEvent),
    {
        info!(
            command_id = %self.command_id,
            instances = self.order.len(),
            interval_ms = self.interval.as_millis() as u64,
            "waiting for command to finish"
        );

        while !self.is_finished() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!(
                        command_id = %self.command_id,
                        remaining = ?self.active,
                        "polling cancelled before every instance finished"
                    );
                    return self.outcome(false);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            // 응답이 늦은 조회도 취소 신호로 끊는다
            let cycle = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                events = self.poll_cycle(api) => Some(events),
            };
            let Some(events) = cycle else {
                warn!(
                    command_id = %self.command_id,
                    remaining = ?self.active,
                    "polling cancelled during a poll cycle"
                );
                return self.outcome(false);
            };

            for event in events {
                on_event(&event);
            }
        }

        info!(command_id = %self.command_id, cycles = self.cycles, "every instance reached a terminal status");
        self.outcome(true)
    }

    fn outcome(&self, completed: bool) -> TrackOutcome {
        TrackOutcome {
            completed,
            cycles: self.cycles,
            statuses: self.statuses(),
            rejected: self.rejected.clone(),
        }
    }
}
