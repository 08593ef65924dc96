use crate::api::ExecutionApi;
use crate::config::Job;
use crate::error::{Result, ShellError};
use crate::executor::{
    CommandDispatcher, StatusTracker, TargetValidator, TrackOutcome, TrackerEvent, DEFAULT_POLL_INTERVAL,
};
use crate::ui::{with_spinner, Reporter};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// shell 서브커맨드 실행 결과
#[derive(Debug)]
pub enum ShellRun {
    /// 드라이런: 요약만 출력함
    DryRun,
    Tracked(TrackOutcome),
}

impl ShellRun {
    /// 요청한 모든 인스턴스가 명령을 받아 Success로 끝났거나 드라이런이면 true
    pub fn succeeded(&self) -> bool {
        match self {
            ShellRun::DryRun => true,
            ShellRun::Tracked(outcome) => outcome.all_succeeded(),
        }
    }
}

/// 검증 → 디스패치 → 폴링 순서로 shell 명령을 실행
pub struct ShellRunner<'a> {
    api: &'a dyn ExecutionApi,
    reporter: Reporter,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl<'a> ShellRunner<'a> {
    pub fn new(api: &'a dyn ExecutionApi) -> Self {
        Self {
            api,
            reporter: Reporter::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// 디스패치 이후 이 시간이 지나면 폴링을 멈춘다
    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub async fn run(&self, job: &Job, dry_run: bool, cancel: &CancellationToken) -> Result<ShellRun> {
        self.reporter.print_summary(&job.spec, &job.targets);
        if dry_run {
            return Ok(ShellRun::DryRun);
        }

        let validator = TargetValidator::new();
        with_spinner("Checking instances registered with SSM...", validator.validate(self.api, &job.targets))
            .await?;

        // 디스패치 전이면 아무 부작용 없이 중단할 수 있다
        if cancel.is_cancelled() {
            return Err(ShellError::Cancelled);
        }

        let dispatcher = CommandDispatcher::new();
        let result = with_spinner(
            "Sending command...",
            dispatcher.dispatch(self.api, &job.spec, &job.targets),
        )
        .await?;
        self.reporter.print_dispatch_ack(&result);

        let watch = cancel.child_token();
        if let Some(max_wait) = self.max_wait {
            let deadline = watch.clone();
            tokio::spawn(async move {
                tokio::time::sleep(max_wait).await;
                info!(max_wait_secs = max_wait.as_secs(), "max wait elapsed");
                deadline.cancel();
            });
        }

        let mut tracker = StatusTracker::new(&result).with_interval(self.poll_interval);
        let outcome = tracker
            .run(self.api, &watch, |event| match event {
                TrackerEvent::Transition(transition) => {
                    self.reporter.print_transition(transition, transition.severity())
                }
                TrackerEvent::PollFailed { instance_id, error } => {
                    self.reporter.print_poll_failure(instance_id, &error.to_string())
                }
            })
            .await;

        self.reporter.print_final_report(&outcome);
        Ok(ShellRun::Tracked(outcome))
    }
}
