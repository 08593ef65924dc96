use crate::api::{ExecutionApi, SendCommandRequest, SentCommand};
use crate::error::{Result, ShellError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Step {
    Status(String),
    Failure(String),
}

/// 테스트용 SSM Run Command API
///
/// 인스턴스별로 미리 정해 둔 상태 순서를 돌려주고, 모든 호출을 기록합니다.
pub struct MockApi {
    command_id: String,
    available: Vec<String>,
    /// send-command가 받아들일 인스턴스 (None이면 전부)
    accepted: Option<Vec<String>>,
    initial_status: String,
    send_failure: Option<String>,
    list_failure: Option<String>,
    /// 인스턴스별 남은 응답. 마지막 상태는 계속 반복된다
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    sent: Mutex<Vec<SendCommandRequest>>,
    polls: Mutex<Vec<String>>,
    poll_delay: Option<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        MockApi {
            command_id: "cmd-mock-0001".to_string(),
            available: Vec::new(),
            accepted: None,
            initial_status: "Pending".to_string(),
            send_failure: None,
            list_failure: None,
            scripts: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            polls: Mutex::new(Vec::new()),
            poll_delay: None,
        }
    }

    pub fn with_available(mut self, ids: &[&str]) -> Self {
        self.available = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_accepted(mut self, ids: &[&str]) -> Self {
        self.accepted = Some(ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_initial_status(mut self, status: &str) -> Self {
        self.initial_status = status.to_string();
        self
    }

    pub fn with_command_id(mut self, command_id: &str) -> Self {
        self.command_id = command_id.to_string();
        self
    }

    pub fn failing_send(mut self, message: &str) -> Self {
        self.send_failure = Some(message.to_string());
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_failure = Some(message.to_string());
        self
    }

    /// 응답이 느린 API 흉내 (get-status마다 지연)
    pub fn with_poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = Some(delay);
        self
    }

    /// 한 인스턴스의 조회 응답을 순서대로 추가
    pub fn with_statuses(self, instance: &str, statuses: &[&str]) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts.entry(instance.to_string()).or_default();
            queue.extend(statuses.iter().map(|s| Step::Status(s.to_string())));
        }
        self
    }

    /// 조회 실패 한 번을 추가
    pub fn with_poll_failure(self, instance: &str, message: &str) -> Self {
        {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts.entry(instance.to_string()).or_default();
            queue.push_back(Step::Failure(message.to_string()));
        }
        self
    }

    /// 받은 send-command 요청 (순서대로)
    pub fn sent_requests(&self) -> Vec<SendCommandRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// get-status 호출된 인스턴스 id (순서대로)
    pub fn poll_calls(&self) -> Vec<String> {
        self.polls.lock().unwrap().clone()
    }

    pub fn poll_count(&self, instance: &str) -> usize {
        self.polls.lock().unwrap().iter().filter(|i| *i == instance).count()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionApi for MockApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_command(&self, request: &SendCommandRequest) -> Result<SentCommand> {
        self.sent.lock().unwrap().push(request.clone());

        if let Some(message) = &self.send_failure {
            return Err(ShellError::Api(message.clone()));
        }

        let instance_ids = match &self.accepted {
            Some(accepted) => request
                .instance_ids
                .iter()
                .filter(|id| accepted.contains(id))
                .cloned()
                .collect(),
            None => request.instance_ids.clone(),
        };

        Ok(SentCommand {
            command_id: self.command_id.clone(),
            instance_ids,
            status: self.initial_status.clone(),
        })
    }

    async fn list_available_targets(&self) -> Result<Vec<String>> {
        match &self.list_failure {
            Some(message) => Err(ShellError::Api(message.clone())),
            None => Ok(self.available.clone()),
        }
    }

    async fn get_invocation_status(&self, command_id: &str, instance_id: &str) -> Result<String> {
        self.polls.lock().unwrap().push(instance_id.to_string());

        if let Some(delay) = self.poll_delay {
            tokio::time::sleep(delay).await;
        }

        if command_id != self.command_id {
            return Err(ShellError::Api(format!("InvocationDoesNotExist: {}", command_id)));
        }

        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(instance_id)
            .ok_or_else(|| ShellError::Api(format!("InvalidInstanceId: {}", instance_id)))?;

        let last = queue.len() <= 1;
        let step = if !last {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match step {
            Some(Step::Status(status)) => Ok(status),
            Some(Step::Failure(message)) => {
                // 마지막 실패는 반복하지 않고 이후엔 초기 상태를 돌려준다
                if last {
                    queue.pop_front();
                    queue.push_back(Step::Status(self.initial_status.clone()));
                }
                Err(ShellError::Api(message))
            }
            None => Ok(self.initial_status.clone()),
        }
    }
}
