use crate::api::{ExecutionApi, SendCommandRequest, SHELL_DOCUMENT};
use crate::error::{Result, ShellError};
use crate::executor::plan::{CommandSpec, TargetSet};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 디스패치 결과
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    /// SSM command id
    pub command_id: String,
    /// API가 받아들인 인스턴스 (API 응답 순서)
    pub targets: Vec<String>,
    /// 디스패치 직후 보고된 상태
    pub initial_status: String,
    /// 요청했지만 API 응답에 없는 인스턴스
    pub rejected: Vec<String>,
}

impl DispatchResult {
    pub fn is_partial(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// 모든 대상에 한 번의 send-command 요청을 보낸다
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn build_request(&self, spec: &CommandSpec, targets: &TargetSet) -> SendCommandRequest {
        let mut parameters = BTreeMap::new();
        parameters.insert("commands".to_string(), spec.commands.clone());
        parameters.insert("workingDirectory".to_string(), vec![spec.working_dir.clone()]);

        SendCommandRequest {
            document_name: SHELL_DOCUMENT.to_string(),
            instance_ids: targets.ids().to_vec(),
            parameters,
        }
    }

    pub async fn dispatch(
        &self,
        api: &dyn ExecutionApi,
        spec: &CommandSpec,
        targets: &TargetSet,
    ) -> Result<DispatchResult> {
        let request = self.build_request(spec, targets);

        let sent = api
            .send_command(&request)
            .await
            .map_err(|e| ShellError::Dispatch(e.to_string()))?;

        // 요청하지 않은 인스턴스가 돌아오면 무시한다
        let accepted: Vec<String> = sent
            .instance_ids
            .into_iter()
            .filter(|id| targets.contains(id))
            .collect();

        if accepted.is_empty() {
            return Err(ShellError::Dispatch(format!(
                "command {} was not accepted by any instance",
                sent.command_id
            )));
        }

        let rejected: Vec<String> = targets
            .ids()
            .iter()
            .filter(|id| !accepted.contains(id))
            .cloned()
            .collect();

        if !rejected.is_empty() {
            warn!(
                command_id = %sent.command_id,
                rejected = ?rejected,
                "command was not accepted by every requested instance"
            );
        }

        info!(
            command_id = %sent.command_id,
            backend = api.name(),
            targets = accepted.len(),
            status = %sent.status,
            "command dispatched"
        );

        Ok(DispatchResult {
            command_id: sent.command_id,
            targets: accepted,
            initial_status: sent.status,
            rejected,
        })
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;

    fn targets(list: &[&str]) -> TargetSet {
        TargetSet::new(list.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn spec() -> CommandSpec {
        CommandSpec::new("/tmp".to_string(), vec!["echo hi".to_string(), "uptime".to_string()]).unwrap()
    }

    #[test]
    fn test_build_request_parameters() {
        let request = CommandDispatcher::new().build_request(&spec(), &targets(&["i-1", "i-2"]));

        assert_eq!(request.document_name, "AWS-RunShellScript");
        assert_eq!(request.instance_ids, vec!["i-1", "i-2"]);
        assert_eq!(request.parameters["commands"], vec!["echo hi", "uptime"]);
        assert_eq!(request.parameters["workingDirectory"], vec!["/tmp"]);
    }

    #[tokio::test]
    async fn test_single_request_for_all_targets() {
        let api = MockApi::new().with_command_id("cmd-42");
        let result = CommandDispatcher::new()
            .dispatch(&api, &spec(), &targets(&["i-1", "i-2", "i-3"]))
            .await
            .unwrap();

        assert_eq!(api.sent_requests().len(), 1);
        assert_eq!(result.command_id, "cmd-42");
        assert_eq!(result.targets, vec!["i-1", "i-2", "i-3"]);
        assert_eq!(result.initial_status, "Pending");
        assert!(!result.is_partial());
    }

    #[tokio::test]
    async fn test_initial_status_comes_from_the_api() {
        let api = MockApi::new().with_initial_status("In Progress");
        let result = CommandDispatcher::new()
            .dispatch(&api, &spec(), &targets(&["i-1"]))
            .await
            .unwrap();

        assert_eq!(result.initial_status, "In Progress");
    }

    #[tokio::test]
    async fn test_partial_acceptance_is_surfaced() {
        let api = MockApi::new().with_accepted(&["i-1", "i-3"]);
        let result = CommandDispatcher::new()
            .dispatch(&api, &spec(), &targets(&["i-1", "i-2", "i-3"]))
            .await
            .unwrap();

        assert_eq!(result.targets, vec!["i-1", "i-3"]);
        assert_eq!(result.rejected, vec!["i-2"]);
        assert!(result.is_partial());
    }

    #[tokio::test]
    async fn test_nothing_accepted_is_an_error() {
        let api = MockApi::new().with_accepted(&[]);
        let err = CommandDispatcher::new()
            .dispatch(&api, &spec(), &targets(&["i-1"]))
            .await
            .unwrap_err();

        assert!(matches!(err, ShellError::Dispatch(_)));
    }

    #[tokio::test]
    async fn test_send_failure_becomes_dispatch_error() {
        let api = MockApi::new().failing_send("AccessDeniedException");
        let err = CommandDispatcher::new()
            .dispatch(&api, &spec(), &targets(&["i-1"]))
            .await
            .unwrap_err();

        match err {
            ShellError::Dispatch(message) => assert!(message.contains("AccessDeniedException")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
