use crate::api::ExecutionApi;
use crate::error::{Result, ShellError};
use crate::executor::plan::TargetSet;
use std::collections::HashSet;
use tracing::{debug, warn};

/// 요청한 인스턴스가 SSM에 등록되어 있는지 디스패치 전에 확인
pub struct TargetValidator;

impl TargetValidator {
    pub fn new() -> Self {
        Self
    }

    /// 사용 불가능한 인스턴스가 하나라도 있으면 모두 모아서 실패
    pub async fn validate(&self, api: &dyn ExecutionApi, requested: &TargetSet) -> Result<()> {
        let available: HashSet<String> = api.list_available_targets().await?.into_iter().collect();
        debug!(available = available.len(), requested = requested.len(), "fetched available instances");

        let unavailable: Vec<String> = requested
            .ids()
            .iter()
            .filter(|id| !available.contains(*id))
            .cloned()
            .collect();

        if !unavailable.is_empty() {
            warn!(instances = ?unavailable, "instances are not registered with ssm");
            return Err(ShellError::UnavailableTargets(unavailable));
        }

        Ok(())
    }
}

impl Default for TargetValidator {
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

    #[tokio::test]
    async fn test_all_targets_available() {
        let api = MockApi::new().with_available(&["i-1", "i-2", "i-3"]);
        let validator = TargetValidator::new();

        assert!(validator.validate(&api, &targets(&["i-1", "i-3"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_lists_every_unavailable_target() {
        let api = MockApi::new().with_available(&["i-1"]);
        let validator = TargetValidator::new();

        let err = validator
            .validate(&api, &targets(&["i-9", "i-1", "i-8"]))
            .await
            .unwrap_err();

        match err {
            ShellError::UnavailableTargets(ids) => assert_eq!(ids, vec!["i-9", "i-8"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_list_failure_is_propagated() {
        let api = MockApi::new().failing_list("ExpiredTokenException");
        let validator = TargetValidator::new();

        let err = validator.validate(&api, &targets(&["i-1"])).await.unwrap_err();
        assert!(matches!(err, ShellError::Api(_)));
    }
}
