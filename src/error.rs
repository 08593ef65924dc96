use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    /// 플래그/설정 파일 충돌, 필수 입력 누락, 설정 파일 파싱 실패
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("instance {} is unavailable for ssm", format_ids(.0))]
    UnavailableTargets(Vec<String>),

    #[error("Failed to dispatch command: {0}")]
    Dispatch(String),

    #[error("SSM API call failed: {0}")]
    Api(String),

    /// 단일 인스턴스 폴링 실패 (다음 주기에 재시도)
    #[error("Failed to get status of {instance}: {message}")]
    Poll { instance: String, message: String },

    #[error("Interrupted before the command was dispatched")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_ids(ids: &[String]) -> String {
    format!("[{}]", ids.join(" "))
}

pub type Result<T> = std::result::Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_targets_lists_every_id() {
        let err = ShellError::UnavailableTargets(vec!["i-1".to_string(), "i-2".to_string()]);
        assert_eq!(err.to_string(), "instance [i-1 i-2] is unavailable for ssm");
    }

    #[test]
    fn test_poll_error_message() {
        let err = ShellError::Poll {
            instance: "i-1".to_string(),
            message: "throttled".to_string(),
        };
        assert!(err.to_string().contains("i-1"));
        assert!(err.to_string().contains("throttled"));
    }
}
