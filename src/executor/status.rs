use std::fmt;

/// SSM 호출(invocation) 상태
///
/// API가 돌려주는 문자열을 파싱한 값입니다. 출력용 원문은 `ObservedStatus`가 보존합니다.
/// 알 수 없는 문자열은 `Unknown`으로 분류되어 종료 상태로 취급됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Pending,
    InProgress,
    Delayed,
    Success,
    Cancelled,
    Failed,
    TimedOut,
    Undeliverable,
    Terminated,
    Unknown,
}

/// 상태 전이 출력 색상을 결정하는 심각도
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Progressing,
    Warning,
    Problem,
}

impl CommandStatus {
    /// "In Progress", "InProgress", "in_progress" 모두 같은 값으로 취급
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "pending" => CommandStatus::Pending,
            "inprogress" => CommandStatus::InProgress,
            "delayed" => CommandStatus::Delayed,
            "success" => CommandStatus::Success,
            "cancelled" | "canceled" => CommandStatus::Cancelled,
            "failed" => CommandStatus::Failed,
            "timedout" | "deliverytimedout" | "executiontimedout" => CommandStatus::TimedOut,
            "undeliverable" => CommandStatus::Undeliverable,
            "terminated" => CommandStatus::Terminated,
            _ => CommandStatus::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            CommandStatus::Pending | CommandStatus::InProgress | CommandStatus::Delayed
        )
    }

    pub fn severity(&self) -> Severity {
        match self {
            CommandStatus::Pending | CommandStatus::InProgress | CommandStatus::Success => {
                Severity::Progressing
            }
            CommandStatus::Delayed => Severity::Warning,
            _ => Severity::Problem,
        }
    }
}

/// 원문 문자열과 파싱된 상태의 쌍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedStatus {
    pub raw: String,
    pub kind: CommandStatus,
}

impl ObservedStatus {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = CommandStatus::parse(&raw);
        Self { raw, kind }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for ObservedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
