use crate::error::{Result, ShellError};
use std::collections::HashSet;
use tracing::warn;

/// 명령을 보낼 인스턴스 목록 (순서 유지, 중복 없음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    ids: Vec<String>,
}

impl TargetSet {
    /// 중복 id는 첫 번째 것만 남긴다
    pub fn new(ids: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(ids.len());

        for id in ids {
            let id = id.trim().to_string();
            if id.is_empty() {
                continue;
            }
            if seen.insert(id.clone()) {
                unique.push(id);
            } else {
                warn!(instance = %id, "duplicate instance id ignored");
            }
        }

        if unique.is_empty() {
            return Err(ShellError::Config("--instance is required, more than 1".to_string()));
        }

        Ok(Self { ids: unique })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }
}

/// 원격에서 실행할 셸 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub working_dir: String,
    pub commands: Vec<String>,
}

impl CommandSpec {
    pub fn new(working_dir: String, commands: Vec<String>) -> Result<Self> {
        if working_dir.trim().is_empty() {
            return Err(ShellError::Config("--workdir is required".to_string()));
        }

        let commands: Vec<String> = commands
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        if commands.is_empty() {
            return Err(ShellError::Config("--cmd is required, more than 1".to_string()));
        }

        Ok(Self {
            working_dir,
            commands,
        })
    }
}
