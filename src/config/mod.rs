use crate::error::{Result, ShellError};
use crate::executor::{CommandSpec, TargetSet};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// `--path`로 지정하는 작업 설정 파일
///
/// 기본 형식은 YAML이며, 확장자가 `.toml`이면 TOML로 읽습니다.
///
/// ```yaml
/// instances:
///   - i-0123456789abcdef0
/// workdir: /var/app
/// commands:
///   - git pull
///   - systemctl restart app
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobFile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instances: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub workdir: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub commands: Vec<String>,
}

/// 값이 비어 있는 키(`workdir:`)는 키가 없는 것과 같게 취급
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl JobFile {
    /// 설정 파일 읽기
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ShellError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);

        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // 빈 파일은 모든 필드가 비어 있는 것으로 취급
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| ShellError::Config(format!("invalid yaml config: {}", e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ShellError::Config(format!("invalid toml config: {}", e)))
    }
}

/// 커맨드라인에서 받은 값 (설정 파일과 섞기 전)
#[derive(Debug, Clone, Default)]
pub struct JobSources {
    pub instances: Vec<String>,
    pub workdir: Option<String>,
    pub commands: Vec<String>,
    pub path: Option<PathBuf>,
}

/// 실행할 작업: 대상 인스턴스와 명령
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub targets: TargetSet,
    pub spec: CommandSpec,
}

impl JobSources {
    /// 각 항목은 플래그와 설정 파일 중 정확히 한 곳에서만 와야 한다
    pub fn resolve(self) -> Result<Job> {
        let file = match &self.path {
            Some(path) => JobFile::load(path)?,
            None => JobFile::default(),
        };
        self.resolve_with(file)
    }

    pub fn resolve_with(self, file: JobFile) -> Result<Job> {
        let instances = pick_list(file.instances, self.instances, "instance", "more than 1")?;

        let flag_workdir = self.workdir.filter(|w| !w.is_empty());
        let workdir = match (file.workdir.is_empty(), flag_workdir) {
            (false, Some(_)) => return Err(conflict("workdir")),
            (true, None) => return Err(ShellError::Config("--workdir is required".to_string())),
            (_, Some(flag)) => flag,
            (false, None) => file.workdir,
        };

        let commands = pick_list(file.commands, self.commands, "cmd", "more than 1")?;

        Ok(Job {
            targets: TargetSet::new(instances)?,
            spec: CommandSpec::new(workdir, commands)?,
        })
    }
}

fn pick_list(from_file: Vec<String>, from_flag: Vec<String>, flag: &str, hint: &str) -> Result<Vec<String>> {
    match (from_file.is_empty(), from_flag.is_empty()) {
        (false, false) => Err(conflict(flag)),
        (true, true) => Err(ShellError::Config(format!("--{} is required, {}", flag, hint))),
        (true, false) => Ok(from_flag),
        (false, true) => Ok(from_file),
    }
}

fn conflict(flag: &str) -> ShellError {
    ShellError::Config(format!("--path and --{} conflict", flag))
}
