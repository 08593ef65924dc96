use crate::api::{ExecutionApi, SendCommandRequest, SentCommand};
use crate::error::{Result, ShellError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// `aws ssm` CLI를 호출하는 ExecutionApi 구현
///
/// 자격 증명과 세션 구성은 aws CLI에 맡기고, 리전/프로파일만 인자로 넘깁니다.
pub struct AwsCliApi {
    region: Option<String>,
    profile: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendCommandOutput {
    command: CommandInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CommandInfo {
    command_id: String,
    #[serde(default)]
    instance_ids: Vec<String>,
    #[serde(default)]
    status_details: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeInstanceInformationOutput {
    #[serde(default)]
    instance_information_list: Vec<InstanceInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstanceInformation {
    instance_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetCommandInvocationOutput {
    #[serde(default)]
    status_details: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl AwsCliApi {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        Self { region, profile }
    }

    /// 서브커맨드 인자 뒤에 공통 옵션(--output json, --region, --profile)을 붙인다
    fn build_args(&self, operation: &str, extra: Vec<String>) -> Vec<String> {
        let mut args = vec!["ssm".to_string(), operation.to_string()];
        args.extend(extra);
        args.push("--output".to_string());
        args.push("json".to_string());
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args
    }

    async fn run_json<T: DeserializeOwned>(&self, args: Vec<String>) -> Result<T> {
        debug!(args = ?args, "invoking aws cli");

        // 폴링이 취소되어 future가 버려지면 aws 프로세스도 종료
        let output = Command::new("aws")
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ShellError::Api(
                        "aws CLI is not installed.\n\
                         Install: https://docs.aws.amazon.com/cli/latest/userguide/getting-started-install.html"
                            .to_string(),
                    )
                } else {
                    ShellError::Io(e)
                }
            })?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(ShellError::Api(error.trim().to_string()));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[async_trait]
impl ExecutionApi for AwsCliApi {
    fn name(&self) -> &str {
        "aws-cli"
    }

    async fn send_command(&self, request: &SendCommandRequest) -> Result<SentCommand> {
        let mut extra = vec![
            "--document-name".to_string(),
            request.document_name.clone(),
            "--instance-ids".to_string(),
        ];
        extra.extend(request.instance_ids.iter().cloned());
        extra.push("--parameters".to_string());
        extra.push(serde_json::to_string(&request.parameters)?);

        let output: SendCommandOutput = self
            .run_json(self.build_args("send-command", extra))
            .await?;
        let command = output.command;

        Ok(SentCommand {
            command_id: command.command_id,
            instance_ids: command.instance_ids,
            status: command
                .status_details
                .or(command.status)
                .unwrap_or_else(|| "Pending".to_string()),
        })
    }

    async fn list_available_targets(&self) -> Result<Vec<String>> {
        // aws CLI는 기본적으로 모든 페이지를 이어서 반환한다
        let output: DescribeInstanceInformationOutput = self
            .run_json(self.build_args("describe-instance-information", Vec::new()))
            .await?;

        Ok(output
            .instance_information_list
            .into_iter()
            .map(|info| info.instance_id)
            .collect())
    }

    async fn get_invocation_status(&self, command_id: &str, instance_id: &str) -> Result<String> {
        let extra = vec![
            "--command-id".to_string(),
            command_id.to_string(),
            "--instance-id".to_string(),
            instance_id.to_string(),
        ];
        let output: GetCommandInvocationOutput = self
            .run_json(self.build_args("get-command-invocation", extra))
            .await?;

        output
            .status_details
            .or(output.status)
            .ok_or_else(|| ShellError::Api("get-command-invocation returned no status".to_string()))
    }
}
