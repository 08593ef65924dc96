pub mod aws_cli;
pub mod mock;

use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub use aws_cli::AwsCliApi;
pub use mock::MockApi;

/// Document used for every dispatch
pub const SHELL_DOCUMENT: &str = "AWS-RunShellScript";

/// send-command request addressed to several instances at once
#[derive(Debug, Clone, PartialEq)]
pub struct SendCommandRequest {
    pub document_name: String,
    pub instance_ids: Vec<String>,
    pub parameters: BTreeMap<String, Vec<String>>,
}

/// What the API reports back for an accepted send-command call
#[derive(Debug, Clone, PartialEq)]
pub struct SentCommand {
    pub command_id: String,
    pub instance_ids: Vec<String>,
    pub status: String,
}

/// Remote command execution capability (SSM Run Command or a test double)
#[async_trait]
pub trait ExecutionApi: Send + Sync {
    /// Backend name used in logs (e.g., "aws-cli", "mock")
    fn name(&self) -> &str;

    /// Submit one command to every instance in the request
    async fn send_command(&self, request: &SendCommandRequest) -> Result<SentCommand>;

    /// Instance ids currently registered with the execution service
    async fn list_available_targets(&self) -> Result<Vec<String>>;

    /// Status detail of one invocation (command id x instance id)
    async fn get_invocation_status(&self, command_id: &str, instance_id: &str) -> Result<String>;
}
