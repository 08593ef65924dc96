use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::JobSources;

#[derive(Parser, Debug)]
#[command(name = "ssmcast")]
#[command(version)]
#[command(about = "Run shell commands on EC2 instances through SSM Run Command", long_about = None)]
pub struct Cli {
    /// ~/.aws/credentials 프로파일 이름
    #[arg(long, global = true)]
    pub awsconf: Option<String>,

    /// AWS 리전
    #[arg(long, global = true, default_value = "ap-northeast-1")]
    pub awsregion: String,

    /// 디버그 로그 출력
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run shell script via ssm
    Shell(ShellArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ShellArgs {
    /// instance targeted by command, more than 1
    #[arg(long = "instance", value_name = "INSTANCE_ID")]
    pub instances: Vec<String>,

    /// directory where command will be executed
    #[arg(long)]
    pub workdir: Option<String>,

    /// command will be executed
    #[arg(long = "cmd", value_name = "COMMAND")]
    pub cmds: Vec<String>,

    /// path to yaml config file
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// dry-run. print instanceIDS, work directory and commands
    #[arg(long)]
    pub dry_run: bool,

    /// stop waiting after this many seconds (the remote command keeps running)
    #[arg(long, value_name = "SECONDS")]
    pub max_wait: Option<u64>,
}

impl ShellArgs {
    pub fn sources(&self) -> JobSources {
        JobSources {
            instances: self.instances.clone(),
            workdir: self.workdir.clone(),
            commands: self.cmds.clone(),
            path: self.path.clone(),
        }
    }
}
