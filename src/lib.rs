//! SSM Run Command으로 여러 EC2 인스턴스에 셸 명령을 보내고,
//! 인스턴스별 상태가 모두 종료될 때까지 폴링합니다.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod ui;

pub use error::{Result, ShellError};
