pub mod shell;

pub use shell::{ShellRun, ShellRunner};
