use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn ssmcast() -> Command {
    Command::cargo_bin("ssmcast").unwrap()
}

#[test]
fn test_cli_help() {
    ssmcast()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SSM Run Command"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_shell_help_lists_flags() {
    ssmcast()
        .args(["shell", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--instance"))
        .stdout(predicate::str::contains("--workdir"))
        .stdout(predicate::str::contains("--cmd"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_cli_version() {
    ssmcast().arg("--version").assert().success();
}

#[test]
fn test_missing_instance() {
    ssmcast()
        .args(["shell", "--workdir", "/tmp", "--cmd", "echo hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--instance is required"));
}

#[test]
fn test_dry_run_from_flags() {
    ssmcast()
        .args([
            "shell", "--instance", "i-0001", "--instance", "i-0002", "--workdir", "/tmp", "--cmd", "echo hi",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("instances:\n\ti-0001\n\ti-0002\n"))
        .stdout(predicate::str::contains("working directory:\n\t/tmp\n"))
        .stdout(predicate::str::contains("command:\n\techo hi\n"))
        .stdout(predicate::str::contains("dispatch command").not());
}

#[test]
fn test_dry_run_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "instances:\n  - i-0003\nworkdir: /srv/app\ncommands:\n  - git pull\n  - make").unwrap();

    ssmcast()
        .arg("shell")
        .arg("--path")
        .arg(file.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("\ti-0003\n"))
        .stdout(predicate::str::contains("\t/srv/app\n"))
        .stdout(predicate::str::contains("\tgit pull\n\tmake\n"));
}

#[test]
fn test_path_and_flag_conflict() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "instances:\n  - i-0003\nworkdir: /srv/app\ncommands:\n  - uptime").unwrap();

    ssmcast()
        .arg("shell")
        .arg("--path")
        .arg(file.path())
        .args(["--instance", "i-0004", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--path and --instance conflict"));
}
