use crate::executor::{
    CommandSpec, DispatchResult, InstanceStatus, Severity, StatusTransition, TargetSet, TrackOutcome,
};
use chrono::Local;
use colored::*;

/// 상태 심각도별 출력 색상
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Progressing => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Problem => Color::Red,
    }
}

/// 콘솔 출력 담당 (상태 없음)
///
/// `format_*`는 문자열만 만들고, `print_*`가 stdout에 출력합니다.
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// 드라이런 요약 (대상 인스턴스, 작업 디렉토리, 명령)
    pub fn format_summary(&self, spec: &CommandSpec, targets: &TargetSet) -> String {
        let mut out = String::new();
        out.push_str("instances:\n");
        for id in targets.ids() {
            out.push_str(&format!("\t{}\n", id));
        }
        out.push_str("working directory:\n");
        out.push_str(&format!("\t{}\n", spec.working_dir));
        out.push_str("command:\n");
        for command in &spec.commands {
            out.push_str(&format!("\t{}\n", command));
        }
        out
    }

    pub fn print_summary(&self, spec: &CommandSpec, targets: &TargetSet) {
        println!("{}", self.format_summary(spec, targets));
    }

    pub fn format_dispatch_ack(&self, result: &DispatchResult) -> Vec<String> {
        let mut lines: Vec<String> = result
            .targets
            .iter()
            .map(|id| format!("dispatch command to instanceID: {}", id))
            .collect();
        lines.push(format!("commandID: {}", result.command_id));
        lines
    }

    pub fn print_dispatch_ack(&self, result: &DispatchResult) {
        for line in self.format_dispatch_ack(result) {
            println!("{}", line);
        }
        if result.is_partial() {
            println!(
                "{} command was not accepted by: {}",
                "[!]".yellow().bold(),
                result.rejected.join(", ").yellow()
            );
        }
    }

    pub fn format_transition(&self, event: &StatusTransition) -> String {
        format!(
            "instanceID: {} change status {} -> {}",
            event.instance_id, event.previous, event.current
        )
    }

    pub fn print_transition(&self, event: &StatusTransition, severity: Severity) {
        let styled = self.format_transition(event).color(severity_color(severity));
        println!("{} {}", Local::now().format("%H:%M:%S").to_string().dimmed(), styled);
    }

    pub fn print_poll_failure(&self, instance_id: &str, error: &str) {
        eprintln!("{} {}: {}", "[X]".red(), instance_id, error.red());
    }

    /// 최종 상태 목록 (명령을 받지 못한 인스턴스는 마지막에)
    pub fn format_final_report(&self, outcome: &TrackOutcome) -> Vec<String> {
        outcome
            .statuses
            .iter()
            .map(|s: &InstanceStatus| format!("{}: {}", s.instance_id, s.current))
            .chain(outcome.rejected.iter().map(|id| format!("{}: not dispatched", id)))
            .collect()
    }

    pub fn print_final_report(&self, outcome: &TrackOutcome) {
        if outcome.completed {
            println!("\n{} Command finished on every instance.", "[OK]".green().bold());
        } else {
            println!(
                "\n{} Stopped waiting; {} instance(s) still running.",
                "[!]".yellow().bold(),
                outcome.unfinished().len()
            );
        }

        let severities = outcome
            .statuses
            .iter()
            .map(|s| s.current.severity())
            .chain(outcome.rejected.iter().map(|_| Severity::Problem));
        for (line, severity) in self.format_final_report(outcome).iter().zip(severities) {
            println!("  - {}", line.color(severity_color(severity)));
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ObservedStatus;

    fn targets() -> TargetSet {
        TargetSet::new(vec!["i-a".to_string(), "i-b".to_string()]).unwrap()
    }

    fn spec() -> CommandSpec {
        CommandSpec::new("/tmp".to_string(), vec!["echo hi".to_string()]).unwrap()
    }

    #[test]
    fn test_summary_layout() {
        let summary = Reporter::new().format_summary(&spec(), &targets());

        assert_eq!(
            summary,
            "instances:\n\ti-a\n\ti-b\nworking directory:\n\t/tmp\ncommand:\n\techo hi\n"
        );
    }

    #[test]
    fn test_dispatch_ack_lists_accepted_instances() {
        let result = DispatchResult {
            command_id: "cmd-1".to_string(),
            targets: vec!["i-a".to_string()],
            initial_status: "Pending".to_string(),
            rejected: vec!["i-b".to_string()],
        };

        let lines = Reporter::new().format_dispatch_ack(&result);
        assert_eq!(lines, vec!["dispatch command to instanceID: i-a", "commandID: cmd-1"]);
    }

    #[test]
    fn test_transition_line() {
        let event = StatusTransition {
            instance_id: "i-a".to_string(),
            previous: ObservedStatus::new("Pending"),
            current: ObservedStatus::new("In Progress"),
        };

        assert_eq!(
            Reporter::new().format_transition(&event),
            "instanceID: i-a change status Pending -> In Progress"
        );
    }

    #[test]
    fn test_final_report_in_dispatch_order() {
        let outcome = TrackOutcome {
            completed: true,
            cycles: 3,
            statuses: vec![
                InstanceStatus {
                    instance_id: "i-b".to_string(),
                    current: ObservedStatus::new("Failed"),
                    previous: Some(ObservedStatus::new("Delayed")),
                },
                InstanceStatus {
                    instance_id: "i-a".to_string(),
                    current: ObservedStatus::new("Success"),
                    previous: Some(ObservedStatus::new("In Progress")),
                },
            ],
            rejected: Vec::new(),
        };

        assert_eq!(
            Reporter::new().format_final_report(&outcome),
            vec!["i-b: Failed", "i-a: Success"]
        );
    }

    #[test]
    fn test_final_report_lists_undispatched_instances() {
        let outcome = TrackOutcome {
            completed: true,
            cycles: 1,
            statuses: vec![InstanceStatus {
                instance_id: "i-a".to_string(),
                current: ObservedStatus::new("Success"),
                previous: Some(ObservedStatus::new("Pending")),
            }],
            rejected: vec!["i-b".to_string()],
        };

        assert_eq!(
            Reporter::new().format_final_report(&outcome),
            vec!["i-a: Success", "i-b: not dispatched"]
        );
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(Severity::Progressing), Color::Green);
        assert_eq!(severity_color(Severity::Warning), Color::Yellow);
        assert_eq!(severity_color(Severity::Problem), Color::Red);
        assert_eq!(severity_color(ObservedStatus::new("Delayed").severity()), Color::Yellow);
        assert_eq!(severity_color(ObservedStatus::new("TimedOut").severity()), Color::Red);
    }
}
