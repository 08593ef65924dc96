use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// 스피너 스타일 (SSM API 호출 대기 중)
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// future가 끝날 때까지 스피너를 보여주고 지운다
pub async fn with_spinner<F, T>(message: &str, f: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = create_spinner(message);
    let result = f.await;
    spinner.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let spinner = create_spinner("listing instances...");
        assert!(!spinner.is_finished());
        spinner.finish_and_clear();
    }

    #[tokio::test]
    async fn test_with_spinner_returns_result() {
        let value = with_spinner("waiting...", async { 42 }).await;
        assert_eq!(value, 42);
    }
}
