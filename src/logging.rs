use tracing_subscriber::EnvFilter;

/// stderr로 로그를 내보낸다. stdout은 Reporter 전용
///
/// `RUST_LOG`가 있으면 그 값을 따르고, 없으면 `--debug` 여부로 레벨을 정한다.
pub fn init_tracing(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "ssmcast=debug"
    } else {
        "ssmcast=warn"
    }
}

fn build_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "ssmcast=debug");
        assert_eq!(default_directive(false), "ssmcast=warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(false);
        init_tracing(true);
    }
}
