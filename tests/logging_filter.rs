// tests/logging_filter.rs

use logflow::cli::LogLevel;
use logflow::logging::build_filter;
use tracing_subscriber::filter::LevelFilter;

#[test]
fn cli_level_overrides_the_environment() {
    let filter = build_filter(Some(LogLevel::Warn), Some("trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
}

#[test]
fn environment_takes_per_target_directives() {
    let filter = build_filter(None, Some("warn,logflow::exec=debug"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    assert!(filter.to_string().contains("logflow::exec=debug"));
}

#[test]
fn defaults_to_info() {
    assert_eq!(build_filter(None, None).max_level_hint(), Some(LevelFilter::INFO));
    assert_eq!(
        build_filter(None, Some("  ")).max_level_hint(),
        Some(LevelFilter::INFO)
    );
}
