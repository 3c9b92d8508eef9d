use tracing_subscriber::EnvFilter;

/// 覆盖日志级别的环境变量，语法同 `RUST_LOG`
pub const LOG_ENV: &str = "MCMP_LOG";

/// 初始化日志，输出到 stderr，避免混入 stdout 上的比较结果
///
/// 重复调用时保留第一次的设置。
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
