use tracing_subscriber::EnvFilter;

/// Tracing for the backend binary: JSON lines on stdout. The filter comes
/// from `BACKEND_LOG`, then `RUST_LOG`, then a default that keeps
/// request-level events while muting the sqlx statement echo and the
/// per-worker actix startup chatter.
pub fn init_tracing() {
    let directives = std::env::var("BACKEND_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info,sqlx=warn,actix_server=warn".to_string());

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .with_ansi(false)
        .init();
}
