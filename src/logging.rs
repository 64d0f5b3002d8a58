use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. Honours `RUST_LOG`, and `LOG_FORMAT=json`
/// switches to structured output.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = fmt().with_env_filter(env_filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };

    if let Err(e) = result {
        eprintln!("logging already initialised: {e}");
    }
}
