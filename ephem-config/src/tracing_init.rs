use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber driven by `RUST_LOG` (falling
/// back to `info` for this crate family and `warn` for everything
/// else). Call once at process startup, before constructing any
/// adapters — logging setup is ambient infrastructure, not something
/// the core or its adapters initialize themselves.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,ephem_core=info,ephem_blob=info,ephem_index=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
