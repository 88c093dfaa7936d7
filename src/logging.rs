use env_logger::{Builder, Env};

/// Install `env_logger` as the `log` backend.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`. Calling this more than once is
/// harmless, which lets every test call it.
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(cfg!(test))
        .format_timestamp(None)
        .try_init();
}
