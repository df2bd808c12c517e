use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the stderr subscriber used by the binary.
///
/// `RUST_LOG` wins when set; otherwise only warnings from this crate are
/// shown, or debug events with `verbose`. Calling it again is a no-op.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default = if verbose {
            "sql_signature=debug"
        } else {
            "sql_signature=warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        // try_init fails only when another subscriber is already global
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
