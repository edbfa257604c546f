//! Log bootstrap for applications that do not install their own `tracing` subscriber.
//!
//! Native targets log through `tracing-subscriber`'s formatter, the browser logs to the devtools
//! console through `tracing-wasm`.

use tracing::{subscriber::SetGlobalDefaultError, Level};

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Install a global subscriber that keeps events up to `level`.
///
/// Fails if another global subscriber was installed first.
pub fn init(level: Level) -> Result<(), LoggerError> {
    #[cfg(target_arch = "wasm32")]
    let subscriber = {
        use tracing_subscriber::layer::SubscriberExt;

        let config = tracing_wasm::WASMLayerConfigBuilder::default()
            .set_max_level(level)
            .build();
        tracing_subscriber::registry().with(tracing_wasm::WASMLayer::new(config))
    };

    #[cfg(not(target_arch = "wasm32"))]
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::trace!("logger initialized at {level}");
    Ok(())
}
