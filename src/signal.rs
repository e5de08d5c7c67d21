//! Ctrl+C handling.
//!
//! A scan of a large resources tree can take minutes. Ctrl+C sets a shared
//! flag instead of killing the process; the walker stops yielding, hashing
//! stops starting new files, and the partial result is still reported before
//! the process exits with code 130.
//!
//! ```rust,no_run
//! use mapclash::collisions::FinderConfig;
//! use mapclash::signal::install_handler;
//!
//! let handler = install_handler()?;
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! # Ok::<(), mapclash::signal::SignalError>(())
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) was called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request shutdown manually.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for the walker and hashing pool.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag so the handler can serve another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler, or reuse the installed one.
///
/// The first call registers with `ctrlc`; later calls (several `run_app`
/// invocations in one test binary) get the same handler back with its flag
/// cleared.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if another part of the process
/// already owns the Ctrl+C hook.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone();
    let flag = handler.get_flag();

    let registered = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(
            std::io::stderr(),
            "\nInterrupted. Finishing with the files hashed so far..."
        );
        let _ = std::io::stderr().flush();
        log::info!("Shutdown signal received");
    });

    match registered {
        Ok(()) => Ok(handler),
        // A racing caller in this process may have registered first; its
        // closure sets the same global flag.
        Err(ctrlc::Error::MultipleHandlers) => Ok(handler),
        Err(e) => Err(SignalError::InstallFailed(e)),
    }
}
