// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archivwerk — Ghostscript interpreter backends.
//
// The interpreter is a non-reentrant, process-wide resource. Every invocation
// goes through `run`, which holds the global interpreter lock for the whole
// create / initialise / exit / delete cycle.

pub mod lock;
pub mod process;
pub mod stub;
pub mod traits;

#[cfg(feature = "libgs")]
pub mod library;

use std::sync::Arc;

use archivwerk_core::config::{BackendKind, ConverterConfig};
use archivwerk_core::error::Result;
use tracing::{debug, instrument};

pub use lock::interpreter_lock;
pub use process::ProcessBackend;
pub use stub::UnavailableBackend;
pub use traits::{Interpreter, InterpreterBackend, Revision};

#[cfg(feature = "libgs")]
pub use library::LibraryBackend;

/// Select the backend named by the configuration.
///
/// Asking for the library backend in a build without the `libgs` feature
/// yields an [`UnavailableBackend`] rather than failing at startup.
pub fn backend_for(config: &ConverterConfig) -> Arc<dyn InterpreterBackend> {
    match config.backend {
        BackendKind::Library => library_backend(),
        BackendKind::Process => Arc::new(ProcessBackend::new(&config.ghostscript_path)),
    }
}

#[cfg(feature = "libgs")]
fn library_backend() -> Arc<dyn InterpreterBackend> {
    Arc::new(LibraryBackend)
}

#[cfg(not(feature = "libgs"))]
fn library_backend() -> Arc<dyn InterpreterBackend> {
    Arc::new(UnavailableBackend::new(
        "built without the `libgs` feature; the Ghostscript library is not linked",
    ))
}

/// Run the interpreter once with `args` and tear it down.
///
/// The instance is created, initialised, exited and deleted while the global
/// interpreter lock is held. An instance is never reused across calls.
#[instrument(skip_all, fields(backend = backend.name(), argc = args.len()))]
pub fn run(backend: &dyn InterpreterBackend, args: &[String]) -> Result<()> {
    let _guard = interpreter_lock();

    let mut instance = backend.new_instance()?;
    debug!("interpreter instance created");

    // On error the instance is dropped here, which exits and deletes it.
    instance.initialize(args)?;
    instance.exit()?;

    drop(instance);
    debug!("interpreter instance deleted");
    Ok(())
}
