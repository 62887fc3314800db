// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend-agnostic interpreter abstractions.

use std::fmt;

use archivwerk_core::error::Result;

/// One live interpreter instance.
///
/// Dropping the instance deletes it. Implementations must also exit the
/// interpreter on drop when `initialize` was called but `exit` was not.
pub trait Interpreter {
    /// Initialise the interpreter with an argv-style argument vector and run
    /// it. Slot 0 is the program-name slot.
    fn initialize(&mut self, args: &[String]) -> Result<()>;

    /// Exit the interpreter after a run.
    fn exit(&mut self) -> Result<()>;
}

/// Factory for interpreter instances.
pub trait InterpreterBackend: Send + Sync {
    /// Short backend name for logs (e.g. "library", "process").
    fn name(&self) -> &str;

    /// Create a fresh interpreter instance.
    fn new_instance(&self) -> Result<Box<dyn Interpreter>>;

    /// Report the interpreter's product name and revision.
    fn revision(&self) -> Result<Revision>;
}

/// Interpreter product and revision as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub product: String,
    /// Packed revision number, e.g. 10021 for 10.02.1. Engines older than
    /// 9.50 pack as `major * 100 + minor` (927 for 9.27).
    pub revision: i64,
    /// Release date as YYYYMMDD, when the backend can report it.
    pub revision_date: Option<i64>,
}

impl Revision {
    /// Pack a dotted version string ("10.02.1") into a revision number.
    pub fn pack(version: &str) -> Option<i64> {
        let mut parts = version.trim().split('.');
        let major: i64 = parts.next()?.parse().ok()?;
        let minor: i64 = parts.next().unwrap_or("0").parse().ok()?;
        let patch: i64 = parts.next().unwrap_or("0").parse().ok()?;
        Some(major * 1000 + minor * 10 + patch)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.revision < 1000 {
            let major = self.revision / 100;
            let minor = self.revision % 100;
            write!(f, "{} {}.{:02}", self.product, major, minor)?;
        } else {
            let major = self.revision / 1000;
            let minor = (self.revision % 1000) / 10;
            let patch = self.revision % 10;
            write!(f, "{} {}.{:02}.{}", self.product, major, minor, patch)?;
        }
        if let Some(date) = self.revision_date {
            write!(f, " ({date})")?;
        }
        Ok(())
    }
}
