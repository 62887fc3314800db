// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub backend for builds where the configured interpreter is not compiled in.
//
// Every call returns `InterpreterUnavailable`.

use archivwerk_core::error::{ArchivwerkError, Result};

use crate::traits::*;

/// Backend that refuses every request.
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl InterpreterBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn new_instance(&self) -> Result<Box<dyn Interpreter>> {
        tracing::warn!(reason = %self.reason, "interpreter requested from stub backend");
        Err(ArchivwerkError::InterpreterUnavailable(self.reason.clone()))
    }

    fn revision(&self) -> Result<Revision> {
        Err(ArchivwerkError::InterpreterUnavailable(self.reason.clone()))
    }
}
