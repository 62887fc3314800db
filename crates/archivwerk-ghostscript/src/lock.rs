// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide interpreter lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

static INTERPRETER_LOCK: Mutex<()> = Mutex::new(());

/// Acquire the global interpreter lock.
///
/// The guarded value carries no state, so a lock poisoned by a panicking
/// holder is recovered rather than propagated.
pub fn interpreter_lock() -> MutexGuard<'static, ()> {
    INTERPRETER_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
