// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Archivwerk.

use thiserror::Error;

/// Top-level error type for all Archivwerk operations.
#[derive(Debug, Error)]
pub enum ArchivwerkError {
    // -- Interpreter errors --
    #[error("Ghostscript interpreter failed (code {code}): {message}")]
    Interpreter { code: i32, message: String },

    #[error("Ghostscript interpreter not available: {0}")]
    InterpreterUnavailable(String),

    #[error("cannot retrieve file with key {key} from disk store")]
    MissingOutput { key: String },

    // -- Document errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    // -- Settings / configuration --
    #[error("invalid conversion setting: {0}")]
    InvalidSetting(String),

    #[error("configuration error: {0}")]
    Config(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ArchivwerkError>;
