// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::ArchivwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must fix something (install Ghostscript, pick another file).
    ActionRequired,
    /// Cannot be fixed by the user — bad input or an interpreter fault.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert an `ArchivwerkError` into a `HumanError`.
pub fn humanize_error(err: &ArchivwerkError) -> HumanError {
    match err {
        ArchivwerkError::Interpreter { code, message } => HumanError {
            message: "Ghostscript could not convert this document.".into(),
            suggestion: format!(
                "Check that the input is a valid PDF and that your Ghostscript build supports PDF/A. (code {code}: {message})"
            ),
            severity: Severity::Permanent,
        },

        ArchivwerkError::InterpreterUnavailable(detail) => HumanError {
            message: "Ghostscript is not available.".into(),
            suggestion: format!(
                "Install Ghostscript, or switch to the process backend with --backend process. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        ArchivwerkError::MissingOutput { .. } => HumanError {
            message: "Ghostscript finished but produced no output.".into(),
            suggestion: "Check the free space in the temporary directory, then try again.".into(),
            severity: Severity::Permanent,
        },

        ArchivwerkError::UnsupportedDocument(detail) => HumanError {
            message: "This type of document can't be converted to PDF/A.".into(),
            suggestion: format!("Only PDF input is supported. (File type: {detail})"),
            severity: Severity::ActionRequired,
        },

        ArchivwerkError::InvalidDocument(detail) => HumanError {
            message: "The input file doesn't look like a valid PDF.".into(),
            suggestion: format!("Open the file in a PDF viewer to check it isn't damaged. ({detail})"),
            severity: Severity::Permanent,
        },

        ArchivwerkError::InvalidSetting(detail) => HumanError {
            message: "One of the conversion options is not valid.".into(),
            suggestion: detail.clone(),
            severity: Severity::ActionRequired,
        },

        ArchivwerkError::Config(detail) => HumanError {
            message: "The configuration file couldn't be used.".into(),
            suggestion: detail.clone(),
            severity: Severity::ActionRequired,
        },

        ArchivwerkError::Io(io) => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!("Check the file paths and permissions. ({io})"),
            severity: Severity::ActionRequired,
        },

        ArchivwerkError::Serialization(detail) => HumanError {
            message: "The configuration file is not valid JSON.".into(),
            suggestion: detail.to_string(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_interpreter_is_action_required() {
        let err = ArchivwerkError::InterpreterUnavailable("libgs not linked".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("libgs not linked"));
    }

    #[test]
    fn interpreter_failure_keeps_code() {
        let err = ArchivwerkError::Interpreter {
            code: -100,
            message: "fatal".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("-100"));
    }
}
