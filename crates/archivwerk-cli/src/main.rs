// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archivwerk — PDF/A conversion through Ghostscript.
//
// Entry point. Initialises logging, parses the command line, and reports
// failures in plain language.

mod cli;

use std::process::ExitCode;

use archivwerk_core::human_errors::humanize_error;
use clap::Parser;

fn main() -> ExitCode {
    // Logs go to stderr; stdout may carry the converted PDF.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli::run(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "archivwerk failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}
