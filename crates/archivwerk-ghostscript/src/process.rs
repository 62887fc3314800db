// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process backend — runs the `gs` executable once per conversion.
//
// The argument vector is argv-shaped: slot 0 is the program-name slot, which
// the library API consumes as the program name. Here the executable takes
// that role, so only `args[1..]` are passed on the command line.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use archivwerk_core::error::{ArchivwerkError, Result};
use tracing::{debug, info, instrument, warn};

use crate::traits::*;

/// Backend that spawns the Ghostscript executable.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    executable: PathBuf,
}

impl ProcessBackend {
    pub fn new(executable: impl AsRef<Path>) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }
}

impl InterpreterBackend for ProcessBackend {
    fn name(&self) -> &str {
        "process"
    }

    fn new_instance(&self) -> Result<Box<dyn Interpreter>> {
        Ok(Box::new(ProcessInterpreter {
            executable: self.executable.clone(),
        }))
    }

    fn revision(&self) -> Result<Revision> {
        let output = Command::new(&self.executable)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| spawn_error(&self.executable, err))?;

        if !output.status.success() {
            return Err(ArchivwerkError::InterpreterUnavailable(format!(
                "{} --version exited with {}",
                self.executable.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let revision = Revision::pack(&version).ok_or_else(|| {
            ArchivwerkError::InterpreterUnavailable(format!(
                "unrecognised Ghostscript version string '{version}'"
            ))
        })?;

        Ok(Revision {
            product: "Ghostscript".into(),
            revision,
            revision_date: None,
        })
    }
}

/// One `gs` run. Exiting is a no-op: the process has already ended.
struct ProcessInterpreter {
    executable: PathBuf,
}

impl Interpreter for ProcessInterpreter {
    #[instrument(skip_all, fields(executable = %self.executable.display()))]
    fn initialize(&mut self, args: &[String]) -> Result<()> {
        let cli_args = args.get(1..).unwrap_or_default();
        debug!(?cli_args, "spawning Ghostscript");

        let output = Command::new(&self.executable)
            .args(cli_args)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| spawn_error(&self.executable, err))?;

        if !output.stdout.is_empty() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout), "Ghostscript output");
        }

        if output.status.success() {
            info!("Ghostscript run completed");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no diagnostic output")
            .trim()
            .to_string();

        warn!(status = %output.status, %message, "Ghostscript run failed");
        Err(ArchivwerkError::Interpreter {
            code: output.status.code().unwrap_or(-1),
            message,
        })
    }

    fn exit(&mut self) -> Result<()> {
        Ok(())
    }
}

fn spawn_error(executable: &Path, err: std::io::Error) -> ArchivwerkError {
    if err.kind() == ErrorKind::NotFound {
        ArchivwerkError::InterpreterUnavailable(format!(
            "Ghostscript executable '{}' not found",
            executable.display()
        ))
    } else {
        ArchivwerkError::Io(err)
    }
}
