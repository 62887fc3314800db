// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures for unit tests: tiny PDFs and a scripted interpreter.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use archivwerk_core::error::{ArchivwerkError, Result};
use archivwerk_ghostscript::{Interpreter, InterpreterBackend, Revision};
use lopdf::{Object, dictionary};

/// Build a minimal, parseable PDF with `pages` empty A4 pages.
pub fn sample_pdf(pages: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("serialise sample PDF");
    out
}

/// What the scripted interpreter does when initialised.
#[derive(Debug, Clone)]
pub enum Script {
    /// Write `prefix` followed by the input file's bytes to the output file.
    EchoInput { prefix: Vec<u8> },
    /// Succeed without producing any output file.
    NoOutput,
    /// Fail with the given gsapi error code.
    Fail(i32),
}

/// One observed interpreter run.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub args: Vec<String>,
    /// Input file content at the time of the call.
    pub input: Vec<u8>,
    pub exited: bool,
    pub deleted: bool,
}

/// Backend whose instances follow a [`Script`] and record every call.
pub struct ScriptedBackend {
    script: Script,
    pub invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

impl InterpreterBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn new_instance(&self) -> Result<Box<dyn Interpreter>> {
        Ok(Box::new(ScriptedInterpreter {
            script: self.script.clone(),
            invocations: Arc::clone(&self.invocations),
            slot: None,
        }))
    }

    fn revision(&self) -> Result<Revision> {
        Ok(Revision {
            product: "Scripted Ghostscript".into(),
            revision: 10021,
            revision_date: Some(20231101),
        })
    }
}

struct ScriptedInterpreter {
    script: Script,
    invocations: Arc<Mutex<Vec<Invocation>>>,
    slot: Option<usize>,
}

impl Interpreter for ScriptedInterpreter {
    fn initialize(&mut self, args: &[String]) -> Result<()> {
        let input_path = PathBuf::from(args.last().cloned().unwrap_or_default());
        let output_path = args
            .iter()
            .find_map(|arg| arg.strip_prefix("-sOutputFile="))
            .map(PathBuf::from);
        let input = std::fs::read(&input_path).unwrap_or_default();

        {
            let mut invocations = self.invocations.lock().unwrap();
            self.slot = Some(invocations.len());
            invocations.push(Invocation {
                args: args.to_vec(),
                input: input.clone(),
                exited: false,
                deleted: false,
            });
        }

        match &self.script {
            Script::EchoInput { prefix } => {
                let output_path = output_path.ok_or_else(|| ArchivwerkError::Interpreter {
                    code: -100,
                    message: "no -sOutputFile".into(),
                })?;
                let mut content = prefix.clone();
                content.extend_from_slice(&input);
                std::fs::write(output_path, content)?;
                Ok(())
            }
            Script::NoOutput => Ok(()),
            Script::Fail(code) => Err(ArchivwerkError::Interpreter {
                code: *code,
                message: "scripted failure".into(),
            }),
        }
    }

    fn exit(&mut self) -> Result<()> {
        if let Some(slot) = self.slot {
            self.invocations.lock().unwrap()[slot].exited = true;
        }
        Ok(())
    }
}

impl Drop for ScriptedInterpreter {
    fn drop(&mut self) {
        if let Some(slot) = self.slot {
            self.invocations.lock().unwrap()[slot].deleted = true;
        }
    }
}
