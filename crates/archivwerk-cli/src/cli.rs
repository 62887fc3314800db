// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definition and command dispatch.

use std::io::Write;
use std::path::{Path, PathBuf};

use archivwerk_core::config::{BackendKind, ConverterConfig};
use archivwerk_core::error::Result;
use archivwerk_core::types::{AutoRotatePages, CompatibilityLevel, PdfSettings, ProcessColorModel};
use archivwerk_document::{PdfaConverter, build_pdfa_args, load_document};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "archivwerk")]
#[command(author, version, about = "Convert PDF documents to PDF/A with Ghostscript", long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Interpreter backend (overrides the configuration file)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// Ghostscript executable for the process backend
    #[arg(long = "gs", global = true)]
    pub ghostscript_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Library,
    Process,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Library => BackendKind::Library,
            BackendArg::Process => BackendKind::Process,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a PDF to PDF/A
    Convert {
        /// Input PDF
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Quality preset: default, screen, ebook, printer, prepress
        #[arg(long)]
        settings: Option<PdfSettings>,

        /// Process colour model: rgb, cmyk, gray
        #[arg(long)]
        color: Option<ProcessColorModel>,

        /// Page auto-rotation: none, all, page-by-page, off
        #[arg(long)]
        auto_rotate: Option<AutoRotatePages>,

        /// PDF compatibility level, e.g. 1.4
        #[arg(long)]
        compatibility_level: Option<CompatibilityLevel>,

        /// Print the Ghostscript arguments instead of converting
        #[arg(long)]
        print_args: bool,

        /// Print a JSON conversion report to stderr
        #[arg(long)]
        report: bool,
    },
    /// Show the Ghostscript product and revision
    Revision,
    /// Print the effective configuration as JSON
    Config,
}

/// Load the configuration file (if any) and apply global overrides.
pub fn resolve_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut config = match &cli.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    if let Some(path) = &cli.ghostscript_path {
        config.ghostscript_path = path.clone();
    }
    Ok(config)
}

/// Execute the parsed command, writing primary output to `stdout`.
pub fn run(cli: Cli, stdout: &mut dyn Write) -> Result<()> {
    let mut config = resolve_config(&cli)?;

    match cli.command {
        Command::Convert {
            input,
            output,
            settings,
            color,
            auto_rotate,
            compatibility_level,
            print_args,
            report,
        } => {
            if let Some(preset) = settings {
                config.settings.pdf_settings = preset;
            }
            if let Some(model) = color {
                config.settings.process_color_model = model;
            }
            if let Some(policy) = auto_rotate {
                config.settings.auto_rotate_pages = policy;
            }
            if let Some(level) = compatibility_level {
                config.settings.compatibility_level = level;
            }

            if print_args {
                // The interpreter is handed absolute paths; show the same.
                let output_path =
                    std::path::absolute(output.as_deref().unwrap_or(Path::new("output.pdf")))?;
                let input_path = std::path::absolute(&input)?;
                for arg in build_pdfa_args(&config.settings, &output_path, &input_path) {
                    writeln!(stdout, "{arg}")?;
                }
                return Ok(());
            }

            convert(&config, &input, output.as_deref(), report, stdout)
        }

        Command::Revision => {
            let backend = archivwerk_ghostscript::backend_for(&config);
            let revision = backend.revision()?;
            writeln!(stdout, "{revision} [{} backend]", backend.name())?;
            Ok(())
        }

        Command::Config => {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&config)?)?;
            Ok(())
        }
    }
}

fn convert(
    config: &ConverterConfig,
    input: &Path,
    output: Option<&Path>,
    report: bool,
    stdout: &mut dyn Write,
) -> Result<()> {
    let document = load_document(input)?;
    let converter = PdfaConverter::from_config(config)?;

    // Buffer first so a failed conversion never leaves a partial output file.
    let mut converted = Vec::new();
    let summary = converter.convert_with_report(document.as_ref(), &mut converted)?;

    match output {
        Some(path) => {
            std::fs::write(path, &converted)?;
            info!(output = %path.display(), "PDF/A written");
        }
        None => stdout.write_all(&converted)?,
    }

    if report {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
