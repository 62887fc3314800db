// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ghostscript argument vector for PDF/A output.
//
// The interpreter parses its arguments positionally, so both the spelling and
// the order of every flag below are fixed.

use std::path::Path;

use archivwerk_core::types::{AutoRotatePages, ConversionSettings, ProcessColorModel};

/// Build the full pdfwrite/PDF-A argument vector.
pub fn build_pdfa_args(
    settings: &ConversionSettings,
    output_path: &Path,
    input_path: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(16);

    args.push("-q".into());
    args.push("-f".into());
    args.push(format!(
        "-dPDFSETTINGS=/{}",
        settings.pdf_settings.preset_name()
    ));
    args.push("-dNOPAUSE".into());
    args.push("-dBATCH".into());
    args.push("-dPDFA".into());
    args.push("-dNOOUTERSAVE".into());
    args.push("-dSAFER".into());
    args.push("-sDEVICE=pdfwrite".into());
    args.push(process_color_model_flag(settings.process_color_model).into());
    args.push("-dUseCIEColor".into());
    args.push("-dPDFACompatibilityPolicy=1".into());
    if let Some(flag) = auto_rotate_pages_flag(settings.auto_rotate_pages) {
        args.push(flag.into());
    }
    args.push(format!(
        "-dCompatibilityLevel={}",
        settings.compatibility_level
    ));
    // Output goes to a file; redirecting to stdout is unreliable.
    args.push(format!("-sOutputFile={}", output_path.display()));
    args.push(input_path.display().to_string());

    args
}

// RGB is a string parameter, the others are name parameters.
fn process_color_model_flag(model: ProcessColorModel) -> &'static str {
    match model {
        ProcessColorModel::Cmyk => "-dProcessColorModel=/DeviceCMYK",
        ProcessColorModel::Gray => "-dProcessColorModel=/DeviceGray",
        ProcessColorModel::Rgb => "-sProcessColorModel=DeviceRGB",
    }
}

fn auto_rotate_pages_flag(policy: AutoRotatePages) -> Option<&'static str> {
    match policy {
        AutoRotatePages::None => Some("-dAutoRotatePages=/None"),
        AutoRotatePages::All => Some("-dAutoRotatePages=/All"),
        AutoRotatePages::PageByPage => Some("-dAutoRotatePages=/PageByPage"),
        AutoRotatePages::Off => None,
    }
}
