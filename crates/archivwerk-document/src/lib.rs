// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// archivwerk-document — Documents and the PDF/A converter.
//
// Provides input documents (PDF, PostScript), the keyed disk store for
// interpreter temp files, the Ghostscript argument builder, and the PDF/A
// converter that ties them together.

pub mod args;
pub mod converter;
pub mod disk_store;
pub mod document;
pub mod integrity;

#[cfg(test)]
mod test_support;

// Re-export the primary types so callers can use `archivwerk_document::PdfaConverter` etc.
pub use args::build_pdfa_args;
pub use converter::{Converter, PdfaConverter};
pub use disk_store::{DiskStore, TempFileGuard};
pub use document::{Document, PdfDocument, PostScriptDocument, load_document};
