// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input documents — opaque payloads handed to the interpreter, validated on
// load so that obviously broken input never reaches Ghostscript.

use std::path::Path;

use archivwerk_core::error::{ArchivwerkError, Result};
use archivwerk_core::types::DocumentType;
use tracing::{debug, instrument, warn};

/// A document that can be serialised to disk for conversion.
pub trait Document {
    fn document_type(&self) -> DocumentType;

    /// Raw document bytes.
    fn as_bytes(&self) -> &[u8];

    /// Number of pages, as far as the document format lets us tell.
    fn page_count(&self) -> usize;

    fn size(&self) -> u64 {
        self.as_bytes().len() as u64
    }

    /// Serialise the document to `path`, replacing any existing file.
    fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.as_bytes())?;
        Ok(())
    }
}

/// Load a document from disk, choosing the type by extension and falling
/// back to content sniffing.
pub fn load_document(path: impl AsRef<Path>) -> Result<Box<dyn Document>> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentType::from_extension);

    let document_type = match by_extension {
        Some(kind) => kind,
        None if data.starts_with(b"%PDF-") => DocumentType::Pdf,
        None if data.starts_with(b"%!") => DocumentType::PostScript,
        None => {
            return Err(ArchivwerkError::UnsupportedDocument(format!(
                "cannot determine the type of {}",
                path.display()
            )));
        }
    };

    match document_type {
        DocumentType::Pdf => Ok(Box::new(PdfDocument::from_bytes(data)?)),
        DocumentType::PostScript => Ok(Box::new(PostScriptDocument::from_bytes(data)?)),
    }
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------

/// A PDF payload, page-counted with `lopdf` where it parses.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    content: Vec<u8>,
    page_count: usize,
}

impl PdfDocument {
    /// Wrap raw PDF bytes.
    ///
    /// Input without a `%PDF-` header is rejected. Input with the header that
    /// `lopdf` cannot parse (typically a damaged cross-reference table) is
    /// accepted with a page count of zero, since Ghostscript rebuilds the
    /// xref itself when it opens the file.
    #[instrument(skip_all, fields(bytes_len = content.len()))]
    pub fn from_bytes(content: Vec<u8>) -> Result<Self> {
        let page_count = match lopdf::Document::load_mem(&content) {
            Ok(parsed) => parsed.get_pages().len(),
            Err(err) if content.starts_with(b"%PDF-") => {
                warn!(error = %err, "PDF structure is damaged, leaving repair to the interpreter");
                0
            }
            Err(err) => {
                return Err(ArchivwerkError::InvalidDocument(format!(
                    "failed to parse PDF: {}",
                    err
                )));
            }
        };

        debug!(page_count, "PDF loaded from bytes");
        Ok(Self {
            content,
            page_count,
        })
    }
}

impl Document for PdfDocument {
    fn document_type(&self) -> DocumentType {
        DocumentType::Pdf
    }

    fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    fn page_count(&self) -> usize {
        self.page_count
    }
}

// ---------------------------------------------------------------------------
// PostScript
// ---------------------------------------------------------------------------

/// A PostScript payload, identified by its `%!` header.
#[derive(Debug, Clone)]
pub struct PostScriptDocument {
    content: Vec<u8>,
}

impl PostScriptDocument {
    pub fn from_bytes(content: Vec<u8>) -> Result<Self> {
        if !content.starts_with(b"%!") {
            return Err(ArchivwerkError::InvalidDocument(
                "PostScript must start with '%!'".into(),
            ));
        }
        Ok(Self { content })
    }
}

impl Document for PostScriptDocument {
    fn document_type(&self) -> DocumentType {
        DocumentType::PostScript
    }

    fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Counts DSC `%%Page:` comments; zero for non-conforming files.
    fn page_count(&self) -> usize {
        self.content
            .split(|&b| b == b'\n' || b == b'\r')
            .filter(|line| line.starts_with(b"%%Page:"))
            .count()
    }
}
