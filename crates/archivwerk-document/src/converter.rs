// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF/A converter.
//
// Sequence per conversion: write the document to a disk store file, build the
// pdfwrite argument vector, run Ghostscript once under the interpreter lock,
// then copy the output file into the caller's sink. Both temporary files and
// the interpreter instance are released on every exit path.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use archivwerk_core::config::ConverterConfig;
use archivwerk_core::error::{ArchivwerkError, Result};
use archivwerk_core::types::{ConversionReport, ConversionSettings, DocumentType};
use archivwerk_ghostscript::InterpreterBackend;
use tracing::{debug, info, instrument};

use crate::args::build_pdfa_args;
use crate::disk_store::DiskStore;
use crate::document::Document;
use crate::integrity::hash_bytes;

/// Converts a document and writes the result to a sink.
pub trait Converter {
    fn convert(&self, document: &dyn Document, output: &mut dyn Write) -> Result<()>;
}

/// Ghostscript-backed PDF/A converter.
pub struct PdfaConverter {
    settings: ConversionSettings,
    backend: Arc<dyn InterpreterBackend>,
    disk_store: Arc<DiskStore>,
}

impl PdfaConverter {
    pub fn new(
        settings: ConversionSettings,
        backend: Arc<dyn InterpreterBackend>,
        disk_store: Arc<DiskStore>,
    ) -> Self {
        Self {
            settings,
            backend,
            disk_store,
        }
    }

    /// Build a converter from configuration: backend, temp dir and settings.
    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        let disk_store = match &config.temp_dir {
            Some(dir) => DiskStore::new(dir)?,
            None => DiskStore::in_temp_dir()?,
        };
        Ok(Self::new(
            config.settings.clone(),
            archivwerk_ghostscript::backend_for(config),
            Arc::new(disk_store),
        ))
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    pub fn backend(&self) -> &dyn InterpreterBackend {
        self.backend.as_ref()
    }

    pub fn disk_store(&self) -> &DiskStore {
        &self.disk_store
    }

    /// PDF/A output is never PDF/X.
    pub fn is_pdfx(&self) -> bool {
        false
    }

    /// Accepted for API parity with the plain PDF converter; PDF/X is not
    /// available on the PDF/A path.
    pub fn set_pdfx(&mut self, pdfx: bool) {
        if pdfx {
            debug!("PDF/X requested on the PDF/A converter; ignoring");
        }
    }

    pub fn supports(&self, document_type: DocumentType) -> bool {
        matches!(document_type, DocumentType::Pdf)
    }

    pub fn assert_document_supported(&self, document: &dyn Document) -> Result<()> {
        let document_type = document.document_type();
        if self.supports(document_type) {
            Ok(())
        } else {
            Err(ArchivwerkError::UnsupportedDocument(format!(
                "{} (the PDF/A converter accepts {} only)",
                document_type.mime_type(),
                DocumentType::Pdf.mime_type()
            )))
        }
    }

    /// Convert when a sink is given; with no sink there is nothing to do.
    pub fn convert_to(
        &self,
        document: &dyn Document,
        output: Option<&mut dyn Write>,
    ) -> Result<Option<ConversionReport>> {
        match output {
            Some(sink) => self.convert_with_report(document, sink).map(Some),
            None => {
                debug!("no output sink; skipping conversion");
                Ok(None)
            }
        }
    }

    /// Convert `document` to PDF/A, write it to `output`, and report on it.
    #[instrument(skip_all, fields(backend = self.backend.name(), input_bytes = document.size()))]
    pub fn convert_with_report(
        &self,
        document: &dyn Document,
        output: &mut dyn Write,
    ) -> Result<ConversionReport> {
        let started = Instant::now();
        self.assert_document_supported(document)?;

        // Declared before the input guard so it is released last.
        let output_file = self.disk_store.guard(self.disk_store.generate_unique_key());
        let input_file = self.disk_store.guard(self.disk_store.generate_unique_key());
        document.write_to(input_file.path())?;

        let args = build_pdfa_args(&self.settings, output_file.path(), input_file.path());
        debug!(?args, "Ghostscript arguments");

        archivwerk_ghostscript::run(self.backend.as_ref(), &args)?;

        let output_path = self
            .disk_store
            .get_file(output_file.key())
            .ok_or_else(|| ArchivwerkError::MissingOutput {
                key: output_file.key().to_string(),
            })?;

        let content = std::fs::read(&output_path)?;
        output.write_all(&content)?;
        output.flush()?;

        let report = ConversionReport {
            input_bytes: document.size(),
            output_bytes: content.len() as u64,
            output_sha256: hash_bytes(&content),
            page_count: document.page_count(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            pages = report.page_count,
            output_bytes = report.output_bytes,
            elapsed_ms = report.elapsed_ms,
            "PDF/A conversion complete"
        );
        Ok(report)
    }
}

impl Converter for PdfaConverter {
    fn convert(&self, document: &dyn Document, output: &mut dyn Write) -> Result<()> {
        self.convert_with_report(document, output).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use archivwerk_core::types::{PdfSettings, ProcessColorModel};

    use crate::document::{PdfDocument, PostScriptDocument};
    use crate::test_support::{Script, ScriptedBackend, sample_pdf};

    fn converter_with(
        script: Script,
        settings: ConversionSettings,
    ) -> (PdfaConverter, Arc<ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new(script));
        let store = Arc::new(DiskStore::in_temp_dir().unwrap());
        let converter = PdfaConverter::new(settings, backend.clone(), store);
        (converter, backend)
    }

    fn echo() -> Script {
        Script::EchoInput {
            prefix: b"PDFA:".to_vec(),
        }
    }

    fn assert_store_clean(converter: &PdfaConverter) {
        assert!(converter.disk_store().is_empty());
        let leftovers = std::fs::read_dir(converter.disk_store().root())
            .unwrap()
            .count();
        assert_eq!(leftovers, 0, "temporary files left behind");
    }

    #[test]
    fn converts_and_writes_output() {
        let (converter, backend) = converter_with(echo(), ConversionSettings::default());
        let document = PdfDocument::from_bytes(sample_pdf(2)).unwrap();

        let mut sink = Vec::new();
        let report = converter.convert_with_report(&document, &mut sink).unwrap();

        let mut expected = b"PDFA:".to_vec();
        expected.extend_from_slice(document.as_bytes());
        assert_eq!(sink, expected);
        assert_eq!(report.page_count, 2);
        assert_eq!(report.output_bytes, expected.len() as u64);
        assert_eq!(report.input_bytes, document.size());
        assert_eq!(report.output_sha256, hash_bytes(&expected));

        let invocations = backend.invocations();
        assert_eq!(invocations.len(), 1);
        assert!(invocations[0].exited);
        assert!(invocations[0].deleted);
        assert_eq!(invocations[0].input, document.as_bytes());
        assert_store_clean(&converter);
    }

    #[test]
    fn arguments_follow_settings_and_store_paths() {
        let settings = ConversionSettings::default()
            .with_pdf_settings(PdfSettings::Ebook)
            .with_process_color_model(ProcessColorModel::Gray);
        let (converter, backend) = converter_with(echo(), settings);
        let document = PdfDocument::from_bytes(sample_pdf(1)).unwrap();

        converter.convert(&document, &mut Vec::new()).unwrap();

        let args = &backend.invocations()[0].args;
        assert_eq!(args[0], "-q");
        assert_eq!(args[2], "-dPDFSETTINGS=/ebook");
        assert_eq!(args[9], "-dProcessColorModel=/DeviceGray");

        let root = converter.disk_store().root().display().to_string();
        let output_arg = &args[args.len() - 2];
        let input_arg = &args[args.len() - 1];
        assert!(output_arg.starts_with(&format!("-sOutputFile={root}")));
        assert!(input_arg.starts_with(&root));
        assert_ne!(output_arg.trim_start_matches("-sOutputFile="), input_arg);
    }

    #[test]
    fn interpreter_failure_is_surfaced_and_cleaned_up() {
        let (converter, backend) = converter_with(Script::Fail(-100), ConversionSettings::default());
        let document = PdfDocument::from_bytes(sample_pdf(1)).unwrap();

        let mut sink = Vec::new();
        let err = converter.convert(&document, &mut sink).unwrap_err();

        assert!(matches!(err, ArchivwerkError::Interpreter { code: -100, .. }));
        assert!(sink.is_empty());
        assert!(backend.invocations()[0].deleted);
        assert_store_clean(&converter);
    }

    #[test]
    fn missing_output_is_an_error() {
        let (converter, _backend) = converter_with(Script::NoOutput, ConversionSettings::default());
        let document = PdfDocument::from_bytes(sample_pdf(1)).unwrap();

        let err = converter.convert(&document, &mut Vec::new()).unwrap_err();
        match err {
            ArchivwerkError::MissingOutput { key } => assert!(!key.is_empty()),
            other => panic!("unexpected error variant: {other}"),
        }
        assert_store_clean(&converter);
    }

    #[test]
    fn postscript_is_rejected_before_any_work() {
        let (converter, backend) = converter_with(echo(), ConversionSettings::default());
        let document = PostScriptDocument::from_bytes(b"%!PS-Adobe-3.0\n".to_vec()).unwrap();

        let err = converter.convert(&document, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ArchivwerkError::UnsupportedDocument(_)));
        assert!(backend.invocations().is_empty());
        assert_store_clean(&converter);
    }

    #[test]
    fn no_sink_means_nothing_to_do() {
        let (converter, backend) = converter_with(echo(), ConversionSettings::default());
        let document = PdfDocument::from_bytes(sample_pdf(1)).unwrap();

        assert!(converter.convert_to(&document, None).unwrap().is_none());
        assert!(backend.invocations().is_empty());

        let mut sink = Vec::new();
        let report = converter.convert_to(&document, Some(&mut sink)).unwrap();
        assert!(report.is_some());
        assert!(!sink.is_empty());
    }

    #[test]
    fn pdfx_stays_disabled() {
        let (mut converter, _backend) = converter_with(echo(), ConversionSettings::default());
        converter.set_pdfx(true);
        assert!(!converter.is_pdfx());
    }

    #[test]
    fn concurrent_conversions_keep_their_own_files() {
        let (converter, backend) = converter_with(
            Script::EchoInput { prefix: Vec::new() },
            ConversionSettings::default(),
        );
        let converter = Arc::new(converter);

        let handles: Vec<_> = (1..=6)
            .map(|pages| {
                let converter = Arc::clone(&converter);
                std::thread::spawn(move || {
                    let document = PdfDocument::from_bytes(sample_pdf(pages)).unwrap();
                    let mut sink = Vec::new();
                    converter.convert(&document, &mut sink).unwrap();
                    assert_eq!(sink, document.as_bytes());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(backend.invocations().len(), 6);
        assert_store_clean(&converter);
    }

    #[test]
    fn from_config_uses_configured_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConverterConfig {
            temp_dir: Some(dir.path().join("work")),
            settings: ConversionSettings::default().with_pdf_settings(PdfSettings::Printer),
            ..Default::default()
        };
        let converter = PdfaConverter::from_config(&config).unwrap();
        assert!(converter.disk_store().root().ends_with("work"));
        assert_eq!(converter.settings().pdf_settings, PdfSettings::Printer);
    }
}
