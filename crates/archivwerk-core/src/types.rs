// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for PDF/A conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ArchivwerkError;

/// Unique key for a file held in the disk store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiskStoreKey(pub Uuid);

impl DiskStoreKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DiskStoreKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DiskStoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input document types the converter can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    /// Recognised so that it can be rejected; the PDF/A path accepts PDF only.
    PostScript,
}

impl DocumentType {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::PostScript => "application/postscript",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "ps" | "eps" => Some(Self::PostScript),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Quality preset passed to the pdfwrite device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PdfSettings {
    #[default]
    Default,
    Screen,
    Ebook,
    Printer,
    Prepress,
}

impl PdfSettings {
    /// The Ghostscript distiller parameter name, without the leading slash.
    pub fn preset_name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Screen => "screen",
            Self::Ebook => "ebook",
            Self::Printer => "printer",
            Self::Prepress => "prepress",
        }
    }
}

impl FromStr for PdfSettings {
    type Err = ArchivwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches('/') {
            "default" => Ok(Self::Default),
            "screen" => Ok(Self::Screen),
            "ebook" => Ok(Self::Ebook),
            "printer" => Ok(Self::Printer),
            "prepress" => Ok(Self::Prepress),
            other => Err(ArchivwerkError::InvalidSetting(format!(
                "unknown PDF settings preset '{other}'"
            ))),
        }
    }
}

/// Process colour model of the produced PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessColorModel {
    #[default]
    Rgb,
    Cmyk,
    Gray,
}

impl FromStr for ProcessColorModel {
    type Err = ArchivwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" | "devicergb" => Ok(Self::Rgb),
            "cmyk" | "devicecmyk" => Ok(Self::Cmyk),
            "gray" | "grey" | "devicegray" => Ok(Self::Gray),
            other => Err(ArchivwerkError::InvalidSetting(format!(
                "unknown process colour model '{other}'"
            ))),
        }
    }
}

/// Page auto-rotation policy. `Off` leaves the interpreter default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoRotatePages {
    None,
    All,
    PageByPage,
    #[default]
    Off,
}

impl FromStr for AutoRotatePages {
    type Err = ArchivwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            "page-by-page" | "pagebypage" => Ok(Self::PageByPage),
            "off" => Ok(Self::Off),
            other => Err(ArchivwerkError::InvalidSetting(format!(
                "unknown auto-rotate policy '{other}'"
            ))),
        }
    }
}

/// PDF compatibility level, always of the form `major.minor` (e.g. "1.4").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompatibilityLevel(String);

impl CompatibilityLevel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CompatibilityLevel {
    fn default() -> Self {
        Self("1.4".into())
    }
}

impl FromStr for CompatibilityLevel {
    type Err = ArchivwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s
            .split_once('.')
            .map(|(major, minor)| {
                !major.is_empty()
                    && !minor.is_empty()
                    && major.bytes().all(|b| b.is_ascii_digit())
                    && minor.bytes().all(|b| b.is_ascii_digit())
            })
            .unwrap_or(false);

        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(ArchivwerkError::InvalidSetting(format!(
                "compatibility level must look like '1.4', got '{s}'"
            )))
        }
    }
}

impl TryFrom<String> for CompatibilityLevel {
    type Error = ArchivwerkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CompatibilityLevel> for String {
    fn from(level: CompatibilityLevel) -> Self {
        level.0
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable settings for one converter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub pdf_settings: PdfSettings,
    pub process_color_model: ProcessColorModel,
    pub auto_rotate_pages: AutoRotatePages,
    pub compatibility_level: CompatibilityLevel,
}

impl ConversionSettings {
    pub fn with_pdf_settings(mut self, pdf_settings: PdfSettings) -> Self {
        self.pdf_settings = pdf_settings;
        self
    }

    pub fn with_process_color_model(mut self, model: ProcessColorModel) -> Self {
        self.process_color_model = model;
        self
    }

    pub fn with_auto_rotate_pages(mut self, policy: AutoRotatePages) -> Self {
        self.auto_rotate_pages = policy;
        self
    }

    pub fn with_compatibility_level(mut self, level: CompatibilityLevel) -> Self {
        self.compatibility_level = level;
        self
    }
}

/// Summary of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Size of the input document in bytes.
    pub input_bytes: u64,
    /// Size of the PDF/A output in bytes.
    pub output_bytes: u64,
    /// Lowercase hex SHA-256 of the output.
    pub output_sha256: String,
    /// Page count of the input document.
    pub page_count: usize,
    /// Wall-clock time spent in the conversion, in milliseconds.
    pub elapsed_ms: u64,
}
