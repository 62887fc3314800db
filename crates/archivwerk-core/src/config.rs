// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ArchivwerkError, Result};
use crate::types::ConversionSettings;

/// How the Ghostscript interpreter is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// In-process through the `gsapi_*` shared library API.
    Library,
    /// The `gs` executable, one process per conversion.
    Process,
}

/// The library when it is linked into this build, the executable otherwise.
impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(feature = "libgs") {
            Self::Library
        } else {
            Self::Process
        }
    }
}

/// Persistent converter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Which interpreter backend to use.
    pub backend: BackendKind,
    /// Path (or PATH-resolvable name) of the Ghostscript executable.
    pub ghostscript_path: PathBuf,
    /// Directory for temporary input/output files (system temp when unset).
    pub temp_dir: Option<PathBuf>,
    /// Default conversion settings.
    pub settings: ConversionSettings,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            ghostscript_path: PathBuf::from("gs"),
            temp_dir: None,
            settings: ConversionSettings::default(),
        }
    }
}

impl ConverterConfig {
    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ArchivwerkError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PdfSettings, ProcessColorModel};

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"backend":"process","settings":{"pdf_settings":"printer"}}"#)
                .unwrap();
        assert_eq!(config.backend, BackendKind::Process);
        assert_eq!(config.ghostscript_path, PathBuf::from("gs"));
        assert_eq!(config.settings.pdf_settings, PdfSettings::Printer);
        assert_eq!(config.settings.process_color_model, ProcessColorModel::Rgb);
    }

    #[test]
    fn default_backend_follows_build() {
        let expected = if cfg!(feature = "libgs") {
            BackendKind::Library
        } else {
            BackendKind::Process
        };
        assert_eq!(ConverterConfig::default().backend, expected);

        // A file without a backend picks the build default too.
        let config: ConverterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.backend, expected);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archivwerk.json");

        let config = ConverterConfig {
            temp_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(ConverterConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ConverterConfig::load("/nonexistent/archivwerk.json").unwrap_err();
        assert!(matches!(err, ArchivwerkError::Config(_)));
    }
}
