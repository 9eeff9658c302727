/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Filter configuration.
//!
//! Settings come from a TOML file. Every field has a default, so an empty
//! file (or no file at all) yields a working configuration that looks for
//! notes in the current directory.

use crate::error::{CiteError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "CITECRAFT_CONFIG";

/// Environment variable overriding [`CiteConfig::notes_dir`].
pub const NOTES_DIR_ENV: &str = "CITECRAFT_NOTES_DIR";

const PROJECT_CONFIG_PATHS: [&str; 2] = ["citecraft.toml", ".citecraft.toml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CiteConfig {
    /// Directory holding `{note}.md` files.
    #[serde(default = "default_notes_dir")]
    pub notes_dir: PathBuf,

    /// Number of letters in a citation identifier.
    #[serde(default = "default_identifier_length")]
    pub identifier_length: usize,

    /// Prefix placed before citations that carry no quoted label.
    #[serde(default = "default_compare_prefix")]
    pub compare_prefix: String,

    /// Citation text used when a note header lacks the required fields.
    #[serde(default = "default_incomplete_citation")]
    pub incomplete_citation: String,

    /// Labels meaning "no label", e.g. `[[note#^a|^]]`.
    #[serde(default = "default_unlabeled_markers")]
    pub unlabeled_markers: Vec<String>,

    /// Document metadata field receiving the generated preamble.
    #[serde(default = "default_preamble_field")]
    pub preamble_field: String,

    /// Wrap label content in typographic double quotes.
    #[serde(default)]
    pub quote_labels: bool,
}

impl Default for CiteConfig {
    fn default() -> Self {
        Self {
            notes_dir: default_notes_dir(),
            identifier_length: default_identifier_length(),
            compare_prefix: default_compare_prefix(),
            incomplete_citation: default_incomplete_citation(),
            unlabeled_markers: default_unlabeled_markers(),
            preamble_field: default_preamble_field(),
            quote_labels: false,
        }
    }
}

fn default_notes_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_identifier_length() -> usize {
    15
}

fn default_compare_prefix() -> String {
    "vgl.".to_string()
}

fn default_incomplete_citation() -> String {
    "incomplete citation information".to_string()
}

fn default_unlabeled_markers() -> Vec<String> {
    vec!["^".to_string(), "°".to_string()]
}

fn default_preamble_field() -> String {
    "citations-in-preamble".to_string()
}

impl CiteConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Look for a configuration file in the working directory.
    pub fn load_from_project() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Look for `citecraft.toml`, then `.citecraft.toml`, in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        for path in PROJECT_CONFIG_PATHS.iter().map(|name| dir.join(name)) {
            if path.exists() {
                debug!(path = %path.display(), "loading project configuration");
                return Ok(Some(Self::load(&path)?));
            }
        }

        Ok(None)
    }

    /// Resolve the configuration for a filter run.
    ///
    /// `CITECRAFT_CONFIG` wins over project files; `CITECRAFT_NOTES_DIR`
    /// is applied last.
    pub fn load_from_env() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let notes_dir = std::env::var_os(NOTES_DIR_ENV).map(PathBuf::from);
        Self::resolve(explicit.as_deref(), notes_dir, Path::new("."))
    }

    /// Apply the lookup order: explicit file, project file in `project_dir`,
    /// defaults. A notes directory override replaces whatever was loaded.
    pub fn resolve(
        explicit: Option<&Path>,
        notes_dir: Option<PathBuf>,
        project_dir: &Path,
    ) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::load_from_dir(project_dir)?.unwrap_or_default(),
        };

        if let Some(dir) = notes_dir {
            config.notes_dir = dir;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.identifier_length == 0 {
            return Err(CiteError::Config(
                "identifier-length must be at least 1".to_string(),
            ));
        }
        if self.preamble_field.trim().is_empty() {
            return Err(CiteError::Config(
                "preamble-field must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a raw label means "use the unlabeled form".
    pub fn is_unlabeled_marker(&self, label: &str) -> bool {
        let label = label.trim();
        label.is_empty() || self.unlabeled_markers.iter().any(|m| m == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CiteConfig::from_toml("").unwrap();
        assert_eq!(config, CiteConfig::default());
        assert_eq!(config.identifier_length, 15);
        assert_eq!(config.compare_prefix, "vgl.");
    }

    #[test]
    fn fields_are_kebab_case() {
        let config = CiteConfig::from_toml(
            r#"
notes-dir = "/srv/notes"
identifier-length = 10
compare-prefix = "cf."
quote-labels = true
"#,
        )
        .unwrap();
        assert_eq!(config.notes_dir, PathBuf::from("/srv/notes"));
        assert_eq!(config.identifier_length, 10);
        assert_eq!(config.compare_prefix, "cf.");
        assert!(config.quote_labels);
        assert_eq!(config.preamble_field, "citations-in-preamble");
    }

    #[test]
    fn zero_identifier_length_is_rejected() {
        let err = CiteConfig::from_toml("identifier-length = 0").unwrap_err();
        assert!(matches!(err, CiteError::Config(_)));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = CiteConfig::from_toml("notes-dir = [").unwrap_err();
        assert!(matches!(err, CiteError::Config(_)));
    }

    #[test]
    fn unlabeled_markers() {
        let config = CiteConfig::default();
        assert!(config.is_unlabeled_marker("^"));
        assert!(config.is_unlabeled_marker(" ° "));
        assert!(config.is_unlabeled_marker(""));
        assert!(!config.is_unlabeled_marker("as stated"));
    }

    #[test]
    fn project_file_precedence() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CiteConfig::load_from_dir(dir.path()).unwrap(), None);

        std::fs::write(dir.path().join(".citecraft.toml"), "compare-prefix = \"hidden\"").unwrap();
        let hidden = CiteConfig::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(hidden.compare_prefix, "hidden");

        std::fs::write(dir.path().join("citecraft.toml"), "compare-prefix = \"cf.\"").unwrap();
        let found = CiteConfig::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(found.compare_prefix, "cf.");
    }

    #[test]
    fn explicit_file_wins_over_project_file() {
        let project = tempfile::tempdir().unwrap();
        std::fs::write(project.path().join("citecraft.toml"), "compare-prefix = \"cf.\"").unwrap();
        let other = tempfile::tempdir().unwrap();
        let explicit = other.path().join("custom.toml");
        std::fs::write(&explicit, "compare-prefix = \"see\"\nnotes-dir = \"vault\"").unwrap();

        let config = CiteConfig::resolve(Some(&explicit), None, project.path()).unwrap();
        assert_eq!(config.compare_prefix, "see");
        assert_eq!(config.notes_dir, PathBuf::from("vault"));

        let config = CiteConfig::resolve(None, None, project.path()).unwrap();
        assert_eq!(config.compare_prefix, "cf.");
    }

    #[test]
    fn notes_dir_override_applies_last() {
        let project = tempfile::tempdir().unwrap();
        std::fs::write(project.path().join("citecraft.toml"), "notes-dir = \"vault\"").unwrap();

        let config =
            CiteConfig::resolve(None, Some(PathBuf::from("/srv/notes")), project.path()).unwrap();
        assert_eq!(config.notes_dir, PathBuf::from("/srv/notes"));
    }

    #[test]
    fn no_files_yield_defaults() {
        let empty = tempfile::tempdir().unwrap();
        let config = CiteConfig::resolve(None, None, empty.path()).unwrap();
        assert_eq!(config, CiteConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let empty = tempfile::tempdir().unwrap();
        let missing = empty.path().join("absent.toml");
        assert!(matches!(
            CiteConfig::resolve(Some(&missing), None, empty.path()),
            Err(CiteError::Io(_))
        ));
    }
}
