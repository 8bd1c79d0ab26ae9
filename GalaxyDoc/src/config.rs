//! Generator configuration (`galaxydoc.toml`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::{DEFAULT_LOCALE, ModelOptions};
use crate::error::Result;

/// File name looked up in the template directory
pub const CONFIG_FILE_NAME: &str = "galaxydoc.toml";

fn default_header_template() -> String {
    "DocumentHeader.tmpl".to_string()
}

fn default_info_template() -> String {
    "DocumentInfo.tmpl".to_string()
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The full configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub templates: TemplateSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
}

/// Template file names, relative to the template directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSettings {
    #[serde(default = "default_header_template")]
    pub header: String,
    #[serde(default = "default_info_template")]
    pub info: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            header: default_header_template(),
            info: default_info_template(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Reject unrecognized template fields
    #[serde(default = "default_true")]
    pub strict: bool,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Directory relative bundle locators resolve against. A relative
    /// `base_dir` read by [`GeneratorConfig::load`] is taken relative to the
    /// directory holding the config file.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            strict: true,
            default_locale: default_locale(),
            base_dir: default_base_dir(),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration file
    ///
    /// A relative `generation.base_dir` (including the default `.`) is
    /// resolved against the file's parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read or [`Error::Config`]
    /// if it is not valid TOML for this schema.
    ///
    /// [`Error::Io`]: crate::Error::Io
    /// [`Error::Config`]: crate::Error::Config
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)?;
        if config.generation.base_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.generation.base_dir = parent.join(&config.generation.base_dir);
            }
        }
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `galaxydoc.toml` from `template_dir`, or the defaults if there is none
    ///
    /// # Errors
    ///
    /// See [`GeneratorConfig::load`].
    pub fn discover<P: AsRef<Path>>(template_dir: P) -> Result<Self> {
        let path = template_dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            strict: self.generation.strict,
            default_locale: self.generation.default_locale.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_default() {
        let config: GeneratorConfig = toml::from_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.templates.header, "DocumentHeader.tmpl");
        assert!(config.generation.strict);
    }

    #[test]
    fn test_partial_sections() {
        let config: GeneratorConfig = toml::from_str(
            r#"
[templates]
info = "Info.tmpl"

[generation]
strict = false
"#,
        )
        .unwrap();

        assert_eq!(config.templates.header, "DocumentHeader.tmpl");
        assert_eq!(config.templates.info, "Info.tmpl");
        assert!(!config.generation.strict);
        assert_eq!(config.generation.default_locale, "enUS");
        assert_eq!(config.generation.base_dir, PathBuf::from("."));
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        assert_eq!(GeneratorConfig::discover(dir.path()).unwrap(), GeneratorConfig::default());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[generation]\ndefault_locale = \"koKR\"\n",
        )
        .unwrap();
        let config = GeneratorConfig::discover(dir.path()).unwrap();
        assert_eq!(config.model_options().default_locale, "koKR");
    }

    #[test]
    fn test_base_dir_relative_to_config_file() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir(&templates).unwrap();
        let path = templates.join(CONFIG_FILE_NAME);

        std::fs::write(&path, "[generation]\nbase_dir = \"../game\"\n").unwrap();
        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.generation.base_dir, templates.join("../game"));

        std::fs::write(&path, "").unwrap();
        let config = GeneratorConfig::discover(&templates).unwrap();
        assert_eq!(config.generation.base_dir, templates.join("."));

        let absolute = dir.path().join("abs");
        std::fs::write(&path, format!("[generation]\nbase_dir = {:?}\n", absolute.display().to_string())).unwrap();
        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.generation.base_dir, absolute);
    }

    #[test]
    fn test_bad_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[generation]\nstrict = \"yes\"\n").unwrap();
        assert!(matches!(GeneratorConfig::load(&path), Err(Error::Config(_))));
    }
}
