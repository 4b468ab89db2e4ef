// Judge language catalog and runtime settings
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CATALOG_PATH: &str = "config/languages.json";
pub const DEFAULT_JUDGE_URL: &str = "http://127.0.0.1:2358";
pub const DEFAULT_JUDGE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("unknown language '{0}' in language catalog")]
    UnknownLanguage(String),
    #[error("no judge configuration for language: {0}")]
    Missing(Language),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub name: String,
    pub version: String,
    /// Judge-specific identifier sent as `language_id`
    pub language_id: u32,
    pub source_file: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguagesJson {
    languages: Vec<LanguageConfig>,
}

/// Immutable language → judge id table, built once at startup
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    configs: HashMap<Language, LanguageConfig>,
}

impl LanguageCatalog {
    /// Load the catalog from a languages.json file
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let path = config_path.display().to_string();
        let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let languages_json: LanguagesJson =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })?;

        let mut configs = HashMap::new();
        for lang in languages_json.languages {
            let language = Language::from_str(&lang.name)
                .ok_or_else(|| ConfigError::UnknownLanguage(lang.name.clone()))?;
            configs.insert(language, lang);
        }

        Ok(Self { configs })
    }

    /// Load config/languages.json, or the built-in Judge0 ids if the file is absent
    pub fn load_default() -> Result<Self, ConfigError> {
        let default_path = Path::new(DEFAULT_CATALOG_PATH);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            tracing::debug!(path = DEFAULT_CATALOG_PATH, "Language catalog not found, using built-in ids");
            Ok(Self::builtin())
        }
    }

    pub fn builtin() -> Self {
        let entries = [
            (Language::TypeScript, "5.0", 74, "main.ts"),
            (Language::Python, "3.8", 71, "main.py"),
            (Language::Java, "13", 62, "Main.java"),
            (Language::Cpp, "17", 54, "main.cpp"),
        ];
        let configs = entries
            .into_iter()
            .map(|(language, version, language_id, source_file)| {
                (
                    language,
                    LanguageConfig {
                        name: language.to_string(),
                        version: version.to_string(),
                        language_id,
                        source_file: source_file.to_string(),
                    },
                )
            })
            .collect();
        Self { configs }
    }

    pub fn get_config(&self, language: Language) -> Result<&LanguageConfig, ConfigError> {
        self.configs
            .get(&language)
            .ok_or(ConfigError::Missing(language))
    }

    pub fn language_id(&self, language: Language) -> Result<u32, ConfigError> {
        Ok(self.get_config(language)?.language_id)
    }

    pub fn list_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.configs.keys().copied().collect();
        languages.sort_by_key(|l| l.to_string());
        languages
    }
}

/// Judge endpoint settings read from the environment
#[derive(Debug, Clone)]
pub struct JudgeSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl JudgeSettings {
    pub fn from_env() -> Self {
        let base_url = std::env::var("JUDGE_URL").unwrap_or_else(|_| DEFAULT_JUDGE_URL.to_string());
        let timeout_ms = std::env::var("JUDGE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_JUDGE_TIMEOUT_MS);
        Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_ids() {
        let catalog = LanguageCatalog::builtin();
        assert_eq!(catalog.language_id(Language::Python).unwrap(), 71);
        assert_eq!(catalog.language_id(Language::Cpp).unwrap(), 54);
        assert_eq!(catalog.list_languages().len(), 4);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"languages":[{{"name":"python","version":"3.11","language_id":92,"source_file":"main.py"}}]}}"#
        )
        .unwrap();

        let catalog = LanguageCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.language_id(Language::Python).unwrap(), 92);
        assert!(matches!(
            catalog.language_id(Language::Java),
            Err(ConfigError::Missing(Language::Java))
        ));
    }

    #[test]
    fn test_unknown_language_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"languages":[{{"name":"cobol","version":"1","language_id":1,"source_file":"a.cob"}}]}}"#
        )
        .unwrap();

        let err = LanguageCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLanguage(name) if name == "cobol"));
    }
}
