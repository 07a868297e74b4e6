use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG: &str = ".wordlint.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tokens shorter than this are never spell-checked.
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Extra wordlists applied to every file, on top of the per-language ones.
    #[serde(default)]
    pub wordlists: Vec<PathBuf>,

    /// Languages checked against their own wordlists. When empty, a catch-all
    /// "english" language is used.
    #[serde(default, rename = "language")]
    pub languages: Vec<LanguageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub name: String,

    /// Single-character shorthand for the language; defaults to its initial.
    #[serde(default)]
    pub key: Option<char>,

    /// Gitignore-style include rules. Empty means the language covers all files.
    #[serde(default)]
    pub includes: Vec<String>,

    /// Interpreter names matched against `#!` lines of extensionless files.
    #[serde(default)]
    pub hashbangs: Vec<String>,

    /// Command whose stdout seeds the generated project wordlist.
    #[serde(default)]
    pub generate: Option<String>,

    /// Overrides the base wordlist path for this language.
    #[serde(default)]
    pub base_wordlist: Option<PathBuf>,
}

fn default_min_word_length() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_word_length: default_min_word_length(),
            wordlists: Vec::new(),
            languages: vec![LanguageConfig {
                name: "english".to_string(),
                ..Default::default()
            }],
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults.
    pub fn load(
        config_path: Option<&Path>,
        min_word_length: Option<usize>,
        extra_wordlists: &[PathBuf],
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        let local_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG));
        if local_path.exists() {
            config = config.merge(Self::from_file(&local_path)?);
        } else if config_path.is_some() {
            anyhow::bail!("config file not found: {}", local_path.display());
        }

        if let Some(min) = min_word_length {
            config.min_word_length = min;
        }
        config.wordlists.extend_from_slice(extra_wordlists);

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        if other.min_word_length != default_min_word_length() {
            self.min_word_length = other.min_word_length;
        }
        if !other.wordlists.is_empty() {
            self.wordlists = other.wordlists;
        }
        if !other.languages.is_empty() {
            self.languages = other.languages;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wordlint").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Where base (shared) wordlists live.
    pub fn base_wordlist_dir() -> PathBuf {
        ProjectDirs::from("", "", "wordlint")
            .map(|dirs| dirs.data_dir().join("wordlists"))
            .unwrap_or_else(|| PathBuf::from("wordlists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.min_word_length, 3);
        assert!(config.wordlists.is_empty());
        assert_eq!(config.languages.len(), 1);
        assert_eq!(config.languages[0].name, "english");
    }

    #[test]
    fn parses_language_tables() {
        let toml = r#"
            min_word_length = 4
            wordlists = ["extra.txt"]

            [[language]]
            name = "ruby"
            key = "r"
            includes = ["*.rb", "Gemfile"]
            hashbangs = ["ruby"]
            generate = "ruby-wordlist"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.min_word_length, 4);
        assert_eq!(config.wordlists, vec![PathBuf::from("extra.txt")]);
        assert_eq!(config.languages.len(), 1);
        let ruby = &config.languages[0];
        assert_eq!(ruby.name, "ruby");
        assert_eq!(ruby.key, Some('r'));
        assert_eq!(ruby.includes, vec!["*.rb", "Gemfile"]);
        assert_eq!(ruby.generate.as_deref(), Some("ruby-wordlist"));
    }

    #[test]
    fn merge_prefers_non_default_values() {
        let base = Config::default();
        let override_config = Config {
            min_word_length: 5,
            ..Default::default()
        };
        let merged = base.merge(override_config);
        assert_eq!(merged.min_word_length, 5);
        assert_eq!(merged.languages.len(), 1);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "min_word_length = 6\n").unwrap();
        let config = Config::load(Some(&path), None, &[]).unwrap();
        assert_eq!(config.min_word_length, 6);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml")), None, &[]).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "min_word_length = 6\n").unwrap();
        let extra = vec![PathBuf::from("cli.txt")];
        let config = Config::load(Some(&path), Some(2), &extra).unwrap();
        assert_eq!(config.min_word_length, 2);
        assert_eq!(config.wordlists, extra);
    }
}
