use crate::checker::dictionary::Dictionary;
use crate::config::LanguageConfig;
use anyhow::{ensure, Context, Result};
use ignore::overrides::{Override, OverrideBuilder};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Directory (relative to the project root) holding project wordlists.
pub const WORDLIST_DIR: &str = ".wordlint";

/// A language maps files to wordlists: which files it covers (gitignore-style
/// include rules plus hashbangs for extensionless scripts) and the ordered set
/// of dictionaries its files are checked against — a shared base wordlist, a
/// generated project wordlist, and a hand-maintained project wordlist.
pub struct Language {
    name: String,
    key: char,
    hashbangs: Vec<String>,
    generate: Option<String>,
    matcher: Option<Override>,
    base: Arc<Dictionary>,
    generated: Arc<Dictionary>,
    project: Arc<Dictionary>,
}

impl Language {
    pub fn new(config: &LanguageConfig, base_dir: &Path, project_root: &Path) -> Result<Self> {
        let matcher = if config.includes.is_empty() {
            None
        } else {
            let mut builder = OverrideBuilder::new(project_root);
            for rule in &config.includes {
                builder
                    .add(rule)
                    .with_context(|| format!("invalid include rule {:?} for {}", rule, config.name))?;
            }
            Some(builder.build().context("failed to build include matcher")?)
        };

        let base_path = config
            .base_wordlist
            .clone()
            .unwrap_or_else(|| base_dir.join(format!("{}.txt", config.name)));
        let wordlist_dir = project_root.join(WORDLIST_DIR);

        Ok(Self {
            name: config.name.clone(),
            key: config
                .key
                .or_else(|| config.name.chars().next())
                .unwrap_or('?'),
            hashbangs: config.hashbangs.clone(),
            generate: config.generate.clone(),
            matcher,
            base: Arc::new(Dictionary::new(base_path)),
            generated: Arc::new(Dictionary::new(
                wordlist_dir.join("generated").join(format!("{}.txt", config.name)),
            )),
            project: Arc::new(Dictionary::new(wordlist_dir.join(format!("{}.txt", config.name)))),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> char {
        self.key
    }

    /// Whether this language covers `path`. A language with no include rules
    /// covers every file.
    pub fn matches(&self, path: &Path, hashbang: Option<&str>) -> bool {
        let Some(matcher) = &self.matcher else {
            return true;
        };
        if matcher.matched(path, false).is_whitelist() {
            return true;
        }
        match hashbang {
            Some(line) => self.hashbangs.iter().any(|h| line.contains(h.as_str())),
            None => false,
        }
    }

    /// The ordered set of existing dictionaries for this language, generating
    /// the project wordlist first when configured and not yet present.
    pub fn wordlists(&self) -> Vec<Arc<Dictionary>> {
        if self.generate.is_some() && !self.generated.exists() {
            if let Err(e) = self.generate_wordlist() {
                eprintln!("warning: could not generate wordlist for {}: {:#}", self.name, e);
            }
        }

        [&self.base, &self.generated, &self.project]
            .into_iter()
            .filter(|dictionary| dictionary.exists())
            .map(Arc::clone)
            .collect()
    }

    /// Runs the configured generator with its stdout piped into the generated
    /// wordlist. The file is touched first so a failing generator is not
    /// retried on every run.
    fn generate_wordlist(&self) -> Result<()> {
        let Some(command) = &self.generate else {
            return Ok(());
        };
        eprintln!("Generating wordlist for {}", self.name);

        let path = self.generated.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let output = fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        let mut parts = command.split_whitespace();
        let program = parts.next().context("empty generate command")?;
        let status = Command::new(program)
            .args(parts)
            .stdout(Stdio::from(output))
            .status()
            .with_context(|| format!("failed to run {:?}", command))?;
        ensure!(status.success(), "{:?} exited with {}", command, status);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn language(config: LanguageConfig, root: &Path) -> Language {
        Language::new(&config, &root.join("base"), root).unwrap()
    }

    fn named(name: &str) -> LanguageConfig {
        LanguageConfig {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn no_include_rules_matches_everything() {
        let dir = tempdir().unwrap();
        let lang = language(named("english"), dir.path());
        assert!(lang.matches(Path::new("whatever.rs"), None));
        assert!(lang.matches(Path::new("deep/nested/file.txt"), None));
    }

    #[test]
    fn include_rules_select_by_glob() {
        let dir = tempdir().unwrap();
        let lang = language(
            LanguageConfig {
                includes: vec!["*.rb".to_string()],
                ..named("ruby")
            },
            dir.path(),
        );
        assert!(lang.matches(&dir.path().join("main.rb"), None));
        assert!(!lang.matches(&dir.path().join("main.py"), None));
    }

    #[test]
    fn hashbangs_cover_extensionless_scripts() {
        let dir = tempdir().unwrap();
        let lang = language(
            LanguageConfig {
                includes: vec!["*.rb".to_string()],
                hashbangs: vec!["ruby".to_string()],
                ..named("ruby")
            },
            dir.path(),
        );
        assert!(lang.matches(&dir.path().join("script"), Some("#!/usr/bin/env ruby")));
        assert!(!lang.matches(&dir.path().join("script"), Some("#!/bin/sh")));
        assert!(!lang.matches(&dir.path().join("script"), None));
    }

    #[test]
    fn wordlists_are_filtered_to_existing_files() {
        let dir = tempdir().unwrap();
        let base_dir = dir.path().join("base");
        fs::create_dir_all(&base_dir).unwrap();
        fs::write(base_dir.join("english.txt"), "hello\n").unwrap();

        let lang = language(named("english"), dir.path());
        let wordlists = lang.wordlists();
        assert_eq!(wordlists.len(), 1);
        assert!(wordlists[0].includes("hello"));
    }

    #[test]
    fn project_wordlists_come_after_the_base() {
        let dir = tempdir().unwrap();
        let base_dir = dir.path().join("base");
        fs::create_dir_all(&base_dir).unwrap();
        fs::write(base_dir.join("english.txt"), "base\n").unwrap();
        let project_dir = dir.path().join(WORDLIST_DIR);
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(project_dir.join("english.txt"), "project\n").unwrap();

        let lang = language(named("english"), dir.path());
        let wordlists = lang.wordlists();
        assert_eq!(wordlists.len(), 2);
        assert!(wordlists[0].includes("base"));
        assert!(wordlists[1].includes("project"));
    }

    #[test]
    fn generation_runs_once_and_fills_the_wordlist() {
        let dir = tempdir().unwrap();
        let lang = language(
            LanguageConfig {
                generate: Some("echo generated".to_string()),
                ..named("tools")
            },
            dir.path(),
        );

        let wordlists = lang.wordlists();
        assert_eq!(wordlists.len(), 1);
        assert!(wordlists[0].includes("generated"));

        // Second resolution must not regenerate.
        let again = lang.wordlists();
        assert_eq!(again.len(), 1);
    }
}
