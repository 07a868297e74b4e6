use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use ignore::WalkBuilder;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use wordlint::cli::output::{make_reporter, print_file_errors, OutputFormat};
use wordlint::file::hashbang;
use wordlint::{Check, CheckFile, Config, Dictionary, Language};

#[derive(Parser, Debug)]
#[command(name = "wordlint")]
#[command(version, about = "A fast wordlist-driven spellchecker", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Output format (text, json, wordlist)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if unknown words are found
    #[arg(long)]
    no_fail: bool,

    /// Minimum token length to spell-check
    #[arg(short, long)]
    min_word_length: Option<usize>,

    /// Extra wordlist applied to every file (repeatable)
    #[arg(short, long)]
    wordlist: Vec<PathBuf>,

    /// Config file (defaults to .wordlint.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "wordlint", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref(), cli.min_word_length, &cli.wordlist)?;

    if cli.paths.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let project_root = std::env::current_dir().context("failed to resolve working directory")?;
    let base_dir = Config::base_wordlist_dir();
    let languages = config
        .languages
        .iter()
        .map(|language| Language::new(language, &base_dir, &project_root))
        .collect::<Result<Vec<_>>>()?;
    let extra: Vec<Arc<Dictionary>> = config
        .wordlists
        .iter()
        .map(|path| Arc::new(Dictionary::new(path)))
        .collect();

    let paths = collect_paths(&cli.paths);
    let files = build_check_files(&paths, &languages, &extra);

    let reporter = make_reporter(cli.format, !cli.no_color);
    let summary = Check::new(&files, reporter.as_ref(), config.min_word_length).run();

    print_file_errors(&summary.errors, !cli.no_color);

    if !cli.no_fail && (summary.exit_code != 0 || !summary.errors.is_empty()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Expand directories into their files, honoring gitignore rules.
fn collect_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkBuilder::new(input).build().flatten() {
                if entry.file_type().is_some_and(|t| t.is_file()) {
                    paths.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            paths.push(input.clone());
        } else {
            eprintln!("Error: File not found: {}", input.display());
        }
    }
    paths
}

/// Pair each path with the wordlists of every language covering it. Wordlists
/// are resolved once per language so generation and lazy loading happen once.
/// Files no language covers are skipped.
fn build_check_files(
    paths: &[PathBuf],
    languages: &[Language],
    extra: &[Arc<Dictionary>],
) -> Vec<CheckFile> {
    let mut resolved: Vec<Option<Vec<Arc<Dictionary>>>> = vec![None; languages.len()];
    let mut files = Vec::new();

    for path in paths {
        let bang = hashbang(path);
        let mut dictionaries: Vec<Arc<Dictionary>> = Vec::new();
        let mut covered = false;

        for (index, language) in languages.iter().enumerate() {
            if !language.matches(path, bang.as_deref()) {
                continue;
            }
            covered = true;
            let wordlists =
                resolved[index].get_or_insert_with(|| language.wordlists());
            dictionaries.extend(wordlists.iter().cloned());
        }

        if !covered {
            continue;
        }
        dictionaries.extend(extra.iter().cloned());
        files.push(CheckFile::new(path.clone(), dictionaries));
    }

    files
}
