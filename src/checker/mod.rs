pub mod dictionary;
pub mod tokenizer;

use crate::file::CheckFile;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokenizer::Tokenizer;

/// One unmatched token, with enough context to locate it.
#[derive(Debug, Clone, Copy)]
pub struct Issue<'a> {
    pub token: &'a str,
    /// Character offset of the token within its line.
    pub offset: usize,
    pub line: &'a str,
    /// 1-based.
    pub line_number: usize,
    pub path: &'a Path,
}

/// Sink for unmatched tokens.
///
/// `report` is invoked once per unmatched token, from whichever worker found
/// it. A reporter that returns `true` from `parallel()` must tolerate
/// concurrent invocation; otherwise the pipeline serializes calls to it.
/// `finish` runs once after all files complete.
pub trait Reporter: Send + Sync {
    fn report(&self, issue: &Issue<'_>);

    fn parallel(&self) -> bool {
        false
    }

    fn finish(&self) {}
}

/// A file whose contents could not be checked. Sibling files are unaffected.
#[derive(Debug, Error)]
#[error("failed to read {}: {source}", path.display())]
pub struct CheckError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug)]
pub struct CheckSummary {
    /// 1 if any token in any file went unmatched, 0 otherwise.
    pub exit_code: i32,
    pub errors: Vec<CheckError>,
}

/// Drives tokenization and dictionary lookups across a batch of files, one
/// rayon task per file. Lines within a file and tokens within a line are
/// checked strictly in order; there is no ordering guarantee between files.
pub struct Check<'a> {
    files: &'a [CheckFile],
    reporter: &'a dyn Reporter,
    min_word_length: usize,
}

impl<'a> Check<'a> {
    pub fn new(files: &'a [CheckFile], reporter: &'a dyn Reporter, min_word_length: usize) -> Self {
        Self {
            files,
            reporter,
            min_word_length,
        }
    }

    pub fn run(&self) -> CheckSummary {
        let failed = AtomicBool::new(false);
        let report_lock = (!self.reporter.parallel()).then(|| Mutex::new(()));

        let errors: Vec<CheckError> = self
            .files
            .par_iter()
            .filter_map(|file| self.check_file(file, &failed, report_lock.as_ref()).err())
            .collect();

        self.reporter.finish();

        CheckSummary {
            exit_code: i32::from(failed.load(Ordering::Relaxed)),
            errors,
        }
    }

    fn check_file(
        &self,
        file: &CheckFile,
        failed: &AtomicBool,
        report_lock: Option<&Mutex<()>>,
    ) -> Result<(), CheckError> {
        let content = file.read()?;

        for (index, line) in content.lines().enumerate() {
            for token in Tokenizer::new(line, self.min_word_length) {
                if file
                    .dictionaries()
                    .iter()
                    .any(|dictionary| dictionary.includes(token.text))
                {
                    continue;
                }

                failed.store(true, Ordering::Relaxed);
                let issue = Issue {
                    token: token.text,
                    offset: token.offset,
                    line,
                    line_number: index + 1,
                    path: file.path(),
                };
                let _guard = report_lock.map(|m| m.lock().unwrap_or_else(PoisonError::into_inner));
                self.reporter.report(&issue);
            }
        }

        Ok(())
    }
}
