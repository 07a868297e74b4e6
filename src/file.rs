use crate::checker::dictionary::Dictionary;
use crate::checker::CheckError;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file queued for checking, bundled with the ordered set of dictionaries
/// that apply to it. Dictionaries are shared so each wordlist loads once per
/// run no matter how many files it applies to.
pub struct CheckFile {
    path: PathBuf,
    dictionaries: Vec<Arc<Dictionary>>,
}

impl CheckFile {
    pub fn new(path: impl Into<PathBuf>, dictionaries: Vec<Arc<Dictionary>>) -> Self {
        Self {
            path: path.into(),
            dictionaries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dictionaries(&self) -> &[Arc<Dictionary>] {
        &self.dictionaries
    }

    pub fn read(&self) -> Result<String, CheckError> {
        fs::read_to_string(&self.path).map_err(|source| CheckError {
            path: self.path.clone(),
            source,
        })
    }
}

/// First line of an extensionless file, when it is a `#!` line. Files with an
/// extension are matched by glob rules instead.
pub fn hashbang(path: &Path) -> Option<String> {
    if path.extension().is_some() {
        return None;
    }
    let file = fs::File::open(path).ok()?;
    let mut first = String::new();
    BufReader::new(file).read_line(&mut first).ok()?;
    first.starts_with("#!").then(|| first.trim_end().to_string())
}
