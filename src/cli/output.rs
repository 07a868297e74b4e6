use crate::checker::{Issue, Reporter};
use colored::*;
use dashmap::DashSet;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Wordlist,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "wordlist" => Ok(OutputFormat::Wordlist),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Wordlist => write!(f, "wordlist"),
        }
    }
}

pub fn make_reporter(format: OutputFormat, colored: bool) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::new(colored)),
        OutputFormat::Json => Box::new(JsonReporter),
        OutputFormat::Wordlist => Box::new(WordlistReporter::default()),
    }
}

/// Prints `path:line:column word` per issue plus a closing summary. Output
/// interleaves badly under concurrent calls, so the pipeline serializes them.
pub struct TextReporter {
    colored: bool,
    count: AtomicUsize,
}

impl TextReporter {
    pub fn new(colored: bool) -> Self {
        Self {
            colored,
            count: AtomicUsize::new(0),
        }
    }
}

impl Reporter for TextReporter {
    fn report(&self, issue: &Issue<'_>) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let location = format!(
            "{}:{}:{}",
            issue.path.display(),
            issue.line_number,
            issue.offset + 1
        );
        if self.colored {
            println!("{} {}", location.blue().bold(), issue.token.red().bold());
        } else {
            println!("{} {}", location, issue.token);
        }
    }

    fn finish(&self) {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return;
        }
        let summary = format!(
            "{} unknown {}",
            count,
            if count == 1 { "word" } else { "words" }
        );
        if self.colored {
            eprintln!("{}", summary.red().bold());
        } else {
            eprintln!("{}", summary);
        }
    }
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    file: String,
    line: usize,
    column: usize,
    word: &'a str,
    context: &'a str,
}

/// One JSON object per issue, newline delimited.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn report(&self, issue: &Issue<'_>) {
        let record = JsonIssue {
            file: issue.path.display().to_string(),
            line: issue.line_number,
            column: issue.offset + 1,
            word: issue.token,
            context: issue.line,
        };
        if let Ok(json) = serde_json::to_string(&record) {
            println!("{}", json);
        }
    }
}

/// Collects the normalized unmatched words and prints them sorted, ready to
/// paste into a project wordlist. Safe under concurrent invocation.
#[derive(Default)]
pub struct WordlistReporter {
    words: DashSet<String>,
}

impl WordlistReporter {
    pub fn words(&self) -> Vec<String> {
        let mut words: Vec<String> = self.words.iter().map(|w| w.key().clone()).collect();
        words.sort();
        words
    }
}

impl Reporter for WordlistReporter {
    fn report(&self, issue: &Issue<'_>) {
        self.words.insert(issue.token.to_lowercase());
    }

    fn parallel(&self) -> bool {
        true
    }

    fn finish(&self) {
        for word in self.words() {
            println!("{}", word);
        }
    }
}

pub fn print_file_errors(errors: &[crate::checker::CheckError], colored: bool) {
    for error in errors {
        if colored {
            eprintln!("{} {}", "error:".red().bold(), error);
        } else {
            eprintln!("error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parses_output_formats() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "wordlist".parse::<OutputFormat>().unwrap(),
            OutputFormat::Wordlist
        );
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn wordlist_reporter_normalizes_and_sorts() {
        let reporter = WordlistReporter::default();
        for token in ["Zebra", "apple", "APPLE", "mango"] {
            reporter.report(&Issue {
                token,
                offset: 0,
                line: token,
                line_number: 1,
                path: Path::new("x.txt"),
            });
        }
        assert_eq!(reporter.words(), vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn wordlist_reporter_is_parallel() {
        assert!(WordlistReporter::default().parallel());
        assert!(!TextReporter::new(false).parallel());
        assert!(!JsonReporter.parallel());
    }
}
