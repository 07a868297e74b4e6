use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One on-disk wordlist: plain text, one lowercased word per line, newline
/// terminated, sorted ascending. Sortedness is a precondition of the data,
/// not something the dictionary re-establishes; it is checked in debug builds
/// at load time. An unsorted wordlist in release builds yields undefined
/// lookup results.
///
/// The backing file is loaded on the first membership query and kept for the
/// rest of the run. A missing file behaves as an empty dictionary.
pub struct Dictionary {
    path: PathBuf,
    words: OnceLock<Vec<String>>,
}

impl Dictionary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            words: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Case-insensitive membership test. O(log n) after the one-time load;
    /// concurrent first calls race on the load but only one wins.
    pub fn includes(&self, word: &str) -> bool {
        let needle = format!("{}\n", word.to_lowercase());
        self.words()
            .binary_search_by(|entry| entry.as_str().cmp(needle.as_str()))
            .is_ok()
    }

    fn words(&self) -> &[String] {
        self.words.get_or_init(|| match fs::read_to_string(&self.path) {
            Ok(content) => {
                let words: Vec<String> =
                    content.split_inclusive('\n').map(str::to_string).collect();
                debug_assert!(
                    words.windows(2).all(|pair| pair[0] <= pair[1]),
                    "wordlist {} is not sorted",
                    self.path.display()
                );
                words
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    eprintln!("warning: could not read wordlist {}: {}", self.path.display(), e);
                }
                Vec::new()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn wordlist(dir: &tempfile::TempDir, name: &str, words: &str) -> Dictionary {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(words.as_bytes()).unwrap();
        Dictionary::new(path)
    }

    #[test]
    fn includes_words_even_when_cached() {
        let dir = tempdir().unwrap();
        let dict = wordlist(&dir, "wordlist.txt", "bar\nfoo\n");
        assert!(dict.includes("bar"));
        assert!(dict.includes("bar"));
    }

    #[test]
    fn excludes_words_even_when_cached() {
        let dir = tempdir().unwrap();
        let dict = wordlist(&dir, "wordlist.txt", "bar\nfoo\n");
        assert!(!dict.includes("baz"));
        assert!(!dict.includes("baz"));
    }

    #[test]
    fn is_case_insensitive() {
        let dir = tempdir().unwrap();
        let dict = wordlist(&dir, "wordlist.txt", "bar\nfoo\n");
        assert!(dict.includes("BAR"));
        assert!(dict.includes("Bar"));
        assert!(dict.includes("bAr"));
        assert!(!dict.includes("BAZ"));
    }

    #[test]
    fn missing_file_is_an_empty_dictionary() {
        let dir = tempdir().unwrap();
        let dict = Dictionary::new(dir.path().join("nope.txt"));
        assert!(!dict.includes("anything"));
    }

    #[test]
    fn loads_lazily_not_at_construction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("late.txt");
        let dict = Dictionary::new(&path);
        fs::write(&path, "word\n").unwrap();
        assert!(dict.includes("word"));
    }

    #[test]
    fn does_not_match_prefixes_or_substrings() {
        let dir = tempdir().unwrap();
        let dict = wordlist(&dir, "wordlist.txt", "foobar\n");
        assert!(!dict.includes("foo"));
        assert!(!dict.includes("bar"));
        assert!(dict.includes("foobar"));
    }
}
