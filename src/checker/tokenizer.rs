use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything that is not a letter, digit, `/` or `#` is a separator. Separators
    // are consumed rather than matched, which is what splits snake_case, kebab-case
    // and SCREAMING_SNAKE_CASE into independent words.
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}/#0-9]+").unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"[\n\r]+").unwrap();
    // The whole URL is consumed, query string and embedded digits included, so no
    // substring of it is ever tokenized.
    static ref URL: Regex =
        Regex::new(r"(?://|https?://|s?ftp://|file:///|mailto:)[\p{L}\p{N}%&.@+=/?#_-]+").unwrap();
    static ref HEX_CODE: Regex =
        Regex::new(r"(?:#|0x)(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})").unwrap();
    static ref EMAIL: Regex = Regex::new(r"[\p{L}\p{N}._-]+@[\p{L}\p{N}._-]+").unwrap();
    // Bare numbers, fractions, and heading markers like `###`.
    static ref NUMERIC_RUN: Regex = Regex::new(r"[/#0-9]+").unwrap();
}

/// A spell-checkable candidate word and its character offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Which case class an apostrophe-joined group may contain.
#[derive(Clone, Copy)]
enum CaseClass {
    Lower,
    Upper,
}

impl CaseClass {
    fn matches(self, c: char) -> bool {
        match self {
            CaseClass::Lower => c.is_lowercase(),
            CaseClass::Upper => c.is_uppercase(),
        }
    }

    fn possessive(self) -> char {
        match self {
            CaseClass::Lower => 's',
            CaseClass::Upper => 'S',
        }
    }
}

/// Stateful scanner over one line of text.
///
/// Each step skips non-word constructs (whitespace, punctuation, URLs, emails,
/// hex codes, numeric runs) and then tries to match a title-case, lowercase, or
/// uppercase word at the cursor, in that order. Trying the three alternatives at
/// every position is what splits camelCase into homogeneous-case runs without a
/// separate boundary-detection pass.
///
/// One instance per in-flight line; the internal cursor is not safe to share.
pub struct Tokenizer<'a> {
    line: &'a str,
    /// Byte position of the cursor.
    pos: usize,
    /// Character position of the cursor, reported as token offsets.
    charpos: usize,
    min_word_length: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a str, min_word_length: usize) -> Self {
        Self {
            line,
            pos: 0,
            charpos: 0,
            min_word_length,
        }
    }

    /// Collect every token in the line. Mostly a test convenience.
    pub fn tokenize(line: &'a str, min_word_length: usize) -> Vec<Token<'a>> {
        Self::new(line, min_word_length).collect()
    }

    /// Rewind to the start of the line.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.charpos = 0;
    }

    fn eos(&self) -> bool {
        self.pos >= self.line.len()
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn advance(&mut self, bytes: usize) {
        let end = self.pos + bytes;
        self.charpos += self.line[self.pos..end].chars().count();
        self.pos = end;
    }

    /// Consume `re` if it matches exactly at the cursor.
    fn skip(&mut self, re: &Regex) {
        if let Some(m) = re.find_at(self.line, self.pos) {
            if m.start() == self.pos {
                self.advance(m.end() - m.start());
            }
        }
    }

    fn skip_non_words(&mut self) {
        self.skip(&NON_WORD);
        self.skip(&LINE_BREAKS);
        self.skip(&URL);
        self.skip(&HEX_CODE);
        self.skip(&EMAIL);
        self.skip(&NUMERIC_RUN);
    }

    /// Matched byte length of `[[:upper:]][[:lower:]]+` plus apostrophe groups.
    fn title_case(&self) -> Option<usize> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !first.is_uppercase() {
            return None;
        }
        let head = first.len_utf8();
        let tail = case_run(&rest[head..], CaseClass::Lower);
        if tail == 0 {
            return None;
        }
        let base = head + tail;
        Some(base + apostrophe_groups(&rest[base..], CaseClass::Lower))
    }

    /// Matched byte length of `[[:lower:]]+` plus apostrophe groups.
    fn lower_case(&self) -> Option<usize> {
        let rest = self.rest();
        let base = case_run(rest, CaseClass::Lower);
        if base == 0 {
            return None;
        }
        Some(base + apostrophe_groups(&rest[base..], CaseClass::Lower))
    }

    /// Matched byte length of `[[:upper:]]+` plus apostrophe groups, rejecting a
    /// match that runs into a lowercase letter. Backing off one character when
    /// the lookahead fails is what splits `HTTParty` as `HTT` + `Party`.
    fn upper_case(&self) -> Option<usize> {
        let rest = self.rest();
        let base = case_run(rest, CaseClass::Upper);
        if base == 0 {
            return None;
        }
        let mut len = base + apostrophe_groups(&rest[base..], CaseClass::Upper);
        if rest[len..].chars().next().is_some_and(char::is_lowercase) {
            let last = rest[..len].chars().next_back()?;
            len -= last.len_utf8();
            if rest[..len].ends_with('\'') {
                len -= 1;
            }
            if len == 0 {
                return None;
            }
        }
        Some(len)
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        self.skip_non_words();
        if self.eos() {
            return None;
        }
        let offset = self.charpos;
        let len = self
            .title_case()
            .or_else(|| self.lower_case())
            .or_else(|| self.upper_case())?;
        let text = &self.line[self.pos..self.pos + len];
        self.advance(len);
        Some(Token { text, offset })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.eos() {
            let before = self.pos;
            match self.next_token() {
                Some(token) => {
                    if token.text.chars().count() >= self.min_word_length {
                        return Some(token);
                    }
                }
                None => {
                    if self.pos == before && !self.eos() {
                        // A character no rule consumes (e.g. a caseless letter).
                        let step = self.rest().chars().next().map_or(0, char::len_utf8);
                        self.advance(step);
                    }
                }
            }
        }
        None
    }
}

/// Byte length of the run of `class` letters at the start of `s`.
fn case_run(s: &str, class: CaseClass) -> usize {
    s.chars()
        .take_while(|&c| class.matches(c))
        .map(char::len_utf8)
        .sum()
}

/// Byte length of zero or more `'word` groups at the start of `s`, excluding a
/// trailing possessive `'s`/`'S`. A group reduced to a bare apostrophe by the
/// possessive rule is rejected outright, so `do's` matches only `do`.
fn apostrophe_groups(s: &str, class: CaseClass) -> usize {
    let mut len = 0;
    loop {
        let rest = &s[len..];
        if !rest.starts_with('\'') {
            return len;
        }
        let run = case_run(&rest[1..], class);
        if run == 0 {
            return len;
        }
        let mut group = &rest[1..1 + run];
        while group.ends_with(class.possessive()) {
            group = &group[..group.len() - 1];
        }
        if group.is_empty() {
            return len;
        }
        len += 1 + group.len();
        if group.len() < run {
            // Possessive suffix stripped; the leftover `s` is not ours to consume.
            return len;
        }
    }
}
