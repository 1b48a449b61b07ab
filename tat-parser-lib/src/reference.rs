// Verse locators: `Book.Chapter.Verse[...]=Sources`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::books::Book;
use crate::error::ParseError;

// Hebrew OT: Gen.1.8(Gen.3.4)#12=L(K)
// Greek NT:  Act.1.8#12=N(K)O
static BCV: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^.\t]+)\.(\d+)\.(\d+)").unwrap());

/// A parsed verse locator. Trailing decorations before the `=` (alternate
/// versification, word counters) are ignored; the text after the last `=`
/// is the witness list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ref {
    pub book: Book,
    pub chapter: u32,
    pub verse: u32,
    pub sources: String,
}

impl Ref {
    /// Parse and validate a locator token. The error is recoverable by
    /// contract: corpus files carry comment and metadata lines whose first
    /// field is no locator, and callers skip those lines rather than abort.
    pub fn parse(s: &str) -> Result<Ref, ParseError> {
        let invalid = || ParseError::InvalidReference(s.to_string());

        let caps = BCV.captures(s).ok_or_else(invalid)?;
        let book = Book::from_english(&caps[1]).ok_or_else(invalid)?;
        let chapter: u32 = caps[2].parse().map_err(|_| invalid())?;
        let verse: u32 = caps[3].parse().map_err(|_| invalid())?;
        if chapter == 0 || verse == 0 {
            return Err(invalid());
        }

        let sources = s.rfind('=').map(|i| s[i + 1..].to_string()).unwrap_or_default();

        Ok(Ref {
            book,
            chapter,
            verse,
            sources,
        })
    }

    /// Verse equality: book, chapter, and verse; the witness list is ignored.
    pub fn verse_eq(&self, other: &Ref) -> bool {
        self.book == other.book && self.chapter == other.chapter && self.verse == other.verse
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}
