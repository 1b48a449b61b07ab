use std::io;

use serde::Serialize;

use crate::books::Book;

/// Language of a record, derived from its first grammar code's leading letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Heb,
    Arc,
    Grk,
}

/// Which alternate-reading stream a record came from. Absent = canonical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Meaning,
    Spelling,
}

impl VariantKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariantKind::Meaning => "meaning",
            VariantKind::Spelling => "spelling",
        }
    }
}

/// One annotated morpheme, the unit output record.
///
/// Field order is the emission order. Spelling-variant records are created
/// with empty annotation and filled in exactly once by the aligner before
/// emission; nothing mutates a record after that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Morpheme {
    pub variant: Option<VariantKind>,
    /// Comma list of witness abbreviations attesting this reading.
    pub sources: String,
    pub book: Book,
    pub chapter: u32,
    pub verse: u32,
    /// 1-based index within the verse, shared by all morphemes of one
    /// source word.
    pub word: u32,
    pub lang: Option<Lang>,
    /// Lexeme identifier, braces and leading language letter stripped.
    /// May carry a trailing disambiguation letter (`0168G`).
    pub strong: String,
    /// The literal token, original script.
    pub text: String,
    /// Morphology code. The first morpheme's language letter has been
    /// promoted to `lang`.
    pub grammar: String,
    pub transliteration: String,
    pub translation: String,
    /// Dictionary form (Greek layout only; comma list).
    pub dict_form: String,
    /// Dictionary gloss (Greek layout only; comma list).
    pub gloss: String,
}

impl Morpheme {
    /// Short locator for log messages, e.g. `gen.12.8#08 טל (spelling)`.
    pub fn locator(&self) -> String {
        let mut res = format!(
            "{}.{}.{}#{:02} {}",
            self.book, self.chapter, self.verse, self.word, self.text
        );
        if let Some(v) = self.variant {
            res.push_str(&format!(" ({})", v.as_str()));
        }
        res
    }
}

/// Record consumer. The library streams records out; serialization policy
/// (delimiter, headers, file naming) belongs to the caller.
pub trait Sink<T> {
    fn write(&mut self, rec: T) -> io::Result<()>;
}

impl<T> Sink<T> for Vec<T> {
    fn write(&mut self, rec: T) -> io::Result<()> {
        self.push(rec);
        Ok(())
    }
}
