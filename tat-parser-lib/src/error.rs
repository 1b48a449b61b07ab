// Error taxonomy for corpus parsing.
//
// InvalidReference is recoverable: callers skip the offending line, since
// corpus files carry comment and metadata lines. Everything else aborts the
// file it occurred in; sibling files are unaffected.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The first field of a line is not a usable `Book.Chapter.Verse` locator.
    #[error("invalid reference '{0}'")]
    InvalidReference(String),

    /// A grammar code began with a letter that names no known language.
    #[error("unknown grammar prefix in '{0}'")]
    UnknownGrammarPrefix(String),

    /// The text field of a reference-bearing line split into nothing.
    #[error("empty text field at {0}")]
    EmptyTextField(String),

    /// A meaning-variant clause did not match its fixed shape.
    #[error("malformed meaning variant '{0}'")]
    MalformedMeaningVariant(String),

    /// A spelling-variant clause did not match its fixed shape.
    #[error("malformed spelling variant '{0}'")]
    MalformedSpellingVariant(String),

    /// A `strong=grammar` pair did not split into exactly two parts.
    #[error("malformed strong=grammar pair '{0}'")]
    MalformedStrongGrammar(String),

    /// A `dictionary-form=gloss` pair did not split into exactly two parts.
    #[error("malformed dictionary-form=gloss pair '{0}'")]
    MalformedDictGloss(String),

    /// A combined `text (transliteration)` field did not match its shape.
    #[error("malformed text field '{0}'")]
    MalformedTextField(String),

    /// A lexicon strong number failed validation.
    #[error("invalid strong number '{0}'")]
    InvalidStrong(String),

    /// No candidate cleared the acceptance threshold for a spelling variant.
    #[error("could not align '{text}' at {locator}: best score {best:.2} below threshold\n{diagnostics}")]
    AlignmentFailure {
        text: String,
        locator: String,
        best: f64,
        diagnostics: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Wrapper attaching the raw line that triggered a fatal error.
    #[error("{source}\noffending line: {line}")]
    Line {
        line: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the offending raw line for operator diagnosis.
    pub(crate) fn with_line(self, line: &str) -> ParseError {
        ParseError::Line {
            line: line.to_string(),
            source: Box::new(self),
        }
    }
}
