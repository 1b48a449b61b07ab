// Variant clause micro-grammars.
//
// Meaning variants carry full annotation; spelling variants carry bare
// text and recover their annotation through alignment. The clause shapes
// are fixed: a clause that fails its pattern means the upstream corpus
// format changed, and that must surface instead of being swallowed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

// K= 'o.ho.Lo/h (אָהֳלֹ/ה) "tent/ his" (H0168G/H9023=HNcbsc/Sp3ms)
static MEANING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^ ]*)= ([^ ]*) \(([^)]*)\) "(.*)" \(([^=]*)=([^)]*)\)"#).unwrap()
});

// L= אָהֳלֹ֑/ה
static SPELLING: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^ ]*)= ([^ ]*)").unwrap());

// δύο μυριάδες (t=duo muriades) twenty thousand - G1417=A-NUI + G3461=N-NPF in: Treg+TR
static NT_MEANING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^(]*) \([^=]*=([^)]*)\) (.*) - (.*) in: (.*)$").unwrap());

// WH: δὶς μυριάδες
static NT_SPELLING: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^:]*): (.*)$").unwrap());

/// Split a variant field into independent clauses. Empty segments and the
/// bare-`;` artifacts of the source format are dropped.
pub fn split_clauses(field: &str) -> impl Iterator<Item = &str> {
    field.split(['¦', ';']).map(str::trim).filter(|c| !c.is_empty())
}

/// A fully annotated alternate reading (Hebrew layout).
#[derive(Debug, PartialEq, Eq)]
pub struct MeaningClause<'a> {
    pub sources: &'a str,
    pub transliteration: &'a str,
    pub text: &'a str,
    pub translation: &'a str,
    pub strongs: &'a str,
    pub grammar: &'a str,
}

/// Parse `WITNESS= TRANSLIT (TEXT) "TRANSLATION" (STRONG=GRAMMAR)`.
pub fn meaning_clause(clause: &str) -> Result<MeaningClause<'_>, ParseError> {
    let caps = MEANING
        .captures(clause)
        .ok_or_else(|| ParseError::MalformedMeaningVariant(clause.to_string()))?;
    Ok(MeaningClause {
        sources: caps.get(1).map_or("", |m| m.as_str()),
        transliteration: caps.get(2).map_or("", |m| m.as_str()),
        text: caps.get(3).map_or("", |m| m.as_str()),
        translation: caps.get(4).map_or("", |m| m.as_str()),
        strongs: caps.get(5).map_or("", |m| m.as_str()),
        grammar: caps.get(6).map_or("", |m| m.as_str()),
    })
}

/// A bare alternate spelling (Hebrew layout): witness list and text only.
#[derive(Debug, PartialEq, Eq)]
pub struct SpellingClause<'a> {
    pub sources: &'a str,
    pub text: &'a str,
}

/// Parse `WITNESS= TEXT`.
pub fn spelling_clause(clause: &str) -> Result<SpellingClause<'_>, ParseError> {
    let caps = SPELLING
        .captures(clause)
        .ok_or_else(|| ParseError::MalformedSpellingVariant(clause.to_string()))?;
    Ok(SpellingClause {
        sources: caps.get(1).map_or("", |m| m.as_str()),
        text: caps.get(2).map_or("", |m| m.as_str()),
    })
}

/// An annotated alternate reading (Greek layout).
#[derive(Debug, PartialEq, Eq)]
pub struct NtMeaningClause<'a> {
    pub text: &'a str,
    pub transliteration: &'a str,
    pub translation: &'a str,
    pub strong_and_grammars: &'a str,
    pub sources: &'a str,
}

/// Parse `TEXT (x=TRANSLIT) TRANSLATION - STRONG=GRAMMAR pairs in: WITNESSES`.
pub fn nt_meaning_clause(clause: &str) -> Result<NtMeaningClause<'_>, ParseError> {
    let caps = NT_MEANING
        .captures(clause)
        .ok_or_else(|| ParseError::MalformedMeaningVariant(clause.to_string()))?;
    Ok(NtMeaningClause {
        text: caps.get(1).map_or("", |m| m.as_str()),
        transliteration: caps.get(2).map_or("", |m| m.as_str()),
        translation: caps.get(3).map_or("", |m| m.as_str()),
        strong_and_grammars: caps.get(4).map_or("", |m| m.as_str()),
        sources: caps.get(5).map_or("", |m| m.as_str()),
    })
}

/// A bare alternate spelling (Greek layout): `WITNESSES: TEXT`.
pub fn nt_spelling_clause(clause: &str) -> Result<SpellingClause<'_>, ParseError> {
    let caps = NT_SPELLING
        .captures(clause)
        .ok_or_else(|| ParseError::MalformedSpellingVariant(clause.to_string()))?;
    Ok(SpellingClause {
        sources: caps.get(1).map_or("", |m| m.as_str()),
        text: caps.get(2).map_or("", |m| m.as_str()),
    })
}
