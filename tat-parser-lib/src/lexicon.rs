// Brief-lexicon (TBESH/TBESG) parsing.
//
// One tab-separated entry per line: eStrong, dStrong=reason, uStrong,
// word, transliteration, morph, gloss, meaning. The meaning field is HTML
// split on <br> tags; `__1.` / `__(1)`-style outline prefixes give sense
// nesting depth, un-numbered text collects into notes, and <ref> links are
// rewritten to plain book/chapter:verse text.

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::books::Book;
use crate::error::ParseError;
use crate::types::Sink;

static ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[HG]\d{4}").unwrap());
static STRONG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[HG]\d{4}").unwrap());
static BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
// __1. text / __1a) text / __(1) text
static OUTLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^_*((?::?\d+|[a-z]+|\()*)[).] (.*)").unwrap());
static DEPTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+|[a-z]+").unwrap());
// <ref='Mat.11.10'>Mat.11:10</ref>
static REF_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<ref=['"]([A-Za-z]{3})\.(\d+)\.(\d+)[^'"]*['"]>[^<]*</ref>"#).unwrap()
});

/// One lexicon entry. `meaning` and `notes` hold the sense outline
/// serialized as nested JSON arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexiconEntry {
    pub e_strong: String,
    pub d_strong: String,
    pub u_strong: String,
    pub reason: String,
    pub word: String,
    pub morph: String,
    pub transliteration: String,
    pub gloss: String,
    pub meaning: String,
    pub notes: String,
}

/// Parse one lexicon file. Lines that do not begin with a strong number
/// (headers, separators) are skipped; a malformed strong aborts the file.
pub fn parse_lexicon<R: BufRead, S: Sink<LexiconEntry>>(
    reader: R,
    out: &mut S,
) -> Result<(), ParseError> {
    for line in reader.lines() {
        let line = line?;
        match parse_entry(&line) {
            Ok(Some(entry)) => out.write(entry)?,
            Ok(None) => {}
            Err(e) => return Err(e.with_line(&line)),
        }
    }
    Ok(())
}

fn parse_entry(line: &str) -> Result<Option<LexiconEntry>, ParseError> {
    let f: Vec<&str> = line.split('\t').map(str::trim).collect();
    let e_strong = f.first().copied().unwrap_or("");
    if !ENTRY.is_match(e_strong) {
        return Ok(None);
    }

    let d_strong_and_reason = f.get(1).copied().unwrap_or("");
    let u_strong = f.get(2).copied().unwrap_or("").replace(',', "");
    let word = f.get(3).copied().unwrap_or("");
    let transliteration = f.get(4).copied().unwrap_or("");
    let morph = f.get(5).copied().unwrap_or("");
    let gloss = f.get(6).copied().unwrap_or("");
    let meaning = f.get(7).copied().unwrap_or("");

    let (d_strong, reason) = match d_strong_and_reason.split_once('=') {
        Some((d, rsn)) => (d.trim(), rsn.trim()),
        None => (d_strong_and_reason, ""),
    };

    for s in [e_strong, d_strong, u_strong.as_str()] {
        if !STRONG.is_match(s) {
            return Err(ParseError::InvalidStrong(s.to_string()));
        }
    }

    let (senses, notes) = parse_meaning(meaning)?;

    Ok(Some(LexiconEntry {
        e_strong: e_strong.to_string(),
        d_strong: d_strong.to_string(),
        u_strong,
        reason: reason.to_string(),
        word: word.to_string(),
        morph: morph.to_string(),
        transliteration: transliteration.to_string(),
        gloss: gloss.to_string(),
        meaning: Value::Array(senses).to_string(),
        notes: Value::from(notes).to_string(),
    }))
}

/// Parse the `<br>`-separated sense outline into a nested list plus
/// depth-0 notes. Each outline prefix group (`1`, `a`, `(1)`) adds one
/// nesting level; a depth increase opens a sub-list at the current
/// position, a decrease re-descends from the root along last children.
fn parse_meaning(meaning: &str) -> Result<(Vec<Value>, Vec<String>), ParseError> {
    let mut notes: Vec<String> = Vec::new();
    let mut root: Vec<Value> = Vec::new();
    let mut cur_depth: usize = 1;
    // The current list, tracked as a descent depth below the root.
    let mut cur_levels: usize = 0;

    for def in BR.split(meaning).map(str::trim) {
        let caps = OUTLINE.captures(def);
        let (number, text) = match &caps {
            Some(c) => (
                Some(c.get(1).map_or("", |m| m.as_str())),
                c.get(2).map_or("", |m| m.as_str()).to_string(),
            ),
            None => (None, def.to_string()),
        };
        let text = rewrite_refs(&text)?;

        let depth = match number {
            Some(n) => DEPTH.find_iter(n).count(),
            None => 0,
        };

        if depth < cur_depth {
            cur_levels = depth.saturating_sub(1);
        } else if depth > cur_depth {
            let cur = descend(&mut root, cur_levels);
            cur.push(Value::Array(vec![]));
            cur_levels += 1;
        }

        if !text.is_empty() {
            if depth == 0 {
                notes.push(text);
            } else {
                descend(&mut root, cur_levels).push(Value::String(text));
            }
        }
        cur_depth = depth;
    }

    Ok((root, notes))
}

/// Follow last children `levels` deep, stopping early if the outline
/// nesting does not actually reach that far.
fn descend(root: &mut Vec<Value>, levels: usize) -> &mut Vec<Value> {
    let mut cur = root;
    for _ in 0..levels {
        if !matches!(cur.last(), Some(Value::Array(_))) {
            break;
        }
        match cur.last_mut() {
            Some(Value::Array(next)) => cur = next,
            _ => unreachable!(),
        }
    }
    cur
}

/// Rewrite `<ref='Mat.11.10'>…</ref>` links to `mat 11:10`. An unknown
/// book name in a link is fatal; the lexicon's cross-references are part
/// of its data.
fn rewrite_refs(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in REF_LINK.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let book = Book::from_english(&caps[1])
            .ok_or_else(|| ParseError::InvalidReference(caps[1].to_string()))?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(&format!("{} {}:{}", book, &caps[2], &caps[3]));
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
