// Greek NT line-stream parsing.
//
// One tab-separated line per annotated word:
//   Word & Type:              Rev.9.16#08=N(k)O
//   Greek:                    δισμυριάδες (dismuriades)
//   English translation:      twice ten thousand
//   dStrongs = Grammar:       G1364=ADV + G3461=N-NPF
//   Dictionary form = Gloss:  δίς=twice + μυριάς=myriad
//   editions:                 NA28+NA27+Tyn+SBL+WH
//   Meaning variants:         δύο μυριάδες (t=duo muriades) twenty thousand - G1417=A-NUI + G3461=N-NPF in: Treg+TR
//   Spelling variants:        WH: δὶς μυριάδες ;
//
// Greek grammar splits do not follow the surface word (some are even out
// of order, e.g. κἀμοὶ tagging G1473=P-1DS before G2532=CONJ), so a line
// yields a single record whose strong/grammar/dict-form/gloss fields carry
// comma-joined lists instead of per-morpheme records.

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::reference::Ref;
use crate::types::{Lang, Morpheme, Sink, VariantKind};
use crate::variants;

// δισμυριάδες (dismuriades)
static TEXT_TRANSLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^(]*) \(([^)]*)\)").unwrap());

/// Parse one NT corpus file into word records.
///
/// Same per-file contract as the OT parser: strictly ordered lines,
/// invalid references skipped, any other failure aborts the file with the
/// offending raw line attached.
pub fn parse_tagnt<R: BufRead, S: Sink<Morpheme>>(reader: R, out: &mut S) -> Result<(), ParseError> {
    let mut last_ref: Option<Ref> = None;
    let mut word: u32 = 1;

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            continue;
        }
        let first = line.split('\t').next().unwrap_or("");
        let Ok(r) = Ref::parse(first) else { continue };
        if !last_ref.as_ref().is_some_and(|lr| lr.verse_eq(&r)) {
            word = 1;
        }

        parse_line(&line, &r, word, out).map_err(|e| e.with_line(&line))?;
        word += 1;
        last_ref = Some(r);
    }
    Ok(())
}

fn parse_line<S: Sink<Morpheme>>(
    line: &str,
    r: &Ref,
    word: u32,
    out: &mut S,
) -> Result<(), ParseError> {
    let f: Vec<&str> = line.split('\t').collect();
    let text_and_transliteration = f.get(1).copied().unwrap_or("");
    let translation = f.get(2).copied().unwrap_or("");
    let strong_and_grammars = f.get(3).copied().unwrap_or("");
    let dict_form_and_gloss = f.get(4).copied().unwrap_or("");
    let sources = f.get(5).copied().unwrap_or("");
    let meaning_variant = f.get(6).copied().unwrap_or("");
    let spelling_variant = f.get(7).copied().unwrap_or("");
    // The remaining fields (Spanish translation, sub-meaning, conjoin word,
    // sStrong, alt-Strong, note) are not emitted.

    let caps = TEXT_TRANSLIT
        .captures(text_and_transliteration)
        .ok_or_else(|| ParseError::MalformedTextField(text_and_transliteration.to_string()))?;
    let text = caps.get(1).map_or("", |m| m.as_str());
    let transliteration = caps.get(2).map_or("", |m| m.as_str());

    let canonical = parse_nt_fields(
        r,
        word,
        sources,
        text,
        transliteration,
        translation,
        strong_and_grammars,
        dict_form_and_gloss,
        None,
    )?;
    let mut morphemes = vec![canonical];

    for clause in meaning_variant.split('¦').map(str::trim).filter(|c| !c.is_empty()) {
        let c = variants::nt_meaning_clause(clause)?;
        morphemes.push(parse_nt_fields(
            r,
            word,
            c.sources,
            c.text,
            c.transliteration,
            c.translation,
            c.strong_and_grammars,
            "",
            Some(VariantKind::Meaning),
        )?);
    }

    for clause in spelling_variant.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let c = variants::nt_spelling_clause(clause)?;
        // A spelling difference leaves the annotation intact; clone it
        // from the canonical record.
        let mut m = morphemes[0].clone();
        m.variant = Some(VariantKind::Spelling);
        m.text = c.text.to_string();
        m.sources = fmt_sources(c.sources);
        morphemes.push(m);
    }

    for m in morphemes {
        out.write(m)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn parse_nt_fields(
    r: &Ref,
    word: u32,
    sources: &str,
    text: &str,
    transliteration: &str,
    translation: &str,
    strong_and_grammars: &str,
    dict_form_and_gloss: &str,
    variant: Option<VariantKind>,
) -> Result<Morpheme, ParseError> {
    let sg = split_pairs(strong_and_grammars, ParseError::MalformedStrongGrammar)?;
    let strongs: Vec<String> = sg.iter().map(|&(s, _)| strip_lang_letter(s)).collect();
    let grammars: Vec<&str> = sg.iter().map(|&(_, g)| g).collect();

    let dg = split_pairs(dict_form_and_gloss, ParseError::MalformedDictGloss)?;
    let dict_forms: Vec<&str> = dg.iter().map(|&(d, _)| d).collect();
    let glosses: Vec<&str> = dg.iter().map(|&(_, g)| g).collect();

    Ok(Morpheme {
        variant,
        sources: fmt_sources(sources),
        book: r.book,
        chapter: r.chapter,
        verse: r.verse,
        word,
        lang: Some(Lang::Grk),
        strong: strongs.join(","),
        text: text.to_string(),
        grammar: grammars.join(","),
        transliteration: transliteration.to_string(),
        translation: translation.to_string(),
        dict_form: dict_forms.join(","),
        gloss: glosses.join(","),
    })
}

/// Split a `+`-joined list of `left=right` pairs into parallel halves.
/// A pair that does not split into exactly two parts is fatal.
fn split_pairs(
    field: &str,
    err: fn(String) -> ParseError,
) -> Result<Vec<(&str, &str)>, ParseError> {
    if field.is_empty() {
        return Ok(vec![]);
    }
    field
        .split('+')
        .map(|pair| {
            let mut it = pair.split('=');
            match (it.next(), it.next(), it.next()) {
                (Some(l), Some(rhs), None) => Ok((l.trim(), rhs.trim())),
                _ => Err(err(pair.to_string())),
            }
        })
        .collect()
}

/// `G1364` → `1364`: the leading letter restates the corpus language.
fn strip_lang_letter(s: &str) -> String {
    let mut chars = s.chars();
    chars.next();
    chars.as_str().to_string()
}

/// Witness lists arrive `+`-joined; records carry them comma-joined.
fn fmt_sources(sources: &str) -> String {
    sources.split('+').map(str::trim).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    const REV_LINE: &str = "Rev.9.16#08=N(k)O\tδισμυριάδες (dismuriades)\ttwice ten thousand\tG1364=ADV + G3461=N-NPF\tδίς=twice + μυριάς=myriad\tNA28+NA27+Tyn+SBL+WH\tδύο μυριάδες (t=duo muriades) twenty thousand - G1417=A-NUI + G3461=N-NPF in: Treg+TR\tWH: δὶς μυριάδες ;\tdiez miles\ttwice + myriads\t#08\tG3461_A, G1364\tG1417, G6019\t";

    fn parse_str(input: &str) -> Vec<Morpheme> {
        let mut out = Vec::new();
        parse_tagnt(input.as_bytes(), &mut out).unwrap();
        out
    }

    #[test]
    fn test_canonical_record() {
        let ms = parse_str(REV_LINE);
        let m = &ms[0];
        assert_eq!(m.variant, None);
        assert_eq!(m.text, "δισμυριάδες");
        assert_eq!(m.transliteration, "dismuriades");
        assert_eq!(m.translation, "twice ten thousand");
        assert_eq!(m.strong, "1364,3461");
        assert_eq!(m.grammar, "ADV,N-NPF");
        assert_eq!(m.dict_form, "δίς,μυριάς");
        assert_eq!(m.gloss, "twice,myriad");
        assert_eq!(m.sources, "NA28,NA27,Tyn,SBL,WH");
        assert_eq!(m.lang, Some(Lang::Grk));
        assert_eq!(m.word, 1);
    }

    #[test]
    fn test_meaning_variant_record() {
        let ms = parse_str(REV_LINE);
        let m = &ms[1];
        assert_eq!(m.variant, Some(VariantKind::Meaning));
        assert_eq!(m.text, "δύο μυριάδες");
        assert_eq!(m.transliteration, "duo muriades");
        assert_eq!(m.translation, "twenty thousand");
        assert_eq!(m.strong, "1417,3461");
        assert_eq!(m.grammar, "A-NUI,N-NPF");
        assert_eq!(m.sources, "Treg,TR");
        assert_eq!(m.dict_form, "");
    }

    #[test]
    fn test_spelling_variant_clones_canonical_annotation() {
        let ms = parse_str(REV_LINE);
        assert_eq!(ms.len(), 3);
        let m = &ms[2];
        assert_eq!(m.variant, Some(VariantKind::Spelling));
        assert_eq!(m.text, "δὶς μυριάδες");
        assert_eq!(m.sources, "WH");
        // Annotation carried over from the canonical record.
        assert_eq!(m.strong, "1364,3461");
        assert_eq!(m.grammar, "ADV,N-NPF");
        assert_eq!(m.dict_form, "δίς,μυριάς");
    }

    #[test]
    fn test_word_index_advances_per_line() {
        let input = "Jhn.1.1#01=NKO\tἘν (en)\tin\tG1722=PREP\tἐν=in\tNA28\t\t\n\
                     Jhn.1.1#02=NKO\tἀρχῇ (archē)\tbeginning\tG0746=N-DSF\tἀρχή=beginning\tNA28\t\t\n\
                     Jhn.1.2#01=NKO\tοὗτος (houtos)\tthis one\tG3778=D-NSM\tοὗτος=this\tNA28\t\t\n";
        let ms = parse_str(input);
        assert_eq!(ms.len(), 3);
        assert_eq!(ms[0].word, 1);
        assert_eq!(ms[1].word, 2);
        assert_eq!(ms[2].word, 1);
        assert_eq!(ms[0].strong, "1722");
    }

    #[test]
    fn test_malformed_strong_grammar_aborts() {
        let input = "Jhn.1.1#01=NKO\tἘν (en)\tin\tG1722\tἐν=in\tNA28\t\t\n";
        let mut out: Vec<Morpheme> = Vec::new();
        let err = parse_tagnt(input.as_bytes(), &mut out).unwrap_err();
        assert!(err.to_string().contains("strong=grammar"));
    }

    #[test]
    fn test_split_pairs_rejects_extra_equals() {
        let err = split_pairs("G1=A=B", ParseError::MalformedStrongGrammar).unwrap_err();
        assert!(matches!(err, ParseError::MalformedStrongGrammar(_)));
    }
}
