// Hebrew/Aramaic OT line-stream parsing.
//
// One tab-separated line per annotated source word:
//   Ref & Type:        Gen.12.8#08=Q(K)
//   Hebrew:            אָהְָל֑/וֹ
//   Transliteration:   'o.ho.L/o
//   Translation:       tent/ his
//   dStrongs:          {H0168G}/H9023
//   Grammar:           HNcmsc/Sp3ms
//   Meaning Variants:  K= 'o.ho.Lo/h (אָהֳלֹ/ה) "tent/ his" (H0168G/H9023=HNcbsc/Sp3ms)
//   Spelling Variants: L= אָהֳלֹ֑/ה ¦ ;

use std::io::BufRead;

use crate::align::{self, ALL_FIELDS};
use crate::error::ParseError;
use crate::fields::parse_fields;
use crate::reference::Ref;
use crate::types::{Morpheme, Sink, VariantKind};
use crate::variants;

/// Hebrew maqaf: conjoins the following word, which then shares its index.
const MAQAF: char = '־';

/// Parse one OT corpus file into morpheme records.
///
/// Lines are consumed strictly in order: the running per-verse word index
/// and verse-boundary detection are fold state across lines. Lines whose
/// first field is not a valid reference are skipped; any other failure
/// aborts the file, carrying the offending raw line.
pub fn parse_tahot<R: BufRead, S: Sink<Morpheme>>(reader: R, out: &mut S) -> Result<(), ParseError> {
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

        word = parse_line(&line, &r, word, out).map_err(|e| e.with_line(&line))?;
        last_ref = Some(r);
    }
    Ok(())
}

/// Process one reference-bearing line; returns the next line's starting
/// word index.
fn parse_line<S: Sink<Morpheme>>(
    line: &str,
    r: &Ref,
    word: u32,
    out: &mut S,
) -> Result<u32, ParseError> {
    let f: Vec<&str> = line.split('\t').collect();
    let text = f.get(1).copied().unwrap_or("");
    let transliteration = f.get(2).copied().unwrap_or("");
    let translation = f.get(3).copied().unwrap_or("");
    let strongs = f.get(4).copied().unwrap_or("");
    let grammar = f.get(5).copied().unwrap_or("");
    let meaning_variant = f.get(6).copied().unwrap_or("");
    let spelling_variant = f.get(7).copied().unwrap_or("");

    let mut morphemes = parse_fields(
        &r.sources,
        r,
        word,
        text,
        strongs,
        grammar,
        transliteration,
        translation,
        None,
    )?;

    // The next starting index comes from the canonical morphemes alone;
    // a trailing maqaf conjoins the following word.
    let next_word = match morphemes.last() {
        Some(m) => m.word + if m.text.ends_with(MAQAF) { 0 } else { 1 },
        None => word + 1,
    };

    for clause in variants::split_clauses(meaning_variant) {
        let c = variants::meaning_clause(clause)?;
        morphemes.extend(parse_fields(
            c.sources,
            r,
            word,
            c.text,
            c.strongs,
            c.grammar,
            c.transliteration,
            c.translation,
            Some(VariantKind::Meaning),
        )?);
    }

    for clause in variants::split_clauses(spelling_variant) {
        let c = variants::spelling_clause(clause)?;
        // Spelling variants carry bare text; every annotation field is
        // recovered by aligning against this line's morphemes. The goal is
        // zero manual alignment.
        let mut unaligned = parse_fields(
            c.sources,
            r,
            word,
            c.text,
            "",
            "",
            "",
            "",
            Some(VariantKind::Spelling),
        )?;
        for m in &mut unaligned {
            align::align(m, &morphemes, ALL_FIELDS)?;
        }
        morphemes.append(&mut unaligned);
    }

    for m in morphemes {
        // The corpus has sparse annotation gaps; these are worth noting
        // but are not errors.
        if m.grammar.is_empty() && align::punctuation_strong(&m.text).is_none() {
            tracing::warn!("missing grammar: {}", m.locator());
        }
        if m.strong.is_empty() {
            tracing::warn!("missing strong: {}", m.locator());
        }
        out.write(m)?;
    }

    Ok(next_word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Lang;

    fn parse_str(input: &str) -> Vec<Morpheme> {
        let mut out = Vec::new();
        parse_tahot(input.as_bytes(), &mut out).unwrap();
        out
    }

    #[test]
    fn test_word_index_resets_on_verse_change() {
        let input = "Gen.1.1#01=L\tבְּ/רֵאשִׁ֖ית\tbe/re.Shit\tin/ beginning\tH9003/{H7225}\tHR/Ncfsa\t\t\n\
                     Gen.1.1#02=L\tבָּרָ֣א\tba.Ra\the created\t{H1254A}\tHVqp3ms\t\t\n\
                     Gen.1.2#01=L\tוְ/הָ/אָ֗רֶץ\tve/ha/A.retz\tand/ the/ earth\tH9002/H9009/{H0776}\tHC/Td/Ncbsa\t\t\n";
        let ms = parse_str(input);
        assert_eq!(ms.len(), 6);
        assert_eq!(ms[0].word, 1);
        assert_eq!(ms[1].word, 1);
        assert_eq!(ms[2].word, 2);
        // New verse: back to 1 for all three morphemes of the first word.
        assert_eq!(ms[3].word, 1);
        assert_eq!(ms[4].word, 1);
        assert_eq!(ms[5].word, 1);
        assert_eq!(ms[3].verse, 2);
    }

    #[test]
    fn test_maqaf_conjoins_next_word() {
        let input = "Gen.1.1#03=L\tאֶת־\tet\t[obj]\t{H0853}\tHTo\t\t\n\
                     Gen.1.1#04=L\tהַ/שָּׁמַ֖יִם\tha/sha.Ma.yim\tthe/ heavens\tH9009/{H8064}\tHTd/Ncmpa\t\t\n";
        let ms = parse_str(input);
        assert_eq!(ms.len(), 3);
        assert_eq!(ms[0].word, 1);
        // The maqaf-joined word shares the index.
        assert_eq!(ms[1].word, 1);
        assert_eq!(ms[2].word, 1);
    }

    #[test]
    fn test_invalid_reference_skips_line() {
        let input = "TAHOT Gen-Deu - header line\n\
                     Foo.1.1=X\tbad\t\t\t\t\t\t\n\
                     # comment\n\
                     Gen.1.1#01=L\tאוֹר\tor\tlight\t{H0216}\tHNcbsa\t\t\n";
        let ms = parse_str(input);
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].text, "אוֹר");
    }

    #[test]
    fn test_variants_share_the_word_index() {
        let input = "Gen.12.8#08=Q(K)\tאָהְָל֑/וֹ\t'o.ho.L/o\ttent/ his\t{H0168G}/H9023\tHNcmsc/Sp3ms\tK= 'o.ho.Lo/h (אָהֳלֹ/ה) \"tent/ his\" (H0168G/H9023=HNcbsc/Sp3ms)\tL= אָהֳלֹ֑/ה ¦ ;\n";
        let ms = parse_str(input);
        assert_eq!(ms.len(), 6);

        // Canonical pair.
        assert_eq!(ms[0].variant, None);
        assert_eq!(ms[0].sources, "Q(K)");
        assert_eq!(ms[0].strong, "0168G");
        assert_eq!(ms[1].strong, "9023");

        // Meaning variant, fully annotated at parse time.
        assert_eq!(ms[2].variant, Some(VariantKind::Meaning));
        assert_eq!(ms[2].sources, "K");
        assert_eq!(ms[2].text, "אָהֳלֹ");
        assert_eq!(ms[2].grammar, "Ncbsc");
        assert_eq!(ms[3].text, "ה");
        assert_eq!(ms[3].strong, "9023");

        // Spelling variant, annotated through alignment.
        assert_eq!(ms[4].variant, Some(VariantKind::Spelling));
        assert_eq!(ms[4].sources, "L");
        assert_eq!(ms[4].strong, "0168G");
        assert_eq!(ms[4].lang, Some(Lang::Heb));
        assert_eq!(ms[4].translation, "tent");
        // The bare suffix ה matches the meaning variant's ה exactly and
        // inherits its annotation.
        assert_eq!(ms[5].strong, "9023");
        assert_eq!(ms[5].grammar, "Sp3ms");
        assert_eq!(ms[5].translation, "his");

        // All morphemes of one source word share the index.
        assert!(ms.iter().all(|m| m.word == 1));
    }

    #[test]
    fn test_unalignable_spelling_variant_aborts() {
        let input = "Gen.1.1#01=L\tאוֹר\tor\tlight\t{H0216}\tHNcbsa\t\tL= שׁמש\n";
        let mut out: Vec<Morpheme> = Vec::new();
        let err = parse_tahot(input.as_bytes(), &mut out).unwrap_err();
        let ParseError::Line { source, .. } = err else {
            panic!("expected line wrapper, got {err:?}");
        };
        assert!(matches!(*source, ParseError::AlignmentFailure { .. }));
    }

    #[test]
    fn test_malformed_meaning_variant_aborts() {
        let input = "Gen.1.1#01=L\tאוֹר\tor\tlight\t{H0216}\tHNcbsa\tK= broken clause\t\n";
        let mut out: Vec<Morpheme> = Vec::new();
        let err = parse_tahot(input.as_bytes(), &mut out).unwrap_err();
        assert!(err.to_string().contains("malformed meaning variant"));
    }
}
