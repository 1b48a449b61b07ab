// Field splitting: the five parallel slot-fields of one line become an
// ordered sequence of morpheme records.

use crate::error::ParseError;
use crate::reference::Ref;
use crate::types::{Lang, Morpheme, VariantKind};

/// Morpheme separators: `/` between morphemes, `\` attaching trailing
/// punctuation strong numbers.
const SEPARATORS: [char; 2] = ['/', '\\'];

/// Split the parallel text/strong/grammar/transliteration/translation
/// fields on the morpheme separators and zip them into morpheme records.
///
/// The corpus guarantees positional alignment for canonical lines only;
/// variant strings may carry shorter annotation fields, so every
/// non-text array is indexed optionally and defaults to empty. An empty
/// text slot is a null morpheme: nothing is emitted, but the word index
/// still advances so sibling fields stay aligned downstream.
///
/// The language is derived once from the first grammar entry's leading
/// letter, which is then stripped (it tags the language, not the
/// morphology).
#[allow(clippy::too_many_arguments)]
pub fn parse_fields(
    sources: &str,
    r: &Ref,
    word: u32,
    text: &str,
    strongs: &str,
    grammar: &str,
    transliteration: &str,
    translation: &str,
    variant: Option<VariantKind>,
) -> Result<Vec<Morpheme>, ParseError> {
    let texts: Vec<&str> = text.split(SEPARATORS).collect();
    let strongs: Vec<&str> = strongs.split(SEPARATORS).collect();
    let mut grammars: Vec<&str> = grammar.split(SEPARATORS).collect();
    let transliterations: Vec<&str> = transliteration.split(SEPARATORS).collect();
    let translations: Vec<&str> = translation.split(SEPARATORS).collect();

    // Source text is never entirely absent on a valid reference line.
    if texts.is_empty() {
        return Err(ParseError::EmptyTextField(r.to_string()));
    }

    let first_grammar: &str = grammars[0];
    let lang = match first_grammar.chars().next() {
        Some('H') => Some(Lang::Heb),
        Some('A') => Some(Lang::Arc),
        Some('G') => Some(Lang::Grk),
        None => None,
        Some(_) => return Err(ParseError::UnknownGrammarPrefix(grammar.to_string())),
    };
    if !first_grammar.is_empty() {
        grammars[0] = &first_grammar[1..];
    }

    let mut word = word;
    let mut res = Vec::new();
    for (i, slot) in texts.iter().enumerate() {
        let text = slot.trim();
        if text.is_empty() {
            word += 1;
            continue;
        }

        res.push(Morpheme {
            variant,
            sources: sources.to_string(),
            book: r.book,
            chapter: r.chapter,
            verse: r.verse,
            word,
            lang,
            strong: clean_strong(strongs.get(i).copied().unwrap_or("")),
            text: text.to_string(),
            grammar: trimmed(&grammars, i),
            transliteration: trimmed(&transliterations, i),
            translation: trimmed(&translations, i),
            dict_form: String::new(),
            gloss: String::new(),
        });
    }
    Ok(res)
}

fn trimmed(slots: &[&str], i: usize) -> String {
    slots.get(i).map(|s| s.trim()).unwrap_or("").to_string()
}

/// Strip `{}` braces, whitespace, and the leading language letter from a
/// strong number: `{H0168G}` becomes `0168G`.
fn clean_strong(raw: &str) -> String {
    let s: String = raw.chars().filter(|c| !matches!(c, '{' | '}')).collect();
    let mut chars = s.trim().chars();
    chars.next();
    chars.as_str().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::Book;

    fn gen_ref() -> Ref {
        Ref {
            book: Book::Genesis,
            chapter: 12,
            verse: 8,
            sources: "Q(K)".to_string(),
        }
    }

    #[test]
    fn test_canonical_hebrew_line() {
        let r = gen_ref();
        let ms = parse_fields(
            &r.sources,
            &r,
            8,
            "אָהְָל֑/וֹ",
            "{H0168G}/H9023",
            "HNcmsc/Sp3ms",
            "'o.ho.L/o",
            "tent/ his",
            None,
        )
        .unwrap();

        assert_eq!(ms.len(), 2);
        assert_eq!(ms[0].word, 8);
        assert_eq!(ms[1].word, 8);
        assert_eq!(ms[0].lang, Some(Lang::Heb));
        assert_eq!(ms[1].lang, Some(Lang::Heb));
        assert_eq!(ms[0].strong, "0168G");
        assert_eq!(ms[1].strong, "9023");
        assert_eq!(ms[0].grammar, "Ncmsc");
        assert_eq!(ms[1].grammar, "Sp3ms");
        assert_eq!(ms[0].text, "אָהְָל֑");
        assert_eq!(ms[1].text, "וֹ");
        assert_eq!(ms[0].translation, "tent");
        assert_eq!(ms[1].translation, "his");
    }

    #[test]
    fn test_empty_slot_advances_word() {
        let r = gen_ref();
        let ms = parse_fields(&r.sources, &r, 3, "א//ב", "", "", "", "", None).unwrap();
        assert_eq!(ms.len(), 2);
        assert_eq!(ms[0].word, 3);
        assert_eq!(ms[1].word, 4);
    }

    #[test]
    fn test_backslash_separates_punctuation() {
        let r = gen_ref();
        let ms = parse_fields(
            &r.sources,
            &r,
            1,
            "אָהֳלֹ/ה\\׃",
            "H0168G/H9023\\H9016",
            "HNcbsc/Sp3ms",
            "",
            "",
            None,
        )
        .unwrap();
        assert_eq!(ms.len(), 3);
        assert_eq!(ms[2].text, "׃");
        assert_eq!(ms[2].strong, "9016");
    }

    #[test]
    fn test_aramaic_prefix() {
        let r = gen_ref();
        let ms = parse_fields(&r.sources, &r, 1, "מִלְּתָ/א", "", "ANcfsd/Td", "", "", None).unwrap();
        assert_eq!(ms[0].lang, Some(Lang::Arc));
        assert_eq!(ms[0].grammar, "Ncfsd");
    }

    #[test]
    fn test_unknown_grammar_prefix_is_fatal() {
        let r = gen_ref();
        let err = parse_fields(&r.sources, &r, 1, "א", "", "Xq", "", "", None).unwrap_err();
        assert!(matches!(err, ParseError::UnknownGrammarPrefix(_)));
    }

    #[test]
    fn test_no_grammar_leaves_lang_unset() {
        let r = gen_ref();
        let ms = parse_fields(&r.sources, &r, 1, "א", "", "", "", "", None).unwrap();
        assert_eq!(ms[0].lang, None);
        assert_eq!(ms[0].grammar, "");
        assert_eq!(ms[0].strong, "");
    }

    #[test]
    fn test_short_annotation_arrays_default_empty() {
        let r = gen_ref();
        let ms = parse_fields(&r.sources, &r, 1, "א/ב/ג", "H1234", "", "", "", None).unwrap();
        assert_eq!(ms.len(), 3);
        assert_eq!(ms[0].strong, "1234");
        assert_eq!(ms[1].strong, "");
        assert_eq!(ms[2].strong, "");
    }

    #[test]
    fn test_variant_tag_carried() {
        let r = gen_ref();
        let ms = parse_fields(
            &r.sources,
            &r,
            1,
            "א",
            "",
            "",
            "",
            "",
            Some(VariantKind::Spelling),
        )
        .unwrap();
        assert_eq!(ms[0].variant, Some(VariantKind::Spelling));
    }
}
