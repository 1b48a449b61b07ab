// Alignment of under-specified variant morphemes against annotated ones.

use crate::error::ParseError;
use crate::similarity::{consonants, similarity};
use crate::types::{Morpheme, VariantKind};

/// Morpheme fields the aligner may copy from the winning candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignField {
    Lang,
    Strong,
    Grammar,
    Transliteration,
    Translation,
}

/// The full annotation set, for spelling variants that carry nothing.
pub const ALL_FIELDS: &[AlignField] = &[
    AlignField::Lang,
    AlignField::Strong,
    AlignField::Grammar,
    AlignField::Transliteration,
    AlignField::Translation,
];

/// Minimum score an alignment must reach to be accepted.
pub const THRESHOLD: f64 = 0.7;

/// Punctuation glyphs carry fixed strong numbers; they are matched by
/// table, never scored.
const PUNCTUATION: &[(&str, &str)] = &[("־", "9014"), ("׀", "9015"), ("׃", "9016")];

pub fn punctuation_strong(text: &str) -> Option<&'static str> {
    PUNCTUATION
        .iter()
        .find(|(glyph, _)| *glyph == text)
        .map(|&(_, strong)| strong)
}

/// Enrich `m` with the requested fields from the best-matching candidate.
///
/// Punctuation short-circuits (manuscripts differ freely in punctuation).
/// Otherwise the candidate with the highest raw-or-skeleton similarity
/// wins, provided it clears the threshold; ties keep the earliest
/// candidate. A below-threshold spelling variant is fatal, because an
/// unaligned spelling variant would lose every annotation field. Other
/// variants are left under-annotated.
pub fn align(
    m: &mut Morpheme,
    candidates: &[Morpheme],
    fields: &[AlignField],
) -> Result<(), ParseError> {
    if let Some(strong) = punctuation_strong(&m.text) {
        if fields.contains(&AlignField::Strong) {
            m.strong = strong.to_string();
        }
        if fields.contains(&AlignField::Lang) {
            m.lang = candidates.first().and_then(|c| c.lang);
        }
        return Ok(());
    }

    let mut best = 0.0f64;
    let mut best_i = 0usize;
    for (i, c) in candidates.iter().enumerate() {
        let s = score(m, c);
        if s > best {
            best = s;
            best_i = i;
        }
    }

    if best >= THRESHOLD {
        let c = &candidates[best_i];
        if best < 1.0 {
            tracing::debug!("{} matches {} at {:.2}", m.locator(), c.text, best);
        }
        for field in fields {
            match field {
                AlignField::Lang => m.lang = c.lang,
                AlignField::Strong => m.strong = c.strong.clone(),
                AlignField::Grammar => m.grammar = c.grammar.clone(),
                AlignField::Transliteration => m.transliteration = c.transliteration.clone(),
                AlignField::Translation => m.translation = c.translation.clone(),
            }
        }
        return Ok(());
    }

    if m.variant == Some(VariantKind::Spelling) {
        let diagnostics = candidates
            .iter()
            .map(|c| {
                format!(
                    "  {} raw {:.2} skeleton {:.2}",
                    c.text,
                    similarity(&m.text, &c.text),
                    similarity(&consonants(&m.text), &consonants(&c.text)),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        return Err(ParseError::AlignmentFailure {
            text: m.text.clone(),
            locator: m.locator(),
            best,
            diagnostics,
        });
    }

    Ok(())
}

/// Max of raw and consonant-skeleton similarity. Punctuation candidates
/// never match by score.
fn score(m: &Morpheme, candidate: &Morpheme) -> f64 {
    if punctuation_strong(&candidate.text).is_some() {
        return 0.0;
    }
    similarity(&m.text, &candidate.text).max(similarity(
        &consonants(&m.text),
        &consonants(&candidate.text),
    ))
}
