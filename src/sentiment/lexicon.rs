// src/sentiment/lexicon.rs
//! Embedded word lexicons used by the text sub-scorers.
//!
//! Both lexicons ship inside the binary (`include_str!`) and are parsed once,
//! on first use. A lexicon that fails to parse stays `None`; the sub-scorer
//! that needs it reports an error and the text scorer skips it.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

/// Word → polarity in [-1, 1].
pub(crate) static POLARITY: Lazy<Option<HashMap<String, f64>>> =
    Lazy::new(|| parse("polarity", include_str!("../../lexicon/polarity.json")));

/// Word → valence in [-4, 4].
pub(crate) static VALENCE: Lazy<Option<HashMap<String, f64>>> =
    Lazy::new(|| parse("valence", include_str!("../../lexicon/valence.json")));

fn parse(name: &str, raw: &str) -> Option<HashMap<String, f64>> {
    match serde_json::from_str::<HashMap<String, f64>>(raw) {
        Ok(map) => Some(map),
        Err(e) => {
            warn!(lexicon = name, error = %e, "lexicon failed to parse; sub-scorer disabled");
            None
        }
    }
}

/// Negation words. Cleaning strips apostrophes, so contractions arrive as `dont`, `wasnt`.
pub(crate) fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "nothing"
            | "nobody"
            | "none"
            | "neither"
            | "nor"
            | "cannot"
            | "without"
            | "isnt"
            | "wasnt"
            | "arent"
            | "werent"
            | "dont"
            | "doesnt"
            | "didnt"
            | "cant"
            | "wont"
            | "couldnt"
            | "shouldnt"
            | "havent"
            | "hasnt"
    )
}

/// Multiplier a preceding intensifier applies to the next polar word.
pub(crate) fn intensity(tok: &str) -> Option<f64> {
    let m = match tok {
        "very" | "really" | "so" | "truly" | "super" => 1.3,
        "extremely" | "incredibly" | "absolutely" | "totally" | "completely" => 1.5,
        "quite" | "pretty" => 1.1,
        "slightly" | "somewhat" | "barely" | "little" => 0.5,
        _ => return None,
    };
    Some(m)
}

/// Additive valence boost for booster words (sign applied by the caller).
pub(crate) fn booster(tok: &str) -> Option<f64> {
    const B_INCR: f64 = 0.293;
    const B_DECR: f64 = -0.293;
    match tok {
        "very" | "really" | "so" | "extremely" | "incredibly" | "absolutely" | "totally"
        | "completely" | "truly" | "super" | "deeply" | "especially" | "hugely" | "most"
        | "more" => Some(B_INCR),
        "slightly" | "somewhat" | "barely" | "hardly" | "kinda" | "marginally" | "less"
        | "little" | "occasionally" | "partly" => Some(B_DECR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_lexicons_parse() {
        let pol = POLARITY.as_ref().expect("polarity lexicon");
        let val = VALENCE.as_ref().expect("valence lexicon");
        assert!(pol.values().all(|v| (-1.0..=1.0).contains(v)));
        assert!(val.values().all(|v| (-4.0..=4.0).contains(v)));
        assert!(pol.contains_key("great") && val.contains_key("great"));
    }

    #[test]
    fn negators_cover_contractions() {
        assert!(is_negator("not"));
        assert!(!is_negator("nothingness"));
        let cleaned = crate::sentiment::text::clean_text("I don't know, it wasn't bad");
        let negators: Vec<&str> = cleaned
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| is_negator(t))
            .collect();
        assert_eq!(negators, vec!["dont", "wasnt"]);
    }
}
