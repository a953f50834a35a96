// src/sentiment/text.rs
//! Free-text scorer: cleans the input, runs every configured sub-scorer and
//! averages whichever ones succeed. Output is always in [-1, 1].

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::lexicon::{booster, intensity, is_negator, POLARITY, VALENCE};

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .expect("url regex")
});
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?]").expect("special-char regex"));

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "happy",
    "joy",
    "love",
    "like",
    "enjoy",
    "pleased",
    "satisfied",
    "positive",
    "optimistic",
    "hopeful",
    "confident",
    "energetic",
    "motivated",
    "excited",
    "grateful",
    "thankful",
    "blessed",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "hate",
    "sad",
    "depressed",
    "angry",
    "frustrated",
    "annoyed",
    "upset",
    "negative",
    "pessimistic",
    "hopeless",
    "worried",
    "anxious",
    "stressed",
    "tired",
    "exhausted",
    "lonely",
    "isolated",
];

/// Lower-case, drop URLs, collapse whitespace, drop everything except word
/// characters, whitespace and `. , ! ?`, then trim.
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_urls = URL_RE.replace_all(&lower, "");
    let collapsed = WS_RE.replace_all(&no_urls, " ");
    let stripped = SPECIAL_RE.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Word tokens of already-cleaned text (punctuation dropped).
fn words(cleaned: &str) -> Vec<&str> {
    cleaned
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// One independent estimate of text sentiment in [-1, 1].
///
/// Implementations receive text that has already gone through [`clean_text`].
pub trait SubScorer: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, cleaned: &str) -> Result<f64>;
}

/// Lexicon polarity: mean polarity of the polar words, with intensifiers
/// scaling and a directly preceding negator flipping at half strength.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternPolarity;

impl SubScorer for PatternPolarity {
    fn name(&self) -> &'static str {
        "pattern_polarity"
    }

    fn score(&self, cleaned: &str) -> Result<f64> {
        let lex = POLARITY
            .as_ref()
            .ok_or_else(|| anyhow!("polarity lexicon unavailable"))?;
        let toks = words(cleaned);

        let mut contributions = Vec::new();
        for (i, tok) in toks.iter().enumerate() {
            let Some(&base) = lex.get(*tok) else { continue };
            let mut v = base;

            let prev = i.checked_sub(1).map(|j| toks[j]);
            let prev_mult = prev.and_then(intensity);
            if let Some(m) = prev_mult {
                v *= m;
            }

            // "not good" and "not very good" both negate.
            let negated = match (prev, prev_mult) {
                (Some(p), _) if is_negator(p) => true,
                (Some(_), Some(_)) => i >= 2 && is_negator(toks[i - 2]),
                _ => false,
            };
            if negated {
                v *= -0.5;
            }
            contributions.push(v.clamp(-1.0, 1.0));
        }

        if contributions.is_empty() {
            return Ok(0.0);
        }
        let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
        Ok(mean.clamp(-1.0, 1.0))
    }
}

/// Valence-aware compound score (boosters, negation, "but", punctuation
/// emphasis), normalized with `s / sqrt(s² + 15)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValenceCompound;

const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZATION_ALPHA: f64 = 15.0;
const BOOSTER_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

impl SubScorer for ValenceCompound {
    fn name(&self) -> &'static str {
        "valence_compound"
    }

    fn score(&self, cleaned: &str) -> Result<f64> {
        let lex = VALENCE
            .as_ref()
            .ok_or_else(|| anyhow!("valence lexicon unavailable"))?;
        let toks = words(cleaned);

        let mut sentiments = vec![0.0f64; toks.len()];
        for (i, tok) in toks.iter().enumerate() {
            let Some(&base) = lex.get(*tok) else { continue };
            let mut v = base;

            for k in 1..=3 {
                if i < k {
                    break;
                }
                if let Some(b) = booster(toks[i - k]) {
                    let signed = if v < 0.0 { -b } else { b };
                    v += signed * BOOSTER_DAMPING[k - 1];
                }
            }

            if (1..=3).any(|k| i >= k && is_negator(toks[i - k])) {
                v *= NEGATION_SCALAR;
            }
            sentiments[i] = v;
        }

        if let Some(but_at) = toks.iter().position(|t| *t == "but") {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < but_at {
                    *s *= 0.5;
                } else if i > but_at {
                    *s *= 1.5;
                }
            }
        }

        let mut sum: f64 = sentiments.iter().sum();
        if sum == 0.0 {
            return Ok(0.0);
        }

        let exclamations = cleaned.matches('!').count().min(4) as f64;
        let questions = cleaned.matches('?').count();
        let question_emphasis = match questions {
            0 | 1 => 0.0,
            2 | 3 => questions as f64 * 0.18,
            _ => 0.96,
        };
        let emphasis = exclamations * 0.292 + question_emphasis;
        if sum > 0.0 {
            sum += emphasis;
        } else {
            sum -= emphasis;
        }

        let compound = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
        Ok(compound.clamp(-1.0, 1.0))
    }
}

/// `(pos - neg) / (pos + neg)` over exact whitespace-token matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordCount;

impl SubScorer for KeywordCount {
    fn name(&self) -> &'static str {
        "keyword_count"
    }

    fn score(&self, cleaned: &str) -> Result<f64> {
        let (mut pos, mut neg) = (0usize, 0usize);
        for w in cleaned.split_whitespace() {
            if POSITIVE_WORDS.contains(&w) {
                pos += 1;
            } else if NEGATIVE_WORDS.contains(&w) {
                neg += 1;
            }
        }
        if pos + neg == 0 {
            return Ok(0.0);
        }
        Ok((pos as f64 - neg as f64) / (pos + neg) as f64)
    }
}

/// Ensemble of sub-scorers. Immutable after construction, so one instance
/// can be shared across any number of concurrent requests.
pub struct TextScorer {
    scorers: Vec<Box<dyn SubScorer>>,
}

impl TextScorer {
    /// Polarity + (optionally) compound + keyword heuristic.
    pub fn new(compound_enabled: bool) -> Self {
        let mut scorers: Vec<Box<dyn SubScorer>> = vec![Box::new(PatternPolarity)];
        if compound_enabled {
            scorers.push(Box::new(ValenceCompound));
        }
        scorers.push(Box::new(KeywordCount));
        Self { scorers }
    }

    pub fn with_scorers(scorers: Vec<Box<dyn SubScorer>>) -> Self {
        Self { scorers }
    }

    pub fn scorer_names(&self) -> Vec<&'static str> {
        self.scorers.iter().map(|s| s.name()).collect()
    }

    /// Score free text in [-1, 1]. `None`, empty or whitespace-only input is
    /// neutral (0.0).
    pub fn score(&self, text: Option<&str>) -> f64 {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return 0.0;
        };
        let cleaned = clean_text(text);

        let successes: Vec<f64> = self
            .scorers
            .iter()
            .filter_map(|s| match s.score(&cleaned) {
                Ok(v) => Some(v),
                Err(e) => {
                    debug!(scorer = s.name(), error = %e, "sub-scorer skipped");
                    None
                }
            })
            .collect();

        if successes.is_empty() {
            return 0.0;
        }
        let mean = successes.iter().sum::<f64>() / successes.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl Default for TextScorer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for TextScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextScorer")
            .field("scorers", &self.scorer_names())
            .finish()
    }
}
