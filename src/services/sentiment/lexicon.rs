//! Lexicon-based polarity scoring for short financial texts.
//!
//! A valence lexicon in the VADER style: each known word carries a valence in
//! roughly [-4, 4], adjusted by nearby negations and intensity boosters,
//! contrast after "but", ALL-CAPS emphasis and trailing exclamation marks.
//! The summed valence is squashed into a compound score in [-1, 1].

use std::collections::{HashMap, HashSet};

/// Normalization constant for the compound squash.
const ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const BOOSTER_INCR: f64 = 0.293;
const CAPS_INCR: f64 = 0.733;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Words up to this many positions back can modify a valence word.
const LOOKBACK: usize = 3;

const LEXICON: &[(&str, f64)] = &[
    // Market moves
    ("surge", 2.5),
    ("surges", 2.5),
    ("surged", 2.5),
    ("surging", 2.5),
    ("soar", 2.6),
    ("soars", 2.6),
    ("soared", 2.6),
    ("soaring", 2.6),
    ("rally", 2.2),
    ("rallies", 2.2),
    ("rallied", 2.2),
    ("jump", 1.8),
    ("jumps", 1.8),
    ("jumped", 1.8),
    ("climb", 1.5),
    ("climbs", 1.5),
    ("rebound", 1.6),
    ("rebounds", 1.6),
    ("recover", 1.5),
    ("recovery", 1.6),
    ("breakout", 1.9),
    ("boom", 2.2),
    ("moon", 1.5),
    ("rocket", 1.5),
    ("higher", 1.0),
    ("record", 1.2),
    ("plunge", -2.7),
    ("plunges", -2.7),
    ("plunged", -2.7),
    ("crash", -3.0),
    ("crashes", -3.0),
    ("crashed", -3.0),
    ("slump", -2.3),
    ("slumps", -2.3),
    ("tumble", -2.3),
    ("tumbles", -2.3),
    ("tumbled", -2.3),
    ("sink", -1.8),
    ("sinks", -1.8),
    ("fall", -1.5),
    ("falls", -1.5),
    ("fell", -1.5),
    ("drop", -1.6),
    ("drops", -1.6),
    ("dropped", -1.6),
    ("decline", -1.6),
    ("declines", -1.6),
    ("declined", -1.6),
    ("selloff", -2.3),
    ("dump", -1.6),
    ("lower", -1.0),
    // Fundamentals and analyst language
    ("beat", 1.8),
    ("beats", 1.8),
    ("upgrade", 2.0),
    ("upgraded", 2.0),
    ("upgrades", 2.0),
    ("outperform", 2.0),
    ("bullish", 2.5),
    ("buy", 1.2),
    ("profit", 1.9),
    ("profits", 1.9),
    ("profitable", 2.0),
    ("gain", 1.9),
    ("gains", 1.9),
    ("growth", 1.8),
    ("grow", 1.6),
    ("strong", 2.0),
    ("stronger", 2.0),
    ("optimistic", 2.1),
    ("opportunity", 1.8),
    ("innovative", 1.9),
    ("approval", 2.0),
    ("approved", 1.8),
    ("partnership", 1.4),
    ("dividend", 1.0),
    ("miss", -1.6),
    ("misses", -1.6),
    ("missed", -1.6),
    ("downgrade", -2.1),
    ("downgraded", -2.1),
    ("downgrades", -2.1),
    ("underperform", -2.0),
    ("bearish", -2.5),
    ("sell", -1.0),
    ("loss", -2.1),
    ("losses", -2.1),
    ("weak", -1.9),
    ("weaker", -1.9),
    ("pessimistic", -1.9),
    ("lawsuit", -1.8),
    ("fraud", -3.2),
    ("scam", -2.8),
    ("bankruptcy", -3.0),
    ("bankrupt", -3.0),
    ("layoffs", -2.0),
    ("recall", -1.5),
    ("warning", -1.5),
    ("warns", -1.5),
    ("investigation", -1.5),
    ("probe", -1.3),
    ("risk", -1.1),
    ("risky", -1.4),
    ("concern", -1.4),
    ("concerns", -1.4),
    ("fear", -2.2),
    ("fears", -1.9),
    ("recession", -2.4),
    ("debt", -1.2),
    ("volatile", -1.0),
    ("overvalued", -1.6),
    // General
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("better", 1.9),
    ("positive", 2.3),
    ("success", 2.7),
    ("successful", 2.8),
    ("win", 2.8),
    ("wins", 2.7),
    ("winning", 2.4),
    ("love", 3.2),
    ("happy", 2.7),
    ("impressive", 2.3),
    ("solid", 1.7),
    ("bad", -2.5),
    ("terrible", -2.5),
    ("awful", -2.0),
    ("worst", -3.1),
    ("worse", -2.1),
    ("poor", -2.1),
    ("negative", -2.3),
    ("fail", -2.5),
    ("fails", -2.3),
    ("failed", -2.3),
    ("failure", -2.3),
    ("hate", -2.7),
    ("sad", -2.1),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("trouble", -1.7),
    ("struggle", -1.7),
    ("struggles", -1.7),
    ("worried", -1.2),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nor", "without", "hardly", "neither", "cannot", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt",
    "won't", "wont", "can't", "cant", "couldn't", "shouldn't", "wouldn't",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("very", BOOSTER_INCR),
    ("extremely", BOOSTER_INCR),
    ("really", BOOSTER_INCR),
    ("highly", BOOSTER_INCR),
    ("hugely", BOOSTER_INCR),
    ("incredibly", BOOSTER_INCR),
    ("absolutely", BOOSTER_INCR),
    ("significantly", BOOSTER_INCR),
    ("sharply", BOOSTER_INCR),
    ("strongly", BOOSTER_INCR),
    ("massive", BOOSTER_INCR),
    ("slightly", -BOOSTER_INCR),
    ("somewhat", -BOOSTER_INCR),
    ("barely", -BOOSTER_INCR),
    ("marginally", -BOOSTER_INCR),
    ("kinda", -BOOSTER_INCR),
];

/// Scores text polarity as a compound value in [-1, 1].
pub struct PolarityAnalyzer {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for PolarityAnalyzer {
    fn default() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }
}

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_shouting(&self) -> bool {
        self.raw.len() > 1
            && self.raw.chars().any(|c| c.is_alphabetic())
            && self.raw.chars().all(|c| !c.is_lowercase())
    }
}

impl PolarityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compound polarity of `text`; 0.0 when no lexicon word is present.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<Token> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty())
            .map(|raw| Token {
                raw,
                lower: raw.to_lowercase(),
            })
            .collect();

        let shouting = tokens.iter().filter(|t| t.is_shouting()).count();
        // Emphasis only counts when some, but not all, words are capitalized.
        let caps_differential = shouting > 0 && shouting < tokens.len();

        let mut valences: Vec<f64> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.lower.as_str()) else {
                valences.push(0.0);
                continue;
            };

            let mut valence = base;
            if caps_differential && token.is_shouting() {
                valence += CAPS_INCR * valence.signum();
            }

            for back in 1..=LOOKBACK.min(i) {
                let prev = &tokens[i - back].lower;
                if let Some(&boost) = self.boosters.get(prev.as_str()) {
                    let damp = 1.0 - 0.05 * (back - 1) as f64;
                    valence += boost * damp * valence.signum();
                }
            }

            if (1..=LOOKBACK.min(i)).any(|back| self.negations.contains(tokens[i - back].lower.as_str())) {
                valence *= NEGATION_SCALAR;
            }

            valences.push(valence);
        }

        if let Some(pivot) = tokens.iter().position(|t| t.lower == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        let mut sum: f64 = valences.iter().sum();
        if sum != 0.0 {
            let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS);
            sum += EXCLAMATION_INCR * bangs as f64 * sum.signum();
        }

        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    }

    /// Mean compound polarity over `texts`; None when empty.
    pub fn average(&self, texts: &[String]) -> Option<f64> {
        if texts.is_empty() {
            return None;
        }
        let total: f64 = texts.iter().map(|t| self.compound(t)).sum();
        Some(total / texts.len() as f64)
    }
}
