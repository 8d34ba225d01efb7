//! Financial sentiment lexicon shared by the two lexicon-based sources.
//!
//! Each entry carries a valence on the -4..4 scale and a subjectivity in
//! [0, 1]. The polarity source averages valences (scaled to [-1, 1]); the
//! compound source sums them and squashes through the alpha normalization.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "wouldn't", "couldn't", "shouldn't", "hardly",
    "barely", "neither", "nor", "without",
];

/// A sentiment-bearing word is flipped if a negation appears within this
/// many tokens before it.
pub const NEGATION_WINDOW: usize = 3;

/// (word, valence, subjectivity)
const ENTRIES: &[(&str, f64, f64)] = &[
    // Bullish vocabulary
    ("bullish", 2.9, 0.8),
    ("rally", 2.2, 0.6),
    ("rallies", 2.2, 0.6),
    ("surge", 2.6, 0.6),
    ("surges", 2.6, 0.6),
    ("soar", 3.0, 0.7),
    ("soars", 3.0, 0.7),
    ("gain", 1.8, 0.4),
    ("gains", 1.8, 0.4),
    ("profit", 2.0, 0.4),
    ("profits", 2.0, 0.4),
    ("growth", 1.9, 0.4),
    ("beat", 1.7, 0.5),
    ("beats", 1.7, 0.5),
    ("upgrade", 2.1, 0.5),
    ("upgraded", 2.1, 0.5),
    ("outperform", 2.3, 0.6),
    ("strong", 1.8, 0.6),
    ("positive", 1.9, 0.5),
    ("rise", 1.5, 0.4),
    ("rises", 1.5, 0.4),
    ("jump", 1.9, 0.5),
    ("jumps", 1.9, 0.5),
    ("increase", 1.3, 0.4),
    ("breakthrough", 2.7, 0.7),
    ("innovation", 1.6, 0.6),
    ("success", 2.4, 0.6),
    ("exceed", 1.9, 0.5),
    ("exceeds", 1.9, 0.5),
    ("momentum", 1.2, 0.5),
    ("buy", 1.4, 0.5),
    ("recommend", 1.5, 0.6),
    ("optimistic", 2.2, 0.8),
    ("record", 1.6, 0.4),
    ("advance", 1.4, 0.4),
    ("good", 1.9, 0.6),
    ("great", 3.1, 0.75),
    ("dividend", 1.1, 0.3),
    ("buyback", 1.5, 0.4),
    ("upside", 1.8, 0.6),
    ("recovery", 1.7, 0.5),
    ("rebound", 1.8, 0.5),
    ("expansion", 1.5, 0.4),
    ("robust", 2.0, 0.6),
    ("accelerating", 1.6, 0.5),
    ("tailwind", 1.7, 0.6),
    // Bearish vocabulary
    ("bearish", -2.9, 0.8),
    ("decline", -1.7, 0.4),
    ("declines", -1.7, 0.4),
    ("loss", -2.0, 0.4),
    ("losses", -2.0, 0.4),
    ("fall", -1.5, 0.4),
    ("falls", -1.5, 0.4),
    ("plunge", -2.8, 0.6),
    ("plunges", -2.8, 0.6),
    ("tumble", -2.3, 0.5),
    ("tumbles", -2.3, 0.5),
    ("crash", -3.3, 0.7),
    ("miss", -1.7, 0.5),
    ("misses", -1.7, 0.5),
    ("downgrade", -2.1, 0.5),
    ("downgraded", -2.1, 0.5),
    ("underperform", -2.3, 0.6),
    ("weak", -1.8, 0.6),
    ("negative", -1.9, 0.5),
    ("drop", -1.6, 0.4),
    ("drops", -1.6, 0.4),
    ("decrease", -1.3, 0.4),
    ("concern", -1.4, 0.6),
    ("concerns", -1.4, 0.6),
    ("risk", -1.2, 0.5),
    ("fail", -2.2, 0.5),
    ("fails", -2.2, 0.5),
    ("disappoint", -2.0, 0.6),
    ("disappointing", -2.0, 0.6),
    ("slump", -2.4, 0.5),
    ("sell", -1.4, 0.5),
    ("warning", -1.8, 0.5),
    ("pessimistic", -2.2, 0.8),
    ("retreat", -1.3, 0.4),
    ("fear", -2.0, 0.7),
    ("fears", -2.0, 0.7),
    ("trouble", -1.9, 0.6),
    ("bad", -2.5, 0.6),
    ("lawsuit", -1.8, 0.5),
    ("litigation", -1.6, 0.5),
    ("investigation", -1.6, 0.5),
    ("recall", -1.9, 0.5),
    ("default", -2.5, 0.5),
    ("bankruptcy", -3.4, 0.6),
    ("layoff", -2.2, 0.5),
    ("layoffs", -2.2, 0.5),
    ("headwind", -1.6, 0.6),
    ("dilution", -1.5, 0.5),
    ("overvalued", -1.8, 0.7),
    ("bubble", -1.9, 0.7),
];

fn table() -> &'static HashMap<&'static str, (f64, f64)> {
    static TABLE: OnceLock<HashMap<&'static str, (f64, f64)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|&(word, valence, subjectivity)| (word, (valence, subjectivity)))
            .collect()
    })
}

/// Look up the (valence, subjectivity) of an already-lowercased token.
pub fn entry(word: &str) -> Option<(f64, f64)> {
    table().get(word).copied()
}

pub fn is_negation(word: &str) -> bool {
    static NEGATIONS: OnceLock<std::collections::HashSet<&'static str>> = OnceLock::new();
    NEGATIONS
        .get_or_init(|| NEGATION_WORDS.iter().copied().collect())
        .contains(word)
}

/// Split a lowercased text into tokens, stripping common punctuation.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| {
        c.is_whitespace() || c == ',' || c == ';' || c == '.' || c == '!' || c == '?' || c == ':'
    })
    .filter(|w| !w.is_empty())
    .collect()
}
