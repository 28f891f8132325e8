//! Transcript normalization
//!
//! Speech recognizers spell brand names and app names in creative ways
//! ("gugle", "youtoob", "visual studio code"). Before any matching happens,
//! the transcript is lower-cased, trimmed and every known variant is folded
//! onto its canonical token.

use serde::Deserialize;
use tokio::time::Instant;

/// One canonical token and the spellings that should collapse onto it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replacement {
    /// Token the variants are rewritten to
    pub canonical: String,

    /// Recognized spelling or phonetic variants
    pub variants: Vec<String>,
}

impl Replacement {
    /// Build a replacement entry from string slices
    #[must_use]
    pub fn new(canonical: &str, variants: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            variants: variants.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Static table mapping canonical tokens to their variants
///
/// Matching is a single left-to-right scan that prefers the longest variant at
/// each position, so a short variant never eats part of a longer one ("wiki"
/// inside "wikipedia") and normalizing twice gives the same text as once.
///
/// That guarantee is a property of the table, not of the scan. A user table
/// where a canonical token, once written next to other text, spells some
/// other variant (`ab <- x` with `z <- cab` turns "cx" into "cab", then "z")
/// is not idempotent. [`WordReplacementTable::new`] warns about the cases it
/// can see, a variant that embeds a canonical token past its first character
/// or extends one.
#[derive(Debug, Clone)]
pub struct WordReplacementTable {
    entries: Vec<Replacement>,
    /// (variant, canonical) sorted longest variant first, ties in declaration order
    patterns: Vec<(String, String)>,
}

impl WordReplacementTable {
    /// Build a table from entries in declaration order
    #[must_use]
    pub fn new(entries: Vec<Replacement>) -> Self {
        let entries: Vec<Replacement> = entries
            .into_iter()
            .map(|entry| {
                let canonical = entry.canonical.trim().to_lowercase();
                let mut variants: Vec<String> = entry
                    .variants
                    .iter()
                    .map(|v| v.trim().to_lowercase())
                    .filter(|v| !v.is_empty())
                    .collect();
                // Canonical tokens must survive a second pass untouched
                if !canonical.is_empty() && !variants.contains(&canonical) {
                    variants.insert(0, canonical.clone());
                }
                Replacement {
                    canonical,
                    variants,
                }
            })
            .filter(|entry| !entry.canonical.is_empty())
            .collect();

        let mut patterns: Vec<(String, String)> = entries
            .iter()
            .flat_map(|entry| {
                entry
                    .variants
                    .iter()
                    .map(|v| (v.clone(), entry.canonical.clone()))
            })
            .collect();
        patterns.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        for (variant, canonical) in chaining_variants(&patterns) {
            tracing::warn!(
                variant,
                canonical,
                "replacement variant overlaps a canonical token, normalization may not be idempotent"
            );
        }

        tracing::debug!(
            canonical_tokens = entries.len(),
            variants = patterns.len(),
            "word replacement table loaded"
        );

        Self { entries, patterns }
    }

    /// Entries in declaration order
    #[must_use]
    pub fn entries(&self) -> &[Replacement] {
        &self.entries
    }

    /// Canonicalize a raw transcript
    ///
    /// Lower-cases and trims the input, then replaces every variant occurrence
    /// with its canonical token. Text without any variant comes back as the
    /// lower-cased, trimmed input.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let text = raw.trim().to_lowercase();
        let mut out = String::with_capacity(text.len());
        let mut rest = text.as_str();

        'scan: while let Some(ch) = rest.chars().next() {
            for (variant, canonical) in &self.patterns {
                if rest.starts_with(variant.as_str()) {
                    out.push_str(canonical);
                    rest = &rest[variant.len()..];
                    continue 'scan;
                }
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        out.trim().to_string()
    }
}

/// Variants that a canonical token could complete or be swallowed by
///
/// Returns `(variant, canonical)` pairs where the variant contains the
/// canonical token at a non-zero offset, or starts with it and runs longer.
fn chaining_variants(patterns: &[(String, String)]) -> Vec<(&str, &str)> {
    let mut canonicals: Vec<&str> = patterns.iter().map(|(_, c)| c.as_str()).collect();
    canonicals.sort_unstable();
    canonicals.dedup();

    patterns
        .iter()
        .filter(|(variant, own)| variant != own)
        .flat_map(|(variant, _)| {
            canonicals
                .iter()
                .filter(move |canonical| {
                    let embedded = variant
                        .match_indices(**canonical)
                        .any(|(offset, _)| offset > 0);
                    let extended = variant.len() > canonical.len() && variant.starts_with(**canonical);
                    embedded || extended
                })
                .map(move |canonical| (variant.as_str(), *canonical))
        })
        .collect()
}

impl Default for WordReplacementTable {
    fn default() -> Self {
        Self::new(vec![
            Replacement::new("google", &["google", "gugle", "googol"]),
            Replacement::new("youtube", &["youtube", "youtoob", "yutuub"]),
            Replacement::new("spotify", &["spotify", "spotifai"]),
            Replacement::new("discord", &["discord", "diskord"]),
            Replacement::new("brave", &["brave", "breyv"]),
            Replacement::new("vscode", &["vscode", "visual studio code", "vs code"]),
            Replacement::new("wikipedia", &["wikipedia", "wiki"]),
        ])
    }
}

/// A single recognized phrase, raw and canonicalized
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Text exactly as the recognizer produced it
    pub raw: String,

    /// Output of [`WordReplacementTable::normalize`]
    pub normalized: String,

    /// When the phrase was handed to the assistant
    pub captured_at: Instant,
}

impl Transcript {
    /// Normalize a raw recognizer result
    #[must_use]
    pub fn new(raw: impl Into<String>, table: &WordReplacementTable) -> Self {
        let raw = raw.into();
        let normalized = table.normalize(&raw);
        Self {
            raw,
            normalized,
            captured_at: Instant::now(),
        }
    }

    /// Whether normalization left anything to act on
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Whether normalization rewrote anything beyond case and whitespace
    #[must_use]
    pub fn was_rewritten(&self) -> bool {
        self.raw.trim().to_lowercase() != self.normalized
    }
}
