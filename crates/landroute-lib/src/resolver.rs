//! Country identifier resolution.
//!
//! [`CountryResolver`] indexes every known code and display name once and then
//! maps arbitrary user input onto a canonical three-letter code. Resolution is
//! attempted in a fixed order:
//!
//! 1. implausible input is rejected outright (see [`looks_like_garbage`]),
//! 2. exact code match (`cca2`, `cca3`, `ccn3`, `cioc`),
//! 3. exact display-name match,
//! 4. fuzzy display-name match,
//! 5. fuzzy canonical-code match.
//!
//! Matching is case-insensitive. The index is immutable after construction,
//! so a resolver can be shared between threads without locking.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use crate::error::Result;
use crate::graph::CountryCode;

const VOWELS: &str = "AEIOU";
const CONSONANTS: &str = "BCDFGHJKLMNPQRSTVWXYZ";

/// Inputs longer than this are never treated as country identifiers.
const MAX_INPUT_LEN: usize = 12;

const NAME_BASE_SCORE: i64 = 120;
const NAME_EDIT_PENALTY: i64 = 10;
const NAME_PREFIX_BONUS: i64 = 40;
const NAME_SUBSTRING_BONUS: i64 = 20;
const NAME_SKELETON_BONUS: i64 = 10;
const NAME_ACCEPT_SCORE: i64 = 70;

const CODE_BASE_SCORE: i64 = 100;
const CODE_EDIT_PENALTY: i64 = 25;
const CODE_INITIAL_BONUS: i64 = 10;
const CODE_SKELETON_BONUS: i64 = 10;
const CODE_ACCEPT_SCORE: i64 = 60;

/// Lowest name score still worth offering as a "did you mean" hint.
const SUGGESTION_FLOOR: i64 = 40;

/// Identifiers and display names for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryRecord {
    /// Canonical three-letter code (`cca3`).
    pub code: CountryCode,
    /// Two-letter ISO code.
    pub cca2: Option<String>,
    /// Numeric ISO code.
    pub ccn3: Option<String>,
    /// International Olympic Committee code.
    pub cioc: Option<String>,
    /// Common, official, and native display names.
    pub names: Vec<String>,
}

impl CountryRecord {
    pub fn new(code: impl Into<CountryCode>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn with_cca2(mut self, cca2: impl Into<String>) -> Self {
        self.cca2 = Some(cca2.into());
        self
    }

    pub fn with_ccn3(mut self, ccn3: impl Into<String>) -> Self {
        self.ccn3 = Some(ccn3.into());
        self
    }

    pub fn with_cioc(mut self, cioc: impl Into<String>) -> Self {
        self.cioc = Some(cioc.into());
        self
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    fn alternate_codes(&self) -> impl Iterator<Item = &str> {
        [&self.cca2, &self.ccn3, &self.cioc]
            .into_iter()
            .filter_map(|code| code.as_deref())
    }
}

/// Source of per-country identifiers and names, consulted once at start-up.
pub trait CountryMetadataProvider: Send + Sync {
    fn countries(&self) -> Result<Vec<CountryRecord>>;
}

impl CountryMetadataProvider for Vec<CountryRecord> {
    fn countries(&self) -> Result<Vec<CountryRecord>> {
        Ok(self.clone())
    }
}

impl<T: CountryMetadataProvider + ?Sized> CountryMetadataProvider for &T {
    fn countries(&self) -> Result<Vec<CountryRecord>> {
        (**self).countries()
    }
}

#[derive(Debug, Clone)]
struct IndexedName {
    upper: String,
    skeleton: String,
}

/// Read-only index resolving free-form input to canonical country codes.
#[derive(Debug, Clone, Default)]
pub struct CountryResolver {
    exact_codes: HashMap<String, CountryCode>,
    exact_names: HashMap<String, CountryCode>,
    names_by_code: BTreeMap<CountryCode, Vec<IndexedName>>,
    /// Inputs that are accepted even when they trip the garbage heuristics:
    /// every exact key plus each display name with vowels and spaces removed.
    plausible: HashSet<String>,
}

impl CountryResolver {
    /// Build the index from a metadata provider.
    pub fn build<M: CountryMetadataProvider + ?Sized>(provider: &M) -> Result<Self> {
        let records = provider.countries()?;
        let resolver = Self::from_records(records);
        info!(
            countries = resolver.names_by_code.len(),
            codes = resolver.exact_codes.len(),
            names = resolver.exact_names.len(),
            "built country resolver index"
        );
        Ok(resolver)
    }

    /// Build the index from in-memory records.
    ///
    /// Records are indexed in ascending code order. When two countries share
    /// a name the first one keeps it; a canonical code always wins over an
    /// alternate code spelled the same way.
    pub fn from_records(mut records: Vec<CountryRecord>) -> Self {
        records.retain(|record| !record.code.trim().is_empty());
        records.sort_by(|a, b| a.code.cmp(&b.code));

        let mut resolver = Self::default();

        for record in &records {
            let code = record.code.trim().to_uppercase();

            for alternate in record.alternate_codes() {
                let key = normalize(alternate);
                if !key.is_empty() {
                    resolver.exact_codes.entry(key).or_insert_with(|| code.clone());
                }
            }

            let names = resolver.names_by_code.entry(code.clone()).or_default();
            for name in &record.names {
                let upper = normalize(name);
                if upper.is_empty() {
                    continue;
                }
                resolver
                    .exact_names
                    .entry(upper.clone())
                    .or_insert_with(|| code.clone());
                resolver.plausible.insert(devowel(&upper));
                names.push(IndexedName {
                    skeleton: skeleton(&upper),
                    upper,
                });
            }
        }

        for code in resolver.names_by_code.keys() {
            resolver.exact_codes.insert(code.clone(), code.clone());
        }

        resolver
            .plausible
            .extend(resolver.exact_codes.keys().cloned());
        resolver
            .plausible
            .extend(resolver.exact_names.keys().cloned());

        resolver
    }

    /// Number of indexed countries.
    pub fn len(&self) -> usize {
        self.names_by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names_by_code.is_empty()
    }

    /// Canonical codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.names_by_code.keys().map(String::as_str)
    }

    /// Resolve arbitrary input to a canonical code.
    ///
    /// Returns `None` when the input is implausible or nothing scores high
    /// enough; callers treat that as an unknown identifier.
    pub fn resolve(&self, input: &str) -> Option<CountryCode> {
        let normalized = normalize(input);
        if self.is_garbage(&normalized) {
            debug!(input, "rejected implausible country identifier");
            return None;
        }

        if let Some(code) = self.exact_codes.get(&normalized) {
            return Some(code.clone());
        }

        if let Some(code) = self.exact_names.get(&normalized) {
            return Some(code.clone());
        }

        let resolved = self
            .fuzzy_match_names(&normalized)
            .or_else(|| self.fuzzy_match_codes(&normalized));
        debug!(input, resolved = ?resolved, "fuzzy country resolution");
        resolved
    }

    /// Up to `limit` canonical codes whose names resemble `input`, best first.
    ///
    /// Implausible input yields no suggestions.
    pub fn suggest(&self, input: &str, limit: usize) -> Vec<CountryCode> {
        let normalized = normalize(input);
        if limit == 0 || self.is_garbage(&normalized) {
            return Vec::new();
        }

        let input_skeleton = skeleton(&normalized);
        let mut scored: Vec<(i64, &CountryCode)> = self
            .names_by_code
            .iter()
            .filter_map(|(code, names)| {
                names
                    .iter()
                    .map(|name| score_name(&normalized, &input_skeleton, name))
                    .max()
                    .map(|score| (score, code))
            })
            .filter(|(score, _)| *score >= SUGGESTION_FLOOR)
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, code)| code.clone())
            .collect()
    }

    fn is_garbage(&self, normalized: &str) -> bool {
        if normalized.is_empty() {
            return true;
        }
        !self.plausible.contains(normalized) && looks_like_garbage(normalized)
    }

    fn fuzzy_match_names(&self, input: &str) -> Option<CountryCode> {
        let input_skeleton = skeleton(input);
        let mut best: Option<(i64, &CountryCode)> = None;

        for (code, names) in &self.names_by_code {
            for name in names {
                let score = score_name(input, &input_skeleton, name);
                if best.map_or(true, |(top, _)| score > top) {
                    best = Some((score, code));
                }
            }
        }

        best.filter(|(score, _)| *score >= NAME_ACCEPT_SCORE)
            .map(|(_, code)| code.clone())
    }

    fn fuzzy_match_codes(&self, input: &str) -> Option<CountryCode> {
        let input_skeleton = skeleton(input);
        let mut best: Option<(i64, &CountryCode)> = None;

        for code in self.names_by_code.keys() {
            let score = score_code(input, &input_skeleton, code);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, code));
            }
        }

        best.filter(|(score, _)| *score >= CODE_ACCEPT_SCORE)
            .map(|(_, code)| code.clone())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Heuristic plausibility filter for normalized (trimmed, upper-case) input.
///
/// Rejects all-digit strings, vowel-less strings longer than three
/// characters, strings longer than twelve characters, and strings made only
/// of three or more consonants.
pub fn looks_like_garbage(normalized: &str) -> bool {
    let len = normalized.chars().count();

    if len > 0 && normalized.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    if !normalized.chars().any(is_vowel) && len > 3 {
        return true;
    }

    if len > MAX_INPUT_LEN {
        return true;
    }

    len >= 3 && normalized.chars().all(|c| CONSONANTS.contains(c))
}

/// Vowel/consonant pattern of a string: vowels become `V`, everything else `C`.
pub fn skeleton(value: &str) -> String {
    value
        .chars()
        .map(|c| if is_vowel(c) { 'V' } else { 'C' })
        .collect()
}

fn devowel(value: &str) -> String {
    value
        .chars()
        .filter(|c| !is_vowel(*c) && !c.is_whitespace())
        .collect()
}

fn score_name(input: &str, input_skeleton: &str, name: &IndexedName) -> i64 {
    let distance = strsim::levenshtein(input, &name.upper) as i64;
    let mut score = NAME_BASE_SCORE - distance * NAME_EDIT_PENALTY;

    if name.upper.starts_with(input) {
        score += NAME_PREFIX_BONUS;
    }
    if name.upper.contains(input) {
        score += NAME_SUBSTRING_BONUS;
    }
    if input_skeleton == name.skeleton {
        score += NAME_SKELETON_BONUS;
    }

    score
}

fn score_code(input: &str, input_skeleton: &str, code: &str) -> i64 {
    let distance = strsim::levenshtein(input, code) as i64;
    let mut score = CODE_BASE_SCORE - distance * CODE_EDIT_PENALTY;

    if input.chars().next().is_some_and(|first| code.starts_with(first)) {
        score += CODE_INITIAL_BONUS;
    }
    if input_skeleton == skeleton(code) {
        score += CODE_SKELETON_BONUS;
    }

    score
}
