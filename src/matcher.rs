//! Category matching against the sections of an event page.

use crate::{
    event_page::CategorySection,
    text::{char_len, contains_either, normalize},
};

const BEST_PICTURE_SYNONYMS: [&str; 6] = [
    "best picture",
    "best film",
    "best motion picture",
    "best motion picture of the year",
    "best feature film",
    "outstanding picture",
];

const JAPANESE_BEST_FILM_MARKERS: [&str; 4] = ["作品賞", "最優秀作品賞", "日本映画大賞", "最優秀映画賞"];

/// Normalized names a page section may match. Empty names are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetNames {
    names: Vec<String>,
}

impl TargetNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for name in names {
            out.insert(name.as_ref());
        }
        out
    }

    pub fn insert(&mut self, name: &str) {
        let name = normalize(name);
        if !name.is_empty() && !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.names.iter().any(|n| n == normalized)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Builds the target names for a category from its own canonical name.
///
/// Names related to a "best picture" synonym or a Japanese "best film" marker
/// absorb every English synonym; anything else only picks up the synonyms it
/// is itself related to.
pub fn expand_targets(category_name: &str) -> TargetNames {
    let own = normalize(category_name);
    let mut targets = TargetNames::new([own.as_str()]);
    if own.is_empty() {
        return targets;
    }

    let best_film_equivalent = BEST_PICTURE_SYNONYMS
        .iter()
        .chain(JAPANESE_BEST_FILM_MARKERS.iter())
        .any(|marker| contains_either(&own, marker));

    for synonym in BEST_PICTURE_SYNONYMS {
        if best_film_equivalent || contains_either(&own, synonym) {
            targets.insert(synonym);
        }
    }
    targets
}

/// Scores a candidate label: 0 for an exact match, otherwise the smallest
/// length difference to a target it contains or is contained by.
/// `None` means no target is related to the candidate at all.
pub fn score(candidate: &str, targets: &TargetNames) -> Option<usize> {
    let candidate = normalize(candidate);
    if candidate.is_empty() {
        return None;
    }
    if targets.contains(&candidate) {
        return Some(0);
    }

    let len = char_len(&candidate);
    targets
        .iter()
        .filter(|target| contains_either(&candidate, target))
        .map(|target| len.abs_diff(char_len(target)))
        .min()
}

#[derive(Clone, Copy, Debug)]
pub struct CategoryMatch<'a> {
    pub section: &'a CategorySection,
    pub label: &'a str,
    pub score: usize,
}

/// Picks the best scoring section. Ties keep the earliest section in document
/// order and an exact match ends the search.
pub fn select_section<'a>(
    sections: &'a [CategorySection],
    targets: &TargetNames,
) -> Option<CategoryMatch<'a>> {
    let mut best: Option<CategoryMatch<'a>> = None;

    for section in sections {
        let Some(label) = section.match_label() else {
            continue;
        };
        let Some(score) = score(label, targets) else {
            continue;
        };
        if best.is_none_or(|b| score < b.score) {
            best = Some(CategoryMatch { section, label, score });
            if score == 0 {
                break;
            }
        }
    }

    best
}
