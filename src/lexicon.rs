//! Fixed-vocabulary resolver.
//!
//! Maps a raw utterance to a typed slot value by exact lookup first and then by
//! substring containment in table order. Containment is deliberately loose:
//! "I'm meeting John Doe" resolves through the `john` row, and short rows such
//! as `no` or `ten` will also fire inside unrelated words. First match wins.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DialogueError, Result};

/// The kind of value a slot asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Person,
    Day,
    Time,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LexiconEntry {
    Person(String),
    Day(String),
    Time(String),
    Answer(bool),
}

impl LexiconEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            LexiconEntry::Person(_) => EntryKind::Person,
            LexiconEntry::Day(_) => EntryKind::Day,
            LexiconEntry::Time(_) => EntryKind::Time,
            LexiconEntry::Answer(_) => EntryKind::Answer,
        }
    }
}

/// One row of a lexicon file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconRow {
    pub phrase: String,
    pub entry: LexiconEntry,
}

/// Ordered phrase table. Order only matters for the containment fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    rows: Vec<(String, LexiconEntry)>,
}

impl Default for Lexicon {
    fn default() -> Self {
        use LexiconEntry::*;

        let person = |n: &str| Person(n.to_string());
        let day = |d: &str| Day(d.to_string());
        let time = |t: &str| Time(t.to_string());

        Self::from_rows(vec![
            // Names
            ("vlad", person("Vladislav Maraev")),
            ("emma", person("Emma Watson")),
            ("john", person("John Doe")),
            ("david", person("David Brown")),
            ("michael", person("Michael Davis")),
            ("jennifer", person("Jennifer Martinez")),
            // Days
            ("monday", day("Monday")),
            ("friday", day("Friday")),
            ("tuesday", day("Tuesday")),
            // Times
            ("9", time("9:00")),
            ("10", time("10:00")),
            ("11", time("11:00")),
            ("12", time("12:00")),
            ("9 am", time("9:00")),
            ("10 am", time("10:00")),
            ("11 am", time("11:00")),
            ("12 pm", time("12:00")),
            ("nine", time("9:00")),
            ("ten", time("10:00")),
            ("eleven", time("11:00")),
            ("twelve", time("12:00")),
            // Yes / No
            ("yes", Answer(true)),
            ("no", Answer(false)),
            ("of course", Answer(true)),
            ("sure", Answer(true)),
            ("right", Answer(true)),
            ("no way", Answer(false)),
            ("wrong", Answer(false)),
        ])
    }
}

impl Lexicon {
    pub fn from_rows<S: Into<String>>(rows: Vec<(S, LexiconEntry)>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|(phrase, entry)| (phrase.into(), entry))
                .collect(),
        }
    }

    /// Parse a JSON array of `{ "phrase": .., "entry": { "kind": .., "value": .. } }` rows.
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<LexiconRow> =
            serde_json::from_str(json).map_err(DialogueError::LexiconParse)?;
        if rows.is_empty() {
            return Err(DialogueError::InvalidConfig("lexicon has no rows".to_string()));
        }
        Ok(Self {
            rows: rows.into_iter().map(|r| (r.phrase, r.entry)).collect(),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| DialogueError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve `utterance` against rows of `kind` only. Pure.
    ///
    /// A blank utterance never resolves, otherwise every row would "contain" it.
    pub fn resolve(&self, kind: EntryKind, utterance: &str) -> Option<LexiconEntry> {
        let normalized = normalize(utterance);
        if normalized.is_empty() {
            return None;
        }

        let of_kind = || self.rows.iter().filter(move |(_, e)| e.kind() == kind);

        if let Some((_, entry)) = of_kind().find(|(key, _)| key.to_lowercase() == normalized) {
            return Some(entry.clone());
        }

        // Times are often written "9am" in the table and heard as "9 am" (or vice versa).
        let compact = strip_whitespace(&normalized);
        if kind == EntryKind::Time {
            if let Some((_, entry)) =
                of_kind().find(|(key, _)| strip_whitespace(&key.to_lowercase()) == compact)
            {
                return Some(entry.clone());
            }
        }

        of_kind()
            .find(|(key, _)| {
                let key = key.to_lowercase();
                if contains_either(&normalized, &key) {
                    return true;
                }
                kind == EntryKind::Time && contains_either(&compact, &key)
            })
            .map(|(_, entry)| entry.clone())
    }
}

fn normalize(utterance: &str) -> String {
    utterance
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

fn contains_either(utterance: &str, key: &str) -> bool {
    utterance.contains(key) || key.contains(utterance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(n: &str) -> Option<LexiconEntry> {
        Some(LexiconEntry::Person(n.to_string()))
    }

    #[test]
    fn exact_match_after_normalization() {
        let lex = Lexicon::default();
        assert_eq!(lex.resolve(EntryKind::Person, "  VLAD "), person("Vladislav Maraev"));
        assert_eq!(
            lex.resolve(EntryKind::Time, "10   AM"),
            Some(LexiconEntry::Time("10:00".into()))
        );
    }

    #[test]
    fn carrier_phrase_matches_by_containment() {
        let lex = Lexicon::default();
        assert_eq!(
            lex.resolve(EntryKind::Person, "I'm meeting with Emma Watson"),
            person("Emma Watson")
        );
        // Partial utterance contained in the key.
        assert_eq!(lex.resolve(EntryKind::Person, "jen"), person("Jennifer Martinez"));
    }

    #[test]
    fn kind_filter_is_respected() {
        let lex = Lexicon::default();
        assert_eq!(lex.resolve(EntryKind::Day, "vlad"), None);
        assert_eq!(lex.resolve(EntryKind::Person, "friday"), None);
    }

    #[test]
    fn time_matches_without_spaces() {
        let lex = Lexicon::from_rows(vec![("9am", LexiconEntry::Time("9:00".into()))]);
        assert_eq!(
            lex.resolve(EntryKind::Time, "9 am"),
            Some(LexiconEntry::Time("9:00".into()))
        );
        assert_eq!(
            lex.resolve(EntryKind::Time, "let's say 9 am please"),
            Some(LexiconEntry::Time("9:00".into()))
        );
    }

    #[test]
    fn first_row_in_table_order_wins() {
        let lex = Lexicon::from_rows(vec![
            ("ann", LexiconEntry::Person("Ann First".into())),
            ("anna", LexiconEntry::Person("Anna Second".into())),
        ]);
        assert_eq!(lex.resolve(EntryKind::Person, "anna"), person("Anna Second"));
        assert_eq!(lex.resolve(EntryKind::Person, "with anna please"), person("Ann First"));
    }

    #[test]
    fn short_rows_produce_known_false_positives() {
        let lex = Lexicon::default();
        // "no" sits inside "know": accepted trade-off of containment matching.
        assert_eq!(
            lex.resolve(EntryKind::Answer, "I don't know"),
            Some(LexiconEntry::Answer(false))
        );
    }

    #[test]
    fn no_match_and_blank_input() {
        let lex = Lexicon::default();
        assert_eq!(lex.resolve(EntryKind::Person, "xyz"), None);
        assert_eq!(lex.resolve(EntryKind::Person, "   "), None);
        assert_eq!(lex.resolve(EntryKind::Answer, ""), None);
    }

    #[test]
    fn resolve_is_repeatable() {
        let lex = Lexicon::default();
        let first = lex.resolve(EntryKind::Answer, "of course");
        assert_eq!(first, Some(LexiconEntry::Answer(true)));
        assert_eq!(lex.resolve(EntryKind::Answer, "of course"), first);
    }

    #[test]
    fn json_table_keeps_row_order() {
        let json = r#"[
            {"phrase": "bob", "entry": {"kind": "person", "value": "Bob Stone"}},
            {"phrase": "bo", "entry": {"kind": "person", "value": "Bo Jackson"}},
            {"phrase": "yep", "entry": {"kind": "answer", "value": true}}
        ]"#;
        let lex = Lexicon::from_json(json).unwrap();
        assert!(!lex.is_empty());
        assert_eq!(lex.len(), 3);
        assert_eq!(lex.resolve(EntryKind::Person, "bobby"), person("Bob Stone"));
        assert_eq!(lex.resolve(EntryKind::Answer, "yep"), Some(LexiconEntry::Answer(true)));
    }

    #[test]
    fn empty_json_table_is_rejected() {
        assert!(matches!(Lexicon::from_json("[]"), Err(DialogueError::InvalidConfig(_))));
        assert!(matches!(Lexicon::from_json("{"), Err(DialogueError::LexiconParse(_))));
    }
}
