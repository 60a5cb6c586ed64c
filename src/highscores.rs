use crate::consts;
use crate::prompt::{request_initials, InitialsPrompt};
use crate::storage::{KeyValueStore, LoadError, SaveError};
use crate::util::ErrorChain;
use log::{info, warn};
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// A player's initials: one to three uppercase characters
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Initials(String);

impl Initials {
    /// Normalize free-form input into initials: surrounding whitespace is
    /// removed, letters are uppercased, and only the first three characters
    /// are kept.  Returns `None` if nothing is left.
    pub(crate) fn normalize(s: &str) -> Option<Initials> {
        let upper = s.trim().to_uppercase();
        let initials = upper
            .graphemes(true)
            .take(consts::INITIALS_LENGTH)
            .collect::<String>();
        (!initials.is_empty()).then_some(Initials(initials))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Initials {
    fn default() -> Initials {
        Initials(String::from(consts::DEFAULT_INITIALS))
    }
}

impl fmt::Display for Initials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl std::str::FromStr for Initials {
    type Err = InitialsError;

    fn from_str(s: &str) -> Result<Initials, InitialsError> {
        match Initials::normalize(s) {
            Some(initials) if initials.0 == s => Ok(initials),
            _ => Err(InitialsError(s.to_owned())),
        }
    }
}

impl Serialize for Initials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Initials {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse::<Initials>()
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid initials: {0:?}")]
pub(crate) struct InitialsError(String);

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct HighScoreEntry {
    pub(crate) initials: Initials,
    pub(crate) score: u32,
}

/// The high score table: at most [`MAX_HIGH_SCORES`][consts::MAX_HIGH_SCORES]
/// entries sorted from highest to lowest score.  Among equal scores, older
/// entries rank higher.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScoreList(Vec<HighScoreEntry>);

impl HighScoreList {
    /// The table shown before anyone has played: "AAA" through "JJJ" with
    /// scores 10 down to 1
    pub(crate) fn placeholder() -> HighScoreList {
        HighScoreList(
            ('A'..='J')
                .zip((1..=10).rev())
                .map(|(c, score)| HighScoreEntry {
                    initials: Initials(c.to_string().repeat(3)),
                    score,
                })
                .collect(),
        )
    }

    pub(crate) fn entries(&self) -> &[HighScoreEntry] {
        &self.0
    }

    fn is_full(&self) -> bool {
        self.0.len() >= consts::MAX_HIGH_SCORES
    }

    /// Return the index at which an entry for `score` would be inserted, if
    /// any
    fn insertion_index(&self, score: u32) -> Option<usize> {
        match self.0.iter().position(|e| e.score < score) {
            Some(i) => Some(i),
            None if !self.is_full() => Some(self.0.len()),
            None => None,
        }
    }

    /// Does `score` earn a place in the table?  It does if it beats at least
    /// one entry or if the table has room left.
    pub(crate) fn qualifies(&self, score: u32) -> bool {
        self.insertion_index(score).is_some()
    }

    /// Add an entry for `score`, dropping the lowest entry if the table
    /// overflows.  Returns the index of the new entry, or `None` if the score
    /// did not qualify.
    pub(crate) fn insert(&mut self, score: u32, initials: Initials) -> Option<usize> {
        let index = self.insertion_index(score)?;
        self.0.insert(index, HighScoreEntry { initials, score });
        self.0.truncate(consts::MAX_HIGH_SCORES);
        Some(index)
    }
}

impl Default for HighScoreList {
    fn default() -> HighScoreList {
        HighScoreList::placeholder()
    }
}

impl Serialize for HighScoreList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighScoreList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<HighScoreEntry>::deserialize(deserializer)?;
        if entries.len() > consts::MAX_HIGH_SCORES {
            return Err(serde::de::Error::invalid_length(
                entries.len(),
                &"at most ten high scores",
            ));
        }
        if entries.windows(2).any(|w| w[0].score < w[1].score) {
            return Err(serde::de::Error::custom(
                "high scores are not in descending order",
            ));
        }
        Ok(HighScoreList(entries))
    }
}

/// Loads and saves the high score table through a [`KeyValueStore`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScoreStore<S> {
    storage: S,
}

impl<S: KeyValueStore> HighScoreStore<S> {
    pub(crate) fn new(storage: S) -> HighScoreStore<S> {
        HighScoreStore { storage }
    }

    /// Read the stored table.  Returns `Ok(None)` if nothing is stored.
    fn try_load(&self) -> Result<Option<HighScoreList>, LoadError> {
        let Some(src) = self.storage.get(consts::HIGH_SCORES_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&src)
            .map(Some)
            .map_err(LoadError::deserialize)
    }

    /// Return the stored table, or the placeholder table if nothing usable
    /// is stored
    pub(crate) fn load(&self) -> HighScoreList {
        self.load_stored().unwrap_or_default()
    }

    /// Like [`HighScoreStore::load()`], but if the placeholder table had to
    /// be used, it is also written back to storage
    pub(crate) fn load_or_seed(&self) -> HighScoreList {
        if let Some(list) = self.load_stored() {
            list
        } else {
            let list = HighScoreList::placeholder();
            if let Err(e) = self.persist(&list) {
                warn!("{}", ErrorChain(&e));
            }
            list
        }
    }

    fn load_stored(&self) -> Option<HighScoreList> {
        match self.try_load() {
            Ok(Some(list)) => Some(list),
            Ok(None) => {
                info!("No high scores stored; using placeholder table");
                None
            }
            Err(e) => {
                warn!("{}; using placeholder table", ErrorChain(&e));
                None
            }
        }
    }

    /// Write `list` to storage, replacing whatever was there
    pub(crate) fn persist(&self, list: &HighScoreList) -> Result<(), SaveError> {
        let src = serde_json::to_string(list).map_err(SaveError::serialize)?;
        self.storage.set(consts::HIGH_SCORES_KEY, &src)
    }

    /// Enter `score` into `list` if it qualifies, asking `prompt` for the
    /// player's initials, and save the result.  Returns the new entry's
    /// index.
    pub(crate) fn record(
        &self,
        list: &mut HighScoreList,
        score: u32,
        prompt: &mut dyn InitialsPrompt,
    ) -> Result<Option<usize>, SaveError> {
        if !list.qualifies(score) {
            return Ok(None);
        }
        let initials = request_initials(prompt, consts::DEFAULT_INITIALS);
        let Some(rank) = list.insert(score, initials) else {
            return Ok(None);
        };
        self.persist(list)?;
        Ok(Some(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn initials(s: &str) -> Initials {
        s.parse().unwrap()
    }

    fn list_of(scores: &[u32]) -> HighScoreList {
        HighScoreList(
            scores
                .iter()
                .map(|&score| HighScoreEntry {
                    initials: initials("ZZZ"),
                    score,
                })
                .collect(),
        )
    }

    fn scores(list: &HighScoreList) -> Vec<u32> {
        list.entries().iter().map(|e| e.score).collect()
    }

    #[test]
    fn placeholder_table() {
        let list = HighScoreList::placeholder();
        assert_eq!(list.entries().len(), 10);
        assert_eq!(scores(&list), [10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(list.entries()[0].initials.as_str(), "AAA");
        assert_eq!(list.entries()[9].initials.as_str(), "JJJ");
    }

    #[test]
    fn insert_in_middle() {
        let mut list = list_of(&[50, 40, 30, 20, 10, 9, 8, 7, 6, 5]);
        assert!(list.qualifies(35));
        assert_eq!(list.insert(35, initials("NEW")), Some(2));
        assert_eq!(scores(&list), [50, 40, 35, 30, 20, 10, 9, 8, 7, 6]);
        assert_eq!(list.entries()[2].initials.as_str(), "NEW");
    }

    #[test]
    fn insert_at_top() {
        let mut list = HighScoreList::placeholder();
        assert_eq!(list.insert(100, initials("TOP")), Some(0));
        assert_eq!(scores(&list), [100, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    }

    #[test]
    fn equal_to_lowest_does_not_qualify() {
        let mut list = list_of(&[50, 40, 30, 20, 10, 9, 8, 7, 6, 5]);
        assert!(!list.qualifies(5));
        assert_eq!(list.insert(5, initials("LOW")), None);
        assert_eq!(scores(&list), [50, 40, 30, 20, 10, 9, 8, 7, 6, 5]);
    }

    #[test]
    fn ties_rank_below_existing() {
        let mut list = list_of(&[50, 40, 30, 30, 20, 10, 9, 8, 7, 6]);
        assert_eq!(list.insert(30, initials("TIE")), Some(4));
        assert_eq!(list.entries()[4].initials.as_str(), "TIE");
        assert_eq!(list.entries()[3].initials.as_str(), "ZZZ");
    }

    #[rstest]
    #[case(&[], 0, Some(0))]
    #[case(&[30, 20], 10, Some(2))]
    #[case(&[30, 20], 20, Some(2))]
    #[case(&[30, 20], 25, Some(1))]
    fn under_full_list_accepts_any_score(
        #[case] before: &[u32],
        #[case] score: u32,
        #[case] rank: Option<usize>,
    ) {
        let mut list = list_of(before);
        assert!(list.qualifies(score));
        assert_eq!(list.insert(score, initials("ABC")), rank);
        assert_eq!(list.entries().len(), before.len() + 1);
    }

    #[rstest]
    #[case("abc", Some("ABC"))]
    #[case("  jd ", Some("JD"))]
    #[case("abcdef", Some("ABC"))]
    #[case("x", Some("X"))]
    #[case("", None)]
    #[case("   ", None)]
    #[case("ße", Some("SSE"))]
    fn test_normalize_initials(#[case] input: &str, #[case] output: Option<&str>) {
        assert_eq!(
            Initials::normalize(input).as_ref().map(Initials::as_str),
            output
        );
    }

    #[test]
    fn parse_rejects_non_normal_initials() {
        assert!("ABC".parse::<Initials>().is_ok());
        assert!("abc".parse::<Initials>().is_err());
        assert!("ABCD".parse::<Initials>().is_err());
        assert!("".parse::<Initials>().is_err());
    }

    #[test]
    fn load_missing_gives_placeholder() {
        let store = HighScoreStore::new(MemoryStore::default());
        assert_eq!(store.load(), HighScoreList::placeholder());
        assert_eq!(store.storage.get(consts::HIGH_SCORES_KEY).unwrap(), None);
    }

    #[test]
    fn load_or_seed_writes_placeholder() {
        let store = HighScoreStore::new(MemoryStore::default());
        assert_eq!(store.load_or_seed(), HighScoreList::placeholder());
        assert!(store
            .storage
            .get(consts::HIGH_SCORES_KEY)
            .unwrap()
            .is_some());
        assert_eq!(store.load(), HighScoreList::placeholder());
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"initials": "AAA", "score": 1}"#)]
    #[case(r#"[{"initials": "AAA", "score": 1}, {"initials": "BBB", "score": 2}]"#)]
    #[case(r#"[{"initials": "aaa", "score": 1}]"#)]
    #[case(r#"[{"initials": "AAA", "score": -1}]"#)]
    #[case("[1,1,1,1,1,1,1,1,1,1,1]")]
    fn load_malformed_gives_placeholder(#[case] src: &str) {
        let storage = MemoryStore::default();
        storage.set(consts::HIGH_SCORES_KEY, src).unwrap();
        let store = HighScoreStore::new(storage);
        assert_eq!(store.load(), HighScoreList::placeholder());
    }

    #[test]
    fn load_stored_json() {
        let storage = MemoryStore::default();
        storage
            .set(
                consts::HIGH_SCORES_KEY,
                r#"[{"initials":"JWO","score":42},{"initials":"A","score":0}]"#,
            )
            .unwrap();
        let store = HighScoreStore::new(storage);
        let list = store.load();
        assert_eq!(scores(&list), [42, 0]);
        assert_eq!(list.entries()[1].initials.as_str(), "A");
    }

    #[test]
    fn persist_then_load_round_trips() {
        let store = HighScoreStore::new(MemoryStore::default());
        let mut list = store.load();
        assert_eq!(list.insert(7, initials("MID")), Some(4));
        store.persist(&list).unwrap();
        assert_eq!(store.load(), list);
        store.persist(&store.load()).unwrap();
        assert_eq!(store.load(), list);
    }

    #[test]
    fn record_qualifying_score() {
        let store = HighScoreStore::new(MemoryStore::default());
        let mut list = store.load();
        let mut asked = Vec::new();
        let mut prompt = |message: &str, default: &str| {
            asked.push((message.to_owned(), default.to_owned()));
            Some(String::from("xyzzy"))
        };
        assert_eq!(store.record(&mut list, 8, &mut prompt).unwrap(), Some(3));
        assert_eq!(
            asked,
            [(
                String::from(consts::INITIALS_PROMPT),
                String::from(consts::DEFAULT_INITIALS)
            )]
        );
        assert_eq!(list.entries()[3].initials.as_str(), "XYZ");
        assert_eq!(list.entries().len(), 10);
        assert_eq!(store.load(), list);
    }

    #[test]
    fn record_cancelled_prompt_uses_default() {
        let store = HighScoreStore::new(MemoryStore::default());
        let mut list = store.load();
        let mut prompt = |_: &str, _: &str| -> Option<String> { None };
        assert_eq!(store.record(&mut list, 11, &mut prompt).unwrap(), Some(0));
        assert_eq!(list.entries()[0].initials.as_str(), "AAA");
    }

    #[test]
    fn record_non_qualifying_score_does_not_prompt() {
        let store = HighScoreStore::new(MemoryStore::default());
        let mut list = store.load();
        let mut prompted = false;
        let mut prompt = |_: &str, _: &str| -> Option<String> {
            prompted = true;
            None
        };
        assert_eq!(store.record(&mut list, 1, &mut prompt).unwrap(), None);
        assert!(!prompted);
        assert_eq!(list, HighScoreList::placeholder());
        assert_eq!(store.storage.get(consts::HIGH_SCORES_KEY).unwrap(), None);
    }
}
