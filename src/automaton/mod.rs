/// Automaton builder module: key conversion and fail-link construction.
pub mod builder;
/// Node and edge types of the trie.
pub mod children;
/// Error type shared by every operation.
pub mod error;
/// Depth-first enumeration of stored keys and values.
pub mod items;
/// Internal index arena.
pub(crate) mod node_arena;
/// The automaton that owns its nodes.
pub mod owned;
/// Streaming Aho-Corasick search.
pub mod search;
/// Trait for types that can serve as input units.
pub mod unit_trait;

pub use builder::IntoKey;
pub use children::{Children, Payload, StoreKind, TrieNode, Value};
pub use error::{AutomatonError, Result};
pub use items::{Entry, ItemsCursor, ItemsIter, IterMode};
pub use node_arena::NodeId;
pub use owned::{Automaton, AutomatonKind, Stats};
pub use search::{Match, SearchCursor, SearchIter};
pub use unit_trait::InputUnit;

#[cfg(test)]
mod test {
    use hashbrown::{HashMap, HashSet};
    use proptest::prelude::*;

    use super::*;

    fn build(words: &[Vec<u8>]) -> Automaton<usize> {
        let mut automaton = Automaton::new();
        for (i, word) in words.iter().enumerate() {
            automaton.add_word(word, i).unwrap();
        }
        automaton
    }

    /// The last value inserted for every distinct non-empty key.
    fn expected_items(words: &[Vec<u8>]) -> HashMap<Vec<u8>, usize> {
        words
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_empty())
            .map(|(i, w)| (w.clone(), i))
            .collect()
    }

    fn naive_matches(words: &[Vec<u8>], text: &[u8]) -> Vec<(usize, Vec<u8>)> {
        let keys: HashSet<&Vec<u8>> = words.iter().filter(|w| !w.is_empty()).collect();
        let mut out = Vec::new();
        for end in 1..=text.len() {
            let mut here: Vec<&Vec<u8>> =
                keys.iter().copied().filter(|k| text[..end].ends_with(k)).collect();
            here.sort_by_key(|k| std::cmp::Reverse(k.len()));
            out.extend(here.into_iter().map(|k| (end, k.clone())));
        }
        out
    }

    #[test]
    fn search_after_enumeration_round_trip() {
        let mut automaton = Automaton::new();
        for (word, value) in [("he", 1), ("she", 2), ("his", 3), ("hers", 4)] {
            automaton.add_word(word, value).unwrap();
        }
        automaton.make_automaton();

        let items: HashMap<Vec<u8>, i32> = automaton
            .items()
            .map(|entry| match entry.unwrap() {
                Entry::Item(key, value) => (key, *value),
                other => panic!("unexpected entry {other:?}"),
            })
            .collect();
        assert_eq!(items.len(), 4);

        let ends: Vec<(usize, i32)> = automaton
            .iter_str("ushers")
            .unwrap()
            .map(|m| {
                let m = m.unwrap();
                match m.value {
                    Value::Object(v) => (m.end, *v),
                    Value::Integer(_) => panic!("unexpected integer"),
                }
            })
            .collect();
        assert_eq!(ends, [(4, 2), (4, 1), (6, 4)]);
    }

    #[test]
    fn cursors_of_both_kinds_share_one_automaton() {
        let mut automaton = Automaton::<()>::with_store(StoreKind::Integer);
        automaton.add_integer("ab", 1).unwrap();
        automaton.add_integer("b", 2).unwrap();
        automaton.make_automaton();

        let text = b"abab";
        let mut items = ItemsCursor::new(&automaton, IterMode::Items);
        let mut search = SearchCursor::new(&automaton, text, 0..text.len()).unwrap();

        let mut found = 0;
        let mut listed = 0;
        loop {
            let a = search.advance(&automaton).unwrap();
            let b = items.advance(&automaton).unwrap();
            found += a.is_some() as usize;
            listed += b.is_some() as usize;
            if a.is_none() && b.is_none() {
                break;
            }
        }
        assert_eq!(found, 4);
        assert_eq!(listed, 2);

        automaton.clear();
        assert_eq!(search.advance(&automaton), Err(AutomatonError::StaleIterator));
        assert_eq!(items.advance(&automaton), Err(AutomatonError::StaleIterator));
    }

    #[test]
    fn stale_cursor_never_reads_reused_slots() {
        let mut automaton = Automaton::new();
        automaton.add_word("abc", 1).unwrap();
        automaton.make_automaton();
        let text = b"abcabc";
        let mut search = SearchCursor::new(&automaton, text, 0..text.len()).unwrap();
        let mut items = ItemsCursor::new(&automaton, IterMode::Keys);

        automaton.remove_word("abc");
        automaton.add_word("xyz", 2).unwrap();
        automaton.make_automaton();

        assert_eq!(search.advance(&automaton), Err(AutomatonError::StaleIterator));
        assert_eq!(items.advance(&automaton), Err(AutomatonError::StaleIterator));
    }

    fn words_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
        prop::collection::vec(prop::collection::vec(b'a'..=b'd', 0..6), 0..24)
    }

    proptest! {
        #[test]
        fn enumeration_visits_each_key_once(words in words_strategy()) {
            let automaton = build(&words);
            let expected = expected_items(&words);

            for mode in [IterMode::Keys, IterMode::Values, IterMode::Items] {
                prop_assert_eq!(ItemsIter::new(&automaton, mode).count(), expected.len());
            }

            let mut seen = HashMap::new();
            for entry in automaton.items() {
                match entry.unwrap() {
                    Entry::Item(key, value) => {
                        prop_assert!(seen.insert(key, *value).is_none());
                    }
                    other => prop_assert!(false, "unexpected entry {:?}", other),
                }
            }
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn search_agrees_with_naive_scan(
            words in words_strategy(),
            text in prop::collection::vec(b'a'..=b'e', 0..40),
        ) {
            let mut automaton = build(&words);
            automaton.make_automaton();
            let expected = expected_items(&words);
            let by_value: HashMap<usize, Vec<u8>> =
                expected.iter().map(|(k, v)| (*v, k.clone())).collect();

            let got: Vec<(usize, Vec<u8>)> = automaton
                .find_all(&text)
                .unwrap()
                .into_iter()
                .map(|m| match m.value {
                    Value::Object(v) => (m.end, by_value[v].clone()),
                    Value::Integer(_) => unreachable!(),
                })
                .collect();
            prop_assert_eq!(got, naive_matches(&words, &text));
        }

        #[test]
        fn removal_keeps_remaining_keys(words in words_strategy(), drop_every in 1usize..4) {
            let mut automaton = build(&words);
            let mut expected = expected_items(&words);
            let doomed: Vec<Vec<u8>> = expected.keys().step_by(drop_every).cloned().collect();
            for key in &doomed {
                prop_assert!(automaton.remove_word(key));
                expected.remove(key);
            }

            prop_assert_eq!(automaton.len(), expected.len());
            let keys: HashSet<Vec<u8>> = automaton
                .keys()
                .map(|e| e.unwrap().into_key().unwrap())
                .collect();
            prop_assert_eq!(keys, expected.keys().cloned().collect::<HashSet<_>>());
            prop_assert_eq!(automaton.stats().nodes_count, automaton.stats().links_count + 1);
        }
    }
}
