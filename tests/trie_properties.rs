use std::collections::BTreeMap;

use cow_trie::{Trie, TrieNode};
use quickcheck::quickcheck;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Squeezes arbitrary bytes into a small alphabet and short length so that
// generated keys share prefixes and collide often.
fn small_key(raw: &[u8]) -> Vec<u8> {
    raw.iter().take(5).map(|b| b'a' + b % 3).collect()
}

fn build(entries: &[(Vec<u8>, u32)]) -> Trie {
    entries
        .iter()
        .fold(Trie::new(), |trie, (key, value)| trie.put(small_key(key), *value))
}

fn contents(trie: &Trie) -> Vec<(Vec<u8>, u32)> {
    trie.entries::<u32>().map(|(key, value)| (key, *value)).collect()
}

// Every node below the root must carry a value or lead to one.
fn has_no_dangling_nodes(trie: &Trie) -> bool {
    fn check(node: &TrieNode) -> bool {
        (node.is_value_node() || !node.is_leaf()) && node.children().values().all(|c| check(c))
    }

    match trie.root() {
        Some(root) => check(root),
        None => true,
    }
}

quickcheck! {
    fn prop_round_trip(entries: Vec<(Vec<u8>, u32)>, key: Vec<u8>, value: u32) -> bool {
        let key = small_key(&key);
        build(&entries).put(&key, value).get::<u32>(&key) == Some(&value)
    }

    fn prop_put_isolation(entries: Vec<(Vec<u8>, u32)>, key: Vec<u8>, value: u32) -> bool {
        let key = small_key(&key);
        let before = build(&entries);
        let snapshot = contents(&before);
        let after = before.put(&key, value);

        // The old version is untouched
        contents(&before) == snapshot
            // and every other key reads the same in both versions
            && snapshot
                .iter()
                .filter(|(k, _)| *k != key)
                .all(|(k, _)| before.get::<u32>(k) == after.get::<u32>(k))
            && after.len() == before.len() + if before.contains_key(&key) { 0 } else { 1 }
    }

    fn prop_put_keeps_descendants(entries: Vec<(Vec<u8>, u32)>, key: Vec<u8>, value: u32) -> bool {
        let key = small_key(&key);
        let before = build(&entries);
        let after = before.put(&key, value);

        before
            .keys()
            .filter(|k| k.len() > key.len() && k.starts_with(&key))
            .all(|k| after.get::<u32>(&k) == before.get::<u32>(&k))
    }

    fn prop_remove_matches_model(entries: Vec<(Vec<u8>, u32)>, removals: Vec<Vec<u8>>) -> bool {
        let mut model: BTreeMap<Vec<u8>, u32> = BTreeMap::new();
        for (key, value) in &entries {
            model.insert(small_key(key), *value);
        }

        let mut trie = build(&entries);
        for key in &removals {
            let key = small_key(key);
            model.remove(&key);
            trie = trie.remove(&key);
            if !has_no_dangling_nodes(&trie) {
                return false;
            }
        }

        contents(&trie) == model.into_iter().collect::<Vec<_>>()
    }

    fn prop_remove_absent_is_noop(entries: Vec<(Vec<u8>, u32)>, key: Vec<u8>) -> bool {
        let key = small_key(&key);
        let trie = build(&entries);
        if trie.contains_key(&key) {
            return true;
        }
        contents(&trie.remove(&key)) == contents(&trie)
    }

    fn prop_remove_idempotent(entries: Vec<(Vec<u8>, u32)>, key: Vec<u8>) -> bool {
        let key = small_key(&key);
        let once = build(&entries).remove(&key);
        let twice = once.remove(&key);
        contents(&once) == contents(&twice) && once.len() == twice.len()
    }

    fn prop_remove_then_reinsert(entries: Vec<(Vec<u8>, u32)>, key: Vec<u8>, value: u32) -> bool {
        let key = small_key(&key);
        let trie = build(&entries);
        let without = trie.remove(&key);

        // Putting the value back gives the same contents as putting it on the original
        contents(&without.put(&key, value)) == contents(&trie.put(&key, value))
    }

    fn prop_keys_sorted_and_counted(entries: Vec<(Vec<u8>, u32)>) -> bool {
        let trie = build(&entries);
        let keys: Vec<Vec<u8>> = trie.keys().collect();
        keys.windows(2).all(|pair| pair[0] < pair[1]) && keys.len() == trie.len()
    }
}

#[test]
fn test_random_operations_against_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    let mut trie = Trie::new();
    let mut history: Vec<(Trie, BTreeMap<Vec<u8>, u64>)> = Vec::new();

    for step in 0..5_000u64 {
        let len = rng.gen_range(0..6);
        let key: Vec<u8> = (0..len).map(|_| b'a' + rng.gen_range(0..4u8)).collect();

        if rng.gen_bool(0.6) {
            model.insert(key.clone(), step);
            trie = trie.put(&key, step);
        } else {
            model.remove(&key);
            trie = trie.remove(&key);
        }

        assert_eq!(trie.len(), model.len());
        if step % 250 == 0 {
            history.push((trie.clone(), model.clone()));
        }
    }

    assert!(has_no_dangling_nodes(&trie));

    // Every snapshot taken along the way still reads exactly as it did
    for (snapshot, expected) in &history {
        let actual: Vec<(Vec<u8>, u64)> = snapshot
            .entries::<u64>()
            .map(|(key, value)| (key, *value))
            .collect();
        assert_eq!(actual, expected.clone().into_iter().collect::<Vec<_>>());
    }
}
