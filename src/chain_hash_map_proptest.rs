#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so every step can run
// the structural consistency walker.

use crate::{ChainHashMap, CursorError, MapConfig, Position};
use proptest::prelude::*;
use std::fmt;
use std::hash::{BuildHasherDefault, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrDefault(usize, i32),
    Remove(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Rehash(usize),
    PopFront,
    PopBack,
    Retain(i32),
    Clear,
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetOrDefault(i, d)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..40).prop_map(OpI::Rehash),
            1 => Just(OpI::PopFront),
            1 => Just(OpI::PopBack),
            1 => (1i32..5).prop_map(OpI::Retain),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Model: ordered list of live pairs, append on first insert, remove in place.
struct Model(Vec<(Key, i32)>);

impl Model {
    fn pos(&self, k: &Key) -> Option<usize> {
        self.0.iter().position(|(mk, _)| mk == k)
    }
}

fn run_state_machine<S>(mut sut: ChainHashMap<Key, i32, S>, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    S: std::hash::BuildHasher + Clone,
{
    let mut model = Model(Vec::new());
    let mut stale: Vec<Position> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let prev = sut.insert(k.clone(), v);
                match model.pos(&k) {
                    Some(p) => {
                        prop_assert_eq!(prev, Some(model.0[p].1));
                        model.0[p].1 = v;
                    }
                    None => {
                        prop_assert_eq!(prev, None);
                        model.0.push((k, v));
                        prop_assert!(sut.load_factor() <= sut.max_load_factor());
                    }
                }
            }
            OpI::GetOrDefault(i, d) => {
                let k = key_from(&pool, i);
                let v = sut.get_or_insert_default(k.clone());
                *v = v.wrapping_add(d);
                match model.pos(&k) {
                    Some(p) => model.0[p].1 = model.0[p].1.wrapping_add(d),
                    None => {
                        model.0.push((k, d));
                        prop_assert!(sut.load_factor() <= sut.max_load_factor());
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let before = sut.len();
                let p = sut.find(&k);
                let got = sut.remove(&k);
                match model.pos(&k) {
                    Some(mp) => {
                        let (_, mv) = model.0.remove(mp);
                        prop_assert_eq!(got, Some(mv));
                        prop_assert_eq!(sut.len(), before - 1);
                        stale.push(p);
                    }
                    None => {
                        prop_assert_eq!(got, None);
                        prop_assert_eq!(sut.len(), before);
                    }
                }
                prop_assert_eq!(sut.find(&k), sut.end());
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let p = sut.find(&k);
                match model.pos(&k) {
                    Some(mp) => {
                        let (sk, sv) = sut.entry_at(p).expect("found position resolves");
                        prop_assert_eq!(sk, &k);
                        prop_assert_eq!(*sv, model.0[mp].1);
                        // Walking back from the found entry reaches the model's predecessor.
                        match sut.prev_position(p) {
                            Ok(q) => {
                                prop_assert!(mp > 0);
                                let pk = sut.entry_at(q).expect("predecessor resolves").0;
                                prop_assert_eq!(pk, &model.0[mp - 1].0);
                            }
                            Err(e) => {
                                prop_assert_eq!(e, CursorError::OutOfRange);
                                prop_assert_eq!(mp, 0);
                            }
                        }
                    }
                    None => prop_assert_eq!(p, sut.end()),
                }
            }
            OpI::Contains(s) => {
                let has_model = model.0.iter().any(|(k, _)| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(v) = sut.get_mut(&k) {
                    *v = v.saturating_add(d);
                }
                if let Some(mp) = model.pos(&k) {
                    model.0[mp].1 = model.0[mp].1.saturating_add(d);
                }
            }
            OpI::Rehash(cap) => {
                sut.rehash(cap);
                prop_assert_eq!(sut.capacity(), cap.max(1));
            }
            OpI::PopFront => {
                let got = sut.pop_front();
                let want = if model.0.is_empty() { None } else { Some(model.0.remove(0)) };
                prop_assert_eq!(got, want);
            }
            OpI::PopBack => {
                prop_assert_eq!(sut.pop_back(), model.0.pop());
            }
            OpI::Retain(m) => {
                sut.retain(|_, v| v.rem_euclid(m) == 0);
                model.0.retain(|(_, v)| v.rem_euclid(m) == 0);
            }
            OpI::Clear => {
                let cap = sut.capacity();
                sut.clear();
                model.0.clear();
                prop_assert_eq!(sut.capacity(), cap);
            }
            OpI::Iterate => {
                let fwd: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&fwd, &model.0);
                let mut back: Vec<(Key, i32)> = sut.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();
                back.reverse();
                prop_assert_eq!(&back, &model.0);

                // A clone matches now and stays independent afterwards.
                let mut copy = sut.clone();
                copy.insert(Key("#copy".into()), 0);
                if let Some((k, _)) = model.0.first() {
                    copy.remove(k);
                }
                prop_assert_eq!(sut.len(), model.0.len());
                prop_assert!(!sut.contains_key("#copy"));
                copy.assert_consistent();
            }
        }

        // Post-conditions after each op
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.0.len());
        prop_assert_eq!(sut.is_empty(), model.0.is_empty());
        let keys: Vec<&Key> = sut.keys().collect();
        let mkeys: Vec<&Key> = model.0.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(keys, mkeys);
        for &p in &stale {
            prop_assert_eq!(sut.entry_at(p), Err(CursorError::Stale));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against an ordered model.
// Invariants exercised across random operation sequences:
// - Overwrites keep order position; new keys append; removals never reorder.
// - `find`/`entry_at`/`prev_position` agree with the model's order.
// - Load factor stays within the limit after every insert.
// - Structural consistency (chains, order links, cached hashes) after each op.
// - Positions of removed entries never resolve again.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: ChainHashMap<Key, i32> =
            ChainHashMap::with_config(MapConfig::new().initial_capacity(2).max_load_factor(0.75)).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

#[derive(Clone, Default)]
struct ConstHasher;
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions, where every entry
// shares one chain and only key equality separates them.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: ChainHashMap<Key, i32, BuildHasherDefault<ConstHasher>> =
            ChainHashMap::with_hasher(BuildHasherDefault::default());
        run_state_machine(sut, pool, ops)?;
    }
}
