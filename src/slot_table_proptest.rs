#![cfg(test)]

// Property tests for SlotTable kept inside the crate next to the structure
// they exercise.

use crate::slot_table::SlotTable;
use proptest::prelude::*;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Tombstone(usize),
    Compact,
    Clear,
    Lookup(String),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Tombstone),
            1 => Just(OpI::Compact),
            1 => Just(OpI::Clear),
            1 => "[a-z]{0,4}".prop_map(OpI::Lookup),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against an ordered Vec model of slots.
// Invariants exercised across random operation sequences:
// - Slot order is first-insertion order; overwrites keep position.
// - Tombstones keep their slot until `compact`/`clear`; `dead_len` matches.
// - `get` sees live values only; `contains_key` sees live and dead slots.
// - `compact` keeps live slots in relative order and reports the drop count.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: SlotTable<i32> = SlotTable::new();
        let mut model: Vec<(String, Option<i32>)> = Vec::new();

        for op in ops {
            match op {
                OpI::Set(i, v) => {
                    let key = pool[i].clone();
                    let (_h, prev) = sut.upsert(key.clone(), Some(v));
                    match model.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => {
                            prop_assert_eq!(prev, slot.1);
                            slot.1 = Some(v);
                        }
                        None => {
                            prop_assert_eq!(prev, None);
                            model.push((key, Some(v)));
                        }
                    }
                }
                OpI::Tombstone(i) => {
                    let key = pool[i].clone();
                    let prev = sut.tombstone(&key);
                    match model.iter_mut().find(|(k, _)| *k == key) {
                        Some(slot) => {
                            prop_assert_eq!(prev, slot.1.take());
                        }
                        None => {
                            prop_assert_eq!(prev, None);
                            model.push((key, None));
                        }
                    }
                }
                OpI::Compact => {
                    let dead = model.iter().filter(|(_, v)| v.is_none()).count();
                    prop_assert_eq!(sut.compact(), dead);
                    model.retain(|(_, v)| v.is_some());
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
                OpI::Lookup(key) => {
                    let m = model.iter().find(|(k, _)| *k == key);
                    prop_assert_eq!(sut.contains_key(&key), m.is_some());
                    prop_assert_eq!(sut.get(&key), m.and_then(|(_, v)| v.as_ref()));
                }
            }

            let seen: Vec<(String, Option<i32>)> = sut
                .iter()
                .map(|(k, v)| (k.to_string(), v.copied()))
                .collect();
            prop_assert_eq!(&seen, &model);
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.dead_len(), model.iter().filter(|(_, v)| v.is_none()).count());
        }
    }
}
