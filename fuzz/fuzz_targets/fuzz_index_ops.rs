#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;
use subdex::index::SubstringIndex;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert(String),
    Remove(String),
    Find(String),
}

#[derive(Arbitrary, Debug)]
struct Input {
    max_anchor_len: u8,
    support_remove: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let k = (input.max_anchor_len % 6) as usize + 1;
    let mut index = SubstringIndex::new(k, input.support_remove);
    let mut model = BTreeSet::new();

    for op in input.ops {
        match op {
            Op::Insert(name) => {
                assert_eq!(index.insert(&name), model.insert(name));
            }
            Op::Remove(name) => {
                if input.support_remove {
                    assert_eq!(index.remove(&name), model.remove(&name));
                }
            }
            Op::Find(query) => {
                let mut found = index.find(&query);
                found.sort_unstable();
                let expected: Vec<&str> = model
                    .iter()
                    .filter(|name| name.contains(query.as_str()))
                    .map(String::as_str)
                    .collect();
                assert_eq!(found, expected);
                assert!(index.num_search_names(&query) <= index.len());
            }
        }
    }

    if let Err(err) = index.verify_integrity() {
        panic!("integrity check failed: {err:#}");
    }
});
