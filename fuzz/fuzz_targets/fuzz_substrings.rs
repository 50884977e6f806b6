#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use subdex::utils::{count_unique_substrings, unique_substrings};

fuzz_target!(|data: (&str, u8, u8)| {
    let (text, a, b) = data;
    let min = (a % 8) as usize;
    let max = (b % 8) as usize;

    let spans = unique_substrings(text, min, max);
    assert_eq!(spans.len(), count_unique_substrings(text, min, max));

    let mut seen = HashSet::new();
    for span in spans {
        // Spans must land on char boundaries and never repeat a substring
        let piece = &text[span];
        let chars = piece.chars().count();
        assert!(chars >= min.max(1) && chars <= max);
        assert!(seen.insert(piece));
    }
});
