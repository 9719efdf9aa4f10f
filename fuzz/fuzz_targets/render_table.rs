#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First NUL splits candidate from reference
    let text = String::from_utf8_lossy(data);
    let (candidate, reference) = text.split_once('\0').unwrap_or((text.as_ref(), ""));

    let from: Vec<&str> = candidate.lines().collect();
    let to: Vec<&str> = reference.lines().collect();
    let table = goldrun_diff::render_table(&from, &to, "candidate", "reference");

    assert!(table.rows().len() >= from.len().max(to.len()));
    assert_eq!(table.has_changes(), from != to);
    // escaped text never opens a tag of its own
    assert_eq!(table.html().matches("<table").count(), 1);
});
