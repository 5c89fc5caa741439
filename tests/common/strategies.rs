//! Proptest strategies.

use proptest::prelude::*;

/// Small client key alphabet so keys collide often
pub fn client_key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("unknown".to_string()),
        "10\\.0\\.0\\.[0-9]",
        "[a-f]{1,3}",
    ]
}

/// Admission limits including the degenerate zero
pub fn max_requests_strategy() -> impl Strategy<Value = u32> {
    0u32..50
}

/// Strictly increasing capture offsets in minutes
pub fn capture_offsets_strategy(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..600, 0..max_len).prop_map(|gaps| {
        gaps.into_iter()
            .scan(0i64, |total, gap| {
                *total += gap;
                Some(*total)
            })
            .collect()
    })
}

/// Avatar templates, relative or absolute, with zero or more placeholders
pub fn avatar_template_strategy() -> impl Strategy<Value = String> {
    let path = "(/[a-z0-9_]{1,8}){1,3}";
    prop_oneof![
        path.prop_map(|p| format!("{p}/{{size}}.png")),
        path.prop_map(|p| format!("https://cdn.example{p}/{{size}}.png")),
        path.prop_map(|p| format!("{p}.png")),
    ]
}
