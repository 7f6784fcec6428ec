//! Kani Arbitrary implementations and proof harnesses for property verification.
//!
//! # Usage
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani --features kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use crate::{ExactMatcher, Field, FieldSet, PostCodeRange};

impl kani::Arbitrary for Field {
    fn any() -> Self {
        let idx: usize = kani::any();
        Field::ALL[idx % Field::ALL.len()]
    }
}

impl kani::Arbitrary for FieldSet {
    fn any() -> Self {
        Field::ALL.into_iter().filter(|_| kani::any()).collect()
    }
}

impl kani::Arbitrary for PostCodeRange {
    fn any() -> Self {
        PostCodeRange::new(kani::any(), kani::any())
    }
}

// ============================================================================
// Proof Harnesses
// ============================================================================

/// Inserting a field makes it a member and never removes another.
#[kani::proof]
#[kani::unwind(10)]
fn proof_field_set_insert() {
    let set: FieldSet = kani::any();
    let field: Field = kani::any();
    let other: Field = kani::any();

    let grown = set.with(field);
    assert!(grown.contains(field));
    if set.contains(other) {
        assert!(grown.contains(other));
    }
    assert!(grown.len() >= set.len());
}

/// `len` agrees with the iterator.
#[kani::proof]
#[kani::unwind(10)]
fn proof_field_set_len_matches_iter() {
    let set: FieldSet = kani::any();
    assert_eq!(set.len(), set.iter().count());
    assert_eq!(set.is_empty(), set.len() == 0);
}

/// A range contains exactly the values between its bounds.
#[kani::proof]
fn proof_range_contains_bounds() {
    let range: PostCodeRange = kani::any();
    let value: i64 = kani::any();

    if range.contains(value) {
        assert!(range.start() <= value && value <= range.end());
    }
    if range.start() <= range.end() {
        assert!(range.contains(range.start()));
        assert!(range.contains(range.end()));
    }
}

/// A range matcher never accepts a number outside its range.
#[kani::proof]
#[kani::unwind(4)]
fn proof_exact_matcher_range() {
    let range: PostCodeRange = kani::any();
    let value: u16 = kani::any();
    let matcher = ExactMatcher::new().with_range(range);

    let accepted = matcher.matches(&value.to_string());
    assert_eq!(accepted, range.contains(i64::from(value)));
}
