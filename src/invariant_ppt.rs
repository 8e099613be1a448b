//! Runtime invariant checks with contract-test bookkeeping.
//!
//! Pipeline stages assert their structural invariants (volume length, map
//! dimensions, histogram mass) through [`assert_invariant!`]. Every checked
//! invariant is recorded per thread, so a test can run a stage and then use
//! [`contract_test`] to confirm the stage actually checked what it promises.
//!
//! # Usage
//!
//! ```rust,ignore
//! use depthfocus::invariant_ppt::*;
//!
//! assert_invariant!(
//!     histogram.total() == pixels,
//!     "Histogram counts sum to pixel count"
//! );
//!
//! #[test]
//! fn contract_error_analysis() {
//!     analyze(&filtered, Some(&reference)).unwrap();
//!     contract_test("error analysis", &["Histogram counts sum to pixel count"]);
//! }
//! ```
//!
//! Checks must run on the thread that later calls `contract_test`, so stages
//! assert after their parallel sections have joined.

use std::cell::RefCell;
use std::collections::HashSet;
use std::thread_local;

thread_local! {
    static INVARIANT_LOG: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Assert an invariant and record that it was checked.
///
/// # Panics
/// Panics if the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::__assert_invariant_impl($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariant_ppt::__assert_invariant_impl($condition, $message, Some($context))
    };
}

#[doc(hidden)]
pub fn __assert_invariant_impl(condition: bool, message: &str, context: Option<&str>) {
    INVARIANT_LOG.with(|log| {
        log.borrow_mut().insert(message.to_string());
    });

    if !condition {
        let ctx = context.unwrap_or("unknown");
        panic!("INVARIANT VIOLATION [{}]: {}", ctx, message);
    }
}

/// Whether `message` has been checked on this thread.
pub fn was_checked(message: &str) -> bool {
    INVARIANT_LOG.with(|log| log.borrow().contains(message))
}

/// Panic unless every invariant in `required_invariants` was checked on this thread.
pub fn contract_test(test_name: &str, required_invariants: &[&str]) {
    let missing: Vec<&str> = required_invariants
        .iter()
        .copied()
        .filter(|invariant| !was_checked(invariant))
        .collect();

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: The following invariants were not checked:\n  - {}",
            test_name,
            missing.join("\n  - ")
        );
    }
}

/// Forget all recorded checks on this thread.
pub fn clear_invariant_log() {
    INVARIANT_LOG.with(|log| {
        log.borrow_mut().clear();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_invariants_are_recorded() {
        clear_invariant_log();
        assert_invariant!(1 + 1 == 2, "arithmetic holds");
        assert!(was_checked("arithmetic holds"));
        contract_test("arithmetic", &["arithmetic holds"]);
    }

    #[test]
    #[should_panic(expected = "INVARIANT VIOLATION [unit]: broken")]
    fn test_violation_panics() {
        assert_invariant!(false, "broken", "unit");
    }

    #[test]
    #[should_panic(expected = "CONTRACT FAILURE")]
    fn test_missing_invariant_fails_contract() {
        clear_invariant_log();
        contract_test("nothing checked", &["never asserted"]);
    }
}
