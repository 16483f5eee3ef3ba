//! Receipt number generation.
//!
//! A receipt number is a fixed prefix plus the current time in milliseconds
//! since the Unix epoch. This is unique enough to serve as the natural key
//! of a persisted receipt; the database's unique constraint is the arbiter
//! for two creations landing on the same millisecond.

use chrono::Utc;

/// Which prefix a generated number carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptNumberKind {
    /// Receipts created by a registered business.
    Business,
    /// Receipts created during an authenticated trial.
    Trial,
    /// Receipts computed for anonymous visitors, never persisted.
    TrialFree,
}

impl ReceiptNumberKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReceiptNumberKind::Business => "RC-",
            ReceiptNumberKind::Trial => "TRY-",
            ReceiptNumberKind::TrialFree => "TRY-FREE-",
        }
    }
}

/// Generates a receipt number from the current clock.
pub fn generate(kind: ReceiptNumberKind) -> String {
    format_at(kind, Utc::now().timestamp_millis())
}

/// Formats a receipt number for a given epoch-millisecond timestamp.
pub fn format_at(kind: ReceiptNumberKind, epoch_millis: i64) -> String {
    format!("{}{}", kind.prefix(), epoch_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_numbers_match_expected_format() {
        let number = generate(ReceiptNumberKind::Business);
        let digits = number.strip_prefix("RC-").expect("RC- prefix");
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn trial_numbers_carry_their_prefixes() {
        assert!(generate(ReceiptNumberKind::Trial).starts_with("TRY-"));
        assert!(generate(ReceiptNumberKind::TrialFree).starts_with("TRY-FREE-"));
    }

    #[test]
    fn formats_exact_timestamp() {
        assert_eq!(
            format_at(ReceiptNumberKind::Business, 1700000000000),
            "RC-1700000000000"
        );
        assert_eq!(
            format_at(ReceiptNumberKind::TrialFree, 42),
            "TRY-FREE-42"
        );
    }

    #[test]
    fn sequential_numbers_are_non_decreasing() {
        let parse = |n: String| -> i64 {
            n.strip_prefix("RC-")
                .expect("RC- prefix")
                .parse()
                .expect("digits")
        };
        let first = parse(generate(ReceiptNumberKind::Business));
        let second = parse(generate(ReceiptNumberKind::Business));
        assert!(second >= first);
    }
}
