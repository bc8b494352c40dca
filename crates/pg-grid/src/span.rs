//! The `1, 3, 7, 15, ..., 2^k - 1` sequence of cross spans.

/// Next span after `v`: `2 * (v + 1) - 1`.
pub const fn next_span(v: i64) -> i64 {
    2 * (v + 1) - 1
}

/// Span values starting at 1, ending before `i64` overflow.
pub fn span_sequence() -> impl Iterator<Item = i64> {
    core::iter::successors(Some(1i64), |&v| {
        v.checked_mul(2).and_then(|n| n.checked_add(1))
    })
}

pub fn is_span_value(v: i64) -> bool {
    v > 0 && (v as u64 + 1).is_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::{is_span_value, next_span, span_sequence};

    #[test]
    fn sequence_prefix() {
        let head: Vec<i64> = span_sequence().take(6).collect();
        assert_eq!(head, vec![1, 3, 7, 15, 31, 63]);
        assert_eq!(next_span(15), 31);
    }

    #[test]
    fn sequence_is_finite_and_valid() {
        let all: Vec<i64> = span_sequence().collect();
        assert_eq!(all.len(), 63);
        assert_eq!(*all.last().expect("non-empty"), i64::MAX);
        assert!(all.iter().all(|&v| is_span_value(v)));
    }

    #[test]
    fn membership() {
        for v in [1, 3, 7, 1023, i64::MAX] {
            assert!(is_span_value(v));
        }
        for v in [-1, 0, 2, 5, 8, 1024] {
            assert!(!is_span_value(v));
        }
    }
}
