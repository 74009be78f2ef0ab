// vim: tw=80
//! Call-count constraints for [`Mock::verify_call`](crate::Mock::verify_call)

use std::{fmt, ops::Range};

/// How many times a call is expected to have been made.
///
/// Internally a half-open range of acceptable counts.  An end of
/// `usize::MAX` means "no upper bound", so `usize::MAX` itself is always
/// accepted by such a range.  Bounds beyond that saturate: `exactly(usize::MAX)`
/// behaves like `at_least(usize::MAX)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Times {
    range: Range<usize>
}

impl Times {
    /// Any number of calls, including none.
    pub fn any() -> Self {
        Times{range: 0..usize::MAX}
    }

    /// At least `n` calls.
    pub fn at_least(n: usize) -> Self {
        Times{range: n..usize::MAX}
    }

    /// No more than `n` calls.
    pub fn at_most(n: usize) -> Self {
        Times{range: 0..n.saturating_add(1)}
    }

    /// Anywhere within `range`.  The end is exclusive.
    ///
    /// # Panics
    ///
    /// If `range` is empty or backwards.
    pub fn between(range: Range<usize>) -> Self {
        assert!(range.end > range.start, "Backwards or empty range");
        Times{range}
    }

    /// Exactly `n` calls.
    pub fn exactly(n: usize) -> Self {
        Times{range: n..n.saturating_add(1)}
    }

    pub fn never() -> Self {
        Times::exactly(0)
    }

    pub fn once() -> Self {
        Times::exactly(1)
    }

    /// Is `count` an acceptable number of calls?
    pub fn contains(&self, count: usize) -> bool {
        self.range.contains(&count) ||
            (self.range.end == usize::MAX && count >= self.range.start)
    }

    fn is_exact(&self) -> bool {
        self.range.end.checked_sub(self.range.start) == Some(1)
    }
}

impl Default for Times {
    fn default() -> Self {
        Times::at_least(1)
    }
}

impl fmt::Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Range{start, end} = self.range;
        if self.is_exact() {
            match start {
                0 => write!(f, "never"),
                1 => write!(f, "once"),
                n => write!(f, "exactly {} times", n),
            }
        } else if end == usize::MAX {
            match start {
                0 => write!(f, "any number of times"),
                1 => write!(f, "at least once"),
                n => write!(f, "at least {} times", n),
            }
        } else if start == 0 {
            write!(f, "at most {} times", end.saturating_sub(1))
        } else {
            write!(f, "between {} and {} times", start, end.saturating_sub(1))
        }
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn contains() {
        assert!(Times::once().contains(1));
        assert!(!Times::once().contains(0));
        assert!(!Times::once().contains(2));
        assert!(Times::never().contains(0));
        assert!(Times::at_least(2).contains(100));
        assert!(!Times::at_least(2).contains(1));
        assert!(Times::at_most(2).contains(2));
        assert!(!Times::at_most(2).contains(3));
        assert!(Times::between(1..3).contains(2));
        assert!(!Times::between(1..3).contains(3));
    }

    #[test]
    fn display() {
        assert_eq!(Times::never().to_string(), "never");
        assert_eq!(Times::once().to_string(), "once");
        assert_eq!(Times::exactly(3).to_string(), "exactly 3 times");
        assert_eq!(Times::default().to_string(), "at least once");
        assert_eq!(Times::at_least(4).to_string(), "at least 4 times");
        assert_eq!(Times::any().to_string(), "any number of times");
        assert_eq!(Times::at_most(2).to_string(), "at most 2 times");
        assert_eq!(Times::between(1..4).to_string(), "between 1 and 3 times");
    }

    #[test]
    #[should_panic(expected = "Backwards or empty range")]
    fn empty_range() {
        Times::between(0..0);
    }

    #[test]
    #[should_panic(expected = "Backwards or empty range")]
    fn backwards_range() {
        Times::between(5..0);
    }

    #[test]
    fn saturated_bounds() {
        assert!(Times::exactly(usize::MAX).contains(usize::MAX));
        assert!(!Times::exactly(usize::MAX).contains(usize::MAX - 1));
        assert!(Times::any().contains(usize::MAX));
        assert!(Times::at_most(usize::MAX).contains(usize::MAX));
        assert_eq!(Times::exactly(usize::MAX).to_string(),
            format!("at least {} times", usize::MAX));
        assert_eq!(Times::at_most(usize::MAX).to_string(),
            "any number of times");
    }
}
