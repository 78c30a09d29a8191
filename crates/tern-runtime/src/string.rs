//! Immutable string values.
//!
//! Characters are bytes, matching the `char` the compiler lowers string
//! literals to. Every operation that produces a string allocates a new
//! buffer, so no two values ever share storage.

use std::fmt;

use crate::error::{RuntimeError, RuntimeResult, check_index};
use crate::fail_fast::OrFailFast;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TernString {
    chars: Box<[u8]>,
}

impl TernString {
    /// Create a string by copying `chars`.
    pub fn new(chars: &[u8]) -> Self {
        Self {
            chars: chars.into(),
        }
    }

    /// Number of characters.
    #[inline]
    pub fn size(&self) -> i64 {
        self.chars.len() as i64
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    pub fn try_char_at(&self, index: i64) -> RuntimeResult<u8> {
        let slot = check_index("String::char_at", index, self.chars.len())?;
        Ok(self.chars[slot])
    }

    /// Character at `index`; fails fast when out of bounds.
    pub fn char_at(&self, index: i64) -> u8 {
        self.try_char_at(index).or_fail_fast()
    }

    pub fn reverse(&self) -> Self {
        self.chars.iter().rev().copied().collect()
    }

    pub fn concat(&self, other: &TernString) -> Self {
        let mut chars = Vec::with_capacity(self.chars.len() + other.chars.len());
        chars.extend_from_slice(&self.chars);
        chars.extend_from_slice(&other.chars);
        Self {
            chars: chars.into_boxed_slice(),
        }
    }

    /// Characters in `[from, to)`.
    pub fn try_substring(&self, from: i64, to: i64) -> RuntimeResult<Self> {
        let size = self.size();
        if !(0 <= from && from <= to && to <= size) {
            return Err(RuntimeError::InvalidRange {
                op: "String::substring",
                from,
                to,
                size,
            });
        }
        Ok(Self::new(&self.chars[from as usize..to as usize]))
    }

    pub fn substring(&self, from: i64, to: i64) -> Self {
        self.try_substring(from, to).or_fail_fast()
    }
}

impl From<&str> for TernString {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<Vec<u8>> for TernString {
    fn from(chars: Vec<u8>) -> Self {
        Self {
            chars: chars.into_boxed_slice(),
        }
    }
}

impl FromIterator<u8> for TernString {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TernString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_concat() {
        let joined = TernString::from("ab").concat(&TernString::from("cd"));
        assert_eq!(joined, TernString::from("abcd"));
        assert_eq!(joined.size(), 4);
    }

    #[test]
    fn test_concat_allocates_fresh_storage() {
        let left = TernString::from("ab");
        let empty = TernString::default();
        let joined = left.concat(&empty);
        assert_eq!(joined, left);
        assert_ne!(joined.as_bytes().as_ptr(), left.as_bytes().as_ptr());
    }

    #[test]
    fn test_char_at() {
        let s = TernString::from("xyz");
        assert_eq!(s.try_char_at(0), Ok(b'x'));
        assert_eq!(s.char_at(2), b'z');
        assert_eq!(
            s.try_char_at(3),
            Err(RuntimeError::IndexOutOfBounds {
                op: "String::char_at",
                index: 3,
                size: 3
            })
        );
        assert!(s.try_char_at(-1).is_err());
    }

    #[test]
    #[should_panic(expected = "String::char_at: index 5 out of bounds for size 2")]
    fn test_char_at_fails_fast() {
        TernString::from("hi").char_at(5);
    }

    #[test]
    fn test_reverse() {
        assert_eq!(TernString::from("abc").reverse(), TernString::from("cba"));
        assert_eq!(TernString::default().reverse(), TernString::default());
    }

    #[test]
    fn test_substring() {
        let s = TernString::from("runtime");
        assert_eq!(s.substring(0, 3), TernString::from("run"));
        assert_eq!(s.substring(3, 7), TernString::from("time"));
        assert_eq!(s.substring(2, 2).size(), 0);
        assert!(s.try_substring(4, 3).is_err());
        assert!(s.try_substring(-1, 2).is_err());
        assert!(s.try_substring(0, 8).is_err());
    }

    #[test]
    #[should_panic(expected = "String::substring: invalid range [2, 9) for size 3")]
    fn test_substring_fails_fast() {
        TernString::from("abc").substring(2, 9);
    }

    #[test]
    fn test_display_is_lossy_utf8() {
        assert_eq!(TernString::from("héllo").to_string(), "héllo");
        assert_eq!(TernString::new(&[b'a', 0xff]).to_string(), "a\u{fffd}");
    }

    fn any_string() -> impl Strategy<Value = TernString> {
        proptest::collection::vec(any::<u8>(), 0..32).prop_map(TernString::from)
    }

    proptest! {
        #[test]
        fn reverse_is_involution(s in any_string()) {
            prop_assert_eq!(s.reverse().reverse(), s);
        }

        #[test]
        fn concat_is_associative(a in any_string(), b in any_string(), c in any_string()) {
            prop_assert_eq!(a.concat(&b).concat(&c), a.concat(&b.concat(&c)));
        }

        #[test]
        fn full_and_empty_substrings(s in any_string(), i in 0usize..33) {
            prop_assert_eq!(&s.substring(0, s.size()), &s);
            let i = (i as i64).min(s.size());
            prop_assert_eq!(s.substring(i, i).size(), 0);
        }
    }
}
