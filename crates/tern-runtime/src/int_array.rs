//! Growable arrays of 64-bit integers.

use crate::buffer::Buffer;
use crate::error::{RuntimeResult, check_index, check_size};
use crate::fail_fast::OrFailFast;

/// A mutable sequence of `i64` with independent size and capacity.
///
/// `capacity` is always `capacity_for(size)`, and every slot past `size`
/// reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntArray {
    buffer: Buffer<i64>,
}

impl IntArray {
    /// Create an array of `size` zeros.
    pub fn try_new(size: i64) -> RuntimeResult<Self> {
        let size = check_size("IntArray::new", size)?;
        Ok(Self {
            buffer: Buffer::zeroed(size),
        })
    }

    pub fn new(size: i64) -> Self {
        Self::try_new(size).or_fail_fast()
    }

    #[inline]
    pub fn size(&self) -> i64 {
        self.buffer.len() as i64
    }

    #[inline]
    pub fn capacity(&self) -> i64 {
        self.buffer.capacity() as i64
    }

    pub fn try_get(&self, index: i64) -> RuntimeResult<i64> {
        let slot = check_index("IntArray::get", index, self.buffer.len())?;
        Ok(self.buffer.as_slice()[slot])
    }

    pub fn get(&self, index: i64) -> i64 {
        self.try_get(index).or_fail_fast()
    }

    pub fn try_set(&mut self, index: i64, value: i64) -> RuntimeResult<()> {
        let slot = check_index("IntArray::set", index, self.buffer.len())?;
        self.buffer.as_mut_slice()[slot] = value;
        Ok(())
    }

    pub fn set(&mut self, index: i64, value: i64) {
        self.try_set(index, value).or_fail_fast()
    }

    pub fn try_resize(&mut self, new_size: i64) -> RuntimeResult<()> {
        let new_size = check_size("IntArray::resize", new_size)?;
        self.buffer.resize(new_size);
        Ok(())
    }

    pub fn resize(&mut self, new_size: i64) {
        self.try_resize(new_size).or_fail_fast()
    }

    pub fn append(&mut self, value: i64) {
        let last = self.buffer.len();
        self.buffer.resize(last + 1);
        self.buffer.as_mut_slice()[last] = value;
    }

    /// Copy `other`'s elements, in order, onto the end of this array.
    pub fn append_all(&mut self, other: &IntArray) {
        if other.buffer.is_empty() {
            return;
        }
        let start = self.buffer.len();
        self.buffer.resize(start + other.buffer.len());
        self.buffer.as_mut_slice()[start..].copy_from_slice(other.as_slice());
    }

    /// Drop every element; the storage shrinks back to a single slot.
    pub fn clear(&mut self) {
        self.buffer.resize(0);
    }

    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        self.buffer.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.as_slice().iter().copied()
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> &[i64] {
        self.buffer.slots()
    }
}

impl Default for IntArray {
    fn default() -> Self {
        Self {
            buffer: Buffer::zeroed(0),
        }
    }
}

impl From<&[i64]> for IntArray {
    fn from(values: &[i64]) -> Self {
        let mut buffer = Buffer::zeroed(values.len());
        buffer.as_mut_slice().copy_from_slice(values);
        Self { buffer }
    }
}

impl FromIterator<i64> for IntArray {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut array = Self::default();
        for value in iter {
            array.append(value);
        }
        array
    }
}
