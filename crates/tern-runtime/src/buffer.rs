//! Growable storage shared by every dynamically sized runtime container.
//!
//! A [`Buffer`] owns a single allocation of `capacity` slots and presents the
//! first `len` of them. Slots past `len` always hold `T::default()`, which is
//! zero for every element type the runtime stores.

/// Smallest power of two strictly greater than `size`.
///
/// `capacity_for(0) == 1`, `capacity_for(1) == 2`, `capacity_for(4) == 8`.
#[inline]
pub fn capacity_for(size: usize) -> usize {
    (size + 1).next_power_of_two()
}

/// Owned, zero-filled backing storage with independent length and capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Buffer<T> {
    slots: Box<[T]>,
    len: usize,
}

impl<T: Copy + Default> Buffer<T> {
    /// Create a buffer of `len` zeroed elements with `capacity_for(len)` slots.
    pub fn zeroed(len: usize) -> Self {
        Self {
            slots: zeroed_slots(capacity_for(len)),
            len,
        }
    }

    /// Create an empty buffer with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: zeroed_slots(capacity.max(1)),
            len: 0,
        }
    }

    /// Get the current length
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the current capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots[..self.len]
    }

    /// Every slot, including the zero-filled tail past `len`.
    #[inline]
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// Set the logical length, keeping `capacity == capacity_for(len)`.
    ///
    /// Reallocates (growing or shrinking) only when the target capacity
    /// differs from the current one. Elements below `min(len, new_len)` keep
    /// their values; everything else reads as zero afterwards.
    pub fn resize(&mut self, new_len: usize) {
        let target = capacity_for(new_len);
        if target != self.capacity() {
            self.reallocate(target, self.len.min(new_len));
        } else if new_len < self.len {
            self.slots[new_len..self.len].fill(T::default());
        }
        self.len = new_len;
    }

    /// Append a slice, doubling the capacity only once `len` would exceed it.
    ///
    /// Used by accumulation buffers whose starting capacity is chosen by the
    /// caller rather than by [`capacity_for`].
    pub fn extend_from_slice(&mut self, items: &[T]) {
        let new_len = self.len + items.len();
        if new_len > self.capacity() {
            let mut capacity = self.capacity();
            while capacity < new_len {
                capacity *= 2;
            }
            self.reallocate(capacity, self.len);
        }
        self.slots[self.len..new_len].copy_from_slice(items);
        self.len = new_len;
    }

    /// Move into a fresh allocation of `capacity` slots, keeping the first
    /// `keep` elements.
    fn reallocate(&mut self, capacity: usize, keep: usize) {
        tracing::debug!(
            from = self.capacity(),
            to = capacity,
            len = keep,
            "reallocating buffer"
        );
        let mut slots = zeroed_slots(capacity);
        slots[..keep].copy_from_slice(&self.slots[..keep]);
        self.slots = slots;
    }
}

fn zeroed_slots<T: Copy + Default>(capacity: usize) -> Box<[T]> {
    vec![T::default(); capacity].into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tail_is_zero(buffer: &Buffer<i64>) -> bool {
        buffer.slots()[buffer.len()..].iter().all(|&slot| slot == 0)
    }

    #[test]
    fn test_capacity_for_small_sizes() {
        let expected = [(0, 1), (1, 2), (2, 4), (3, 4), (4, 8), (7, 8), (8, 16)];
        for (size, capacity) in expected {
            assert_eq!(capacity_for(size), capacity, "capacity_for({size})");
        }
    }

    #[test]
    fn test_zeroed_buffer() {
        let buffer = Buffer::<i64>::zeroed(5);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.capacity(), 8);
        assert!(buffer.slots().iter().all(|&slot| slot == 0));
    }

    #[test]
    fn test_resize_within_capacity_does_not_reallocate() {
        let mut buffer = Buffer::<i64>::zeroed(2);
        buffer.as_mut_slice().copy_from_slice(&[4, 5]);
        let before = buffer.slots().as_ptr();

        buffer.resize(3);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.slots().as_ptr(), before);
        assert_eq!(buffer.as_slice(), &[4, 5, 0]);
    }

    #[test]
    fn test_shrink_within_capacity_rezeroes_tail() {
        let mut buffer = Buffer::<i64>::zeroed(3);
        buffer.as_mut_slice().copy_from_slice(&[1, 2, 3]);

        buffer.resize(2);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.slots(), &[1, 2, 0, 0]);
    }

    #[test]
    fn test_shrink_reallocates_to_smaller_capacity() {
        let mut buffer = Buffer::<i64>::zeroed(9);
        buffer.as_mut_slice()[0] = 11;
        buffer.as_mut_slice()[8] = 99;
        assert_eq!(buffer.capacity(), 16);

        buffer.resize(1);
        assert_eq!(buffer.capacity(), 2);
        assert_eq!(buffer.slots(), &[11, 0]);
    }

    #[test]
    fn test_extend_from_slice_grows_on_overflow_only() {
        let mut buffer = Buffer::<u8>::with_capacity(4);
        buffer.extend_from_slice(b"abcd");
        assert_eq!(buffer.capacity(), 4);

        buffer.extend_from_slice(b"e");
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.as_slice(), b"abcde");
    }

    #[test]
    fn test_extend_from_slice_doubles_from_starting_capacity() {
        let mut buffer = Buffer::<u8>::with_capacity(256);
        buffer.extend_from_slice(&[b'x'; 256]);
        assert_eq!(buffer.capacity(), 256);

        // Exactly filling the doubled capacity must not overshoot it.
        buffer.extend_from_slice(&[b'y'; 256]);
        assert_eq!(buffer.capacity(), 512);
        assert_eq!(buffer.len(), 512);

        buffer.extend_from_slice(&[b'z'; 1000]);
        assert_eq!(buffer.capacity(), 2048);
        assert_eq!(&buffer.as_slice()[..2], b"xx");
        assert!(buffer.slots()[buffer.len()..].iter().all(|&slot| slot == 0));
    }

    #[test]
    fn test_sequential_growth_reallocates_logarithmically() {
        let mut buffer = Buffer::<i64>::zeroed(0);
        let mut reallocations = 0;
        for n in 1..=10_000usize {
            let before = buffer.capacity();
            buffer.resize(n);
            buffer.as_mut_slice()[n - 1] = n as i64;
            if buffer.capacity() != before {
                reallocations += 1;
            }
        }
        // One reallocation per power of two up to 2^14.
        assert_eq!(reallocations, 14);
        assert!(buffer.as_slice().iter().enumerate().all(|(i, &v)| v == i as i64 + 1));
    }

    proptest! {
        #[test]
        fn capacity_is_smallest_power_of_two_above(size in 0usize..(1 << 40)) {
            let capacity = capacity_for(size);
            prop_assert!(capacity.is_power_of_two());
            prop_assert!(capacity > size);
            prop_assert!(capacity / 2 <= size);
        }

        #[test]
        fn resize_keeps_prefix_and_zero_tail(
            initial in proptest::collection::vec(any::<i64>(), 0..64),
            new_len in 0usize..128,
        ) {
            let mut buffer = Buffer::<i64>::zeroed(initial.len());
            buffer.as_mut_slice().copy_from_slice(&initial);

            buffer.resize(new_len);

            let kept = initial.len().min(new_len);
            prop_assert_eq!(buffer.capacity(), capacity_for(new_len));
            prop_assert_eq!(&buffer.as_slice()[..kept], &initial[..kept]);
            prop_assert!(buffer.as_slice()[kept..].iter().all(|&v| v == 0));
            prop_assert!(tail_is_zero(&buffer));
        }
    }
}
