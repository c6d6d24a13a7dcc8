//! Fixed-capacity sample history.

use crate::error::{Result, ThermoError};

/// Bounded, chronologically ordered sample storage.
///
/// Storage for `capacity` samples is allocated up front and zero-filled.
/// Samples are appended until the buffer is full; after that every append
/// shifts the contents one slot towards the front, dropping the oldest sample,
/// and writes the newest into the last slot. The most recent sample is always
/// last.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    storage: Box<[f64]>,
    len: usize,
}

impl SampleBuffer {
    /// Allocate a buffer for `capacity` samples.
    ///
    /// Fails with [`ThermoError::BufferAllocation`] instead of aborting when
    /// the storage cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| ThermoError::BufferAllocation { capacity })?;
        storage.resize(capacity, 0.0);
        Ok(Self {
            storage: storage.into_boxed_slice(),
            len: 0,
        })
    }

    /// Append a sample, evicting the oldest if the buffer is full.
    pub fn push(&mut self, sample: f64) {
        let capacity = self.storage.len();
        if capacity == 0 {
            return;
        }
        if self.len < capacity {
            self.storage[self.len] = sample;
            self.len += 1;
        } else {
            self.storage.copy_within(1.., 0);
            self.storage[capacity - 1] = sample;
        }
    }

    /// The valid samples, oldest first.
    pub fn samples(&self) -> &[f64] {
        &self.storage[..self.len]
    }

    /// The whole allocation, including the zeroed tail past [`len`](Self::len).
    pub fn backing_storage(&self) -> &[f64] {
        &self.storage
    }

    /// Number of valid samples (the fill count).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no sample has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples kept.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Whether further appends will evict.
    pub fn is_full(&self) -> bool {
        self.len == self.storage.len()
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.samples().last().copied()
    }

    /// Iterate over the valid samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples().iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_below_capacity() {
        let mut buffer = SampleBuffer::new(5).unwrap();
        for v in [1.0, 2.0, 3.0] {
            buffer.push(v);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.samples(), &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.backing_storage(), &[1.0, 2.0, 3.0, 0.0, 0.0]);
        assert!(!buffer.is_full());
        assert_eq!(buffer.latest(), Some(3.0));
    }

    #[test]
    fn test_eviction_keeps_most_recent_last() {
        let mut buffer = SampleBuffer::new(3).unwrap();
        for v in [10.0, 20.0, 30.0, 40.0] {
            buffer.push(v);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.samples(), &[20.0, 30.0, 40.0]);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_many_wraps() {
        let capacity = 7;
        let mut buffer = SampleBuffer::new(capacity).unwrap();
        let readings: Vec<f64> = (0..100).map(f64::from).collect();
        for &v in &readings {
            buffer.push(v);
        }
        assert_eq!(buffer.len(), capacity);
        assert_eq!(buffer.samples(), &readings[readings.len() - capacity..]);
        assert_eq!(buffer.iter().next(), Some(93.0));
    }

    #[test]
    fn test_capacity_one() {
        let mut buffer = SampleBuffer::new(1).unwrap();
        buffer.push(1.5);
        buffer.push(2.5);
        assert_eq!(buffer.samples(), &[2.5]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = SampleBuffer::new(4).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);
        assert_eq!(buffer.backing_storage().len(), 4);
        assert!(buffer.backing_storage().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unallocatable_capacity_is_an_error() {
        let err = SampleBuffer::new(usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            ThermoError::BufferAllocation {
                capacity: usize::MAX
            }
        ));
    }

    #[test]
    fn test_zero_capacity_ignores_pushes() {
        let mut buffer = SampleBuffer::new(0).unwrap();
        buffer.push(1.0);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.samples().is_empty());
    }
}
