use std::sync::atomic::{AtomicU32, Ordering};

/// Monotonic sequence-number source for outbound requests.
///
/// First value is 1; the counter wraps modulo 2^32 skipping 0, which is
/// reserved for generic_nack replies to PDUs whose sequence could not be
/// read. Lock-free so any task holding the session may allocate.
#[derive(Debug)]
pub struct SequenceGenerator {
    counter: AtomicU32,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
        }
    }

    /// Allocate the next sequence number.
    pub fn next(&self) -> u32 {
        let mut allocated = 0;
        self.counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                allocated = if current == u32::MAX { 1 } else { current + 1 };
                Some(allocated)
            })
            .expect("sequence update closure never returns None");
        allocated
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_and_increments() {
        let seq = SequenceGenerator::new();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.next(), 3);
    }

    #[test]
    fn wraps_past_zero() {
        let seq = SequenceGenerator::new();
        seq.counter.store(u32::MAX - 1, Ordering::Relaxed);
        assert_eq!(seq.next(), u32::MAX);
        assert_eq!(seq.next(), 1); // 0 is skipped
        assert_eq!(seq.next(), 2);
    }

    #[test]
    fn concurrent_allocations_are_unique() {
        use std::sync::Arc;

        let seq = Arc::new(SequenceGenerator::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let seq = Arc::clone(&seq);
            handles.push(std::thread::spawn(move || {
                (0..1000).map(|_| seq.next()).collect::<Vec<_>>()
            }));
        }

        let mut all: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 4000);
    }
}
