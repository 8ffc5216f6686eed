use std::collections::VecDeque;
use std::sync::RwLock;

use crate::domain::TelemetrySample;
use crate::ports::SampleStore;

/// In-memory ring buffer for telemetry samples.
///
/// A single lock guards the deque so eviction-then-insert is one atomic step
/// relative to any concurrent read; a reader can never observe the buffer at
/// length capacity+1.
pub struct MemoryStore {
    samples: RwLock<VecDeque<TelemetrySample>>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
}

impl SampleStore for MemoryStore {
    fn append(&self, sample: TelemetrySample) -> usize {
        let mut samples = self.samples.write().unwrap();

        if samples.len() >= self.capacity {
            samples.pop_front();
        }

        samples.push_back(sample);
        samples.len()
    }

    fn latest(&self) -> Option<TelemetrySample> {
        self.samples.read().unwrap().back().cloned()
    }

    fn window(&self, limit: usize) -> Vec<TelemetrySample> {
        let samples = self.samples.read().unwrap();
        let skip = samples.len().saturating_sub(limit);

        samples.iter().skip(skip).cloned().collect()
    }

    fn len(&self) -> usize {
        self.samples.read().unwrap().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
