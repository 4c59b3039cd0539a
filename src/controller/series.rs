//! Bounded, index-aligned history of the four interface counters.

use std::collections::VecDeque;

use crate::config::DEFAULT_BUFFER_CAPACITY;
use crate::error::{MonitorError, Result};
use crate::model::{CounterSample, SeriesSnapshot};

/// Four parallel series stored as one deque of samples, so alignment holds by construction.
#[derive(Debug)]
pub struct TimeSeriesBuffer {
    points: VecDeque<CounterSample>,
    capacity: usize,
}

impl TimeSeriesBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MonitorError::Configuration(
                "buffer capacity must be greater than zero".into(),
            ));
        }
        Ok(Self {
            // Grows on demand past the default; capacity is only an upper bound.
            points: VecDeque::with_capacity(capacity.min(DEFAULT_BUFFER_CAPACITY)),
            capacity,
        })
    }

    /// Push one point; evicts the oldest when over capacity.
    pub fn append(&mut self, sample: CounterSample) {
        self.points.push_back(sample);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        let n = self.points.len();
        let mut out = SeriesSnapshot {
            bytes_sent: Vec::with_capacity(n),
            bytes_recv: Vec::with_capacity(n),
            packets_sent: Vec::with_capacity(n),
            packets_recv: Vec::with_capacity(n),
        };
        for p in &self.points {
            out.bytes_sent.push(p.bytes_sent);
            out.bytes_recv.push(p.bytes_recv);
            out.packets_sent.push(p.packets_sent);
            out.packets_recv.push(p.packets_recv);
        }
        out
    }

    pub fn latest(&self) -> Option<&CounterSample> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
