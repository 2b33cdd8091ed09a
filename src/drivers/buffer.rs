use std::collections::VecDeque;
/// Fixed-width history of 8-bit samples, one per plot column.
///
/// The ring is always full: its length equals the plot width at all times.
/// Appending beyond capacity evicts the oldest sample.
#[derive(Clone, Debug)]
pub struct SampleRing {
    data: VecDeque<u8>,
    capacity: usize,
}
impl SampleRing {
    /// Creates a ring of `width` columns, every slot holding `fill`.
    pub fn filled(width: usize, fill: u8) -> Self {
        let capacity = width.max(1);
        Self {
            data: std::iter::repeat(fill).take(capacity).collect(),
            capacity,
        }
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn push(&mut self, sample: u8) {
        if self.data.len() == self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(sample);
    }
    pub fn extend_from_slice(&mut self, samples: &[u8]) {
        for &sample in samples {
            self.push(sample);
        }
    }
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }
    /// Rebuilds the ring for a new plot width.
    ///
    /// The newest `new_width` samples are kept in order. When the ring grows,
    /// the missing columns are added at the front using the oldest retained
    /// sample, or `fill` if the ring is somehow empty.
    pub fn resize(&mut self, new_width: usize, fill: u8) {
        let new_width = new_width.max(1);
        while self.data.len() > new_width {
            self.data.pop_front();
        }
        let pad = self.data.front().copied().unwrap_or(fill);
        while self.data.len() < new_width {
            self.data.push_front(pad);
        }
        self.capacity = new_width;
    }
}
