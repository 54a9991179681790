//! RequestGeneration — stamps remote searches so late answers can be dropped.
//!
//! In-flight requests are never aborted.  Instead every request carries the
//! generation it was issued under and a response is only applied when that
//! generation is still the latest one.

#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request and return its generation.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Orphan whatever is in flight without starting anything new.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}
