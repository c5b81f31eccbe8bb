use crate::data_types::Event;
use crate::error::{EventFrameError, Result};

/// An ordered, immutable view over events plus a forward-only cursor.
///
/// The cursor marks the first unconsumed event and persists across
/// accumulation calls, so a caller can resume where a previous call stopped
/// instead of reprocessing the whole stream per output frame. Accumulators
/// take `&mut EventStream`, which makes the single-owner sequential contract
/// a compile-time guarantee: two accumulation calls can never interleave on
/// the same stream.
#[derive(Debug, Clone)]
pub struct EventStream {
    events: Vec<Event>,
    cursor: usize,
}

impl EventStream {
    /// Creates a stream, validating that timestamps are non-decreasing.
    ///
    /// Fails fast with [`EventFrameError::MalformedStream`] naming the first
    /// offending index, before any accumulation can run on corrupt data.
    pub fn new(events: Vec<Event>) -> Result<Self> {
        for index in 1..events.len() {
            if events[index].timestamp < events[index - 1].timestamp {
                return Err(EventFrameError::MalformedStream { index });
            }
        }
        Ok(Self { events, cursor: 0 })
    }

    /// Creates a stream without the O(N) sort validation.
    ///
    /// For callers that already hold data known to be time-sorted (e.g. a
    /// decoded log whose format guarantees ordering).
    pub fn from_sorted_unchecked(events: Vec<Event>) -> Self {
        Self { events, cursor: 0 }
    }

    /// Index of the first unconsumed event.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All events, consumed or not.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The unconsumed tail of the stream.
    pub fn remaining(&self) -> &[Event] {
        &self.events[self.cursor..]
    }

    pub fn remaining_len(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether every event has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.events.len()
    }

    /// The first unconsumed event, if any.
    pub fn peek(&self) -> Option<Event> {
        self.events.get(self.cursor).copied()
    }

    /// Rewind the cursor to the start of the stream.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Consumes the stream, handing the unconsumed tail to the caller.
    ///
    /// Supports chaining: the tail can seed a fresh stream for a later
    /// accumulation pass, producing frames identical to a single pass over
    /// the whole grid.
    pub fn take_remaining(mut self) -> Vec<Event> {
        self.events.split_off(self.cursor)
    }

    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(cursor <= self.events.len());
        self.cursor = cursor;
    }
}
