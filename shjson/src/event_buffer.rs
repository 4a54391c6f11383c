// SPDX-License-Identifier: Apache-2.0

use alloc::collections::VecDeque;

use crate::event::Event;

/// FIFO of events produced by one feed step and not yet handed out.
///
/// The stream parser only refills it once it has been fully drained, so its
/// size is bounded by what a single chunk can produce. Events only leave
/// through [`EventBuffer::pop_front`].
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: VecDeque<Event>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Removes and returns the oldest event.
    pub fn pop_front(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
