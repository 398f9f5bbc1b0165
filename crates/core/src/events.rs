//! Event sinks - where tile and outcome notifications go.
//!
//! Grid mutations report through an [`EventSink`] so the same code path can
//! feed the presentation layer (a `Vec<EngineEvent>`) or discard everything
//! during self-play (`()`).

use crate::types::EngineEvent;

pub trait EventSink {
    fn emit(&mut self, event: EngineEvent);
}

/// Discards all events.
impl EventSink for () {
    #[inline(always)]
    fn emit(&mut self, _event: EngineEvent) {}
}

impl EventSink for Vec<EngineEvent> {
    fn emit(&mut self, event: EngineEvent) {
        self.push(event);
    }
}
