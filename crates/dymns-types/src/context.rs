//! Per-transaction execution context.

use chrono::{DateTime, Utc};

use crate::{Event, EventSink, Storage};

/// Everything a keeper operation touches besides the keeper itself.
pub struct Context<'a> {
    pub storage: &'a mut dyn Storage,
    pub events: &'a mut dyn EventSink,
    pub block_time: DateTime<Utc>,
}

impl<'a> Context<'a> {
    pub fn new(
        storage: &'a mut dyn Storage,
        events: &'a mut dyn EventSink,
        block_time: DateTime<Utc>,
    ) -> Self {
        Self {
            storage,
            events,
            block_time,
        }
    }

    /// Block time in unix seconds.
    #[must_use]
    pub fn block_unix(&self) -> i64 {
        self.block_time.timestamp()
    }

    pub fn emit(&mut self, event: Event) {
        self.events.emit(event);
    }
}
