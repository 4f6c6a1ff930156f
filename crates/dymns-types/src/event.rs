//! Events emitted by state transitions and the sink that receives them.

use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_BUY_ORDER: &str = "dymns_buy_order";
pub const EVENT_TYPE_OFFER_TO_BUY: &str = "dymns_offer_to_buy";
pub const EVENT_TYPE_SET_DYM_NAME: &str = "dymns_set_dym_name";
pub const EVENT_TYPE_SELL_ORDER: &str = "dymns_sell_order";
pub const EVENT_TYPE_ALIAS: &str = "dymns_alias";

/// Action attribute attached to order and sell-order events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Created,
    Set,
    Deleted,
    Refunded,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Set => "set",
            Self::Deleted => "deleted",
            Self::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed event with ordered string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub ty: String,
    pub attributes: Vec<(String, String)>,
}

impl Event {
    #[must_use]
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// First value recorded under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Receives events from the keeper.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// An [`EventSink`] that keeps every event in emission order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Events of type `ty` whose `action` attribute equals `action`.
    pub fn with_action<'a>(&'a self, ty: &'a str, action: Action) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .iter()
            .filter(move |e| e.ty == ty && e.get("action") == Some(action.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_order_and_filters_by_action() {
        let mut log = EventLog::new();
        log.emit(Event::new(EVENT_TYPE_BUY_ORDER).attr("id", "101").attr("action", "created"));
        log.emit(Event::new(EVENT_TYPE_BUY_ORDER).attr("id", "101").attr("action", "deleted"));
        log.emit(Event::new(EVENT_TYPE_SET_DYM_NAME).attr("name", "a"));

        assert_eq!(log.len(), 3);
        assert_eq!(log.events()[0].get("id"), Some("101"));
        assert_eq!(log.with_action(EVENT_TYPE_BUY_ORDER, Action::Deleted).count(), 1);
        assert_eq!(log.with_action(EVENT_TYPE_BUY_ORDER, Action::Set).count(), 0);

        let taken = log.take();
        assert_eq!(taken.len(), 3);
        assert!(log.is_empty());
    }

    #[test]
    fn missing_attribute_is_none() {
        let ev = Event::new("x");
        assert_eq!(ev.get("id"), None);
    }
}
