//! Minimal aggregate and event used by the unit tests of this crate.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::aggregate::{AggregateRoot, EventBuffer};
use crate::event::{DomainEvent, EventMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TestEventKind {
    Touched,
    Other,
}

impl TestEventKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Touched => "test.touched",
            Self::Other => "test.other",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestEvent {
    pub metadata: EventMetadata,
    pub kind: TestEventKind,
    pub label: String,
}

impl TestEvent {
    pub(crate) fn new(kind: TestEventKind, label: &str) -> Self {
        Self {
            metadata: EventMetadata::new(
                kind.as_str(),
                None,
                1,
                Uuid::new_v4(),
                Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            ),
            kind,
            label: label.to_owned(),
        }
    }
}

impl DomainEvent for TestEvent {
    type Kind = TestEventKind;

    fn kind(&self) -> TestEventKind {
        self.kind
    }

    fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TestAggregate {
    pub id: Option<Uuid>,
    pub labels: Vec<String>,
    events: EventBuffer<TestEvent>,
}

impl TestAggregate {
    pub(crate) fn new(id: Option<Uuid>) -> Self {
        Self {
            id,
            labels: Vec::new(),
            events: EventBuffer::new(),
        }
    }

    pub(crate) fn touch(&mut self, label: &str) {
        let mut event = TestEvent::new(TestEventKind::Touched, label);
        event.metadata.aggregate_id = self.id;
        event.metadata.version = self.events.next_version();
        self.labels.push(label.to_owned());
        self.events.apply(event);
    }
}

impl AggregateRoot for TestAggregate {
    type Event = TestEvent;

    fn aggregate_id(&self) -> Option<Uuid> {
        self.id
    }

    fn version(&self) -> i64 {
        self.events.version()
    }

    fn pending_events(&self) -> Vec<TestEvent> {
        self.events.pending()
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }
}
