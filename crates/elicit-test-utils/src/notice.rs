//! [`RecordingNotice`] logs what the resolver shows while processing.

use std::sync::Mutex;

use elicit_core::NoticeSurface;

/// A notice call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    Open { title: String, body: String },
    Close,
}

#[derive(Debug, Default)]
pub struct RecordingNotice {
    events: Mutex<Vec<NoticeEvent>>,
}

impl RecordingNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NoticeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Whether every open has a matching close.
    pub fn is_balanced(&self) -> bool {
        let events = self.events.lock().unwrap();
        let opens = events
            .iter()
            .filter(|e| matches!(e, NoticeEvent::Open { .. }))
            .count();
        opens == events.len() - opens
    }
}

impl NoticeSurface for RecordingNotice {
    fn open(&self, title: &str, body: &str) {
        self.events.lock().unwrap().push(NoticeEvent::Open {
            title: title.to_string(),
            body: body.to_string(),
        });
    }

    fn close(&self) {
        self.events.lock().unwrap().push(NoticeEvent::Close);
    }
}
