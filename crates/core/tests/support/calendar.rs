use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use intake_core::CalendarClient;
use intake_domain::{BoxedError, CalendarApiError, CalendarEventPayload, EventHandle};
use parking_lot::Mutex;

/// One scripted reply to `create_event`.
#[derive(Debug, Clone)]
pub enum CalendarReply {
    Event(&'static str),
    Status(u16),
    Message(&'static str),
}

impl CalendarReply {
    fn into_result(self) -> Result<EventHandle, BoxedError> {
        match self {
            Self::Event(id) => Ok(EventHandle::new(id)),
            Self::Status(code) => Err(Box::new(CalendarApiError::new(code, "scripted failure"))),
            Self::Message(message) => Err(anyhow::anyhow!(message).into()),
        }
    }
}

/// Calendar client that replays scripted replies.
///
/// Queued replies are consumed first; afterwards every call gets the
/// fallback reply.
#[derive(Clone)]
pub struct ScriptedCalendarClient {
    queue: Arc<Mutex<VecDeque<CalendarReply>>>,
    fallback: CalendarReply,
    probe: Result<bool, &'static str>,
    payloads: Arc<Mutex<Vec<CalendarEventPayload>>>,
}

impl ScriptedCalendarClient {
    /// Every call replies with `reply`.
    pub fn always(reply: CalendarReply) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback: reply,
            probe: Ok(true),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// `replies` in order, then `fallback` forever.
    pub fn sequence(replies: Vec<CalendarReply>, fallback: CalendarReply) -> Self {
        let client = Self::always(fallback);
        client.queue.lock().extend(replies);
        client
    }

    /// Make `test_connection` fail with `message`.
    pub fn with_failing_probe(mut self, message: &'static str) -> Self {
        self.probe = Err(message);
        self
    }

    pub fn calls(&self) -> usize {
        self.payloads.lock().len()
    }

    pub fn payloads(&self) -> Vec<CalendarEventPayload> {
        self.payloads.lock().clone()
    }
}

#[async_trait]
impl CalendarClient for ScriptedCalendarClient {
    async fn create_event(&self, payload: &CalendarEventPayload) -> Result<EventHandle, BoxedError> {
        self.payloads.lock().push(payload.clone());
        let reply = self.queue.lock().pop_front().unwrap_or_else(|| self.fallback.clone());
        reply.into_result()
    }

    async fn test_connection(&self) -> Result<bool, BoxedError> {
        self.probe.map_err(Into::into)
    }
}
