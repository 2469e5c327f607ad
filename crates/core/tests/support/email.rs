use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use intake_core::EmailSender;
use intake_domain::BoxedError;
use parking_lot::Mutex;

/// A delivered email as the sender saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub subject: String,
    pub body: String,
}

/// Email sender that records every attempt and replays scripted failures.
#[derive(Clone)]
pub struct RecordingEmailSender {
    queue: Arc<Mutex<VecDeque<Result<(), &'static str>>>>,
    fallback: Result<(), &'static str>,
    probe: Result<bool, &'static str>,
    attempts: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingEmailSender {
    /// Every send succeeds.
    pub fn working() -> Self {
        Self::failing_with(None)
    }

    /// Every send fails with `message`.
    pub fn failing(message: &'static str) -> Self {
        Self::failing_with(Some(message))
    }

    fn failing_with(message: Option<&'static str>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback: message.map_or(Ok(()), Err),
            probe: Ok(true),
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the first sends with `messages`, then succeed.
    pub fn flaky(messages: &[&'static str]) -> Self {
        let sender = Self::working();
        sender.queue.lock().extend(messages.iter().map(|m| Err(*m)));
        sender
    }

    pub fn with_probe(mut self, probe: Result<bool, &'static str>) -> Self {
        self.probe = probe;
        self
    }

    /// Every attempt, including failed ones.
    pub fn attempts(&self) -> Vec<SentEmail> {
        self.attempts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.attempts.lock().len()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, subject: &str, body: &str) -> Result<(), BoxedError> {
        self.attempts
            .lock()
            .push(SentEmail { subject: subject.to_string(), body: body.to_string() });
        let reply = self.queue.lock().pop_front().unwrap_or(self.fallback);
        reply.map_err(Into::into)
    }

    async fn probe(&self) -> Result<bool, BoxedError> {
        self.probe.map_err(Into::into)
    }
}
