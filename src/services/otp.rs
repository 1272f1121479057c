use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::common::AppEvent;

/// Mock OTP backend: "sending" and "checking" a code are just delays.
pub struct OtpVerifier {
    runtime: Handle,
    events: mpsc::Sender<AppEvent>,
    expected: String,
    send_delay: Duration,
    verify_delay: Duration,
    task: Option<JoinHandle<()>>,
}

impl OtpVerifier {
    pub fn new(
        runtime: Handle,
        events: mpsc::Sender<AppEvent>,
        expected: impl Into<String>,
        send_delay: Duration,
        verify_delay: Duration,
    ) -> Self {
        Self {
            runtime,
            events,
            expected: expected.into(),
            send_delay,
            verify_delay,
            task: None,
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        code == self.expected
    }

    /// Emits `OtpSent` after the send delay.
    pub fn send_code(&mut self) {
        self.spawn_after(self.send_delay, AppEvent::OtpSent);
    }

    /// Emits `OtpChecked` after the verification delay.
    pub fn verify(&mut self, code: &str) {
        let accepted = self.matches(code);
        self.spawn_after(self.verify_delay, AppEvent::OtpChecked { accepted });
    }

    pub fn is_busy(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn spawn_after(&mut self, delay: Duration, event: AppEvent) {
        self.cancel();
        let events = self.events.clone();
        self.task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = events.send(event).await {
                log::warn!("Failed to deliver OTP event: {err}");
            }
        }));
    }
}

impl Drop for OtpVerifier {
    fn drop(&mut self) {
        self.cancel();
    }
}
