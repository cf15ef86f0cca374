//! Backend stand-in that accepts every submission after a fixed delay

use super::traits::{FormPayload, SubmissionBackend, SubmissionReceipt};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Default simulated network latency
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Simulates a backend round trip with a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl SubmissionBackend for SimulatedBackend {
    async fn submit(&self, payload: &FormPayload) -> Result<SubmissionReceipt> {
        tracing::debug!(
            submission = %payload.submission_id,
            form = ?payload.form,
            fields = payload.values.len(),
            "simulating submission"
        );
        tokio::time::sleep(self.delay).await;
        Ok(SubmissionReceipt {
            submission_id: payload.submission_id,
            accepted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormKind;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn payload() -> FormPayload {
        FormPayload {
            submission_id: Uuid::new_v4(),
            form: FormKind::Login,
            values: BTreeMap::from([("email".to_string(), "a@b.co".to_string())]),
        }
    }

    #[test]
    fn test_payload_serializes_form_kind() {
        let json = serde_json::to_value(payload()).unwrap();
        assert_eq!(json["form"], "login");
        assert_eq!(json["values"]["email"], "a@b.co");
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(SimulatedBackend::default().delay(), Duration::from_millis(2000));
    }

    #[test]
    fn test_zero_delay_accepts_immediately() {
        let backend = SimulatedBackend::new(Duration::ZERO);
        let payload = payload();
        let receipt = tokio_test::block_on(backend.submit(&payload)).unwrap();
        assert_eq!(receipt.submission_id, payload.submission_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_the_delay() {
        let backend = SimulatedBackend::default();
        let started = tokio::time::Instant::now();
        backend.submit(&payload()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }
}
