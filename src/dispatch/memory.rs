//! In-memory dispatcher that records deliveries.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::announcement::AnnouncementPayload;
use crate::metrics::DispatchMetrics;

use super::{ChannelDispatcher, DeliveryReceipt, DispatchError};

/// A recorded delivery
#[derive(Debug, Clone)]
pub struct Delivery {
    pub channel_id: u64,
    pub payload: AnnouncementPayload,
}

/// Records deliveries instead of sending them.
#[derive(Debug, Default)]
pub struct InMemoryDispatcher {
    deliveries: Mutex<Vec<Delivery>>,
    next_id: AtomicU64,
    /// Status to reject every delivery with
    reject_status: Option<u16>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that rejects every delivery
    pub fn rejecting(status: u16) -> Self {
        Self {
            reject_status: Some(status),
            ..Self::default()
        }
    }

    /// Deliveries recorded so far, oldest first
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.clone()
    }

    fn next_message_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

#[async_trait]
impl ChannelDispatcher for InMemoryDispatcher {
    async fn deliver(
        &self,
        channel_id: u64,
        payload: &AnnouncementPayload,
    ) -> Result<DeliveryReceipt, DispatchError> {
        if let Some(status) = self.reject_status {
            DispatchMetrics::record("embed", false);
            return Err(DispatchError::Rejected {
                status,
                body: "rejected by in-memory dispatcher".to_string(),
            });
        }

        let mut message_ids = vec![self.next_message_id()];
        if payload.ping.is_some() {
            message_ids.push(self.next_message_id());
        }

        tracing::info!(
            channel_id = channel_id,
            title = %payload.title,
            ping = ?payload.ping,
            "Announcement recorded (dry run)"
        );

        self.deliveries.lock().await.push(Delivery {
            channel_id,
            payload: payload.clone(),
        });
        DispatchMetrics::record("embed", true);

        Ok(DeliveryReceipt {
            channel_id,
            message_ids,
        })
    }
}
