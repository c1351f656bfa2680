use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted by the service layer. The background processor turns them
/// into log lines today; the enum is the seam for real delivery later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // User events
    UserRegistered(i64),

    // Maintenance request events
    MaintenanceRequestCreated(i64),
    MaintenanceRequestStatusChanged {
        request_id: i64,
        old_status: String,
        new_status: String,
    },
    HelpRequested {
        request_id: i64,
        part_ids: Vec<i64>,
    },
    HelpResolved {
        request_id: i64,
        decision: String,
    },

    // Inventory events
    InventoryReserved {
        warehouse_id: i64,
        catalog_id: i64,
        quantity: i32,
        request_id: Option<i64>,
    },
    InventoryReleased {
        warehouse_id: i64,
        catalog_id: i64,
        quantity: i32,
    },
    LowStock {
        warehouse_id: i64,
        catalog_id: i64,
        available: i32,
    },

    // Procurement events
    PurchaseOrderCreated {
        order_id: i64,
        request_id: i64,
        supplier_id: i64,
    },
    PurchaseOrderStatusChanged {
        order_id: i64,
        new_status: String,
    },
    SupplierReviewed {
        supplier_id: i64,
        rating: Option<i32>,
        complaint: bool,
    },

    // Work log events
    WorkLogCreated(i64),
    WorkLogAssigned {
        log_id: i64,
        mechanic_id: i64,
    },
    WorkLogStatusChanged {
        log_id: i64,
        old_status: Option<String>,
        new_status: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; a full or closed channel is logged, never fatal.
    pub async fn send(&self, event: Event) {
        if let Err(err) = self.sender.send(event).await {
            warn!("Failed to send event: {}", err);
        }
    }
}

/// Background loop draining the event channel.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::LowStock {
                warehouse_id,
                catalog_id,
                available,
            } => {
                warn!(
                    warehouse_id,
                    catalog_id, available, "low stock threshold reached"
                );
            }
            other => info!(event = ?other, "event processed"),
        }
    }
    info!("Event channel closed, stopping event processor");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender.send(Event::MaintenanceRequestCreated(7)).await;
        sender
            .send(Event::WorkLogAssigned {
                log_id: 1,
                mechanic_id: 2,
            })
            .await;

        assert!(matches!(
            rx.recv().await,
            Some(Event::MaintenanceRequestCreated(7))
        ));
        assert!(matches!(
            rx.recv().await,
            Some(Event::WorkLogAssigned { log_id: 1, .. })
        ));
    }

    #[tokio::test]
    async fn send_on_closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        sender.send(Event::UserRegistered(1)).await;
    }
}
