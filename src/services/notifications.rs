use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

/// Upper bound on retained notifications; oldest entries are dropped first.
const MAX_RETAINED: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestCreated,
    RequestStatusChanged,
    HelpRequested,
    HelpConfirmed,
    HelpDeclined,
    HelpReassigned,
    WorkLogCreated,
    WorkLogAssigned,
    WorkLogStatusChanged,
    LowStock,
}

/// In-memory notification log. Delivery is simulated: every push lands in
/// the shared list and is mirrored as a log line.
#[derive(Debug, Clone, Default)]
pub struct NotificationService {
    entries: Arc<RwLock<Vec<Notification>>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, user_id: i64, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        info!(user_id, ?kind, %message, "NOTIFICATION");
        let mut entries = self.entries.write().await;
        entries.push(Notification {
            id: Uuid::new_v4(),
            user_id,
            kind,
            message,
            read: false,
            created_at: Utc::now(),
        });
        if entries.len() > MAX_RETAINED {
            let excess = entries.len() - MAX_RETAINED;
            entries.drain(..excess);
        }
    }

    /// Fans one message out to several recipients.
    pub async fn push_all(
        &self,
        user_ids: &[i64],
        kind: NotificationKind,
        message: impl Into<String>,
    ) {
        let message = message.into();
        for user_id in user_ids {
            self.push(*user_id, kind, message.clone()).await;
        }
    }

    /// Most recent notifications for a user, newest first.
    pub async fn list_for_user(&self, user_id: i64, limit: usize) -> Vec<Notification> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Marks a notification as read; `false` when the id is unknown or owned
    /// by someone else.
    pub async fn mark_read(&self, user_id: i64, id: Uuid) -> bool {
        let mut entries = self.entries.write().await;
        match entries
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn push_and_list_are_scoped_per_user() {
        let service = NotificationService::new();
        service
            .push(1, NotificationKind::RequestCreated, "request #5 created")
            .await;
        service
            .push(2, NotificationKind::LowStock, "pin belt running low")
            .await;
        service
            .push(1, NotificationKind::WorkLogAssigned, "assigned to lane 3")
            .await;

        let for_one = service.list_for_user(1, 10).await;
        assert_eq!(for_one.len(), 2);
        // Newest first.
        assert_eq!(for_one[0].kind, NotificationKind::WorkLogAssigned);
        assert!(service.list_for_user(3, 10).await.is_empty());
    }

    #[tokio::test]
    async fn mark_read_requires_matching_owner() {
        let service = NotificationService::new();
        service
            .push(1, NotificationKind::HelpRequested, "help on part 9")
            .await;
        let id = service.list_for_user(1, 1).await[0].id;

        assert!(!service.mark_read(2, id).await);
        assert!(service.mark_read(1, id).await);
        assert!(service.list_for_user(1, 1).await[0].read);
    }

    #[tokio::test]
    async fn retention_cap_drops_oldest() {
        let service = NotificationService::new();
        for i in 0..(MAX_RETAINED + 5) {
            service
                .push(1, NotificationKind::LowStock, format!("msg {}", i))
                .await;
        }
        let all = service.list_for_user(1, MAX_RETAINED + 10).await;
        assert_eq!(all.len(), MAX_RETAINED);
        assert_eq!(all[0].message, format!("msg {}", MAX_RETAINED + 4));
    }
}
