use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Account roles. Stored as plain strings on the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Mechanic,
    HeadMechanic,
    ClubOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Individual,
    ClubOwner,
    ClubManager,
    FreeMechanicBasic,
    FreeMechanicPremium,
    MainAdmin,
}

impl AccountType {
    /// Free mechanics operate outside a single club and keep personal warehouses.
    pub fn is_free_mechanic(&self) -> bool {
        matches!(self, Self::FreeMechanicBasic | Self::FreeMechanicPremium)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceRequestStatus {
    SentToManager,
    UnderReview,
    PartiallyApproved,
    New,
    Approved,
    InProgress,
    Done,
    Closed,
    Unrepairable,
}

impl MaintenanceRequestStatus {
    /// Terminal statuses refuse part additions and completion.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Closed | Self::Unrepairable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartStatus {
    Ordered,
    Delivered,
    Installed,
    Accepted,
    PartiallyAccepted,
    ApprovalPending,
    ApprovedForIssue,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Pending,
    Confirmed,
    Rejected,
    PartiallyCompleted,
    Completed,
    Canceled,
}

impl PurchaseOrderStatus {
    /// Orders in a terminal state are shown under the archive filter.
    pub fn is_archived(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::PartiallyCompleted | Self::Rejected | Self::Canceled
        )
    }

    pub fn archived() -> [Self; 4] {
        [
            Self::Completed,
            Self::PartiallyCompleted,
            Self::Rejected,
            Self::Canceled,
        ]
    }

    pub fn active() -> [Self; 2] {
        [Self::Pending, Self::Confirmed]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkLogStatus {
    Created,
    Assigned,
    InProgress,
    OnHold,
    Completed,
    Verified,
    Closed,
    Cancelled,
}

impl WorkLogStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Created | Self::Assigned | Self::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    PreventiveMaintenance,
    CorrectiveMaintenance,
    EmergencyRepair,
    Installation,
    Replacement,
    Inspection,
    Cleaning,
    Calibration,
    Upgrade,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn statuses_round_trip_through_strings() {
        assert_eq!(
            MaintenanceRequestStatus::from_str("UNDER_REVIEW").unwrap(),
            MaintenanceRequestStatus::UnderReview
        );
        assert_eq!(MaintenanceRequestStatus::PartiallyApproved.to_string(), "PARTIALLY_APPROVED");
        assert_eq!(PartStatus::from_str("APPROVED_FOR_ISSUE").unwrap(), PartStatus::ApprovedForIssue);
        assert_eq!(PurchaseOrderStatus::Canceled.to_string(), "CANCELED");
        assert!(MaintenanceRequestStatus::from_str("NOT_A_STATUS").is_err());
    }

    #[test]
    fn archived_and_active_order_statuses_do_not_overlap() {
        for status in PurchaseOrderStatus::archived() {
            assert!(status.is_archived());
        }
        for status in PurchaseOrderStatus::active() {
            assert!(!status.is_archived());
        }
    }

    #[test]
    fn terminal_request_statuses() {
        assert!(MaintenanceRequestStatus::Closed.is_terminal());
        assert!(MaintenanceRequestStatus::Unrepairable.is_terminal());
        assert!(!MaintenanceRequestStatus::InProgress.is_terminal());
    }
}
