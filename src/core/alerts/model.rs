// Alert model types.

use serde::Serialize;

use crate::core::model::NotificationCandidate;

/// Candidates gathered for one account during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountAlerts {
    pub name: String,
    pub candidates: Vec<NotificationCandidate>,
}

impl AccountAlerts {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// One outgoing notification, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
}
