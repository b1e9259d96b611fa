//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Transaction,
    RecurringExpense,
    Goal,
    Deposit,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::RecurringExpense => write!(f, "RecurringExpense"),
            EntityType::Goal => write!(f, "Goal"),
            EntityType::Deposit => write!(f, "Deposit"),
        }
    }
}

/// A single audit log entry
///
/// Records one backend mutation with the entity state before and after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// User on whose behalf the mutation ran
    pub user_id: UserId,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable description of the entity (e.g. goal title)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create a new audit entry for a create operation
    pub fn create<T: Serialize>(
        user_id: UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
        }
    }

    /// Create a new audit entry for an update operation
    pub fn update<T: Serialize>(
        user_id: UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            operation: Operation::Update,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
        }
    }

    /// Create a new audit entry for a delete operation
    pub fn delete<T: Serialize>(
        user_id: UserId,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            operation: Operation::Delete,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(entity).ok(),
            after: None,
        }
    }

    /// One-line summary, e.g. `2025-01-15 10:30:00 UTC CREATE Goal goal-3 (Vacation)`
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "{} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );
        if let Some(name) = &self.entity_name {
            line.push_str(&format!(" ({})", name));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_entry() {
        let entity = json!({"title": "Vacation"});
        let entry = AuditEntry::create(
            UserId::new(1),
            EntityType::Goal,
            "goal-3",
            Some("Vacation".into()),
            &entity,
        );

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(entity));
        assert!(entry
            .format_human_readable()
            .ends_with("CREATE Goal goal-3 (Vacation)"));
    }

    #[test]
    fn test_update_and_delete_entries() {
        let before = json!({"isActive": true});
        let after = json!({"isActive": false});
        let update = AuditEntry::update(
            UserId::new(1),
            EntityType::RecurringExpense,
            "fix-1",
            None,
            &before,
            &after,
        );
        assert_eq!(update.before, Some(before.clone()));
        assert_eq!(update.after, Some(after));

        let delete = AuditEntry::delete(UserId::new(1), EntityType::Deposit, "dep-2", None, &before);
        assert_eq!(delete.operation, Operation::Delete);
        assert!(delete.after.is_none());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::delete(
            UserId::new(2),
            EntityType::Transaction,
            "txn-9",
            None,
            &json!({}),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"entity_type\":\"transaction\""));
        assert!(!json.contains("entity_name"));
        assert!(!json.contains("\"after\""));
    }
}
