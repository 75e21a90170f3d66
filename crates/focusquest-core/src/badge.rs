//! Badge definitions and the user's earned set.
//!
//! Mirrors the quest merge shape: immutable definitions joined with
//! per-user earned rows, so display code treats both uniformly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub kind: String,
    pub rarity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub badge_id: Uuid,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeView {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: Option<DateTime<Utc>>,
}

impl BadgeView {
    pub fn is_earned(&self) -> bool {
        self.earned_at.is_some()
    }
}

/// Join badge definitions with the user's earned rows, preserving
/// definition order.
pub fn merge(definitions: &[Badge], earned: &[EarnedBadge]) -> Vec<BadgeView> {
    definitions
        .iter()
        .map(|badge| BadgeView {
            badge: badge.clone(),
            earned_at: earned
                .iter()
                .find(|e| e.badge_id == badge.id)
                .map(|e| e.earned_at),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn merge_marks_only_earned_badges() {
        let defs = vec![
            Badge {
                id: Uuid::new_v4(),
                name: "First Focus".into(),
                description: None,
                icon: None,
                kind: "session".into(),
                rarity: "common".into(),
            },
            Badge {
                id: Uuid::new_v4(),
                name: "Night Owl".into(),
                description: None,
                icon: None,
                kind: "session".into(),
                rarity: "rare".into(),
            },
        ];
        let earned = vec![EarnedBadge {
            badge_id: defs[0].id,
            earned_at: Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
        }];
        let views = merge(&defs, &earned);
        assert!(views[0].is_earned());
        assert!(!views[1].is_earned());
    }
}
