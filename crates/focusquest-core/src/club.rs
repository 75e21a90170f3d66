//! Focus clubs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Membership row; (club_id, user_id) is unique -- joining twice is a
/// store constraint violation, surfaced to the caller, never a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubMember {
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}
