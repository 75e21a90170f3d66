//! Leaderboard assembly.
//!
//! Profiles ranked by lifetime focus minutes. The store returns the
//! global board already ordered; club boards are assembled from member
//! profiles and sorted here before ranking.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::Profile;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub total_focus_minutes: u64,
}

/// Assign 1-based ranks to an ordered list of profiles.
///
/// Ties keep their incoming order, matching the original display.
pub fn rank(profiles: Vec<Profile>) -> Vec<LeaderboardEntry> {
    profiles
        .into_iter()
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i as u32 + 1,
            user_id: p.id,
            name: p.name,
            avatar_url: p.avatar_url,
            total_focus_minutes: p.total_focus_minutes,
        })
        .collect()
}

/// Sort member profiles by total minutes descending, then rank.
pub fn rank_club(mut members: Vec<Profile>) -> Vec<LeaderboardEntry> {
    members.sort_by(|a, b| b.total_focus_minutes.cmp(&a.total_focus_minutes));
    rank(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, minutes: u64) -> Profile {
        let mut p = Profile::new(Uuid::new_v4());
        p.name = Some(name.into());
        p.total_focus_minutes = minutes;
        p
    }

    #[test]
    fn club_board_sorts_by_minutes_descending() {
        let entries = rank_club(vec![
            profile("low", 10),
            profile("high", 500),
            profile("mid", 90),
        ]);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_deref().unwrap()).collect();
        assert_eq!(names, ["high", "mid", "low"]);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let a = profile("a", 100);
        let b = profile("b", 100);
        let entries = rank_club(vec![a, b]);
        assert_eq!(entries[0].name.as_deref(), Some("a"));
        assert_eq!(entries[1].name.as_deref(), Some("b"));
    }
}
