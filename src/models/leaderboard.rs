// src/models/leaderboard.rs

use serde::{Deserialize, Serialize};

/// One learner on the leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub school: String,
    pub points: u32,
    /// Initials shown in the avatar circle.
    pub avatar: String,
}

impl LeaderboardEntry {
    pub fn new(name: &str, school: &str, points: u32) -> Self {
        let avatar = name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        Self {
            name: name.to_string(),
            school: school.to_string(),
            points,
            avatar,
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.school.to_lowercase().contains(&query)
    }
}

/// Query parameters for the leaderboard fragment.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    /// Period filter (`all`, `week`, `month`). Accepted; every period shows the same data.
    pub filter: Option<String>,
    pub search: Option<String>,
}

/// Query parameters for the achievements fragment.
#[derive(Debug, Default, Deserialize)]
pub struct BadgeParams {
    pub category: Option<String>,
}
