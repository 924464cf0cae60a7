// src/models/badge.rs

use serde::Serialize;

/// Which counter on the user a badge tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Counter {
    EcoPoints,
    TasksCompleted,
    Streak,
}

/// How a badge's progress is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "source")]
pub enum Trigger {
    /// Progress is read from a user counter.
    Counter(Counter),
    /// Nothing reports progress for this badge yet; it stays at zero.
    Pending(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Tasks,
    Learning,
    Special,
    Social,
}

impl BadgeCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tasks" => Some(Self::Tasks),
            "learning" => Some(Self::Learning),
            "special" => Some(Self::Special),
            "social" => Some(Self::Social),
            _ => None,
        }
    }
}

/// Static description of an achievement.
#[derive(Debug, Clone, Copy)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub requirement: &'static str,
    pub max_progress: u32,
    pub trigger: Trigger,
}

pub const BADGES: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "first-steps",
        title: "First Steps",
        description: "Complete your first environmental task",
        icon: "fas fa-baby",
        category: BadgeCategory::Tasks,
        requirement: "Complete 1 task",
        max_progress: 1,
        trigger: Trigger::Counter(Counter::TasksCompleted),
    },
    BadgeDefinition {
        id: "knowledge-seeker",
        title: "Knowledge Seeker",
        description: "Complete your first learning module",
        icon: "fas fa-book",
        category: BadgeCategory::Learning,
        requirement: "Complete 1 module",
        max_progress: 1,
        trigger: Trigger::Pending("modules completed"),
    },
    BadgeDefinition {
        id: "tree-planter",
        title: "Tree Planter",
        description: "Plant your first tree",
        icon: "fas fa-tree",
        category: BadgeCategory::Tasks,
        requirement: "Plant 1 tree",
        max_progress: 1,
        trigger: Trigger::Pending("trees planted"),
    },
    BadgeDefinition {
        id: "eco-warrior",
        title: "Eco Warrior",
        description: "Reach 500 Eco Points",
        icon: "fas fa-shield-alt",
        category: BadgeCategory::Special,
        requirement: "500 Eco Points",
        max_progress: 500,
        trigger: Trigger::Counter(Counter::EcoPoints),
    },
    BadgeDefinition {
        id: "social-butterfly",
        title: "Social Butterfly",
        description: "Invite 5 friends to join EcoLearn",
        icon: "fas fa-users",
        category: BadgeCategory::Social,
        requirement: "Invite 5 friends",
        max_progress: 5,
        trigger: Trigger::Pending("friends invited"),
    },
    BadgeDefinition {
        id: "streak-master",
        title: "Streak Master",
        description: "Maintain a 30-day activity streak",
        icon: "fas fa-fire",
        category: BadgeCategory::Special,
        requirement: "30 day streak",
        max_progress: 30,
        trigger: Trigger::Counter(Counter::Streak),
    },
];

/// A badge with progress derived from the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub requirement: &'static str,
    pub progress: u32,
    pub max_progress: u32,
    pub earned: bool,
}

impl Badge {
    /// Builds the badge for `raw` progress, clamped into `[0, max_progress]`.
    pub fn from_progress(def: &BadgeDefinition, raw: u32) -> Self {
        let progress = raw.min(def.max_progress);
        Self {
            id: def.id,
            title: def.title,
            description: def.description,
            icon: def.icon,
            category: def.category,
            requirement: def.requirement,
            progress,
            max_progress: def.max_progress,
            earned: progress >= def.max_progress,
        }
    }

    /// Progress bar fill, in percent.
    pub fn percent(&self) -> u32 {
        if self.max_progress == 0 {
            return 100;
        }
        self.progress * 100 / self.max_progress
    }
}
