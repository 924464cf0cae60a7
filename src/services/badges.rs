// src/services/badges.rs

//! Badge progress, derived from the user's counters on every change.

use std::collections::BTreeSet;

use crate::models::{
    badge::{BADGES, Badge, BadgeCategory, Counter, Trigger},
    user::User,
};

fn counter_value(user: &User, counter: Counter) -> u32 {
    match counter {
        Counter::EcoPoints => user.eco_points,
        Counter::TasksCompleted => user.tasks_completed,
        Counter::Streak => user.streak,
    }
}

/// Every badge with progress computed from `user`. Pure.
pub fn evaluate(user: &User) -> Vec<Badge> {
    BADGES
        .iter()
        .map(|def| {
            let raw = match def.trigger {
                Trigger::Counter(counter) => counter_value(user, counter),
                Trigger::Pending(_) => 0,
            };
            Badge::from_progress(def, raw)
        })
        .collect()
}

/// Remembers the last evaluation so newly earned badges can be announced once.
#[derive(Debug, Default)]
pub struct BadgeEngine {
    owner: Option<i64>,
    badges: Vec<Badge>,
}

impl BadgeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derives all badges from `user` and returns those that became earned since
    /// the previous call for the same user.
    ///
    /// For a user not seen before, the ids stored in `user.badges` stand for the
    /// previous evaluation. A restored record with counters already past a
    /// threshold but without the badge id therefore still announces it once.
    pub fn recompute(&mut self, user: &User) -> Vec<Badge> {
        let fresh = evaluate(user);

        let was_earned = |id: &str| {
            if self.owner == Some(user.id) {
                self.badges.iter().any(|b| b.id == id && b.earned)
            } else {
                user.badges.contains(id)
            }
        };
        let flipped: Vec<Badge> = fresh
            .iter()
            .filter(|now| now.earned && !was_earned(now.id))
            .cloned()
            .collect();

        for badge in &flipped {
            tracing::info!(badge = badge.id, user = user.id, "Badge earned");
        }

        self.owner = Some(user.id);
        self.badges = fresh;
        flipped
    }

    pub fn owner(&self) -> Option<i64> {
        self.owner
    }

    /// Forgets the previous user unless `current` is still that user.
    pub fn release(&mut self, current: Option<i64>) {
        if self.owner != current {
            self.reset();
        }
    }

    /// Forgets the previous user.
    pub fn reset(&mut self) {
        self.owner = None;
        self.badges.clear();
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    /// Badges in `category`, or all of them for `None`.
    pub fn by_category(&self, category: Option<BadgeCategory>) -> Vec<Badge> {
        self.badges
            .iter()
            .filter(|b| category.is_none_or(|c| b.category == c))
            .cloned()
            .collect()
    }

    pub fn earned_ids(&self) -> BTreeSet<String> {
        self.badges
            .iter()
            .filter(|b| b.earned)
            .map(|b| b.id.to_string())
            .collect()
    }
}
