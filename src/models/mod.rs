// src/models/mod.rs

pub mod badge;
pub mod contact;
pub mod leaderboard;
pub mod question;
pub mod task;
pub mod user;
