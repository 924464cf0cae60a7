// src/services/mod.rs

pub mod badges;
pub mod dashboard;
pub mod forms;
pub mod quiz;
pub mod remote;
pub mod session;
