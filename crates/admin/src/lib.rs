pub mod actions;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod forms;
pub mod manage;
pub mod render;
