/// State management module
///
/// This module handles all application state, including:
/// - Database connection and queries (store.rs)
/// - Shared data structures (data.rs)
/// - The art screen controller and its modes (screen.rs)

pub mod data;
pub mod screen;
pub mod store;
