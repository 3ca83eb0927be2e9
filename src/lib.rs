pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatting;
pub mod fragment;
pub mod loader;
pub mod matchups;
pub mod navigation;
pub mod search;
pub mod session;
pub mod site;
pub mod store;
pub mod tui;
pub mod years;

#[cfg(any(test, feature = "development"))]
pub mod fixtures;

#[cfg(any(test, feature = "development"))]
pub mod dev;
