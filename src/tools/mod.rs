//! Lookup tools shared by the CLI and the session

pub mod classify;
pub mod export;
pub mod search;
pub mod show;
