pub mod analysis;
pub mod config;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod simulation;
pub mod source;
pub mod stand;
pub mod sweep;
pub mod trial;
pub mod types;
