// VPI: growth analytics from periodic video/channel stat snapshots
//
// This is the library root. Each module corresponds to a major subsystem:
// typed data loading, the analytics engine, and terminal presentation.

pub mod analytics;
pub mod config;
pub mod data;
pub mod output;
