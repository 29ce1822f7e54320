pub mod mapping;
pub mod orchestrator;
pub mod partition;

pub use orchestrator::{MigrationOrchestrator, MigrationReport};

#[cfg(test)]
pub mod tests;
