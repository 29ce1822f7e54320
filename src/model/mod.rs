pub mod dashboard;
pub mod folder;
