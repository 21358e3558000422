pub mod build;
pub mod list;
