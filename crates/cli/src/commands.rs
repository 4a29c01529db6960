pub mod act;
pub mod completions;
pub mod config;
pub mod resource_types;
pub mod view;
