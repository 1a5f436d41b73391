// src/source/mod.rs
pub mod nml;
pub mod types;

pub use nml::NmlFileSource;
pub use types::{StaticSource, StorySource};
