pub mod cross_sections;
pub mod find;
pub mod reactions;
