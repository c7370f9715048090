pub mod extraction;
pub mod generation;
pub mod quiz;
pub mod processor; // extract → prompt → generate → parse
