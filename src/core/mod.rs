pub mod engine;
pub mod extractor;
pub mod overrides;
pub mod resolver;
pub mod types;
pub mod verbs;
