// src/lib.rs

pub mod config;
pub mod core;
pub mod errors;
pub mod gallery;
pub mod nlp;
pub mod persistence;

pub use crate::config::PictoConfig;
pub use crate::core::engine::PictoEngine;
pub use crate::errors::{PictoError, Result};
