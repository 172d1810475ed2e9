//! Tera-based page rendering.

mod engine;

pub use engine::ThemeEngine;
