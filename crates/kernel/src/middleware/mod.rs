//! HTTP middleware components.

pub mod trailing_slash;

pub use trailing_slash::redirect_trailing_slash;
