//! HTTP route handlers.

pub mod admin;
pub mod api_admins;
pub mod api_birds;
pub mod api_products;
pub mod catalog;
pub mod contact;
pub mod health;
pub mod helpers;
pub mod pages;
pub mod static_files;
