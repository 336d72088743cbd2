//! Headless client for the resource administration console.
//!
//! Each console page is a controller in [`resources`]: it owns the page's
//! form state and status region, and talks to the Resource API through
//! [`api::JsonClient`].

pub mod api;
pub mod config;
pub mod error;
pub mod resources;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::ConsoleError;
