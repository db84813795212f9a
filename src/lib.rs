//! Client for the student dropout-risk prediction service.
//!
//! The service is an external HTTP API; this crate validates and serializes
//! the student form, submits it, and projects the response into a view model
//! that can be rendered as text, HTML or a markdown report.

pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod form;
pub mod health;
pub mod models;
pub mod render;
pub mod validate;
pub mod view;
