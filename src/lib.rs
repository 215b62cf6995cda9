//! Typed gateway for the Minglekari social backend.
//!
//! [`gateway::Gateway`] turns user intents (sign up, publish a post, page through the feed, like
//! or bookmark a post) into calls against three hosted services described in [`backend`].
//! [`api::AppwriteClient`] is the HTTP implementation of those services and
//! [`session::SessionCache`] tracks who is signed in.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod session;
mod utils;


pub use error::{GatewayError, GatewayResult};
