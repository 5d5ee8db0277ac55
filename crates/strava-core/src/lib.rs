//! Core library for the Strava activity viewer: OAuth, REST access and the
//! session flow that ties them together.

pub mod api;
pub mod auth;
pub mod config;
pub mod flow;
pub mod table;
