// src/services/mod.rs

//! External collaborators of the pipeline.

mod api;

pub use api::{HttpRouteApi, RouteApi};
