//! API layer: REST endpoints and the in-process native client

pub mod native;
pub mod rest;
