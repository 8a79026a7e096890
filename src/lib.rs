//! Painting gallery catalog and recommendation service.
//!
//! Paintings, artists and tags are read from a [`store::CatalogStore`];
//! [`services`] holds the tag-overlap rankers and the favorite toggle, and
//! [`routes`] exposes them over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
