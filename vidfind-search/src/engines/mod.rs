//! Concrete upstream implementations.
//!
//! Each module provides a struct implementing [`crate::upstream::UpstreamSearch`].

pub mod youtube;

pub use youtube::YouTubeClient;
