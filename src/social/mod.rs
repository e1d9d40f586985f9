// src/social/mod.rs
pub mod caption;
pub mod publisher;

pub use caption::generate_caption;
pub use publisher::{PublishedPost, SocialPublisher};
