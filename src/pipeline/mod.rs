// src/pipeline/mod.rs
pub mod polling;
pub mod scripts;
pub mod video;

pub use polling::{poll_until_terminal, PollOutcome, PollSettings};
pub use video::{VideoPipeline, VideoRequest};
