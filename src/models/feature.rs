// src/models/feature.rs
use serde::{Deserialize, Serialize};

/// One selling point shown in the website's feature grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl Feature {
    fn new(icon: &str, title: &str, description: &str) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

pub const FEATURE_COUNT: usize = 4;

pub fn default_features() -> Vec<Feature> {
    vec![
        Feature::new(
            "🚀",
            "Lightning Fast",
            "Experience unparalleled speed and efficiency that transforms your workflow.",
        ),
        Feature::new(
            "💎",
            "Premium Quality",
            "Built with the finest materials and cutting-edge technology.",
        ),
        Feature::new(
            "🔒",
            "Secure & Reliable",
            "Your data and privacy are our top priorities.",
        ),
        Feature::new(
            "🎯",
            "Easy to Use",
            "Intuitive design that anyone can master in minutes.",
        ),
    ]
}
