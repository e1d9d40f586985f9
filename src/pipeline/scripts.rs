// src/pipeline/scripts.rs
//! Spoken copy and prompts fed to the video vendors.

use serde::{Deserialize, Serialize};

const DEFAULT_AVATAR_SCRIPT: &str = "Hello! Welcome to our amazing product showcase. This innovative solution is designed specifically for you, combining quality, style, and functionality. It's perfect for anyone looking to upgrade their experience. Join thousands of satisfied customers who have already made the smart choice. Order now and transform the way you live. Don't wait - this is your chance to experience excellence!";

/// How the product animation should move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductVideoStyle {
    Rotation,
    Zoom,
    Pan,
    Reveal,
    #[default]
    Auto,
}

impl ProductVideoStyle {
    /// Empty or unrecognised values fall back to `Auto`
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("rotation") => ProductVideoStyle::Rotation,
            Some("zoom") => ProductVideoStyle::Zoom,
            Some("pan") => ProductVideoStyle::Pan,
            Some("reveal") => ProductVideoStyle::Reveal,
            _ => ProductVideoStyle::Auto,
        }
    }
}

/// Which clip fills the frame in the composite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Product fullscreen, avatar in the bottom-right corner
    #[default]
    ProductMain,
    /// Avatar fullscreen, product in the bottom-right corner
    AvatarMain,
}

impl Layout {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("avatar_main") => Layout::AvatarMain,
            _ => Layout::ProductMain,
        }
    }
}

/// Wrap the generated marketing script with an intro and call-to-action for the presenter
pub fn avatar_script(script: &str) -> String {
    let script = script.trim();
    if script.is_empty() {
        return DEFAULT_AVATAR_SCRIPT.to_string();
    }

    format!(
        "Hello! I'm excited to share something amazing with you today. {} This product is designed to make your life easier and better. Don't miss out on this incredible opportunity - get yours today and experience the difference!",
        script
    )
}

/// Narration used when the product image itself is animated as a D-ID talk
pub fn product_presentation_script(style: ProductVideoStyle) -> &'static str {
    match style {
        ProductVideoStyle::Rotation => "Welcome to our product showcase! This amazing product features a stunning design with premium quality. Watch as we explore its elegant features and innovative design. Perfect for your needs, this product combines style and functionality in one beautiful package.",
        ProductVideoStyle::Zoom => "Take a closer look at this incredible product! Every detail has been carefully crafted to perfection. From its sleek exterior to its innovative features, this product is designed to impress. Experience the quality and craftsmanship that sets it apart.",
        ProductVideoStyle::Pan => "Let me show you this remarkable product from every angle. Notice the attention to detail and premium materials. This product represents the perfect blend of form and function, designed to exceed your expectations.",
        ProductVideoStyle::Reveal => "Prepare to be amazed by this extraordinary product! With cutting-edge technology and elegant design, this product is truly something special. Discover why it's the perfect choice for you.",
        ProductVideoStyle::Auto => "Introducing our premium product! This exceptional item combines innovative design with outstanding quality. Perfect for those who demand the best, this product delivers on every promise. Experience the difference that quality makes.",
    }
}

/// Camera-motion prompt for RunwayML image-to-video
pub fn runway_prompt(style: ProductVideoStyle) -> &'static str {
    match style {
        ProductVideoStyle::Rotation => "Professional product showcase with smooth 360-degree rotation, studio lighting, elegant spin, premium commercial feel, 4K quality, product centered",
        ProductVideoStyle::Zoom => "Professional product showcase with smooth zoom-in effect, starting wide and focusing on product details, studio lighting, premium commercial feel, 4K quality",
        ProductVideoStyle::Pan => "Professional product showcase with smooth camera pan movement, exploring product from different angles, studio lighting, premium commercial feel, 4K quality",
        ProductVideoStyle::Reveal => "Professional product reveal with dramatic lighting, product emerging from shadows, cinematic reveal, premium commercial feel, 4K quality",
        ProductVideoStyle::Auto => "Professional product showcase with smooth camera movement, elegant rotation, studio lighting, premium commercial feel, 4K quality, product centered",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_and_layout_defaults() {
        assert_eq!(ProductVideoStyle::parse(None), ProductVideoStyle::Auto);
        assert_eq!(ProductVideoStyle::parse(Some("")), ProductVideoStyle::Auto);
        assert_eq!(ProductVideoStyle::parse(Some("spin")), ProductVideoStyle::Auto);
        assert_eq!(ProductVideoStyle::parse(Some("Zoom")), ProductVideoStyle::Zoom);

        assert_eq!(Layout::parse(None), Layout::ProductMain);
        assert_eq!(Layout::parse(Some("presenter")), Layout::ProductMain);
        assert_eq!(Layout::parse(Some("avatar_main")), Layout::AvatarMain);
    }

    #[test]
    fn test_avatar_script_wraps_generated_copy() {
        let script = avatar_script("  The Aero Bottle keeps drinks cold for 24 hours.  ");
        assert!(script.starts_with("Hello! I'm excited to share something amazing with you today. The Aero Bottle"));
        assert!(script.ends_with("experience the difference!"));
    }

    #[test]
    fn test_empty_avatar_script_uses_default() {
        assert_eq!(avatar_script("   "), DEFAULT_AVATAR_SCRIPT);
    }

    #[test]
    fn test_every_style_has_distinct_prompt() {
        let styles = [
            ProductVideoStyle::Rotation,
            ProductVideoStyle::Zoom,
            ProductVideoStyle::Pan,
            ProductVideoStyle::Reveal,
            ProductVideoStyle::Auto,
        ];
        for (i, a) in styles.iter().enumerate() {
            for b in styles.iter().skip(i + 1) {
                assert_ne!(runway_prompt(*a), runway_prompt(*b));
                assert_ne!(product_presentation_script(*a), product_presentation_script(*b));
            }
        }
    }
}
