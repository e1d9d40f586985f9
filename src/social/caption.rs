// src/social/caption.rs
//! Deterministic Instagram caption used when the caller doesn't supply one.

const HOOKS: [&str; 5] = [
    "🔥 You NEED to see this!",
    "✨ Game changer alert!",
    "💎 Obsessed with this!",
    "🚀 This is EVERYTHING!",
    "⚡ Wait for it...",
];

const HASHTAGS: [&str; 8] = [
    "#ProductLaunch",
    "#NewProduct",
    "#MustHave",
    "#ShopNow",
    "#Innovation",
    "#TechTok",
    "#ProductReview",
    "#Unboxing",
];

const MAX_DESCRIPTION_CHARS: usize = 100;

pub fn generate_caption(name: &str, description: &str, price: &str) -> String {
    let mut caption = String::new();

    let hook = HOOKS[name.len() % HOOKS.len()];
    caption.push_str(hook);
    caption.push_str("\n\n");

    if !name.is_empty() {
        caption.push_str(&format!("Introducing: {} 🎉\n\n", name));
    }

    if !description.is_empty() {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            let cut: String = description.chars().take(MAX_DESCRIPTION_CHARS).collect();
            caption.push_str(&format!("{}...\n\n", cut));
        } else {
            caption.push_str(&format!("{}\n\n", description));
        }
    }

    if !matches!(price, "" | "$0" | "0") {
        caption.push_str(&format!("💰 Price: {}\n\n", price));
    }

    caption.push('\n');
    caption.push_str(&HASHTAGS.join(" "));
    caption.push_str("\n\n👉 Link in bio to learn more!");
    caption
}
