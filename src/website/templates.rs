// src/website/templates.rs
//! Static assets for the generated product landing page.

use crate::models::feature::Feature;

/// Everything the landing page interpolates. Values are raw; escaping happens at render time.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    pub product_name: &'a str,
    pub product_description: &'a str,
    pub product_price: &'a str,
    pub product_image_url: &'a str,
    pub video_url: Option<&'a str>,
    pub features: &'a [Feature],
    pub year: i32,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn feature_cards(features: &[Feature]) -> String {
    features
        .iter()
        .map(|f| {
            format!(
                r#"            <article class="feature-card">
                <div class="feature-icon">{}</div>
                <h3>{}</h3>
                <p>{}</p>
            </article>"#,
                escape_html(&f.icon),
                escape_html(&f.title),
                escape_html(&f.description)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Blank and "$0" prices are hidden
fn price_block(price: &str) -> String {
    let price = price.trim();
    if price.is_empty() || price == "$0" {
        return String::new();
    }
    format!(
        r#"<div class="price-tag">
                    <span class="price">{}</span>
                    <span class="price-badge">Limited Offer!</span>
                </div>"#,
        escape_html(price)
    )
}

fn video_block(video_url: Option<&str>, poster: &str) -> String {
    match video_url {
        Some(url) => format!(
            r#"<video controls playsinline class="promo-video" poster="{}">
                <source src="{}" type="video/mp4">
                Your browser does not support the video tag.
            </video>"#,
            poster, url
        ),
        None => r#"<div class="video-placeholder"><p>Video coming soon...</p></div>"#.to_string(),
    }
}

pub fn render_index(ctx: &PageContext<'_>) -> String {
    let name = escape_html(ctx.product_name);
    let description = escape_html(ctx.product_description);
    let image = escape_html(ctx.product_image_url);
    let video_url = ctx.video_url.map(escape_html);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{description}">
    <title>{name} | Official Product Page</title>
    <link rel="stylesheet" href="styles.css">
    <link rel="preconnect" href="https://fonts.googleapis.com">
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;800&display=swap" rel="stylesheet">
</head>
<body>
    <header class="hero">
        <nav class="navbar container">
            <span class="logo">{name}</span>
            <ul class="nav-menu">
                <li><a href="#features">Features</a></li>
                <li><a href="#video">Watch Demo</a></li>
                <li><a href="#cta">Get Started</a></li>
            </ul>
        </nav>
        <div class="hero-content container">
            <div class="hero-text">
                <h1>{name}</h1>
                <p class="hero-description">{description}</p>
                {price}
                <div class="hero-cta">
                    <a href="#video" class="btn btn-primary">Watch Demo</a>
                    <a href="#cta" class="btn btn-secondary">Learn More</a>
                </div>
            </div>
            <div class="hero-image">
                <img src="{image}" alt="{name}" class="product-showcase">
            </div>
        </div>
    </header>

    <section id="features" class="features">
        <div class="container">
            <h2 class="section-title">Why Choose {name}?</h2>
            <div class="features-grid">
{features}
            </div>
        </div>
    </section>

    <section id="video" class="video-section">
        <div class="container">
            <h2 class="section-title">See It In Action</h2>
            <div class="video-wrapper">
            {video}
            </div>
        </div>
    </section>

    <section id="cta" class="cta-section">
        <div class="container">
            <h2>Ready to Transform Your Experience?</h2>
            <p>Join thousands of satisfied customers who have already made the switch.</p>
            <a href="#" class="btn btn-large btn-primary">Get Started Now</a>
        </div>
    </section>

    <footer class="footer">
        <div class="container">
            <p>&copy; {year} {name}. All rights reserved.</p>
        </div>
    </footer>

    <script src="script.js"></script>
</body>
</html>
"##,
        name = name,
        description = description,
        image = image,
        price = price_block(ctx.product_price),
        features = feature_cards(ctx.features),
        video = video_block(video_url.as_deref(), &image),
        year = ctx.year,
    )
}

pub const STYLES_CSS: &str = r#":root {
    --primary: #6366f1;
    --primary-dark: #4f46e5;
    --text: #1f2937;
    --muted: #6b7280;
    --surface: #f9fafb;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    color: var(--text);
    line-height: 1.6;
}

.container { max-width: 1200px; margin: 0 auto; padding: 0 1.5rem; }

.hero {
    min-height: 100vh;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: #fff;
}

.navbar { display: flex; justify-content: space-between; align-items: center; padding: 1.5rem; }
.logo { font-size: 1.5rem; font-weight: 800; }
.nav-menu { display: flex; gap: 2rem; list-style: none; }
.nav-menu a { color: #fff; text-decoration: none; opacity: 0.9; }

.hero-content {
    display: grid;
    grid-template-columns: 1fr 1fr;
    gap: 3rem;
    align-items: center;
    padding-top: 4rem;
    padding-bottom: 4rem;
}
.hero-text h1 { font-size: 3.5rem; font-weight: 800; line-height: 1.1; margin-bottom: 1.5rem; }
.hero-description { font-size: 1.25rem; opacity: 0.9; margin-bottom: 2rem; }
.hero-cta { display: flex; gap: 1rem; }
.price-tag { display: flex; align-items: center; gap: 0.75rem; margin-bottom: 2rem; }
.price { font-size: 2rem; font-weight: 800; }
.price-badge { padding: 0.4rem 1rem; border-radius: 0.5rem; background: #dcfce7; color: #15803d; font-weight: 700; }
.product-showcase { width: 100%; border-radius: 1.5rem; box-shadow: 0 25px 50px rgba(0, 0, 0, 0.25); }

.btn {
    display: inline-block;
    padding: 0.875rem 2rem;
    border-radius: 999px;
    font-weight: 600;
    text-decoration: none;
    transition: transform 0.2s ease, box-shadow 0.2s ease;
}
.btn:hover { transform: translateY(-2px); box-shadow: 0 10px 20px rgba(0, 0, 0, 0.15); }
.btn-primary { background: var(--primary); color: #fff; }
.btn-primary:hover { background: var(--primary-dark); }
.btn-secondary { background: rgba(255, 255, 255, 0.15); color: #fff; border: 1px solid rgba(255, 255, 255, 0.4); }
.btn-large { padding: 1.125rem 2.5rem; font-size: 1.125rem; }

.section-title { text-align: center; font-size: 2.5rem; font-weight: 800; margin-bottom: 3rem; }

.features { padding: 6rem 0; background: var(--surface); }
.features-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 2rem; }
.feature-card { background: #fff; padding: 2rem; border-radius: 1rem; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.05); }
.feature-icon { font-size: 2.5rem; margin-bottom: 1rem; }
.feature-card h3 { margin-bottom: 0.5rem; }
.feature-card p { color: var(--muted); }

.video-section { padding: 6rem 0; }
.video-wrapper { max-width: 900px; margin: 0 auto; }
.promo-video { width: 100%; border-radius: 1rem; background: #000; }
.video-placeholder {
    aspect-ratio: 16 / 9;
    display: flex;
    align-items: center;
    justify-content: center;
    border-radius: 1rem;
    background: var(--surface);
    color: var(--muted);
    font-size: 1.25rem;
}

.cta-section { padding: 6rem 0; text-align: center; background: var(--text); color: #fff; }
.cta-section h2 { font-size: 2.5rem; margin-bottom: 1rem; }
.cta-section p { opacity: 0.8; margin-bottom: 2rem; }

.footer { padding: 2rem 0; text-align: center; color: var(--muted); }

@media (max-width: 768px) {
    .hero-content { grid-template-columns: 1fr; }
    .hero-text h1 { font-size: 2.5rem; }
    .nav-menu { display: none; }
}
"#;

pub const SCRIPT_JS: &str = r##"document.addEventListener('DOMContentLoaded', () => {
    document.querySelectorAll('a[href^="#"]').forEach((anchor) => {
        anchor.addEventListener('click', (event) => {
            const id = anchor.getAttribute('href');
            if (id.length <= 1) return;
            const target = document.querySelector(id);
            if (target) {
                event.preventDefault();
                target.scrollIntoView({ behavior: 'smooth', block: 'start' });
            }
        });
    });

    const observer = new IntersectionObserver((entries) => {
        entries.forEach((entry) => {
            if (entry.isIntersecting) {
                entry.target.style.opacity = '1';
                entry.target.style.transform = 'translateY(0)';
            }
        });
    }, { threshold: 0.1 });

    document.querySelectorAll('.feature-card').forEach((card) => {
        card.style.opacity = '0';
        card.style.transform = 'translateY(20px)';
        card.style.transition = 'opacity 0.6s ease, transform 0.6s ease';
        observer.observe(card);
    });
});
"##;
