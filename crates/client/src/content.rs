//! Static page copy: home, about and footer.
//!
//! Pages are plain data. The home page's featured collection is the only
//! dynamic part and is filled in by [`home_page`].

use chrono::{Datelike, Utc};

use shopease_core::Product;

use crate::catalog::featured_products;
use crate::state::Storefront;

pub const BRAND_NAME: &str = "Timeless Essentials";

/// A call-to-action link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub path: &'static str,
}

/// Heading plus body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hero {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

/// A titled section with an optional paragraph and link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallToAction {
    pub title: &'static str,
    pub body: &'static str,
    pub link: Link,
}

// =============================================================================
// Home
// =============================================================================

pub const HOME_HERO: Hero = Hero {
    title: BRAND_NAME,
    subtitle: "Curated goods for the discerning individual.",
    cta: Some(Link {
        label: "Browse Collection",
        path: "/products",
    }),
};

pub const PHILOSOPHY_TITLE: &str = "Our Philosophy";

pub const PHILOSOPHY: [Feature; 3] = [
    Feature {
        title: "Enduring Quality",
        body: "Meticulously crafted goods designed to accompany you through the decades.",
    },
    Feature {
        title: "Personal Service",
        body: "Assistance provided with the courtesy and attention of a bygone era.",
    },
    Feature {
        title: "Reliable Delivery",
        body: "Prompt dispatch and careful packaging for every order without exception.",
    },
];

pub const FEATURED_TITLE: &str = "Featured Collection";

pub const VIEW_ALL_PRODUCTS: Link = Link {
    label: "View All Products",
    path: "/products",
};

pub const JOIN_US: CallToAction = CallToAction {
    title: "Join Us",
    body: "Subscribe for early access to our latest collections.",
    link: Link {
        label: "Subscribe",
        path: "/register",
    },
};

pub const HOME_QUOTE: Quote = Quote {
    text: "Simplicity is the ultimate sophistication.",
    author: "Leonardo da Vinci",
};

/// The home page with its featured collection loaded.
#[derive(Debug, Clone)]
pub struct HomePage {
    pub hero: Hero,
    pub philosophy_title: &'static str,
    pub philosophy: [Feature; 3],
    pub featured_title: &'static str,
    /// At most three products; empty when the catalog could not be fetched.
    pub featured: Vec<Product>,
    pub view_all: Link,
    pub join_us: CallToAction,
    pub quote: Quote,
    pub footer: Footer,
}

/// Build the home page, fetching the featured collection.
pub async fn home_page(storefront: &Storefront) -> HomePage {
    HomePage {
        hero: HOME_HERO,
        philosophy_title: PHILOSOPHY_TITLE,
        philosophy: PHILOSOPHY,
        featured_title: FEATURED_TITLE,
        featured: featured_products(storefront).await,
        view_all: VIEW_ALL_PRODUCTS,
        join_us: JOIN_US,
        quote: HOME_QUOTE,
        footer: footer(),
    }
}

// =============================================================================
// About
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AboutPage {
    pub hero: Hero,
    pub paragraphs: [&'static str; 2],
    pub motion_title: &'static str,
    pub feedback: CallToAction,
}

pub const ABOUT_PAGE: AboutPage = AboutPage {
    hero: Hero {
        title: "About Us",
        subtitle: "We are a marketplace for both sellers and buyers where everyone can buy or sell their products.",
        cta: None,
    },
    paragraphs: [
        "Welcome to our platform! Here, sellers can showcase their products to a wide audience, while buyers can find unique items and great deals with ease.",
        "This project is still under development, and various improvements will be implemented in the future. Your feedback is welcomed and valued as it helps us grow and serve you better.",
    ],
    motion_title: "Our Marketplace in Motion",
    feedback: CallToAction {
        title: "We Value Your Feedback",
        body: "Your feedback is important to us! Let us know how we can improve and serve you better.",
        link: Link {
            label: "Give Feedback",
            path: "/feedback",
        },
    },
};

// =============================================================================
// Footer
// =============================================================================

/// One footer column. Entries are labels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterColumn {
    pub title: &'static str,
    pub entries: &'static [&'static str],
}

pub const FOOTER_TAGLINE: &str = "Crafted for those who appreciate enduring quality.";

pub const FOOTER_COLUMNS: [FooterColumn; 4] = [
    FooterColumn {
        title: "Shop",
        entries: &["Men", "Women", "Accessories"],
    },
    FooterColumn {
        title: "Company",
        entries: &["About", "Careers", "Contact"],
    },
    FooterColumn {
        title: "Support",
        entries: &["FAQ", "Shipping", "Returns"],
    },
    FooterColumn {
        title: "Legal",
        entries: &["Privacy Policy", "Terms of Service"],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub brand: &'static str,
    pub tagline: &'static str,
    pub columns: [FooterColumn; 4],
    pub copyright: String,
}

/// `© <year> Timeless Essentials. All rights reserved.`
#[must_use]
pub fn copyright(year: i32) -> String {
    format!("\u{a9} {year} {BRAND_NAME}. All rights reserved.")
}

/// Footer with the copyright line for the current year.
#[must_use]
pub fn footer() -> Footer {
    Footer {
        brand: BRAND_NAME,
        tagline: FOOTER_TAGLINE,
        columns: FOOTER_COLUMNS,
        copyright: copyright(Utc::now().year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copyright_line() {
        assert_eq!(
            copyright(2025),
            "\u{a9} 2025 Timeless Essentials. All rights reserved."
        );
    }

    #[test]
    fn test_footer_uses_current_year() {
        let year = Utc::now().year();
        assert!(footer().copyright.contains(&year.to_string()));
    }

    #[test]
    fn test_footer_columns() {
        let titles: Vec<_> = FOOTER_COLUMNS.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Shop", "Company", "Support", "Legal"]);
        assert_eq!(FOOTER_COLUMNS[3].entries.len(), 2);
    }

    #[test]
    fn test_home_links() {
        assert_eq!(HOME_HERO.cta.map(|l| l.path), Some("/products"));
        assert_eq!(JOIN_US.link.path, "/register");
        assert_eq!(ABOUT_PAGE.feedback.link.path, "/feedback");
    }
}
