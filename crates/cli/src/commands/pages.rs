//! `page` command: static copy.

use shopease_client::Storefront;
use shopease_client::content::{self, CallToAction, Footer, Hero, Link};

fn print_link(link: Link) {
    println!("  [{}] -> {}", link.label, link.path);
}

fn print_hero(hero: &Hero) {
    println!("{}", hero.title);
    println!("{}", hero.subtitle);
    if let Some(cta) = hero.cta {
        print_link(cta);
    }
    println!();
}

fn print_cta(cta: &CallToAction) {
    println!("{}", cta.title);
    println!("{}", cta.body);
    print_link(cta.link);
    println!();
}

fn print_footer(footer: &Footer) {
    println!("{}", footer.brand);
    println!("{}", footer.tagline);
    for column in &footer.columns {
        println!("{}: {}", column.title, column.entries.join(", "));
    }
    println!("{}", footer.copyright);
}

pub async fn home(storefront: &Storefront) {
    let page = content::home_page(storefront).await;
    print_hero(&page.hero);

    println!("{}", page.philosophy_title);
    for feature in &page.philosophy {
        println!("- {}: {}", feature.title, feature.body);
    }
    println!();

    println!("{}", page.featured_title);
    for product in &page.featured {
        println!("- {} ({})", product.name, product.price);
    }
    print_link(page.view_all);
    println!();

    print_cta(&page.join_us);
    println!("\"{}\" - {}", page.quote.text, page.quote.author);
    println!();
    print_footer(&page.footer);
}

pub fn about() {
    let page = content::ABOUT_PAGE;
    print_hero(&page.hero);
    for paragraph in page.paragraphs {
        println!("{paragraph}");
        println!();
    }
    println!("{}", page.motion_title);
    println!();
    print_cta(&page.feedback);
    print_footer(&content::footer());
}

pub fn footer() {
    print_footer(&content::footer());
}
