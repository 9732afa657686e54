pub mod category;
pub mod platform;
pub mod resource;
pub mod tag_set;

pub use category::{category_order, Category, NewCategory};
pub use platform::{InvalidPlatform, Platform};
pub use resource::{NewResource, Resource};
pub use tag_set::TagSet;

/// URL slug: lowercase alphanumerics separated by single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
