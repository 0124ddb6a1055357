//! URL slug derivation for products and categories.

/// Derive a slug from a display name: lowercase, alphanumeric runs joined by
/// single dashes. Non-ASCII letters are kept as-is (listings carry localized
/// names).
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Make `base` unique against `taken` by appending `-1`, `-2`, ... until the
/// candidate is free.
pub fn unique_slug(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_dashes() {
        assert_eq!(slugify("Mountain Bike 26\""), "mountain-bike-26");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("  a -- b  "), "a-b");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(slugify("Велосипед 26"), "велосипед-26");
    }

    #[test]
    fn unique_slug_returns_base_when_free() {
        assert_eq!(unique_slug("bike", |_| false), "bike");
    }

    #[test]
    fn unique_slug_appends_counter() {
        let taken = ["bike", "bike-1"];
        let got = unique_slug("bike", |s| taken.contains(&s));
        assert_eq!(got, "bike-2");
    }
}
