/// Lowercase, dash-separated slug for a job title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("job");
    }
    slug
}

/// Slug for `title` that does not collide with any slug `taken` reports.
pub fn unique_slug(title: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = slugify(title);
    if !taken(&base) {
        return base;
    }
    (2u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_spaces() {
        assert_eq!(slugify("  Senior Rust Engineer (Remote)!"), "senior-rust-engineer-remote");
        assert_eq!(slugify("C++ / Qt"), "c-qt");
        assert_eq!(slugify("***"), "job");
    }

    #[test]
    fn appends_counter_on_collision() {
        let existing = ["backend-dev", "backend-dev-2"];
        let slug = unique_slug("Backend Dev", |s| existing.contains(&s));
        assert_eq!(slug, "backend-dev-3");
    }
}
