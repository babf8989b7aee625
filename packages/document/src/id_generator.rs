use uuid::Uuid;

/// Generate a fresh random id for a project, page or block.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Turn a page name into a URL slug: lowercase, whitespace runs become `-`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
