/// Derives a node identifier from arbitrary text
///
/// Every space becomes a hyphen, then every character that is neither
/// alphanumeric nor a hyphen is dropped. Other whitespace (tabs, newlines)
/// is dropped rather than hyphenated.
///
/// # Examples
///
/// ```
/// use portal_chef::ident::normalize;
///
/// assert_eq!(normalize("Unit 1: Intro"), "Unit-1-Intro");
/// ```
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

/// Returns true if `id` is non-empty and only holds alphanumerics and hyphens
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_alphanumeric() || c == '-')
}
