//! Slug handling for taxonomy lookups.

/// Lower-cases `name` and replaces every character outside `[a-z0-9-]` with `-`.
///
/// No trimming or collapsing happens, so `"AI & Robotics"` becomes `"ai---robotics"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_replaces_symbols_and_spaces() {
        assert_eq!(slugify("AI & Robotics"), "ai---robotics");
    }

    #[test]
    fn test_slugify_keeps_digits_and_hyphens() {
        assert_eq!(slugify("Web3-Trends 2024"), "web3-trends-2024");
    }

    #[test]
    fn test_slugify_non_ascii() {
        assert_eq!(slugify("Café"), "caf-");
    }

    #[test]
    fn test_slugify_is_stable() {
        let once = slugify("Machine Learning");
        assert_eq!(slugify(&once), once);
    }
}
