//! Class name composition.

/// Join Tailwind class lists, skipping empty entries.
///
/// Conflicting utilities are resolved in favour of the later argument, so
/// `cn(["px-4", "px-0"])` keeps only `px-0`.
pub fn cn<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    let joined = classes
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        return joined;
    }
    tailwind_fuse::tw_merge!(joined.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cn_joins() {
        assert_eq!(cn(["mx-auto px-4", "max-w-full"]), "mx-auto px-4 max-w-full");
    }

    #[test]
    fn test_cn_skips_empty() {
        assert_eq!(cn(["flex", "", "  ", "items-center"]), "flex items-center");
        assert_eq!(cn([]), "");
    }

    #[test]
    fn test_cn_later_utility_wins() {
        assert_eq!(cn(["px-4 py-2", "px-0"]), "py-2 px-0");
        assert_eq!(cn(["max-w-screen-lg", "max-w-full"]), "max-w-full");
    }
}
