//! Content format to publishing platform lookup.

/// Format assumed when neither the model nor the request names one.
pub const DEFAULT_FORMAT: &str = "post";

/// Maps a content format to the platform it is published on.
///
/// Matching is case-insensitive; unknown formats land on Instagram.
#[must_use]
pub fn platform_for_format(format: &str) -> &'static str {
    match format.trim().to_lowercase().as_str() {
        "newsletter" => "newsletter",
        "thread" | "tweet" => "twitter",
        "blog" => "blog",
        "linkedin" => "linkedin",
        "video" | "short" => "youtube",
        _ => "instagram",
    }
}

#[cfg(test)]
mod tests {
    use super::platform_for_format;
    use rstest::rstest;

    #[rstest]
    #[case("carousel", "instagram")]
    #[case("Reels", "instagram")]
    #[case("stories", "instagram")]
    #[case("newsletter", "newsletter")]
    #[case("thread", "twitter")]
    #[case("tweet", "twitter")]
    #[case("blog", "blog")]
    #[case("linkedin", "linkedin")]
    #[case("short", "youtube")]
    #[case("podcast", "instagram")]
    fn maps_formats_to_platforms(#[case] format: &str, #[case] platform: &str) {
        assert_eq!(platform_for_format(format), platform);
    }
}
