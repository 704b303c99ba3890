/// Minimum body length, exclusive, in characters.
pub const MIN_TEXT_CHARS: usize = 100;

/// Marker the site renders on soft-404 pages.
pub const NOT_FOUND_MARKER: &str = "страница не найдена";

/// Decides whether an extracted body is a real article.
pub fn is_acceptable(text: &str) -> bool {
    text.chars().count() > MIN_TEXT_CHARS && !text.to_lowercase().contains(NOT_FOUND_MARKER)
}
