use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Canonical form for comparing free-text answers.
///
/// Decomposes accented characters and drops the marks, lowercases, removes
/// anything that is not a letter, digit or whitespace, then collapses runs
/// of whitespace to single spaces.
pub fn normalize_text(input: &str) -> String {
    let stripped: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
