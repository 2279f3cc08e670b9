use rand::Rng;

/// Filler alphabet for word search grids
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Uniformly random filler letter
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())] as char
}

/// Case-normalize a raw word for placement.
/// Uppercasing is Unicode aware, so accented letters keep their accent.
pub fn puzzle_word(raw: &str) -> Vec<char> {
    raw.trim().to_uppercase().chars().collect()
}
