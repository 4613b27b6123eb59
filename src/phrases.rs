//! Placeholder labels for quickly created nodes.

use rand::seq::IndexedRandom;

const PHRASES: &[&str] = &[
    "A new idea",
    "Something to explore",
    "Open question",
    "Key insight",
    "Main argument",
    "Supporting evidence",
    "Counter example",
    "Next step",
    "Hidden assumption",
    "Root cause",
    "Possible outcome",
    "Related concept",
    "Worth a second look",
    "Loose thread",
    "Starting point",
];

pub fn random_phrase() -> String {
    PHRASES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("New node")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_comes_from_the_list() {
        for _ in 0..20 {
            let phrase = random_phrase();
            assert!(PHRASES.contains(&phrase.as_str()));
        }
    }
}
