//! Word lists for generated names

use rand::Rng;
use rand::seq::SliceRandom;

pub const WORDS: &[&str] = &[
    "alpha", "amber", "anchor", "arrow", "atlas", "aurora", "beacon", "birch",
    "blaze", "canyon", "cedar", "comet", "coral", "delta", "ember", "falcon",
    "fjord", "forest", "galaxy", "glacier", "harbor", "horizon", "island", "jade",
    "juniper", "lagoon", "lotus", "maple", "meadow", "meteor", "nova", "oasis",
    "onyx", "orbit", "pebble", "phoenix", "prairie", "quartz", "raven", "reef",
    "sierra", "summit", "tundra", "vertex", "willow", "zenith",
];

pub const FIRST_NAMES: &[&str] = &[
    "Adam", "Alice", "Amara", "Ben", "Carla", "Chen", "Daniel", "Diana",
    "Elena", "Ethan", "Fatima", "George", "Hana", "Ivan", "Jack", "Julia",
    "Kenji", "Laura", "Liam", "Maria", "Mateo", "Nadia", "Noah", "Olga",
    "Omar", "Priya", "Quinn", "Rosa", "Samuel", "Sofia", "Tariq", "Uma",
    "Victor", "Wendy", "Yusuf", "Zoe",
];

pub const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Bianchi", "Castillo", "Dubois", "Eriksen", "Fischer",
    "Garcia", "Hansen", "Ivanova", "Jensen", "Kim", "Kowalski", "Lopez",
    "Moreau", "Nakamura", "Novak", "O'Brien", "Patel", "Petrenko", "Quinn",
    "Rossi", "Schmidt", "Silva", "Tanaka", "Udeh", "Varga", "Weber", "Xu",
    "Young", "Zhang",
];

/// A single lowercase word, used for group and subject names
pub fn word<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(WORDS, rng).to_string()
}

/// A "First Last" person name, used for students and teachers
pub fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng))
}

fn pick<R: Rng + ?Sized>(list: &[&'static str], rng: &mut R) -> &'static str {
    list.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_full_name_has_two_parts() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let name = full_name(&mut rng);
            let parts: Vec<_> = name.split(' ').collect();
            assert_eq!(parts.len(), 2);
            assert!(FIRST_NAMES.contains(&parts[0]));
            assert!(LAST_NAMES.contains(&parts[1]));
        }
    }

    #[test]
    fn test_word_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = word(&mut rng);
        assert!(WORDS.contains(&w.as_str()));
    }
}
