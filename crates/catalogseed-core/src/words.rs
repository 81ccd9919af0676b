//! # Product Names
//!
//! A product name is one random word followed by a category from a fixed,
//! closed set: `"<word> <category>"`. Words come from a [`WordSource`] so
//! callers can swap the faker-backed generator for a scripted one.

use fake::faker::lorem::en::Word;
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The closed set of category suffixes.
pub const PRODUCT_CATEGORIES: [&str; 7] = [
    "cars",
    "cups",
    "dresses",
    "toys",
    "accessories",
    "utensils",
    "guns",
];

/// Produces one word per call. No uniqueness or charset guarantees.
pub trait WordSource {
    fn next_word(&mut self) -> String;
}

/// Lorem words from the `fake` crate, drawn with the given RNG.
pub struct FakerWords<R: Rng> {
    rng: R,
}

impl<R: Rng> FakerWords<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> WordSource for FakerWords<R> {
    fn next_word(&mut self) -> String {
        Word().fake_with_rng(&mut self.rng)
    }
}

/// Cycles through a fixed list of words.
///
/// An empty list yields empty words; the category suffix still keeps the
/// generated name non-empty.
#[derive(Debug, Clone)]
pub struct ScriptedWords {
    words: Vec<String>,
    position: usize,
}

impl ScriptedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            position: 0,
        }
    }
}

impl WordSource for ScriptedWords {
    fn next_word(&mut self) -> String {
        if self.words.is_empty() {
            return String::new();
        }
        let word = self.words[self.position % self.words.len()].clone();
        self.position += 1;
        word
    }
}

/// Generates `"<word> <category>"` names, picking the category uniformly.
pub struct NameGenerator<W: WordSource, R: Rng> {
    words: W,
    rng: R,
}

impl<W: WordSource, R: Rng> NameGenerator<W, R> {
    pub fn new(words: W, rng: R) -> Self {
        Self { words, rng }
    }

    pub fn next_category(&mut self) -> &'static str {
        PRODUCT_CATEGORIES[self.rng.random_range(0..PRODUCT_CATEGORIES.len())]
    }

    pub fn next_name(&mut self) -> String {
        let category = self.next_category();
        product_name(&self.words.next_word(), category)
    }

    /// Generate `count` names into a fresh Vec.
    pub fn take_names(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_name()).collect()
    }
}

/// Faker-backed generator, reproducible when `seed` is given.
///
/// Words and categories draw from separate RNGs.
pub fn faker_names(seed: Option<u64>) -> NameGenerator<FakerWords<StdRng>, StdRng> {
    match seed {
        Some(seed) => NameGenerator::new(
            FakerWords::new(StdRng::seed_from_u64(seed)),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => NameGenerator::new(
            FakerWords::new(StdRng::from_os_rng()),
            StdRng::from_os_rng(),
        ),
    }
}

/// Join a word and a category into a product name.
pub fn product_name(word: &str, category: &str) -> String {
    format!("{} {}", word, category)
}

/// The category suffix of a product name, if it is one of [`PRODUCT_CATEGORIES`].
pub fn category_of(name: &str) -> Option<&'static str> {
    let suffix = name.rsplit(' ').next()?;
    PRODUCT_CATEGORIES.iter().copied().find(|c| *c == suffix)
}
