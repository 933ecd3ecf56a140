//! Round generation: categories, word bank and the round source seam
//!
//! The local `WordBank` draws from a fixed word list. The `RoundSource`
//! trait exists so a remote source can replace it later; callers must not
//! assume generation is synchronous and always go through the Loading gate.

use rand::Rng;
use rand_pcg::Pcg32;

/// Word categories selectable on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sports,
    SeaAnimals,
    Vegetables,
    Fruit,
    Transport,
    Clothes,
    Weather,
    Animals,
    Toys,
    Food,
    SchoolObjects,
    Nature,
    Film,
    Body,
    Job,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Sports,
        Category::SeaAnimals,
        Category::Vegetables,
        Category::Fruit,
        Category::Transport,
        Category::Clothes,
        Category::Weather,
        Category::Animals,
        Category::Toys,
        Category::Food,
        Category::SchoolObjects,
        Category::Nature,
        Category::Film,
        Category::Body,
        Category::Job,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Sports => "Sports",
            Category::SeaAnimals => "Sea Animals",
            Category::Vegetables => "Vegetables",
            Category::Fruit => "Fruit",
            Category::Transport => "Transport",
            Category::Clothes => "Clothes",
            Category::Weather => "Weather",
            Category::Animals => "Animals",
            Category::Toys => "Toys",
            Category::Food => "Food",
            Category::SchoolObjects => "School Objects",
            Category::Nature => "Nature",
            Category::Film => "Film",
            Category::Body => "Body",
            Category::Job => "Job",
        }
    }

    pub fn from_name(s: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.name() == s)
    }

    pub fn words(self) -> &'static [&'static str] {
        match self {
            Category::Sports => &[
                "Football", "Tennis", "Rugby", "Golf", "Hockey", "Boxing", "Judo", "Swimming",
                "Skiing", "Cricket",
            ],
            Category::SeaAnimals => &[
                "Shark", "Whale", "Dolphin", "Crab", "Octopus", "Jellyfish", "Turtle", "Seal",
                "Starfish", "Shrimp",
            ],
            Category::Vegetables => &[
                "Carrot", "Potato", "Onion", "Peas", "Corn", "Broccoli", "Pepper", "Spinach",
                "Garlic", "Bean",
            ],
            Category::Fruit => &[
                "Apple", "Banana", "Orange", "Pear", "Grape", "Lemon", "Mango", "Melon", "Peach",
                "Kiwi",
            ],
            Category::Transport => &[
                "Car", "Bus", "Train", "Plane", "Bike", "Ship", "Truck", "Taxi", "Boat", "Metro",
            ],
            Category::Clothes => &[
                "Shirt", "Dress", "Jeans", "Hat", "Coat", "Shoes", "Socks", "Scarf", "Gloves",
                "Skirt",
            ],
            Category::Weather => &[
                "Sun", "Rain", "Snow", "Wind", "Cloud", "Storm", "Fog", "Ice", "Hot", "Cold",
            ],
            Category::Animals => &[
                "Dog", "Cat", "Lion", "Tiger", "Bear", "Horse", "Cow", "Sheep", "Rabbit", "Monkey",
            ],
            Category::Toys => &[
                "Doll", "Ball", "Robot", "Lego", "Kite", "Yo-yo", "Puzzle", "Teddy", "Blocks",
                "Car",
            ],
            Category::Food => &[
                "Pizza", "Burger", "Pasta", "Rice", "Soup", "Bread", "Cheese", "Egg", "Meat",
                "Cake",
            ],
            Category::SchoolObjects => &[
                "Pen", "Pencil", "Book", "Ruler", "Desk", "Bag", "Eraser", "Paper", "Glue", "Map",
            ],
            Category::Nature => &[
                "Tree", "Flower", "Grass", "River", "Mountain", "Lake", "Forest", "Sun", "Moon",
                "Star",
            ],
            Category::Film => &[
                "Actor", "Scene", "Camera", "Action", "Comedy", "Drama", "Horror", "Star", "Movie",
                "Cinema",
            ],
            Category::Body => &[
                "Head", "Arm", "Leg", "Hand", "Foot", "Eye", "Ear", "Nose", "Mouth", "Hair",
            ],
            Category::Job => &[
                "Doctor", "Teacher", "Police", "Cook", "Pilot", "Nurse", "Farmer", "Artist",
                "Singer", "Vet",
            ],
        }
    }

    /// Categories that may never supply decoys/intruders for this one.
    /// Food overlaps semantically with Fruit and Vegetables.
    fn excluded_sources(self) -> &'static [Category] {
        match self {
            Category::Food => &[Category::Fruit, Category::Vegetables],
            _ => &[],
        }
    }

    /// Valid categories to draw a decoy or intruder word from
    fn decoy_categories(self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| *c != self && !self.excluded_sources().contains(c))
            .collect()
    }
}

/// Bubble count per round scales with difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn bubble_count(self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 4,
            Difficulty::Hard => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Difficulty> {
        match s {
            "Easy" => Some(Difficulty::Easy),
            "Normal" => Some(Difficulty::Normal),
            "Hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Which word the player must find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Pop the one word that does not belong to the category
    FindIntruder,
    /// Pop the one word that does belong to the category
    FindBelonging,
}

impl Mode {
    pub fn from_name(s: &str) -> Option<Mode> {
        match s {
            "intruder" => Some(Mode::FindIntruder),
            "belonging" => Some(Mode::FindBelonging),
            _ => None,
        }
    }
}

/// One word in a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEntry {
    pub word: String,
    pub is_target: bool,
}

impl RoundEntry {
    fn new(word: &str, is_target: bool) -> Self {
        Self {
            word: word.to_string(),
            is_target,
        }
    }
}

/// The words for one round; exactly one entry is the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub entries: Vec<RoundEntry>,
}

impl Round {
    /// Safe round returned when generation cannot produce a real one
    pub fn fallback() -> Self {
        Self {
            entries: vec![
                RoundEntry::new("Error", false),
                RoundEntry::new("Retry", true),
                RoundEntry::new("Net", false),
            ],
        }
    }

    pub fn target_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_target).count()
    }
}

/// Source of rounds. Must not fail: any internal shortfall degrades to a
/// smaller round or the fixed fallback, never an error to the caller.
pub trait RoundSource {
    fn generate(
        &mut self,
        category: Category,
        difficulty: Difficulty,
        mode: Mode,
        rng: &mut Pcg32,
    ) -> Round;
}

/// Local word-bank round source
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBank;

impl WordBank {
    /// Sample up to `count` distinct words from the category
    fn sample_category_words(category: Category, count: usize, rng: &mut Pcg32) -> Vec<&'static str> {
        let mut pool: Vec<&'static str> = category.words().to_vec();
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            if pool.is_empty() {
                break;
            }
            let idx = rng.random_range(0..pool.len());
            picked.push(pool.swap_remove(idx));
        }
        picked
    }

    /// Draw one word from a random non-excluded other category
    fn sample_decoy(category: Category, rng: &mut Pcg32) -> Option<&'static str> {
        let sources = category.decoy_categories();
        if sources.is_empty() {
            return None;
        }
        let source = sources[rng.random_range(0..sources.len())];
        let words = source.words();
        if words.is_empty() {
            return None;
        }
        Some(words[rng.random_range(0..words.len())])
    }
}

impl RoundSource for WordBank {
    fn generate(
        &mut self,
        category: Category,
        difficulty: Difficulty,
        mode: Mode,
        rng: &mut Pcg32,
    ) -> Round {
        let count = difficulty.bubble_count();

        let entries = match mode {
            Mode::FindIntruder => {
                let mut entries: Vec<RoundEntry> =
                    Self::sample_category_words(category, count - 1, rng)
                        .into_iter()
                        .map(|w| RoundEntry::new(w, false))
                        .collect();
                match Self::sample_decoy(category, rng) {
                    Some(intruder) => entries.push(RoundEntry::new(intruder, true)),
                    None => return Round::fallback(),
                }
                entries
            }
            Mode::FindBelonging => {
                let target = Self::sample_category_words(category, 1, rng);
                let Some(target) = target.first() else {
                    return Round::fallback();
                };
                let mut entries = vec![RoundEntry::new(target, true)];
                for _ in 0..count - 1 {
                    // Decoys are sampled with replacement across decoys
                    if let Some(decoy) = Self::sample_decoy(category, rng) {
                        entries.push(RoundEntry::new(decoy, false));
                    }
                }
                entries
            }
        };

        if entries.is_empty() {
            return Round::fallback();
        }
        Round { entries }
    }
}
