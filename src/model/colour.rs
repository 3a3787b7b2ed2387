use rand::Rng;
use serde::{Deserialize, Serialize};

/// The fixed palette lists and sublists are painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Green,
    Red,
    Blue,
    Orange,
    Purple,
    Yellow,
}

impl Colour {
    pub const ALL: [Colour; 6] = [
        Colour::Green,
        Colour::Red,
        Colour::Blue,
        Colour::Orange,
        Colour::Purple,
        Colour::Yellow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Colour::Green => "green",
            Colour::Red => "red",
            Colour::Blue => "blue",
            Colour::Orange => "orange",
            Colour::Purple => "purple",
            Colour::Yellow => "yellow",
        }
    }

    pub fn from_name(name: &str) -> Option<Colour> {
        Colour::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a colour is chosen for lists without a `Colour` header and for sublists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourMode {
    /// A fresh random pick on every parse
    #[default]
    Random,
    /// Derived from the node's name, identical across reloads
    Stable,
}

impl ColourMode {
    pub fn pick(self, seed: &str) -> Colour {
        let idx = match self {
            ColourMode::Random => rand::rng().random_range(0..Colour::ALL.len()),
            ColourMode::Stable => seed_index(seed),
        };
        Colour::ALL[idx]
    }
}

fn seed_index(seed: &str) -> usize {
    let hash = seed
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    hash % Colour::ALL.len()
}
