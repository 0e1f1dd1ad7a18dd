//! Premade contestant lists

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// A named list of contestants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub contestants: &'static [&'static str],
}

/// Category summary for a picker UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub count: usize,
}

/// Default number of contestants drawn by `random_from`
pub const DEFAULT_DRAW: usize = 8;

pub const PRESETS: &[Preset] = &[
    Preset {
        id: "restaurants",
        name: "Fast Food Restaurants",
        icon: "🍔",
        contestants: &[
            "McDonald's",
            "Burger King",
            "Wendy's",
            "Taco Bell",
            "KFC",
            "Subway",
            "Chick-fil-A",
            "Popeyes",
            "Chipotle",
            "Five Guys",
            "In-N-Out Burger",
            "Shake Shack",
            "Panda Express",
            "Domino's",
            "Pizza Hut",
            "Papa John's",
        ],
    },
    Preset {
        id: "casualDining",
        name: "Casual Dining",
        icon: "🍽️",
        contestants: &[
            "Applebee's",
            "Chili's",
            "Olive Garden",
            "Red Lobster",
            "Outback Steakhouse",
            "Buffalo Wild Wings",
            "TGI Friday's",
            "Cheesecake Factory",
            "Texas Roadhouse",
            "Cracker Barrel",
            "Red Robin",
            "P.F. Chang's",
        ],
    },
    Preset {
        id: "coffee",
        name: "Coffee Chains",
        icon: "☕",
        contestants: &[
            "Starbucks",
            "Dunkin'",
            "Peet's Coffee",
            "Tim Hortons",
            "Caribou Coffee",
            "The Coffee Bean",
            "Dutch Bros",
            "Panera Bread",
        ],
    },
    Preset {
        id: "videoGames",
        name: "Popular Video Games",
        icon: "🎮",
        contestants: &[
            "Minecraft",
            "Fortnite",
            "Call of Duty",
            "League of Legends",
            "Grand Theft Auto V",
            "The Legend of Zelda",
            "Super Mario",
            "Elden Ring",
            "God of War",
            "Red Dead Redemption",
            "Cyberpunk 2077",
            "Assassin's Creed",
            "Overwatch",
            "Counter-Strike",
            "Valorant",
            "Apex Legends",
        ],
    },
    Preset {
        id: "nintendoGames",
        name: "Nintendo Games",
        icon: "🎮",
        contestants: &[
            "Super Mario Bros",
            "The Legend of Zelda",
            "Pokémon",
            "Mario Kart",
            "Animal Crossing",
            "Super Smash Bros",
            "Splatoon",
            "Metroid",
            "Kirby",
            "Donkey Kong",
            "Fire Emblem",
            "Luigi's Mansion",
        ],
    },
    Preset {
        id: "rpgGames",
        name: "RPG Games",
        icon: "⚔️",
        contestants: &[
            "Final Fantasy",
            "The Witcher 3",
            "Skyrim",
            "Dark Souls",
            "Elden Ring",
            "Persona 5",
            "Dragon Quest",
            "Mass Effect",
            "Baldur's Gate 3",
            "Chrono Trigger",
            "Kingdom Hearts",
            "Fallout",
        ],
    },
];

pub fn categories() -> Vec<Category> {
    PRESETS
        .iter()
        .map(|p| Category {
            id: p.id,
            name: p.name,
            icon: p.icon,
            count: p.contestants.len(),
        })
        .collect()
}

pub fn get(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// Contestant names of a preset (empty for an unknown id)
pub fn contestants(id: &str) -> &'static [&'static str] {
    get(id).map(|p| p.contestants).unwrap_or(&[])
}

/// Up to `count` distinct names from a preset, in random order
pub fn random_from<R: Rng + ?Sized>(id: &str, count: usize, rng: &mut R) -> Vec<&'static str> {
    let mut names = contestants(id).to_vec();
    names.shuffle(rng);
    names.truncate(count);
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_categories() {
        let cats = categories();
        assert_eq!(cats.len(), 6);
        assert_eq!(cats[0].id, "restaurants");
        assert_eq!(cats[0].count, 16);
        assert_eq!(cats.iter().find(|c| c.id == "coffee").map(|c| c.count), Some(8));
    }

    #[test]
    fn test_unknown_preset_is_empty() {
        assert!(contestants("boardGames").is_empty());
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(random_from("boardGames", DEFAULT_DRAW, &mut rng).is_empty());
    }

    #[test]
    fn test_random_from_draws_distinct_names() {
        let mut rng = Pcg32::seed_from_u64(7);
        let picked = random_from("videoGames", DEFAULT_DRAW, &mut rng);
        assert_eq!(picked.len(), DEFAULT_DRAW);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), DEFAULT_DRAW);
        assert!(picked.iter().all(|n| contestants("videoGames").contains(n)));

        // Asking for more than exist returns the whole list
        assert_eq!(random_from("coffee", 50, &mut rng).len(), 8);
    }

    #[test]
    fn test_preset_names_are_unique_within_a_list() {
        for preset in PRESETS {
            let unique: HashSet<_> = preset.contestants.iter().collect();
            assert_eq!(unique.len(), preset.contestants.len(), "{}", preset.id);
        }
    }
}
