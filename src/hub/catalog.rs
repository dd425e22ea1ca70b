/// The game catalog shown in the lobby.
///
/// In a connected build this would come from a backend; here it is a
/// built-in table so the hub is fully playable offline. Descriptors are
/// immutable — which module a game mounts is decided by the static
/// category table in `minigame`, never by the descriptor itself.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Puzzle,
    Competitive,
    Simulation,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Puzzle => "Puzzle",
            Category::Competitive => "Competitive",
            Category::Simulation => "Simulation",
        }
    }

    pub fn icon(self) -> char {
        match self {
            Category::Puzzle => '🧩',
            Category::Competitive => '🏆',
            Category::Simulation => '🌱',
        }
    }
}

#[derive(Clone, Debug)]
pub struct GameDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub icon: char,
    pub rating: f32,
    pub play_count: u32,
    pub tags: &'static [&'static str],
}

pub const CATALOG: &[GameDescriptor] = &[
    GameDescriptor {
        id: "neon-puzzle",
        title: "Neon Puzzle",
        description: "Flip the glowing tiles and find every pair.",
        category: Category::Puzzle,
        icon: '🧩',
        rating: 4.8,
        play_count: 12_500,
        tags: &["Relaxing", "Brain"],
    },
    GameDescriptor {
        id: "speed-racer-2077",
        title: "Speed Racer 2077",
        description: "Dodge obstacles at high speed. Test your reaction time!",
        category: Category::Competitive,
        icon: '🏎',
        rating: 4.5,
        play_count: 34_000,
        tags: &["Fast", "Hard"],
    },
    GameDescriptor {
        id: "farm-tiny",
        title: "Farm Tiny",
        description: "Grow crops against the clock in your pocket farm.",
        category: Category::Simulation,
        icon: '🌾',
        rating: 4.9,
        play_count: 8_900,
        tags: &["Casual", "Cute"],
    },
    GameDescriptor {
        id: "match-saga",
        title: "Match Saga",
        description: "Classic pair matching fun in one-minute rounds.",
        category: Category::Puzzle,
        icon: '💎',
        rating: 4.7,
        play_count: 45_000,
        tags: &["Popular"],
    },
    GameDescriptor {
        id: "cyber-dash",
        title: "Cyber Dash",
        description: "Three lanes, one survivor. How far can you get?",
        category: Category::Competitive,
        icon: '🤖',
        rating: 4.6,
        play_count: 2_100,
        tags: &["Arcade"],
    },
];

/// Catalog sorted by popularity, the lobby's "recommended" order.
pub fn by_popularity() -> Vec<&'static GameDescriptor> {
    let mut games: Vec<&GameDescriptor> = CATALOG.iter().collect();
    games.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    games
}
