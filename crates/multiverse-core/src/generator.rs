//! Seed to universe.
//!
//! Generation is a pure, total function of the seed and the epoch
//! duration: no I/O, no clock reads, no failure path. The draw order below
//! is fixed. Every draw consumes exactly one value from the sequence, and
//! moving, adding, or removing a draw changes every universe after it.
//!
//! | # | Field | Draw |
//! |---|-------|------|
//! | 1 | `planet.gravity` | `next_f64() * 2.2 + 0.2` |
//! | 2 | `planet.moons` | `next_int(0, 5)` |
//! | 3 | `planet.climate` | pick [`CLIMATES`] |
//! | 4 | `society.tech_level` | pick [`TECH_LEVELS`] |
//! | 5 | `society.government` | pick [`GOVERNMENTS`] |
//! | 6 | `society.population` | pick [`POPULATIONS`] |
//! | 7 | `society.dominant_country` | pick [`COUNTRIES`] |
//! | 8 | `history.major_event` | pick [`EVENTS`] |
//! | 9 | `history.last_war.first` | pick [`COUNTRIES`] |
//! | 10 | `history.last_war.second` | pick [`COUNTRIES`] minus dominant and first |
//! | 11 | `history.discovery` | pick [`DISCOVERIES`] |
//! | 12+ | six headlines | subject, verb, object, location, template |

use multiverse_types::universe::HEADLINE_COUNT;
use multiverse_types::{HistoryInfo, LastWar, PlanetInfo, Seed, SocietyInfo, Universe};

use crate::clock::epoch_bounds;
use crate::sequence::SeededSequence;
use crate::tables::{
    CLIMATES, COUNTRIES, DISCOVERIES, EVENTS, GOVERNMENTS, HEADLINE_TEMPLATE_COUNT, OBJECTS,
    POPULATIONS, SUBJECTS, TECH_LEVELS, VERBS,
};

/// Default epoch length: thirty minutes.
pub const DEFAULT_EPOCH_DURATION_MS: u64 = 1_800_000;

/// Total draws consumed by one generation: eleven field draws plus five
/// per headline.
pub const DRAWS_PER_UNIVERSE: usize = 41;

/// Produces base universes for a fixed epoch duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseGenerator {
    epoch_duration_ms: u64,
}

impl Default for UniverseGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_EPOCH_DURATION_MS)
    }
}

impl UniverseGenerator {
    /// Create a generator for the given epoch duration.
    pub const fn new(epoch_duration_ms: u64) -> Self {
        Self { epoch_duration_ms }
    }

    /// The epoch duration used for timestamps.
    pub const fn epoch_duration_ms(&self) -> u64 {
        self.epoch_duration_ms
    }

    /// Generate the base universe for `seed`.
    pub fn generate(&self, seed: Seed) -> Universe {
        generate_universe(seed, self.epoch_duration_ms)
    }
}

/// Generate the base universe for `seed` with the given epoch duration.
///
/// Only `created_at` and `expires_at` depend on the duration; every other
/// field depends on the seed alone.
pub fn generate_universe(seed: Seed, epoch_duration_ms: u64) -> Universe {
    let mut rng = SeededSequence::new(seed.value());
    generate_from(&mut rng, seed, epoch_duration_ms)
}

/// Run the pinned draw order against an existing sequence.
fn generate_from(rng: &mut SeededSequence, seed: Seed, epoch_duration_ms: u64) -> Universe {
    let planet = draw_planet(rng);
    let society = draw_society(rng);
    let history = draw_history(rng, &society.dominant_country);
    let headlines = (0..HEADLINE_COUNT)
        .map(|_| draw_headline(rng, &planet, &society, &history))
        .collect();

    let (created_at, expires_at) = epoch_bounds(seed, epoch_duration_ms);

    Universe {
        id: seed.universe_id(),
        seed,
        created_at,
        expires_at,
        planet,
        society,
        history,
        headlines,
    }
}

/// Pick from a vocabulary table. The tables are non-empty constants, so
/// the empty fallback is never taken.
fn draw(rng: &mut SeededSequence, table: &[&'static str]) -> &'static str {
    rng.pick(table).copied().unwrap_or_default()
}

fn draw_planet(rng: &mut SeededSequence) -> PlanetInfo {
    // mul_add would round differently from the reference sequence.
    #[allow(clippy::suboptimal_flops)]
    let gravity = rng.next_f64() * 2.2 + 0.2;
    let moons = u8::try_from(rng.next_int(0, 5)).unwrap_or(0);
    let climate = draw(rng, CLIMATES).to_owned();
    PlanetInfo {
        gravity,
        moons,
        climate,
    }
}

fn draw_society(rng: &mut SeededSequence) -> SocietyInfo {
    let tech_level = draw(rng, TECH_LEVELS).to_owned();
    let government = draw(rng, GOVERNMENTS).to_owned();
    let population = draw(rng, POPULATIONS).to_owned();
    let dominant_country = draw(rng, COUNTRIES).to_owned();
    SocietyInfo {
        tech_level,
        government,
        population,
        dominant_country,
    }
}

fn draw_history(rng: &mut SeededSequence, dominant: &str) -> HistoryInfo {
    let major_event = draw(rng, EVENTS).to_owned();

    // The first belligerent may be the dominant country. The second is
    // drawn once from the countries that are neither.
    let first = draw(rng, COUNTRIES);
    let rivals: Vec<&'static str> = COUNTRIES
        .iter()
        .copied()
        .filter(|c| *c != dominant && *c != first)
        .collect();
    let second = draw(rng, &rivals);

    let discovery = draw(rng, DISCOVERIES).to_owned();
    HistoryInfo {
        major_event,
        last_war: LastWar {
            first: first.to_owned(),
            second: second.to_owned(),
        },
        discovery,
    }
}

fn draw_headline(
    rng: &mut SeededSequence,
    planet: &PlanetInfo,
    society: &SocietyInfo,
    history: &HistoryInfo,
) -> String {
    let subject = draw(rng, SUBJECTS);
    let verb = draw(rng, VERBS);
    let object = draw(rng, OBJECTS);
    let location = draw(rng, COUNTRIES);
    let template = rng.next_index(HEADLINE_TEMPLATE_COUNT).unwrap_or(0);

    let dominant = &society.dominant_country;
    match template {
        0 => format!("{subject} in {location} {verb} {object}"),
        1 => format!(
            "{location} Daily: {object} {}ed by local {}s",
            verb.to_lowercase(),
            subject.to_lowercase()
        ),
        2 => format!("BREAKING: {verb} of {object} at {dominant} border"),
        3 => format!(
            "{} issues mandate on {}",
            society.government,
            object.to_lowercase()
        ),
        4 => {
            let destination = if planet.moons > 0 {
                "moon"
            } else {
                "orbital station"
            };
            format!("History made as {subject} from {location} visits the {destination}")
        }
        5 => format!(
            "Global Panic: {object} {}ed during {}",
            verb.to_lowercase(),
            history.major_event
        ),
        _ => format!("{dominant} scientists claim {object} defies current physics"),
    }
}
