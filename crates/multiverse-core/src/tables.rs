//! Generator vocabularies.
//!
//! Ordered, immutable word lists. Order is significant: the generator picks
//! by index, so reordering or editing any entry changes every universe.

/// Technological eras.
pub const TECH_LEVELS: &[&str] = &[
    "Stone Age",
    "Medieval",
    "Industrial",
    "Modern",
    "Cyberpunk",
    "Space Age",
    "Post-Singularity",
    "Transcendental",
    "Steam-Driven",
    "Genetic-Organic",
    "Quantum-Integrated",
    "Void-Powered",
];

/// Forms of government.
pub const GOVERNMENTS: &[&str] = &[
    "Democracy",
    "Galactic Empire",
    "AI Council",
    "Corporate Hegemony",
    "Tribal Federation",
    "Theocratic Order",
    "Technocracy",
    "Anarchist Collective",
    "Hive Mind",
    "Matriarchal Dynasties",
    "Mercenary Oligarchy",
    "Nomadic Flocks",
];

/// Climate regimes.
pub const CLIMATES: &[&str] = &[
    "Frozen Wasteland",
    "Scorched Desert",
    "Tropical Paradise",
    "Storm World",
    "Ocean Planet",
    "Bioluminescent Jungle",
    "Crystal Barrens",
    "Floating Archipelago",
    "Subterranean Network",
    "Nebula Shrouded",
    "Obsidian Plains",
    "Methane Seas",
];

/// Defining historical events.
pub const EVENTS: &[&str] = &[
    "Alien First Contact",
    "The Great Resource War",
    "Genetic Plague",
    "Quantum Energy Discovery",
    "AI Uprising",
    "Solar Flare Crisis",
    "Interdimensional Rift",
    "Moon Shattering",
    "The Great Ascendance",
    "Biological Transmutation",
    "The Quiet Century",
];

/// Nations. Used for the dominant country, both belligerents, and
/// headline locations.
pub const COUNTRIES: &[&str] = &[
    "Neo Babylon",
    "Solar Union",
    "Atlantic Republic",
    "Red Sahara",
    "North Coalition",
    "Ethereal Reach",
    "Zenith Plateau",
    "Titan Core",
    "Emerald Enclave",
    "Vesper Vanguard",
    "Shadow Syndicate",
    "Cloud Kingdom",
    "Aurora Alliance",
    "Nova Prefecture",
];

/// Technological breakthroughs.
pub const DISCOVERIES: &[&str] = &[
    "Ancient Artifacts",
    "Faster-Than-Light Travel",
    "Immortality Serum",
    "Dark Matter Battery",
    "Psionic Resonance",
    "Parallel Dimension Gateway",
    "Time Dilation Fields",
    "Cold Fusion",
    "Universal Translation",
    "Planetary Consciousness",
    "Antimatter Engines",
];

/// Descriptive population estimates.
pub const POPULATIONS: &[&str] = &[
    "800 Million",
    "4.2 Billion",
    "12 Billion",
    "Unknown (Scattered)",
    "50,000 (Last Survivors)",
    "Digital Consciousness Only",
    "Over 100 Billion",
    "900 Trillion (Micro-Beings)",
    "Zero (Automated)",
];

/// Headline subjects.
pub const SUBJECTS: &[&str] = &[
    "Robot",
    "Citizen",
    "Scientist",
    "Soldier",
    "Explorer",
    "Merchant",
    "Governor",
    "Deity-Machine",
    "Clone-Worker",
    "Void-Pilot",
];

/// Headline verbs, third person singular.
pub const VERBS: &[&str] = &[
    "Discovers",
    "Bans",
    "Launches",
    "Reveals",
    "Claims",
    "Deploys",
    "Celebrates",
    "Sabotages",
    "Terraforms",
    "Transcends",
];

/// Headline objects.
pub const OBJECTS: &[&str] = &[
    "New Energy Source",
    "Forbidden Tech",
    "Deep Space Probe",
    "Lost City",
    "Cybernetic Law",
    "Massive Monument",
    "Alien Relic",
    "Star Engine",
    "Genome Key",
];

/// Number of headline templates the generator chooses from.
pub const HEADLINE_TEMPLATE_COUNT: usize = 7;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn table_sizes() {
        assert_eq!(TECH_LEVELS.len(), 12);
        assert_eq!(GOVERNMENTS.len(), 12);
        assert_eq!(CLIMATES.len(), 12);
        assert_eq!(EVENTS.len(), 11);
        assert_eq!(COUNTRIES.len(), 14);
        assert_eq!(DISCOVERIES.len(), 11);
        assert_eq!(POPULATIONS.len(), 9);
        assert_eq!(SUBJECTS.len(), 10);
        assert_eq!(VERBS.len(), 10);
        assert_eq!(OBJECTS.len(), 9);
    }

    #[test]
    fn entries_are_unique() {
        for table in [
            TECH_LEVELS,
            GOVERNMENTS,
            CLIMATES,
            EVENTS,
            COUNTRIES,
            DISCOVERIES,
            POPULATIONS,
            SUBJECTS,
            VERBS,
            OBJECTS,
        ] {
            let set: BTreeSet<&str> = table.iter().copied().collect();
            assert_eq!(set.len(), table.len());
        }
    }
}
