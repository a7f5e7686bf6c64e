//! Sector card catalog.
//!
//! Static table of the named sectors a galaxy is drawn from, keyed by the
//! lowercase card name. Generation samples from it without replacement.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::sector::SectorType;

/// One named sector card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectorTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub sector_type: SectorType,
    pub is_dangerous: bool,
    pub description: &'static str,
}

/// Key of the card placed at the home coordinate.
pub const HOME_TEMPLATE: &str = "lanai";

/// Look up a template by name, ignoring case.
pub fn get_template(name: &str) -> Option<&'static SectorTemplate> {
    let key = name.to_lowercase();
    SECTOR_TEMPLATES.iter().find(|t| t.key == key)
}

/// Every catalog key, in table order.
pub fn all_template_names() -> Vec<&'static str> {
    SECTOR_TEMPLATES.iter().map(|t| t.key).collect()
}

pub fn templates_by_type(sector_type: SectorType) -> Vec<&'static SectorTemplate> {
    SECTOR_TEMPLATES
        .iter()
        .filter(|t| t.sector_type == sector_type)
        .collect()
}

/// Uniformly random template (with replacement).
pub fn random_template(rng: &mut impl Rng) -> &'static SectorTemplate {
    SECTOR_TEMPLATES
        .choose(rng)
        .unwrap_or(&SECTOR_TEMPLATES[0])
}

macro_rules! card {
    ($key:literal, $name:literal, $ty:ident, $danger:literal, $desc:literal) => {
        SectorTemplate {
            key: $key,
            name: $name,
            sector_type: SectorType::$ty,
            is_dangerous: $danger,
            description: $desc,
        }
    };
}

pub static SECTOR_TEMPLATES: &[SectorTemplate] = &[
    card!("lanai", "Lanai", Civilized, false, "Home of Starbase 42. The starting point for Space Aces."),
    card!("solaris", "Solaris", Civilized, false, "A bright star system with established trade routes."),
    card!("lumina", "Lumina", Civilized, false, "A luminous system known for its research facilities."),
    card!("vega", "Vega", Civilized, false, "An established system with strong governmental presence."),
    card!("gemma", "Gemma", Frontier, false, "A mining system rich in precious gems and crystals."),
    card!("rukbat", "Rukbat", Frontier, false, "A frontier system with agricultural colonies."),
    card!("viridis", "Viridis", Frontier, false, "A green world with terraforming operations."),
    card!("hope", "Hope", Frontier, false, "A colony system representing hope for expansion."),
    card!("corsair", "Corsair", Dangerous, true, "Known pirate haven with frequent raids."),
    card!("tyranus", "Tyranus", Dangerous, true, "A system ruled by a tyrannical warlord."),
    card!("malalo", "Malalo", Dangerous, true, "A system plagued by conflicts and unrest."),
    card!("maelstro", "Maelstro", Dangerous, true, "A chaotic system with dangerous space storms."),
    card!("vanta", "Vanta", Anomaly, true, "A dark system with mysterious properties."),
    card!("eidolon", "Eidolon", Anomaly, true, "A ghostly system with spectral phenomena."),
    card!("gazer", "Gazer", Anomaly, true, "A system with strange observational effects."),
    card!("efflux", "Efflux", Anomaly, true, "A system with dangerous energy emissions."),
    card!("xinti", "Xinti", Unknown, false, "An unexplored system of alien origin."),
    card!("douglas", "Douglas", Frontier, false, "A hardy frontier system with industrial focus."),
    card!("asimov", "Asimov", Civilized, false, "A system renowned for its robotic industries."),
    card!("antilae", "Antilae", Frontier, false, "A frontier system on the edge of known space."),
    card!("arrak", "Arrak", Dangerous, true, "A desert system with harsh conditions."),
    card!("bandor", "Bandor", Dangerous, true, "A system controlled by criminal organizations."),
    card!("beez", "Beez", Frontier, false, "A system with industrious insectoid colonies."),
    card!("bloom", "Bloom", Frontier, false, "A flourishing agricultural system."),
    card!("fluffulon", "Fluffulon", Civilized, false, "A peaceful system known for its comfort industries."),
    card!("frigus", "Frigus", Frontier, false, "A cold system with ice mining operations."),
    card!("glorp", "Glorp", Unknown, false, "A mysterious system with unusual properties."),
    card!("hondo", "Hondo", Frontier, false, "A system with a strong martial tradition."),
    card!("ionos", "Ionos", Anomaly, true, "A system with dangerous ionic storms."),
    card!("jurassi", "Jurassi", Dangerous, true, "A primitive system with dangerous megafauna."),
    card!("lupin", "Lupin", Frontier, false, "A wild system with pack-hunting species."),
    card!("magrath", "Magrath", Civilized, false, "A magical system with mystical properties."),
    card!("revati", "Revati", Civilized, false, "A prosperous trading system."),
    card!("scintilla", "Scintilla", Civilized, false, "A sparkling system known for its entertainment."),
    card!("snacc", "Snacc", Frontier, false, "A system specializing in food production."),
    card!("snodd", "Snodd", Unknown, false, "An oddly named system with peculiar inhabitants."),
    card!("toblero", "Toblero", Frontier, false, "A system known for its triangular space stations."),
    card!("wolfram", "Wolfram", Frontier, false, "A metallic system rich in rare minerals."),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_lowercase_names() {
        let keys: HashSet<_> = SECTOR_TEMPLATES.iter().map(|t| t.key).collect();
        assert_eq!(keys.len(), SECTOR_TEMPLATES.len());
        for t in SECTOR_TEMPLATES {
            assert_eq!(t.key, t.name.to_lowercase());
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let home = get_template("LaNaI").expect("home card");
        assert_eq!(home.key, HOME_TEMPLATE);
        assert_eq!(home.sector_type, SectorType::Civilized);
        assert!(get_template("nowhere").is_none());
    }

    #[test]
    fn dangerous_types_are_flagged() {
        for t in templates_by_type(SectorType::Dangerous) {
            assert!(t.is_dangerous, "{} should be dangerous", t.name);
        }
        assert!(!templates_by_type(SectorType::Anomaly).is_empty());
    }

    #[test]
    fn names_and_random_pick() {
        assert_eq!(all_template_names().len(), SECTOR_TEMPLATES.len());
        let mut rng = StdRng::seed_from_u64(7);
        let pick = random_template(&mut rng);
        assert!(get_template(pick.name).is_some());
    }
}
