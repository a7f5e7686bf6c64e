//! Procedural galaxy layout.
//!
//! The home sector sits at the origin. Rings 1..=`max_ring` around it are
//! filled from the sector catalog, each ring thinned to
//! `min(ring_size, remaining_cards / radius)` so the outer rings keep empty
//! space to fly through. Cards are drawn without replacement, so a name is
//! never used twice in one galaxy.
//!
//! Randomness is injected; a seeded `StdRng` reproduces a galaxy exactly.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{self, SectorTemplate};
use crate::config::{GalaxyConfig, MAX_RINGS};
use crate::galaxy::{Galaxy, HOME_SECTOR_ID};
use crate::hex::{self, HexCoord};
use crate::sector::{NewSector, SectorType, Timestamp};

/// Summary of one generation run, for logging and tooling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationStats {
    /// Sectors placed per ring; index 0 is the home ring.
    pub placed_per_ring: Vec<usize>,
    pub discovered: usize,
    /// Cards left unused when generation finished.
    pub remaining_templates: usize,
}

impl GenerationStats {
    pub fn total(&self) -> usize {
        self.placed_per_ring.iter().sum()
    }
}

/// How many coordinates of a ring to populate.
pub fn ring_quota(ring_size: usize, remaining: usize, radius: u32) -> usize {
    if radius == 0 {
        return ring_size.min(remaining);
    }
    ring_size.min(remaining / radius as usize)
}

/// Build a fresh galaxy from the full catalog.
pub fn generate_galaxy(config: &GalaxyConfig, rng: &mut impl Rng, now: Timestamp) -> Galaxy {
    generate_galaxy_from(catalog::SECTOR_TEMPLATES, config, rng, now).0
}

/// Build a galaxy from an explicit card list and report what was placed.
///
/// The home card is looked up in `templates` by `config.home_template`; if
/// it is missing the first card is used.
pub fn generate_galaxy_from(
    templates: &[SectorTemplate],
    config: &GalaxyConfig,
    rng: &mut impl Rng,
    now: Timestamp,
) -> (Galaxy, GenerationStats) {
    let mut galaxy = Galaxy::new();
    let mut stats = GenerationStats::default();

    let home_key = config.home_template.to_lowercase();
    let home_index = templates
        .iter()
        .position(|t| t.key == home_key)
        .unwrap_or(0);

    let mut pool: Vec<&SectorTemplate> = templates
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != home_index)
        .map(|(_, t)| t)
        .collect();

    // ── Home ──
    if let Some(home) = templates.get(home_index) {
        let placed = galaxy.insert_with_id(
            HOME_SECTOR_ID.to_string(),
            NewSector {
                hex: HexCoord::ORIGIN,
                name: home.name.to_string(),
                sector_type: SectorType::Civilized,
                is_dangerous: false,
                notes: home.description.to_string(),
                discovered_at: Some(now),
            },
            now,
        );
        if placed.is_some() {
            galaxy.current_sector = Some(HOME_SECTOR_ID.to_string());
            stats.discovered += 1;
        }
        stats.placed_per_ring.push(usize::from(placed.is_some()));
    }

    // ── Rings ──
    for radius in 1..=config.max_ring.min(MAX_RINGS) {
        // Quota is zero from here on.
        if pool.len() < radius as usize {
            stats.placed_per_ring.push(0);
            continue;
        }
        let ring = hex::hex_ring(HexCoord::ORIGIN, radius as i32);
        let quota = ring_quota(ring.len(), pool.len(), radius);
        let chosen: Vec<HexCoord> = ring.choose_multiple(rng, quota).copied().collect();

        let mut placed = 0;
        for coord in chosen {
            if pool.is_empty() {
                break;
            }
            if galaxy.is_occupied(coord) {
                continue;
            }
            let template = pool.swap_remove(rng.gen_range(0..pool.len()));
            let discovered = radius == 1 || rng.gen::<f64>() < config.discovery_chance;

            let id = galaxy.create_sector(
                NewSector {
                    hex: coord,
                    name: template.name.to_string(),
                    sector_type: template.sector_type,
                    is_dangerous: template.is_dangerous,
                    notes: template.description.to_string(),
                    discovered_at: discovered.then_some(now),
                },
                now,
            );
            if id.is_some() {
                placed += 1;
                if discovered {
                    stats.discovered += 1;
                }
            }
        }
        stats.placed_per_ring.push(placed);
    }

    stats.remaining_templates = pool.len();
    log::info!(
        "Generated galaxy: {} sectors over {} rings, {} discovered, {} cards unused",
        stats.total(),
        config.max_ring,
        stats.discovered,
        stats.remaining_templates
    );
    (galaxy, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generate(seed: u64) -> (Galaxy, GenerationStats) {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_galaxy_from(
            catalog::SECTOR_TEMPLATES,
            &GalaxyConfig::default(),
            &mut rng,
            1_000,
        )
    }

    #[test]
    fn home_is_unique_discovered_and_civilized() {
        for seed in 0..20 {
            let (g, _) = generate(seed);
            let at_origin: Vec<_> = g
                .sectors
                .values()
                .filter(|s| s.hex() == HexCoord::ORIGIN)
                .collect();
            assert_eq!(at_origin.len(), 1);
            let home = at_origin[0];
            assert_eq!(home.id, HOME_SECTOR_ID);
            assert_eq!(home.name, "Lanai");
            assert_eq!(home.sector_type, SectorType::Civilized);
            assert_eq!(home.discovered_at, Some(1_000));
            assert_eq!(g.current_sector.as_deref(), Some(HOME_SECTOR_ID));
        }
    }

    #[test]
    fn coordinates_and_names_unique() {
        for seed in 0..20 {
            let (g, _) = generate(seed);
            let coords: HashSet<_> = g.sectors.values().map(|s| s.hex()).collect();
            let names: HashSet<_> = g.sectors.values().map(|s| s.name.clone()).collect();
            assert_eq!(coords.len(), g.len());
            assert_eq!(names.len(), g.len());
        }
    }

    #[test]
    fn ring_thinning_follows_quota() {
        // 38 cards: home + 37 in the pool.
        let (g, stats) = generate(3);
        assert_eq!(stats.placed_per_ring, vec![1, 6, 12, 6, 3]);
        assert_eq!(stats.total(), g.len());
        assert_eq!(stats.remaining_templates, 37 - 27);
        for s in g.sectors.values() {
            assert!(hex::hex_distance(HexCoord::ORIGIN, s.hex()) <= 4);
        }
    }

    #[test]
    fn ring_one_always_discovered() {
        for seed in 0..20 {
            let (g, _) = generate(seed);
            for s in g.sectors.values() {
                if hex::hex_distance(HexCoord::ORIGIN, s.hex()) <= 1 {
                    assert!(s.is_discovered(), "{} at {} hidden", s.name, s.hex());
                }
            }
        }
    }

    #[test]
    fn outer_discovery_rate_is_plausible() {
        let mut outer = 0;
        let mut found = 0;
        for seed in 0..200 {
            let (g, _) = generate(seed);
            for s in g.sectors.values() {
                if hex::hex_distance(HexCoord::ORIGIN, s.hex()) >= 2 {
                    outer += 1;
                    if s.is_discovered() {
                        found += 1;
                    }
                }
            }
        }
        let rate = found as f64 / outer as f64;
        assert!((0.2..0.4).contains(&rate), "rate {rate}");
    }

    #[test]
    fn same_seed_same_galaxy() {
        let (a, _) = generate(42);
        let (b, _) = generate(42);
        assert_eq!(a, b);
    }

    #[test]
    fn small_pool_runs_out_cleanly() {
        let cards = &catalog::SECTOR_TEMPLATES[..4];
        let mut rng = StdRng::seed_from_u64(1);
        let (g, stats) = generate_galaxy_from(cards, &GalaxyConfig::default(), &mut rng, 5);
        assert_eq!(g.len(), 4);
        assert_eq!(stats.remaining_templates, 0);
        assert_eq!(stats.placed_per_ring, vec![1, 3, 0, 0, 0]);
    }

    #[test]
    fn ring_count_is_capped() {
        let config = GalaxyConfig {
            max_ring: 100_000,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(8);
        let (g, stats) = generate_galaxy_from(catalog::SECTOR_TEMPLATES, &config, &mut rng, 0);
        assert_eq!(stats.placed_per_ring.len(), MAX_RINGS as usize + 1);
        assert_eq!(&stats.placed_per_ring[..8], &[1, 6, 12, 6, 3, 2, 1, 1]);
        assert!(stats.placed_per_ring[8..].iter().all(|&n| n == 0));
        assert_eq!(stats.remaining_templates, 6);
        assert_eq!(g.len(), 32);
    }

    #[test]
    fn quota_values() {
        assert_eq!(ring_quota(6, 37, 1), 6);
        assert_eq!(ring_quota(12, 31, 2), 12);
        assert_eq!(ring_quota(18, 19, 3), 6);
        assert_eq!(ring_quota(24, 13, 4), 3);
        assert_eq!(ring_quota(24, 0, 4), 0);
    }
}
