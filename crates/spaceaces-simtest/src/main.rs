//! Space Aces Headless Campaign Harness
//!
//! Validates hex geometry, the sector catalog, galaxy generation, dice and
//! save files in-process. No UI, no storage backend.
//!
//! Usage:
//!   cargo run -p spaceaces-simtest
//!   cargo run -p spaceaces-simtest -- --verbose
//!   cargo run -p spaceaces-simtest -- --seed 42 --json

use std::collections::HashSet;

use clap::Parser;
use serde::Serialize;
use spaceaces_core::engine::Campaign;
use spaceaces_core::persistence::SaveFormat;
use spaceaces_logic::catalog::{self, SECTOR_TEMPLATES};
use spaceaces_logic::config::{CampaignConfig, GalaxyConfig};
use spaceaces_logic::dice::{self, DiceEngine, DieType, RollMode};
use spaceaces_logic::galaxy::HOME_SECTOR_ID;
use spaceaces_logic::generation;
use spaceaces_logic::hex::{self, HexCoord};
use spaceaces_logic::rolls::RollContext;
use spaceaces_logic::sector::SectorType;

/// Seeds swept by the generation checks.
const GENERATION_SEEDS: u64 = 25;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
}

/// Headless checks for the Space Aces campaign logic
#[derive(Parser, Debug)]
#[command(name = "spaceaces-simtest", version, about, long_about = None)]
struct Options {
    /// Print every check, not just failures
    #[arg(short, long)]
    verbose: bool,

    /// Emit the summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// First seed for generation, dice and save checks
    #[arg(short, long, default_value_t = 1)]
    seed: u64,
}

fn main() {
    env_logger::init();
    let opts = Options::parse();
    if !opts.json {
        println!("=== Space Aces Campaign Harness (seed {}) ===\n", opts.seed);
    }

    let mut results = Vec::new();

    // 1. Hex geometry invariants
    results.extend(validate_hex_geometry(&opts));

    // 2. Sector catalog
    results.extend(validate_catalog(&opts));

    // 3. Galaxy generation sweep
    results.extend(validate_generation(&opts));

    // 4. Exploration
    results.extend(validate_exploration(&opts));

    // 5. Dice
    results.extend(validate_dice(&opts));

    // 6. Save files
    results.extend(validate_persistence(&opts));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if opts.json {
        let summary = Summary {
            seed: opts.seed,
            passed,
            failed,
            results: &results,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("Could not encode summary: {}", e),
        }
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn section(opts: &Options, title: &str) {
    if !opts.json {
        println!("--- {} ---", title);
    }
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

// ── 1. Hex Geometry ─────────────────────────────────────────────────────

fn validate_hex_geometry(opts: &Options) -> Vec<TestResult> {
    section(opts, "Hex Geometry");
    let mut results = Vec::new();
    let center = HexCoord::new(3, -5);

    // Ring sizes and distances
    let mut ring_ok = true;
    for radius in 1..=8 {
        let ring = hex::hex_ring(center, radius);
        let unique: HashSet<_> = ring.iter().collect();
        ring_ok &= ring.len() == 6 * radius as usize
            && unique.len() == ring.len()
            && ring.iter().all(|h| hex::hex_distance(center, *h) == radius);
    }
    results.push(check(
        "hex_ring_shape",
        ring_ok,
        "rings 1-8 have 6R distinct cells at distance R".into(),
    ));

    // Spiral equals filled disc
    let spiral = hex::hex_spiral(center, 6);
    let disc: HashSet<_> = hex::hexes_within_range(center, 6).into_iter().collect();
    let spiral_set: HashSet<_> = spiral.iter().copied().collect();
    results.push(check(
        "hex_spiral_fills_disc",
        spiral.len() == 127 && spiral_set == disc && spiral[0] == center,
        format!("{} cells, starts at center", spiral.len()),
    ));

    // Neighbors
    let neighbors_ok = hex::hex_neighbors(center)
        .iter()
        .all(|n| hex::hex_distance(center, *n) == 1);
    results.push(check(
        "hex_neighbors_adjacent",
        neighbors_ok,
        "all six neighbors at distance 1".into(),
    ));

    // Pixel projection round trip
    let bad_pixels: Vec<_> = spiral
        .iter()
        .filter(|h| hex::pixel_to_hex(hex::hex_to_pixel(**h, 40.0), 40.0) != **h)
        .collect();
    results.push(check(
        "hex_pixel_roundtrip",
        bad_pixels.is_empty(),
        format!("{} cells failed round trip", bad_pixels.len()),
    ));

    // Lines
    let mut line_ok = true;
    for target in hex::hex_ring(HexCoord::ORIGIN, 7) {
        let line = hex::hex_line(HexCoord::ORIGIN, target);
        line_ok &= line.len() == 8
            && line.first() == Some(&HexCoord::ORIGIN)
            && line.last() == Some(&target)
            && line.windows(2).all(|w| hex::hex_distance(w[0], w[1]) == 1);
    }
    results.push(check(
        "hex_line_contiguous",
        line_ok,
        "lines to ring 7 have N+1 contiguous cells".into(),
    ));

    // Keys
    let keys_ok = spiral
        .iter()
        .all(|h| hex::key_to_hex(&hex::hex_to_key(*h)).ok() == Some(*h));
    let bad_keys_rejected = ["", "12", "a,b", "1,"]
        .iter()
        .all(|k| hex::key_to_hex(k).is_err());
    results.push(check(
        "hex_key_roundtrip",
        keys_ok && bad_keys_rejected,
        format!("round trip ok={}, malformed rejected={}", keys_ok, bad_keys_rejected),
    ));

    results
}

// ── 2. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(opts: &Options) -> Vec<TestResult> {
    section(opts, "Sector Catalog");
    let mut results = Vec::new();

    let keys: HashSet<_> = SECTOR_TEMPLATES.iter().map(|t| t.key).collect();
    results.push(check(
        "catalog_unique_keys",
        keys.len() == SECTOR_TEMPLATES.len(),
        format!("{} cards, {} distinct keys", SECTOR_TEMPLATES.len(), keys.len()),
    ));

    let home = catalog::get_template(catalog::HOME_TEMPLATE);
    results.push(check(
        "catalog_home_card",
        home.is_some(),
        format!("home card '{}' present={}", catalog::HOME_TEMPLATE, home.is_some()),
    ));

    let unnamed: Vec<_> = SECTOR_TEMPLATES
        .iter()
        .filter(|t| t.name.trim().is_empty() || t.description.trim().is_empty())
        .map(|t| t.key)
        .collect();
    results.push(check(
        "catalog_named_and_described",
        unnamed.is_empty(),
        if unnamed.is_empty() {
            "every card has a name and description".into()
        } else {
            format!("missing text: {}", unnamed.join(", "))
        },
    ));

    if opts.verbose && !opts.json {
        println!("  Cards by type:");
        for t in SectorType::ALL {
            println!("    {:10}: {}", t.as_str(), catalog::templates_by_type(t).len());
        }
    }

    results
}

// ── 3. Galaxy Generation ────────────────────────────────────────────────

fn validate_generation(opts: &Options) -> Vec<TestResult> {
    section(opts, "Galaxy Generation");
    let mut results = Vec::new();
    let config = GalaxyConfig::default();

    let mut layout_failures = Vec::new();
    let mut overlap_failures = 0;
    let mut home_failures = 0;
    let mut ring_one_failures = 0;
    let mut discovered_total = 0;

    for seed in opts.seed..opts.seed + GENERATION_SEEDS {
        let mut campaign = match Campaign::new(CampaignConfig {
            seed: Some(seed),
            galaxy: config.clone(),
            ..Default::default()
        }) {
            Ok(c) => c,
            Err(e) => {
                results.push(check("generation_config", false, e.to_string()));
                return results;
            }
        };
        let stats = campaign.initialize_galaxy(0);
        let galaxy = &campaign.galaxy;

        if stats.placed_per_ring != [1, 6, 12, 6, 3] || stats.remaining_templates != 10 {
            layout_failures.push(seed);
        }

        let coords: HashSet<_> = galaxy.sectors.values().map(|s| s.hex()).collect();
        if coords.len() != galaxy.len()
            || galaxy
                .sectors
                .values()
                .any(|s| hex::hex_distance(HexCoord::ORIGIN, s.hex()) > config.max_ring as i32)
        {
            overlap_failures += 1;
        }

        match galaxy.get(HOME_SECTOR_ID) {
            Some(home)
                if home.hex() == HexCoord::ORIGIN
                    && home.is_discovered()
                    && home.sector_type == SectorType::Civilized
                    && galaxy.current_sector.as_deref() == Some(HOME_SECTOR_ID) => {}
            _ => home_failures += 1,
        }

        if galaxy
            .sectors
            .values()
            .filter(|s| hex::hex_distance(HexCoord::ORIGIN, s.hex()) == 1)
            .any(|s| !s.is_discovered())
        {
            ring_one_failures += 1;
        }

        discovered_total += stats.discovered;
    }

    results.push(check(
        "generation_ring_counts",
        layout_failures.is_empty(),
        if layout_failures.is_empty() {
            format!("{} seeds placed 1/6/12/6/3 with 10 cards left", GENERATION_SEEDS)
        } else {
            format!("unexpected layout for seeds {:?}", layout_failures)
        },
    ));
    results.push(check(
        "generation_no_overlap",
        overlap_failures == 0,
        format!("{} galaxies with shared or out-of-range cells", overlap_failures),
    ));
    results.push(check(
        "generation_home_sector",
        home_failures == 0,
        format!("{} galaxies with a bad home sector", home_failures),
    ));
    results.push(check(
        "generation_ring_one_visible",
        ring_one_failures == 0,
        format!("{} galaxies with hidden ring-1 sectors", ring_one_failures),
    ));

    // 7 always visible, 21 more at 30% each
    let mean = discovered_total as f64 / GENERATION_SEEDS as f64;
    results.push(check(
        "generation_discovery_rate",
        (9.0..=18.0).contains(&mean),
        format!("mean {:.1} discovered sectors at start", mean),
    ));

    // Small catalog: generation stops when the pool runs dry
    let few = &SECTOR_TEMPLATES[..5];
    let mut rng = DiceEngine::seeded(opts.seed);
    let (small, small_stats) =
        generation::generate_galaxy_from(few, &config, rng.source_mut(), 0);
    results.push(check(
        "generation_small_pool",
        small.len() == 5 && small_stats.remaining_templates == 0,
        format!("{} sectors from 5 cards", small.len()),
    ));

    results
}

// ── 4. Exploration ──────────────────────────────────────────────────────

fn validate_exploration(opts: &Options) -> Vec<TestResult> {
    section(opts, "Exploration");
    let mut results = Vec::new();

    let config = CampaignConfig {
        seed: Some(opts.seed),
        ..Default::default()
    };
    let mut campaign = match Campaign::new(config) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("exploration_config", false, e.to_string()));
            return results;
        }
    };
    campaign.initialize_galaxy(0);

    let mut steps = 0u64;
    let mut frontier_ok = true;
    loop {
        let Some(next) = campaign
            .galaxy
            .discoverable_sectors()
            .first()
            .map(|s| s.id.clone())
        else {
            break;
        };
        steps += 1;
        let revealed = campaign.travel_to(&next, steps);
        frontier_ok &= revealed.contains(&next);
        if steps > 100 {
            frontier_ok = false;
            break;
        }
    }

    // Sectors never reachable through the frontier (isolated outer cards)
    let hidden = campaign
        .galaxy
        .sectors
        .values()
        .filter(|s| !s.is_discovered())
        .count();
    let isolated_ok = campaign
        .galaxy
        .sectors
        .values()
        .filter(|s| !s.is_discovered())
        .all(|s| !hex::is_discoverable(s.hex(), &campaign.galaxy.discovered_coords()));

    results.push(check(
        "exploration_frontier",
        frontier_ok && isolated_ok,
        format!("{} moves, {} sectors unreachable", steps, hidden),
    ));
    results.push(check(
        "exploration_journal",
        campaign.journal.len() as u64 == steps,
        format!("{} travel entries for {} moves", campaign.journal.len(), steps),
    ));

    let home_kept = campaign.delete_sector(HOME_SECTOR_ID).is_none();
    results.push(check(
        "exploration_home_protected",
        home_kept && campaign.galaxy.get(HOME_SECTOR_ID).is_some(),
        "home sector survives delete".into(),
    ));

    results
}

// ── 5. Dice ─────────────────────────────────────────────────────────────

fn validate_dice(opts: &Options) -> Vec<TestResult> {
    section(opts, "Dice");
    let mut results = Vec::new();
    let mut engine = DiceEngine::seeded(opts.seed);

    // Face ranges
    let mut range_ok = true;
    for die in [DieType::D20, DieType::D6] {
        for _ in 0..2_000 {
            let roll = engine.roll_die(die);
            range_ok &= (1..=die.sides()).contains(&roll);
        }
    }
    results.push(check(
        "dice_face_range",
        range_ok,
        "d20 and d6 stay within [1, sides]".into(),
    ));

    // Advantage picks max, disadvantage picks min
    let mut mode_ok = true;
    for _ in 0..1_000 {
        let adv = engine.roll_with_mode(DieType::D20, RollMode::Advantage);
        let dis = engine.roll_with_mode(DieType::D20, RollMode::Disadvantage);
        mode_ok &= adv.rolls.len() == 2
            && adv.result == *adv.rolls.iter().max().unwrap_or(&0)
            && dis.rolls.len() == 2
            && dis.result == *dis.rolls.iter().min().unwrap_or(&0);
    }
    results.push(check(
        "dice_mode_selection",
        mode_ok,
        "advantage keeps max, disadvantage keeps min".into(),
    ));

    // Uniformity
    let report = engine.randomness_report(20_000);
    results.push(check(
        "dice_uniformity",
        report.chi_square < 45.0 && (10.0..=11.0).contains(&report.average),
        format!("chi²={:.1} avg={:.2}", report.chi_square, report.average),
    ));

    // Probability ordering
    let mut prob_ok = true;
    for target in 1..=21 {
        let normal = dice::success_probability(target, DieType::D20, RollMode::Normal, &[]);
        let adv = dice::success_probability(target, DieType::D20, RollMode::Advantage, &[]);
        let dis = dice::success_probability(target, DieType::D20, RollMode::Disadvantage, &[]);
        prob_ok &= adv >= normal && normal >= dis && (0.0..=1.0).contains(&adv);
    }
    results.push(check(
        "dice_probability_order",
        prob_ok,
        "advantage ≥ normal ≥ disadvantage for every DC".into(),
    ));
    if opts.verbose && !opts.json {
        println!("  d20 success odds (normal / advantage / disadvantage):");
        for target in [5, 10, 15, 20] {
            println!(
                "    DC {:2}: {:.3} / {:.3} / {:.3}",
                target,
                dice::success_probability(target, DieType::D20, RollMode::Normal, &[]),
                dice::success_probability(target, DieType::D20, RollMode::Advantage, &[]),
                dice::success_probability(target, DieType::D20, RollMode::Disadvantage, &[]),
            );
        }
    }

    // Parameter validation
    let good = dice::validate_roll_params("d20", "advantage", &serde_json::json!([1, -2, 3.0]));
    let bad = [
        dice::validate_roll_params("d12", "normal", &serde_json::json!([])),
        dice::validate_roll_params("d20", "lucky", &serde_json::json!([])),
        dice::validate_roll_params("d20", "normal", &serde_json::json!("2")),
        dice::validate_roll_params("d20", "normal", &serde_json::json!([1.5])),
    ];
    results.push(check(
        "dice_param_validation",
        good.as_ref().map(|r| r.modifiers == [1, -2, 3]).unwrap_or(false)
            && bad.iter().all(|b| b.is_err()),
        format!(
            "valid request ok={}, {} malformed rejected",
            good.is_ok(),
            bad.iter().filter(|b| b.is_err()).count()
        ),
    ));

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(opts: &Options) -> Vec<TestResult> {
    section(opts, "Save Files");
    let mut results = Vec::new();

    let config = CampaignConfig {
        seed: Some(opts.seed),
        ..Default::default()
    };
    let mut campaign = match Campaign::new(config) {
        Ok(c) => c,
        Err(e) => {
            results.push(check("persistence_config", false, e.to_string()));
            return results;
        }
    };
    campaign.initialize_galaxy(0);
    for t in 0..10 {
        campaign.roll(DieType::D20, RollMode::Normal, &[1], RollContext::default(), t);
    }

    for format in [SaveFormat::Binary, SaveFormat::Json] {
        let name = match format {
            SaveFormat::Binary => "persistence_binary_roundtrip",
            SaveFormat::Json => "persistence_json_roundtrip",
        };
        let mut buf = Vec::new();
        let outcome = campaign.save(&mut buf, format).and_then(|_| {
            let mut restored = Campaign::new(CampaignConfig::default())?;
            restored.load(&buf[..], format)?;
            Ok(restored)
        });
        match outcome {
            Ok(restored) => results.push(check(
                name,
                restored.galaxy == campaign.galaxy
                    && restored.rolls == campaign.rolls
                    && restored.journal == campaign.journal,
                format!("{} bytes", buf.len()),
            )),
            Err(e) => results.push(check(name, false, e.to_string())),
        }
    }

    results
}
