//! Dice rolling and success odds.
//!
//! # Randomness
//!
//! A [`DiceEngine`] owns one [`RandomSource`], chosen when the engine is
//! built. [`RandomSource::detect`] prefers the operating system CSPRNG and
//! falls back to a clock-seeded pseudorandom generator, logging a warning.
//! The active source is reported by [`DiceEngine::randomness_source`] for
//! display; nothing branches on it.
//!
//! ```
//! use spaceaces_logic::dice::{DiceEngine, DieType, RollMode};
//!
//! let mut dice = DiceEngine::seeded(7);
//! let roll = dice.perform_roll(DieType::D20, RollMode::Advantage, &[2]);
//! assert_eq!(roll.all_rolls.len(), 2);
//! assert_eq!(roll.final_result, roll.base_result + 2);
//! ```
//!
//! # Odds
//!
//! [`success_probability`] is the chance of meeting or beating a target on
//! one resolution of the die, after modifiers:
//!
//! * normal: `p = (sides - effective + 1) / sides`
//! * advantage: `1 - (1 - p)²`
//! * disadvantage: `p²`

use std::fmt;
use std::str::FromStr;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieType {
    D20,
    D6,
}

impl DieType {
    pub const ALL: [DieType; 2] = [DieType::D20, DieType::D6];

    pub const fn sides(self) -> i32 {
        match self {
            DieType::D20 => 20,
            DieType::D6 => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DieType::D20 => "d20",
            DieType::D6 => "d6",
        }
    }

    pub fn stats(self) -> DieStats {
        let sides = self.sides();
        DieStats {
            sides,
            min: 1,
            max: sides,
            average: (sides + 1) as f64 / 2.0,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DieType {
    type Err = RollParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d20" => Ok(DieType::D20),
            "d6" => Ok(DieType::D6),
            _ => Err(RollParamError::InvalidDieType(s.to_string())),
        }
    }
}

/// How many dice are thrown and which one counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    pub const ALL: [RollMode; 3] = [RollMode::Normal, RollMode::Advantage, RollMode::Disadvantage];

    pub fn as_str(self) -> &'static str {
        match self {
            RollMode::Normal => "normal",
            RollMode::Advantage => "advantage",
            RollMode::Disadvantage => "disadvantage",
        }
    }
}

impl fmt::Display for RollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollMode {
    type Err = RollParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(RollMode::Normal),
            "advantage" => Ok(RollMode::Advantage),
            "disadvantage" => Ok(RollMode::Disadvantage),
            _ => Err(RollParamError::InvalidMode(s.to_string())),
        }
    }
}

/// Static facts about a die.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DieStats {
    pub sides: i32,
    pub min: i32,
    pub max: i32,
    pub average: f64,
}

// ── Random source ───────────────────────────────────────────────────────

/// Which kind of generator backs a [`RandomSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RandomSourceKind {
    /// Operating system CSPRNG.
    Secure,
    /// Clock-seeded fallback.
    Pseudorandom,
    /// Explicit seed, reproducible.
    Seeded,
}

/// The generator a dice engine draws from.
#[derive(Debug, Clone)]
pub enum RandomSource {
    Secure(OsRng),
    Pseudo(StdRng),
    Seeded(StdRng),
}

impl RandomSource {
    /// Use the OS CSPRNG if it answers, otherwise a clock-seeded generator.
    pub fn detect() -> Self {
        let mut probe = [0u8; 8];
        match OsRng.try_fill_bytes(&mut probe) {
            Ok(()) => RandomSource::Secure(OsRng),
            Err(e) => {
                log::warn!("OS random source unavailable ({e}), falling back to pseudorandom");
                RandomSource::Pseudo(StdRng::seed_from_u64(clock_seed()))
            }
        }
    }

    /// Reproducible source for tests and tooling.
    pub fn seeded(seed: u64) -> Self {
        RandomSource::Seeded(StdRng::seed_from_u64(seed))
    }

    pub fn kind(&self) -> RandomSourceKind {
        match self {
            RandomSource::Secure(_) => RandomSourceKind::Secure,
            RandomSource::Pseudo(_) => RandomSourceKind::Pseudorandom,
            RandomSource::Seeded(_) => RandomSourceKind::Seeded,
        }
    }

    /// Human-readable description of the source.
    pub fn describe(&self) -> &'static str {
        match self.kind() {
            RandomSourceKind::Secure => "Cryptographically secure random (operating system)",
            RandomSourceKind::Pseudorandom => {
                "Pseudorandom (clock-seeded) - not cryptographically secure"
            }
            RandomSourceKind::Seeded => "Seeded pseudorandom - reproducible, not secure",
        }
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed_d1ce)
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        match self {
            RandomSource::Secure(rng) => rng.next_u32(),
            RandomSource::Pseudo(rng) | RandomSource::Seeded(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            RandomSource::Secure(rng) => rng.next_u64(),
            RandomSource::Pseudo(rng) | RandomSource::Seeded(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            RandomSource::Secure(rng) => rng.fill_bytes(dest),
            RandomSource::Pseudo(rng) | RandomSource::Seeded(rng) => rng.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        match self {
            RandomSource::Secure(rng) => rng.try_fill_bytes(dest),
            RandomSource::Pseudo(rng) | RandomSource::Seeded(rng) => rng.try_fill_bytes(dest),
        }
    }
}

// ── Results ─────────────────────────────────────────────────────────────

/// Outcome of one mode resolution, before modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRoll {
    pub result: i32,
    /// Every die thrown, in throw order.
    pub rolls: Vec<i32>,
}

/// A fully resolved roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub die_type: DieType,
    pub mode: RollMode,
    pub base_result: i32,
    pub all_rolls: Vec<i32>,
    pub modifiers: Vec<i32>,
    pub final_result: i32,
}

impl RollOutcome {
    pub fn modifier_total(&self) -> i32 {
        saturate(modifier_sum(&self.modifiers))
    }

    /// One-line summary, e.g. `d20: 14 (advantage) +2 = 16`. With
    /// `details`, dual rolls are listed as well.
    pub fn summary(&self, details: bool) -> String {
        let mut out = format!("{}: {}", self.die_type, self.base_result);
        if self.mode != RollMode::Normal {
            out.push_str(&format!(" ({})", self.mode));
            if details && self.all_rolls.len() > 1 {
                let rolled: Vec<String> = self.all_rolls.iter().map(i32::to_string).collect();
                out.push_str(&format!(" [rolled: {}]", rolled.join(", ")));
            }
        }
        if !self.modifiers.is_empty() {
            let total = self.modifier_total();
            let sign = if total >= 0 { "+" } else { "" };
            out.push_str(&format!(" {}{} = {}", sign, total, self.final_result));
        }
        out
    }
}

impl fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary(true))
    }
}

/// Distribution check over many d20 throws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomnessReport {
    pub samples: usize,
    pub average: f64,
    /// Count per face, index 0 = face 1.
    pub distribution: Vec<usize>,
    /// Pearson statistic against a uniform distribution (19 degrees of freedom).
    pub chi_square: f64,
}

// ── Engine ──────────────────────────────────────────────────────────────

/// Rolls dice from an owned random source.
#[derive(Debug, Clone)]
pub struct DiceEngine {
    source: RandomSource,
}

impl DiceEngine {
    pub fn new(source: RandomSource) -> Self {
        log::debug!("Dice engine using {}", source.describe());
        Self { source }
    }

    pub fn detect() -> Self {
        Self::new(RandomSource::detect())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomSource::seeded(seed))
    }

    pub fn randomness_source(&self) -> RandomSourceKind {
        self.source.kind()
    }

    pub fn describe_source(&self) -> &'static str {
        self.source.describe()
    }

    /// The underlying generator, for other draws that should share the
    /// dice's seed (galaxy layout, card picks).
    pub fn source_mut(&mut self) -> &mut RandomSource {
        &mut self.source
    }

    /// Uniform integer in `[1, sides]`.
    pub fn roll_die(&mut self, die: DieType) -> i32 {
        self.source.gen_range(1..=die.sides())
    }

    /// Throw one die (normal) or two (advantage/disadvantage) and pick the
    /// counting value. Dual throws keep their original order.
    pub fn roll_with_mode(&mut self, die: DieType, mode: RollMode) -> ModeRoll {
        match mode {
            RollMode::Normal => {
                let roll = self.roll_die(die);
                ModeRoll {
                    result: roll,
                    rolls: vec![roll],
                }
            }
            RollMode::Advantage | RollMode::Disadvantage => {
                let first = self.roll_die(die);
                let second = self.roll_die(die);
                let result = if mode == RollMode::Advantage {
                    first.max(second)
                } else {
                    first.min(second)
                };
                ModeRoll {
                    result,
                    rolls: vec![first, second],
                }
            }
        }
    }

    pub fn perform_roll(&mut self, die: DieType, mode: RollMode, modifiers: &[i32]) -> RollOutcome {
        let ModeRoll { result, rolls } = self.roll_with_mode(die, mode);
        RollOutcome {
            die_type: die,
            mode,
            base_result: result,
            all_rolls: rolls,
            modifiers: modifiers.to_vec(),
            final_result: apply_modifiers(result, modifiers),
        }
    }

    /// Throw `samples` d20s and measure how uniform they look.
    pub fn randomness_report(&mut self, samples: usize) -> RandomnessReport {
        let mut distribution = vec![0usize; 20];
        let mut total: i64 = 0;
        for _ in 0..samples {
            let roll = self.roll_die(DieType::D20);
            distribution[(roll - 1) as usize] += 1;
            total += roll as i64;
        }
        let (average, chi_square) = if samples == 0 {
            (0.0, 0.0)
        } else {
            let expected = samples as f64 / 20.0;
            let chi = distribution
                .iter()
                .map(|&observed| {
                    let diff = observed as f64 - expected;
                    diff * diff / expected
                })
                .sum();
            (total as f64 / samples as f64, chi)
        };
        RandomnessReport {
            samples,
            average,
            distribution,
            chi_square,
        }
    }
}

impl Default for DiceEngine {
    fn default() -> Self {
        Self::detect()
    }
}

// ── Pure arithmetic ─────────────────────────────────────────────────────

/// `base + Σ modifiers`. Only clamped at the `i32` limits.
pub fn apply_modifiers(base: i32, modifiers: &[i32]) -> i32 {
    saturate(base as i64 + modifier_sum(modifiers))
}

fn modifier_sum(modifiers: &[i32]) -> i64 {
    modifiers.iter().map(|&m| m as i64).sum()
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Chance that a roll, after modifiers, meets or beats `target`.
pub fn success_probability(target: i32, die: DieType, mode: RollMode, modifiers: &[i32]) -> f64 {
    let sides = die.sides() as i64;
    let effective = target as i64 - modifier_sum(modifiers);

    if effective <= 1 {
        return 1.0;
    }
    if effective > sides {
        return 0.0;
    }

    let p = (sides - effective + 1) as f64 / sides as f64;
    match mode {
        RollMode::Normal => p,
        RollMode::Advantage => 1.0 - (1.0 - p) * (1.0 - p),
        RollMode::Disadvantage => p * p,
    }
}

// ── Validation ──────────────────────────────────────────────────────────

/// Roll parameters that passed [`validate_roll_params`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    pub die_type: DieType,
    pub mode: RollMode,
    pub modifiers: Vec<i32>,
}

/// Which roll parameter failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollParamError {
    #[error("Invalid die type: {0:?}")]
    InvalidDieType(String),
    #[error("Invalid roll mode: {0:?}")]
    InvalidMode(String),
    #[error("Modifiers must be an array")]
    ModifiersNotArray,
    #[error("All modifiers must be integers (modifier {index} is not)")]
    NonIntegerModifier { index: usize },
}

/// Check untyped roll parameters, as they arrive from stored or user data,
/// without rolling anything. Integral floats such as `2.0` are accepted.
pub fn validate_roll_params(
    die: &str,
    mode: &str,
    modifiers: &serde_json::Value,
) -> Result<RollRequest, RollParamError> {
    let die_type = die.parse::<DieType>()?;
    let mode = mode.parse::<RollMode>()?;
    let list = modifiers.as_array().ok_or(RollParamError::ModifiersNotArray)?;

    let modifiers = list
        .iter()
        .enumerate()
        .map(|(index, value)| integer_modifier(value).ok_or(RollParamError::NonIntegerModifier { index }))
        .collect::<Result<Vec<i32>, _>>()?;

    Ok(RollRequest {
        die_type,
        mode,
        modifiers,
    })
}

fn integer_modifier(value: &serde_json::Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}
