//! Pure campaign logic for Space Aces.
//!
//! This crate contains the game rules that are independent of any UI,
//! storage, or runtime. Functions take plain data (and, where needed, an
//! injected random source) and return results, so everything here is
//! unit-testable and deterministic under a fixed seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Static table of named sector cards |
//! | [`config`] | Galaxy / roll-history / campaign settings |
//! | [`dice`] | Random source selection, d20/d6 rolls, advantage, odds |
//! | [`galaxy`] | Sector store: creation, discovery, movement, swaps |
//! | [`generation`] | Ring-based procedural galaxy layout |
//! | [`hex`] | Axial hex geometry: projection, rounding, rings, lines |
//! | [`rolls`] | Capped most-recent-first roll history |
//! | [`sector`] | Sector records, types, patches |

pub mod catalog;
pub mod config;
pub mod dice;
pub mod galaxy;
pub mod generation;
pub mod hex;
pub mod rolls;
pub mod sector;
