//! Space Aces Core - campaign engine for the tabletop companion app
//!
//! Wraps the pure rules in `spaceaces-logic` into one stateful [`Campaign`]:
//! a generated hex galaxy, the dice and their roll history, a session
//! journal, and save files.
//!
//! # Example
//!
//! ```rust,no_run
//! use spaceaces_core::prelude::*;
//!
//! let mut campaign = Campaign::new(CampaignConfig::default()).unwrap();
//! campaign.initialize_galaxy(now_millis());
//!
//! let (_, outcome) = campaign.roll(
//!     DieType::D20,
//!     RollMode::Advantage,
//!     &[2],
//!     RollContext::default(),
//!     now_millis(),
//! );
//! println!("{}", outcome);
//! ```
//!
//! [`Campaign`]: engine::Campaign

pub mod engine;
pub mod journal;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{now_millis, Campaign};
    pub use crate::journal::{EntryKind, Journal, JournalEntry};
    pub use crate::persistence::{SaveError, SaveFormat};
    pub use spaceaces_logic::config::CampaignConfig;
    pub use spaceaces_logic::dice::{DieType, RollMode, RollOutcome};
    pub use spaceaces_logic::galaxy::{Galaxy, HOME_SECTOR_ID};
    pub use spaceaces_logic::hex::HexCoord;
    pub use spaceaces_logic::rolls::RollContext;
    pub use spaceaces_logic::sector::{Sector, SectorType};
}
