//! Sector records: one hex cell of the galaxy map.

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;

/// Stable sector identifier.
pub type SectorId = String;

/// Milliseconds since the Unix epoch. Always supplied by the caller.
pub type Timestamp = u64;

/// Broad classification shown on the sector card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorType {
    Unknown,
    Civilized,
    Frontier,
    Dangerous,
    Anomaly,
}

impl SectorType {
    pub const ALL: [SectorType; 5] = [
        SectorType::Unknown,
        SectorType::Civilized,
        SectorType::Frontier,
        SectorType::Dangerous,
        SectorType::Anomaly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectorType::Unknown => "unknown",
            SectorType::Civilized => "civilized",
            SectorType::Frontier => "frontier",
            SectorType::Dangerous => "dangerous",
            SectorType::Anomaly => "anomaly",
        }
    }
}

/// A sector on the galaxy map.
///
/// `discovered_at == None` means the player has not explored it yet and it
/// must be drawn as an unknown tile. `is_dangerous` is independent of
/// `sector_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub hex_q: i32,
    pub hex_r: i32,
    pub name: String,
    pub sector_type: SectorType,
    pub discovered_at: Option<Timestamp>,
    pub is_dangerous: bool,
    pub notes: String,
    pub linked_encounter_ids: Vec<String>,
    pub linked_mission_ids: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Sector {
    pub fn hex(&self) -> HexCoord {
        HexCoord::new(self.hex_q, self.hex_r)
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered_at.is_some()
    }

    /// Set `discovered_at` if unset. Returns whether anything changed.
    pub fn discover(&mut self, now: Timestamp) -> bool {
        if self.discovered_at.is_some() {
            return false;
        }
        self.discovered_at = Some(now);
        self.updated_at = now;
        true
    }
}

/// Fields for a sector that does not exist yet; id and timestamps are
/// assigned by the galaxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSector {
    pub hex: HexCoord,
    pub name: String,
    pub sector_type: SectorType,
    pub is_dangerous: bool,
    pub notes: String,
    pub discovered_at: Option<Timestamp>,
}

/// Partial update for an existing sector. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorPatch {
    pub hex: Option<HexCoord>,
    pub name: Option<String>,
    pub sector_type: Option<SectorType>,
    pub is_dangerous: Option<bool>,
    pub notes: Option<String>,
}

impl SectorPatch {
    pub fn is_empty(&self) -> bool {
        *self == SectorPatch::default()
    }
}
