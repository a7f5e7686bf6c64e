//! Save/Load functionality for persisting campaign state
//!
//! Two encodings of the same snapshot: bincode for compact binary saves and
//! JSON for the plain structured form the app keeps on device. Both carry a
//! format version that must match on load.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use spaceaces_logic::config::{CampaignConfig, ConfigError};
use spaceaces_logic::galaxy::Galaxy;
use spaceaces_logic::rolls::RollLog;
use thiserror::Error;

use crate::journal::Journal;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Encoding used for a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Binary,
    Json,
}

/// Serializable snapshot of a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: CampaignConfig,
    pub galaxy: Galaxy,
    pub rolls: RollLog,
    pub journal: Journal,
    pub session_id: Option<String>,
}

impl SaveData {
    pub fn new(
        config: CampaignConfig,
        galaxy: Galaxy,
        rolls: RollLog,
        journal: Journal,
        session_id: Option<String>,
    ) -> Self {
        Self {
            version: SAVE_VERSION,
            config,
            galaxy,
            rolls,
            journal,
            session_id,
        }
    }
}

/// Write a snapshot.
pub fn save_campaign<W: Write>(
    writer: W,
    data: &SaveData,
    format: SaveFormat,
) -> Result<(), SaveError> {
    match format {
        SaveFormat::Binary => bincode::serialize_into(writer, data)?,
        SaveFormat::Json => serde_json::to_writer_pretty(writer, data)?,
    }
    Ok(())
}

/// Read a snapshot, rejecting other format versions and invalid configs.
pub fn load_campaign<R: Read>(reader: R, format: SaveFormat) -> Result<SaveData, SaveError> {
    let data: SaveData = match format {
        SaveFormat::Binary => bincode::deserialize_from(reader)?,
        SaveFormat::Json => serde_json::from_reader(reader)?,
    };

    if data.version != SAVE_VERSION {
        log::warn!(
            "Rejecting save with version {} (expected {})",
            data.version,
            SAVE_VERSION
        );
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    data.config.validate()?;

    Ok(data)
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Invalid saved config: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Campaign;
    use spaceaces_logic::dice::{DieType, RollMode};
    use spaceaces_logic::rolls::RollContext;

    fn played_campaign() -> Campaign {
        let config = CampaignConfig {
            seed: Some(99),
            ..Default::default()
        };
        let mut campaign = Campaign::new(config).expect("valid config");
        campaign.initialize_galaxy(1_000);
        let next = campaign
            .galaxy
            .sectors
            .keys()
            .find(|id| id.as_str() != "home-sector")
            .cloned()
            .unwrap();
        campaign.travel_to(&next, 2_000);
        campaign.roll(DieType::D20, RollMode::Advantage, &[2], RollContext::default(), 2_500);
        campaign
    }

    #[test]
    fn test_save_load_roundtrip_binary() {
        let campaign = played_campaign();

        let mut save_buffer = Vec::new();
        campaign.save(&mut save_buffer, SaveFormat::Binary).expect("Save failed");

        let mut loaded = Campaign::new(CampaignConfig::default()).unwrap();
        loaded.load(&save_buffer[..], SaveFormat::Binary).expect("Load failed");

        assert_eq!(loaded.galaxy, campaign.galaxy);
        assert_eq!(loaded.rolls, campaign.rolls);
        assert_eq!(loaded.journal, campaign.journal);
        assert_eq!(loaded.config(), campaign.config());
    }

    #[test]
    fn test_save_load_roundtrip_json() {
        let campaign = played_campaign();

        let mut save_buffer = Vec::new();
        campaign.save(&mut save_buffer, SaveFormat::Json).expect("Save failed");
        let text = String::from_utf8(save_buffer.clone()).unwrap();
        assert!(text.contains("\"home-sector\""));
        assert!(text.contains("\"advantage\""));

        let data = load_campaign(&save_buffer[..], SaveFormat::Json).expect("Load failed");
        assert_eq!(data.galaxy, campaign.galaxy);
        assert_eq!(data.rolls, campaign.rolls);
    }

    #[test]
    fn test_version_mismatch() {
        let mut data = SaveData::new(
            CampaignConfig::default(),
            Galaxy::new(),
            RollLog::default(),
            Journal::new(),
            None,
        );
        data.version = SAVE_VERSION + 1;
        let mut buf = Vec::new();
        save_campaign(&mut buf, &data, SaveFormat::Binary).unwrap();

        match load_campaign(&buf[..], SaveFormat::Binary) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_binary_is_an_error() {
        let campaign = played_campaign();
        let mut buf = Vec::new();
        campaign.save(&mut buf, SaveFormat::Binary).unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(
            load_campaign(&buf[..], SaveFormat::Binary),
            Err(SaveError::Bincode(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            load_campaign(&b"{ \"version\": 1"[..], SaveFormat::Json),
            Err(SaveError::Json(_))
        ));
    }
}
