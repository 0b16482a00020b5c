use crate::error::StorageError;
use crate::stage::StageDescriptor;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

const DEMO_CAMPAIGN: &str = include_str!("../stages/demo.json");

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub stages: Vec<StageDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StageFile {
    Campaign(Campaign),
    Single(StageDescriptor),
}

/// Parses either a campaign or a single stage.
pub fn parse_campaign(text: &str) -> Result<Campaign, StorageError> {
    Ok(match serde_json::from_str::<StageFile>(text)? {
        StageFile::Campaign(c) => c,
        StageFile::Single(s) => Campaign { stages: vec![s] },
    })
}

pub fn load_campaign(path: &Path) -> Result<Campaign, StorageError> {
    let text = fs::read_to_string(path)?;
    parse_campaign(&text)
}

/// Writes `data` next to `path` and renames it into place, so readers see
/// either the old file or the new one.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    if path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path)
}

pub fn save_campaign_atomic(path: &Path, campaign: &Campaign) -> Result<(), StorageError> {
    let data = serde_json::to_vec_pretty(campaign)?;
    write_atomic(path, &data)?;
    Ok(())
}

pub fn demo_campaign() -> Result<Campaign, StorageError> {
    parse_campaign(DEMO_CAMPAIGN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn demo_campaign_fits_default_grid() {
        let campaign = demo_campaign().unwrap();
        assert!(campaign.stages.len() >= 3);
        let grid = Grid::new(50, 50, 1.0).unwrap();
        for stage in &campaign.stages {
            stage.validate(&grid).unwrap();
        }
    }

    #[test]
    fn single_stage_file_becomes_campaign() {
        let text = r#"{
            "name": "solo",
            "rule": "seeds",
            "player_start": {"x": 0, "y": 0},
            "goal": {"x": 3, "y": 3}
        }"#;
        let campaign = parse_campaign(text).unwrap();
        assert_eq!(campaign.stages.len(), 1);
        assert_eq!(campaign.stages[0].name, "solo");
        assert!(campaign.stages[0].clusters.is_empty());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("lifekernel-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("campaign.json");

        let campaign = demo_campaign().unwrap();
        save_campaign_atomic(&path, &campaign).unwrap();
        save_campaign_atomic(&path, &campaign).unwrap();
        assert_eq!(load_campaign(&path).unwrap(), campaign);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp_file() {
        let dir = std::env::temp_dir().join(format!("lifekernel-atomic-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!path.with_extension("json.tmp").exists());

        let missing = dir.join("no-such-dir").join("x.json");
        assert!(write_atomic(&missing, b"x").is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn garbage_is_a_format_error() {
        assert!(matches!(parse_campaign("{\"stages\": 3}"), Err(StorageError::Json(_))));
    }
}
