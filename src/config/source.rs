use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::host::{RegionId, Tile};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};

use super::RegionConfig;

/// Lookup of the behaviour record attached to a tile. `None` means the tile
/// has no interactive behaviour and should not be tracked.
pub trait ConfigSource {
    fn region_config(&self, tile: &Tile) -> Option<RegionConfig>;
}

impl<F> ConfigSource for F
where
    F: Fn(&Tile) -> Option<RegionConfig>,
{
    fn region_config(&self, tile: &Tile) -> Option<RegionConfig> {
        self(tile)
    }
}

/// In-memory records keyed by tile id.
#[derive(Debug, Clone, Default)]
pub struct MapConfigSource {
    records: HashMap<RegionId, RegionConfig>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<RegionId>, config: RegionConfig) -> Self {
        self.insert(id, config);
        self
    }

    pub fn insert(&mut self, id: impl Into<RegionId>, config: RegionConfig) -> Option<RegionConfig> {
        self.records.insert(id.into(), config)
    }

    pub fn remove(&mut self, id: &str) -> Option<RegionConfig> {
        self.records.remove(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ConfigSource for MapConfigSource {
    fn region_config(&self, tile: &Tile) -> Option<RegionConfig> {
        self.records.get(&tile.id).cloned()
    }
}

/// Records loaded from a JSON object of `{ "<tile id>": <record>, .. }`.
///
/// A malformed record is skipped with a warning so one bad tile does not
/// disable the rest of the scene. Only a document that is not a JSON object
/// at all fails the load.
#[derive(Debug, Clone, Default)]
pub struct JsonConfigSource {
    records: MapConfigSource,
    skipped: Vec<RegionId>,
}

impl JsonConfigSource {
    pub fn from_json(input: &str, logger: Option<&Logger>) -> Result<Self> {
        let document: Map<String, Value> = serde_json::from_str(input)?;
        Ok(Self::from_document(document, logger))
    }

    pub fn from_reader(reader: impl Read, logger: Option<&Logger>) -> Result<Self> {
        let document: Map<String, Value> = serde_json::from_reader(reader)?;
        Ok(Self::from_document(document, logger))
    }

    pub fn from_path(path: impl AsRef<Path>, logger: Option<&Logger>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), logger)
    }

    fn from_document(document: Map<String, Value>, logger: Option<&Logger>) -> Self {
        let mut source = Self::default();
        for (id, value) in document {
            match RegionConfig::from_value(value) {
                Ok(config) => {
                    source.records.insert(id, config);
                }
                Err(err) => {
                    if let Some(logger) = logger {
                        let event = event_with_fields(
                            LogLevel::Warn,
                            "tiles::config",
                            "record_skipped",
                            [json_kv("region", id.as_str()), json_kv("error", err.to_string())],
                        );
                        let _ = logger.log_event(event);
                    }
                    source.skipped.push(id);
                }
            }
        }
        source
    }

    /// Ids whose records failed to parse.
    pub fn skipped(&self) -> &[RegionId] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ConfigSource for JsonConfigSource {
    fn region_config(&self, tile: &Tile) -> Option<RegionConfig> {
        self.records.region_config(tile)
    }
}
