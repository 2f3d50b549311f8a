use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

fn default_passthrough() -> bool {
    true
}

/// Image and propagation behaviour attached to one named state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinition {
    #[serde(rename = "img", alias = "imageRef")]
    pub image_ref: String,
    #[serde(default = "default_passthrough")]
    pub passthrough: bool,
}

impl StateDefinition {
    pub fn new(image_ref: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
            passthrough: true,
        }
    }

    pub fn with_passthrough(mut self, passthrough: bool) -> Self {
        self.passthrough = passthrough;
        self
    }
}

/// A configurable transition slot. `Absent` means the transition changes
/// nothing and always lets the event through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateSlot {
    #[default]
    Absent,
    Present(StateDefinition),
}

impl StateSlot {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn definition(&self) -> Option<&StateDefinition> {
        match self {
            Self::Present(def) => Some(def),
            Self::Absent => None,
        }
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.definition().map(|def| def.image_ref.as_str())
    }

    pub fn passthrough(&self) -> bool {
        self.definition().map(|def| def.passthrough).unwrap_or(true)
    }
}

impl From<Option<StateDefinition>> for StateSlot {
    fn from(value: Option<StateDefinition>) -> Self {
        value.map(Self::Present).unwrap_or_default()
    }
}

impl From<StateDefinition> for StateSlot {
    fn from(value: StateDefinition) -> Self {
        Self::Present(value)
    }
}

/// Names of the visual states a region can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateName {
    Default,
    Hover,
    Pressed,
    Released,
}

impl StateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Hover => "hover",
            Self::Pressed => "pressed",
            Self::Released => "released",
        }
    }
}

/// Behaviour record attached to a tile by the host.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct RegionConfig {
    /// Schema version stamped on the persisted record, if any.
    pub flag_version: Option<f64>,
    pub hover: StateSlot,
    pub pressed: StateSlot,
    pub released: StateSlot,
}

impl RegionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hover(mut self, def: StateDefinition) -> Self {
        self.hover = def.into();
        self
    }

    pub fn with_pressed(mut self, def: StateDefinition) -> Self {
        self.pressed = def.into();
        self
    }

    pub fn with_released(mut self, def: StateDefinition) -> Self {
        self.released = def.into();
        self
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self::try_from(value)?)
    }

    /// Slot for a configurable state. `Default` is synthesized from the tile
    /// and never configured, so it is always `Absent` here.
    pub fn slot(&self, name: StateName) -> &StateSlot {
        const ABSENT: &StateSlot = &StateSlot::Absent;
        match name {
            StateName::Hover => &self.hover,
            StateName::Pressed => &self.pressed,
            StateName::Released => &self.released,
            StateName::Default => ABSENT,
        }
    }

    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        [&self.hover, &self.pressed, &self.released]
            .into_iter()
            .filter_map(StateSlot::image_ref)
    }
}

// Persisted records come either bare (`{"states": ..}`) or wrapped in the
// versioned envelope (`{"flagVersion": 1.0, "data": {"states": ..}}`). The
// shape is chosen by the presence of `data`, so a broken envelope is an
// error rather than an empty bare record.
impl TryFrom<Value> for RegionConfig {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        let is_envelope = value.as_object().is_some_and(|map| map.contains_key("data"));
        let (flag_version, body) = if is_envelope {
            let EnvelopeRepr { flag_version, data } = serde_json::from_value(value)?;
            (flag_version, data)
        } else {
            (None, serde_json::from_value::<BodyRepr>(value)?)
        };
        let StatesRepr {
            hover,
            pressed,
            released,
        } = body.states;
        Ok(Self {
            flag_version,
            hover: hover.into(),
            pressed: pressed.into(),
            released: released.into(),
        })
    }
}

#[derive(Deserialize)]
struct EnvelopeRepr {
    #[serde(rename = "flagVersion", default)]
    flag_version: Option<f64>,
    data: BodyRepr,
}

#[derive(Deserialize, Default)]
struct BodyRepr {
    #[serde(default)]
    states: StatesRepr,
}

#[derive(Deserialize, Default)]
struct StatesRepr {
    #[serde(default)]
    hover: Option<StateDefinition>,
    #[serde(default)]
    pressed: Option<StateDefinition>,
    #[serde(default)]
    released: Option<StateDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TileError;

    #[test]
    fn bare_record_parses_states() {
        let config = RegionConfig::from_json(
            r#"{"states": {"hover": {"img": "h.png", "passthrough": false}, "pressed": {"img": "p.png"}}}"#,
        )
        .unwrap();

        assert_eq!(
            config.hover,
            StateSlot::Present(StateDefinition::new("h.png").with_passthrough(false))
        );
        assert_eq!(config.pressed.image_ref(), Some("p.png"));
        assert!(config.pressed.passthrough());
        assert_eq!(config.released, StateSlot::Absent);
        assert_eq!(config.flag_version, None);
    }

    #[test]
    fn envelope_record_keeps_version() {
        let config = RegionConfig::from_json(
            r#"{"flagVersion": 1.0, "data": {"states": {"released": {"imageRef": "r.png"}}}}"#,
        )
        .unwrap();

        assert_eq!(config.flag_version, Some(1.0));
        assert_eq!(config.released.image_ref(), Some("r.png"));
        assert!(!config.hover.is_present());
    }

    #[test]
    fn unknown_states_are_ignored_and_empty_record_is_valid() {
        let config =
            RegionConfig::from_json(r#"{"states": {"wiggle": {"img": "w.png"}}}"#).unwrap();
        assert_eq!(config, RegionConfig::default());

        let empty = RegionConfig::from_json("{}").unwrap();
        assert_eq!(empty.image_refs().count(), 0);
    }

    #[test]
    fn state_without_image_is_rejected() {
        let err = RegionConfig::from_json(r#"{"states": {"hover": {"passthrough": true}}}"#)
            .unwrap_err();
        assert!(matches!(err, TileError::InvalidConfig(_)));
    }

    #[test]
    fn envelope_with_invalid_state_is_rejected() {
        let err = RegionConfig::from_json(
            r#"{"flagVersion": 1.0, "data": {"states": {"hover": {"passthrough": false}}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TileError::InvalidConfig(_)));
    }

    #[test]
    fn envelope_with_non_numeric_version_is_rejected() {
        let result = RegionConfig::from_json(
            r#"{"flagVersion": "1.0", "data": {"states": {"hover": {"img": "h.png"}}}}"#,
        );
        assert!(matches!(result, Err(TileError::InvalidConfig(_))));
    }

    #[test]
    fn from_value_applies_the_same_shape_rules() {
        let value = serde_json::json!({"data": {"states": {"pressed": {"img": "p.png"}}}});
        let config = RegionConfig::from_value(value).unwrap();
        assert_eq!(config.flag_version, None);
        assert_eq!(config.pressed.image_ref(), Some("p.png"));

        let broken = serde_json::json!({"data": "not a body"});
        assert!(RegionConfig::from_value(broken).is_err());
    }

    #[test]
    fn absent_slot_passes_through() {
        let slot = StateSlot::Absent;
        assert!(slot.passthrough());
        assert_eq!(slot.image_ref(), None);
        assert_eq!(RegionConfig::new().slot(StateName::Default), &StateSlot::Absent);
    }

    #[test]
    fn image_refs_lists_configured_states_in_order() {
        let config = RegionConfig::new()
            .with_released(StateDefinition::new("r.png"))
            .with_hover(StateDefinition::new("h.png"));
        let refs: Vec<_> = config.image_refs().collect();
        assert_eq!(refs, vec!["h.png", "r.png"]);
    }
}
