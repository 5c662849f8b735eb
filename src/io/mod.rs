//! Plain snapshot records and their RON encoding.

pub mod restore;
pub mod save;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    circuits::GateProps,
    id::{GateId, WireId},
    simulation::SimulationMode,
    vector::Vec2f,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub position: Vec2f,
    pub scale: Vec2f,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub transform: TransformState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateState {
    pub template: String,
    pub id: GateId,
    #[serde(default)]
    pub props: GateProps,
    pub transform: TransformState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEndpointState {
    /// Gate id.
    pub id: GateId,
    pub index: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireState {
    pub id: WireId,
    pub from: WireEndpointState,
    pub to: WireEndpointState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub mode: SimulationMode,
    pub name: String,
    #[serde(default)]
    pub gates: Vec<GateState>,
    #[serde(default)]
    pub wires: Vec<WireState>,
}

/// Everything persisted for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub transform: TransformState,
    pub camera: CameraState,
    pub simulation: SimulationState,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Decode(#[from] ron::error::SpannedError),

    #[error("could not encode snapshot: {0}")]
    Encode(#[from] ron::Error),
}

pub fn from_ron<T: DeserializeOwned>(text: &str) -> Result<T, SnapshotError> {
    Ok(ron::from_str(text)?)
}

pub fn to_ron<T: Serialize>(value: &T) -> Result<String, SnapshotError> {
    let config = ron::ser::PrettyConfig::new().struct_names(false);
    Ok(ron::ser::to_string_pretty(value, config)?)
}
