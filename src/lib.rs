//! Logic circuit model: templates, gates, wires and the simulation that
//! owns them, plus snapshot save/restore.

pub mod circuits;
pub mod id;
pub mod io;
pub mod render;
pub mod simulation;
pub mod template;
pub mod transform;
pub mod vector;
pub mod wire;

pub use circuits::{Gate, GateProps, PinSide, PinSlot};
pub use id::{GateId, WireId};
pub use io::restore::{DroppedWire, RestoreError, RestoreOptions, Restored, Restorer};
pub use render::{CancellationToken, Renderer, RendererSignal};
pub use simulation::{Simulation, SimulationEnv, SimulationMode};
pub use template::{Template, TemplateRegistry};
pub use wire::{Wire, WireEndpoint};
