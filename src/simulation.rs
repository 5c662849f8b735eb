use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    circuits::{Gate, GateProps, PinSide},
    id::{GateId, WireId},
    render::CancellationToken,
    template::Template,
    wire::{EndpointError, Wire, WireEndpoint},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Top-level editable project.
    Project,
    /// Integrated circuit, usable as a composite gate.
    Ic,
}

/// Where a simulation lives: top level, or inside a composite gate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationEnv {
    #[default]
    Global,
    Gate,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("gate {0} is already in the simulation")]
    DuplicateGate(GateId),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("could not generate an id: {0}")]
    Id(#[from] getrandom::Error),
}

/// Gates and wires of one circuit.
///
/// Dropping the simulation cancels its [`CancellationToken`], which turns
/// any still-queued geometry retry for its gates into a no-op.
#[derive(Debug)]
pub struct Simulation {
    pub mode: SimulationMode,
    pub name: String,
    pub env: SimulationEnv,

    gates: HashMap<GateId, Arc<Gate>>,
    gate_order: Vec<GateId>,
    wires: Vec<Wire>,

    token: CancellationToken,
}

impl Simulation {
    pub fn new(mode: SimulationMode, name: impl Into<String>, env: SimulationEnv) -> Self {
        Self {
            mode,
            name: name.into(),
            env,
            gates: HashMap::new(),
            gate_order: vec![],
            wires: vec![],
            token: CancellationToken::new(),
        }
    }

    pub fn push(&mut self, gate: impl Into<Arc<Gate>>) -> Result<(), SimulationError> {
        let gate = gate.into();
        if self.gates.contains_key(&gate.id) {
            return Err(SimulationError::DuplicateGate(gate.id.clone()));
        }

        self.gate_order.push(gate.id.clone());
        self.gates.insert(gate.id.clone(), gate);
        Ok(())
    }

    /// Appends a wire. Wire order is evaluation order.
    pub fn push_wire(&mut self, wire: Wire) {
        self.wires.push(wire);
    }

    pub fn gate(&self, id: &GateId) -> Option<&Arc<Gate>> {
        self.gates.get(id)
    }

    /// Gates in insertion order.
    pub fn gates(&self) -> impl Iterator<Item = &Arc<Gate>> {
        self.gate_order.iter().filter_map(|id| self.gates.get(id))
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Binds to the live pin `index` on `side` of gate `id`. The endpoint's
    /// `total` is the gate's actual pin count on that side.
    pub fn endpoint(
        &self,
        id: &GateId,
        side: PinSide,
        index: usize,
    ) -> Result<WireEndpoint, EndpointError> {
        let gate = self.gates.get(id).ok_or_else(|| EndpointError::MissingGate {
            side,
            gate: id.clone(),
        })?;

        let pins = gate.pins().side(side);
        let value = pins.get(index).ok_or_else(|| EndpointError::PinOutOfRange {
            side,
            gate: id.clone(),
            index,
            count: pins.len(),
        })?;

        Ok(WireEndpoint {
            gate: id.clone(),
            index,
            total: pins.len(),
            value: value.clone(),
        })
    }

    /// Places a new gate with a random id.
    pub fn spawn_gate(
        &mut self,
        template: Arc<Template>,
        props: GateProps,
    ) -> Result<Arc<Gate>, SimulationError> {
        let gate = Arc::new(Gate::new(template, GateId::random()?, props));
        self.push(gate.clone())?;
        Ok(gate)
    }

    /// Draws a new wire from output `from` to input `to`.
    pub fn connect(
        &mut self,
        from: (&GateId, usize),
        to: (&GateId, usize),
    ) -> Result<&Wire, SimulationError> {
        let from = self.endpoint(from.0, PinSide::Output, from.1)?;
        let to = self.endpoint(to.0, PinSide::Input, to.1)?;

        self.wires.push(Wire::new(from, to, true, WireId::random()?));
        Ok(&self.wires[self.wires.len() - 1])
    }

    /// Removes a gate together with every wire attached to it.
    pub fn remove_gate(&mut self, id: &GateId) -> Option<(Arc<Gate>, Vec<Wire>)> {
        let gate = self.gates.remove(id)?;
        self.gate_order.retain(|g| g != id);

        let (removed, kept): (Vec<Wire>, Vec<Wire>) = self.wires.drain(..).partition(|w| w.touches(id));
        self.wires = kept;

        debug!(gate = %id, wires = removed.len(), "gate removed");
        Some((gate, removed))
    }

    /// Evaluates every gate, then pushes values along wires in order.
    pub fn step(&self) {
        for gate in self.gates() {
            gate.evaluate();
        }
        for wire in &self.wires {
            wire.propagate();
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
