//! Rebuilding live circuits from snapshot records.
//!
//! Gates are restored first, in record order, and pushed into the
//! simulation whether or not their height could be computed. A gate whose
//! height needs a renderer that does not exist yet gets a one-shot retry
//! queued on the [`RendererSignal`]. Wires are restored afterwards; a wire
//! whose endpoints cannot be bound is dropped and reported, never fatal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    circuits::{Gate, PinSide},
    id::{GateId, WireId},
    render::{fix_gate_height, RendererSignal},
    simulation::{Simulation, SimulationEnv, SimulationError},
    template::{TemplateError, TemplateRegistry},
    transform::{Camera, Transform},
    wire::{EndpointError, Wire, WireEndpoint},
};

use super::{CameraState, SaveState, SimulationState, TransformState, WireEndpointState, WireState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreOptions {
    pub env: SimulationEnv,

    /// Drop wires whose saved pin total disagrees with the gate's template.
    pub check_pin_totals: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            env: SimulationEnv::Global,
            check_pin_totals: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("gate {gate}: {source}")]
    Template {
        gate: GateId,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("wire {wire} dropped: {reason}")]
pub struct DroppedWire {
    pub wire: WireId,
    pub reason: EndpointError,
}

#[derive(Debug)]
pub struct Restored {
    pub simulation: Simulation,
    pub dropped_wires: Vec<DroppedWire>,
    /// Gates whose height waits for a renderer.
    pub deferred_gates: Vec<GateId>,
}

#[derive(Debug)]
pub struct RestoredSave {
    pub transform: Transform,
    pub camera: Camera,
    pub restored: Restored,
}

impl From<&TransformState> for Transform {
    fn from(state: &TransformState) -> Self {
        Transform::new(state.position, state.scale, state.rotation)
    }
}

impl From<&CameraState> for Camera {
    fn from(state: &CameraState) -> Self {
        Camera {
            transform: (&state.transform).into(),
            ..Default::default()
        }
    }
}

pub struct Restorer<'a> {
    templates: &'a TemplateRegistry,
    renderer: &'a RendererSignal,
    options: RestoreOptions,
}

impl<'a> Restorer<'a> {
    pub fn new(templates: &'a TemplateRegistry, renderer: &'a RendererSignal) -> Self {
        Self {
            templates,
            renderer,
            options: RestoreOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RestoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn save_state(&self, state: &SaveState) -> Result<RestoredSave, RestoreError> {
        Ok(RestoredSave {
            transform: (&state.transform).into(),
            camera: (&state.camera).into(),
            restored: self.simulation(&state.simulation)?,
        })
    }

    pub fn simulation(&self, state: &SimulationState) -> Result<Restored, RestoreError> {
        let mut simulation = Simulation::new(state.mode, state.name.clone(), self.options.env);
        let mut deferred_gates = vec![];

        for gate_state in &state.gates {
            let template = self
                .templates
                .get(&gate_state.template)
                .map_err(|source| RestoreError::Template {
                    gate: gate_state.id.clone(),
                    source,
                })?;

            let gate = Arc::new(Gate::new(
                template,
                gate_state.id.clone(),
                gate_state.props.clone(),
            ));
            gate.set_transform((&gate_state.transform).into());

            let renderer = self.renderer.current();
            if let Err(error) = fix_gate_height(renderer.as_deref(), &gate) {
                debug!(gate = %gate.id, %error, "gate height deferred");
                self.defer_height_fix(&simulation, &gate);
                deferred_gates.push(gate.id.clone());
            }

            simulation.push(gate)?;
        }

        let mut dropped_wires = vec![];
        for wire_state in &state.wires {
            match self.wire(&simulation, wire_state) {
                Ok(wire) => simulation.push_wire(wire),
                Err(reason) => {
                    let dropped = DroppedWire {
                        wire: wire_state.id.clone(),
                        reason,
                    };
                    warn!(wire = %dropped.wire, reason = %dropped.reason, "wire dropped");
                    dropped_wires.push(dropped);
                }
            }
        }

        debug!(
            name = %simulation.name,
            gates = simulation.gate_count(),
            wires = simulation.wires().len(),
            dropped = dropped_wires.len(),
            deferred = deferred_gates.len(),
            "simulation restored"
        );

        Ok(Restored {
            simulation,
            dropped_wires,
            deferred_gates,
        })
    }

    fn defer_height_fix(&self, simulation: &Simulation, gate: &Arc<Gate>) {
        let gate = Arc::downgrade(gate);
        self.renderer
            .once_ready(simulation.cancellation_token().clone(), move |renderer| {
                let Some(gate) = gate.upgrade() else {
                    return;
                };

                match fix_gate_height(Some(renderer), &gate) {
                    Ok(height) => debug!(gate = %gate.id, height, "gate height fixed"),
                    Err(error) => warn!(gate = %gate.id, %error, "gate height retry failed"),
                }
            });
    }

    fn wire(&self, simulation: &Simulation, state: &WireState) -> Result<Wire, EndpointError> {
        let from = self.endpoint(simulation, &state.from, PinSide::Output)?;
        let to = self.endpoint(simulation, &state.to, PinSide::Input)?;
        Ok(Wire::new(from, to, false, state.id.clone()))
    }

    fn endpoint(
        &self,
        simulation: &Simulation,
        state: &WireEndpointState,
        side: PinSide,
    ) -> Result<WireEndpoint, EndpointError> {
        let mut endpoint = simulation.endpoint(&state.id, side, state.index)?;

        if self.options.check_pin_totals && state.total != endpoint.total {
            return Err(EndpointError::TotalMismatch {
                side,
                gate: state.id.clone(),
                total: state.total,
                count: endpoint.total,
            });
        }

        endpoint.total = state.total;
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        io::{from_ron, GateState},
        render::{GateMetrics, GeometryError, HeadlessRenderer, Renderer},
        simulation::SimulationMode,
        vector::Vec2f,
    };

    fn transform() -> TransformState {
        TransformState {
            position: Vec2f::new(4.0, 5.0),
            scale: Vec2f::single_value(1.0),
            rotation: 0.0,
        }
    }

    fn gate(template: &str, id: &str) -> GateState {
        GateState {
            template: template.into(),
            id: id.into(),
            props: Default::default(),
            transform: transform(),
        }
    }

    #[test]
    fn camera_takes_saved_transform() {
        let camera: Camera = (&CameraState { transform: transform() }).into();
        assert_eq!(camera.transform.position, Vec2f::new(4.0, 5.0));
        assert_eq!(camera.viewport, Vec2f::default());
    }

    #[test]
    fn unknown_template_is_fatal() {
        let templates = TemplateRegistry::with_builtins();
        let signal = RendererSignal::new();
        let state = SimulationState {
            mode: SimulationMode::Project,
            name: "broken".into(),
            gates: vec![gate("and", "a"), gate("tesseract", "t")],
            wires: vec![],
        };

        let err = Restorer::new(&templates, &signal).simulation(&state).unwrap_err();
        assert!(matches!(
            err,
            RestoreError::Template { ref gate, source: TemplateError::Unknown(ref name) }
                if &**gate == "t" && name == "tesseract"
        ));
        // the half-built simulation was dropped, so its retry is gone too
        assert_eq!(signal.pending(), 0);
    }

    #[test]
    fn duplicate_gate_id_is_fatal() {
        let templates = TemplateRegistry::with_builtins();
        let signal = RendererSignal::with_renderer(Arc::new(HeadlessRenderer::default()));
        let state = SimulationState {
            mode: SimulationMode::Ic,
            name: "dup".into(),
            gates: vec![gate("and", "a"), gate("or", "a")],
            wires: vec![],
        };

        assert!(matches!(
            Restorer::new(&templates, &signal).simulation(&state),
            Err(RestoreError::Simulation(SimulationError::DuplicateGate(_)))
        ));
    }

    #[test]
    fn options_apply() {
        let templates = TemplateRegistry::with_builtins();
        let signal = RendererSignal::new();
        let state = SimulationState {
            mode: SimulationMode::Ic,
            name: "inner".into(),
            gates: vec![gate("and", "a"), gate("and", "b")],
            wires: vec![WireState {
                id: "w".into(),
                from: WireEndpointState { id: "a".into(), index: 0, total: 3 },
                to: WireEndpointState { id: "b".into(), index: 0, total: 2 },
            }],
        };

        let strict = Restorer::new(&templates, &signal).simulation(&state).unwrap();
        assert_eq!(strict.simulation.env, SimulationEnv::Global);
        assert!(strict.simulation.wires().is_empty());
        assert_eq!(
            strict.dropped_wires[0].reason,
            EndpointError::TotalMismatch {
                side: PinSide::Output,
                gate: "a".into(),
                total: 3,
                count: 1,
            }
        );

        let lenient = Restorer::new(&templates, &signal)
            .with_options(RestoreOptions {
                env: SimulationEnv::Gate,
                check_pin_totals: false,
            })
            .simulation(&state)
            .unwrap();
        assert_eq!(lenient.simulation.env, SimulationEnv::Gate);
        assert_eq!(lenient.simulation.wires().len(), 1);
        assert_eq!(lenient.simulation.wires()[0].from.total, 3);
    }

    #[test]
    fn options_from_ron() {
        let options: RestoreOptions = from_ron("(env: gate)").unwrap();
        assert_eq!(options.env, SimulationEnv::Gate);
        assert!(options.check_pin_totals);
    }

    #[test]
    fn retry_skips_removed_gate() {
        struct Counting(Arc<AtomicUsize>);

        impl Renderer for Counting {
            fn gate_metrics(&self) -> Result<GateMetrics, GeometryError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(Default::default())
            }
        }

        let templates = TemplateRegistry::with_builtins();
        let signal = RendererSignal::new();
        let state = SimulationState {
            mode: SimulationMode::Project,
            name: "p".into(),
            gates: vec![gate("and", "a"), gate("or", "b")],
            wires: vec![],
        };

        let mut restored = Restorer::new(&templates, &signal).simulation(&state).unwrap();
        assert_eq!(restored.deferred_gates.len(), 2);
        restored.simulation.remove_gate(&"a".into());

        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(signal.publish(Some(Arc::new(Counting(calls.clone())))), 2);
        // only the gate still alive asked for metrics
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
