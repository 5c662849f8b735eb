//! Live circuit -> snapshot records.

use crate::{
    circuits::Gate,
    simulation::Simulation,
    transform::{Camera, Transform},
    wire::{Wire, WireEndpoint},
};

use super::{
    CameraState, GateState, SaveState, SimulationState, TransformState, WireEndpointState,
    WireState,
};

impl From<&Transform> for TransformState {
    fn from(transform: &Transform) -> Self {
        Self {
            position: transform.position,
            scale: transform.scale,
            rotation: transform.rotation,
        }
    }
}

impl From<&Camera> for CameraState {
    fn from(camera: &Camera) -> Self {
        Self {
            transform: (&camera.transform).into(),
        }
    }
}

impl From<&Gate> for GateState {
    fn from(gate: &Gate) -> Self {
        Self {
            template: gate.template().name().to_owned(),
            id: gate.id.clone(),
            props: gate.props().clone(),
            transform: (&gate.transform()).into(),
        }
    }
}

impl From<&WireEndpoint> for WireEndpointState {
    fn from(endpoint: &WireEndpoint) -> Self {
        Self {
            id: endpoint.gate.clone(),
            index: endpoint.index,
            total: endpoint.total,
        }
    }
}

impl From<&Wire> for WireState {
    fn from(wire: &Wire) -> Self {
        Self {
            id: wire.id.clone(),
            from: (&wire.from).into(),
            to: (&wire.to).into(),
        }
    }
}

impl Simulation {
    /// Gates in insertion order, wires in evaluation order.
    pub fn to_state(&self) -> SimulationState {
        SimulationState {
            mode: self.mode,
            name: self.name.clone(),
            gates: self.gates().map(|g| GateState::from(&**g)).collect(),
            wires: self.wires().iter().map(WireState::from).collect(),
        }
    }
}

impl SaveState {
    pub fn new(transform: &Transform, camera: &Camera, simulation: &Simulation) -> Self {
        Self {
            transform: transform.into(),
            camera: camera.into(),
            simulation: simulation.to_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        circuits::GateProps,
        simulation::{SimulationEnv, SimulationMode},
        template::TemplateRegistry,
        vector::Vec2f,
    };

    #[test]
    fn simulation_to_state() {
        let registry = TemplateRegistry::with_builtins();
        let mut simulation = Simulation::new(SimulationMode::Project, "s", SimulationEnv::Global);

        let mut props = GateProps::new();
        props.insert("label".into(), ron::Value::String("carry".into()));

        let a = Gate::new(registry.get("half adder").unwrap(), "a".into(), props.clone());
        a.update_transform(|t| t.position = Vec2f::new(3.0, 1.0));
        simulation.push(a).unwrap();
        simulation
            .push(Gate::new(registry.get("or").unwrap(), "b".into(), GateProps::new()))
            .unwrap();
        simulation.connect((&"a".into(), 1), (&"b".into(), 0)).unwrap();

        let state = simulation.to_state();
        assert_eq!(state.name, "s");
        assert_eq!(state.gates.len(), 2);
        assert_eq!(state.gates[0].template, "half adder");
        assert_eq!(state.gates[0].props, props);
        assert_eq!(state.gates[0].transform.position, Vec2f::new(3.0, 1.0));

        let wire = &state.wires[0];
        assert_eq!(&*wire.from.id, "a");
        assert_eq!((wire.from.index, wire.from.total), (1, 2));
        assert_eq!(&*wire.to.id, "b");
        assert_eq!((wire.to.index, wire.to.total), (0, 2));
    }
}
