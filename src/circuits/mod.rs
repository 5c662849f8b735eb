pub mod gates;

use std::{
    collections::BTreeMap,
    fmt::Display,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;

use crate::{id::GateId, template::Template, transform::Transform};

/// Template-defined gate configuration, kept as-is from the save file.
pub type GateProps = BTreeMap<String, ron::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinSide {
    Input,
    Output,
}

impl Display for PinSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PinSide::Input => "input",
            PinSide::Output => "output",
        })
    }
}

/// Live value of one pin. Clones share the same slot, so a wire holding
/// a clone observes and drives the gate's own pin.
#[derive(Debug, Clone, Default)]
pub struct PinSlot(Arc<AtomicBool>);

impl PinSlot {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Relaxed)
    }

    pub fn ptr_eq(&self, other: &PinSlot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug)]
pub struct GatePins {
    inputs: Box<[PinSlot]>,
    outputs: Box<[PinSlot]>,
}

impl GatePins {
    fn new(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs: (0..inputs).map(|_| PinSlot::default()).collect(),
            outputs: (0..outputs).map(|_| PinSlot::default()).collect(),
        }
    }

    pub fn side(&self, side: PinSide) -> &[PinSlot] {
        match side {
            PinSide::Input => &self.inputs,
            PinSide::Output => &self.outputs,
        }
    }

    pub fn get(&self, side: PinSide, index: usize) -> Option<&PinSlot> {
        self.side(side).get(index)
    }

    pub fn inputs(&self) -> &[PinSlot] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PinSlot] {
        &self.outputs
    }
}

/// A placed circuit element. Shared as `Arc<Gate>` between its simulation
/// and any pending geometry retry.
#[derive(Debug)]
pub struct Gate {
    pub id: GateId,
    template: Arc<Template>,
    props: GateProps,
    transform: RwLock<Transform>,
    pins: GatePins,
}

impl Gate {
    pub fn new(template: Arc<Template>, id: GateId, props: GateProps) -> Self {
        let pins = GatePins::new(template.pins.inputs, template.pins.outputs);
        Self {
            id,
            template,
            props,
            transform: RwLock::new(Transform::default()),
            pins,
        }
    }

    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    pub fn props(&self) -> &GateProps {
        &self.props
    }

    pub fn pins(&self) -> &GatePins {
        &self.pins
    }

    pub fn transform(&self) -> Transform {
        *self.transform.read()
    }

    pub fn set_transform(&self, transform: Transform) {
        *self.transform.write() = transform;
    }

    pub fn update_transform(&self, f: impl FnOnce(&mut Transform)) {
        f(&mut *self.transform.write())
    }

    /// Runs the activation function over the current input values and
    /// stores the result in the output slots.
    pub fn evaluate(&self) {
        let inputs: Vec<bool> = self.pins.inputs.iter().map(PinSlot::get).collect();
        let mut outputs = vec![false; self.pins.outputs.len()];

        (self.template.activation)(&inputs, &mut outputs);

        for (slot, value) in self.pins.outputs.iter().zip(outputs) {
            slot.set(value);
        }
    }
}
