use thiserror::Error;

use crate::{
    circuits::{PinSide, PinSlot},
    id::{GateId, WireId},
};

/// One end of a wire, bound to a live pin slot of a gate.
#[derive(Debug, Clone)]
pub struct WireEndpoint {
    pub gate: GateId,
    pub index: usize,
    /// Pin count on this side of the gate.
    pub total: usize,
    pub value: PinSlot,
}

/// Directed connection from an output pin to an input pin.
#[derive(Debug, Clone)]
pub struct Wire {
    pub id: WireId,
    pub from: WireEndpoint,
    pub to: WireEndpoint,

    /// Drawn in this session, as opposed to restored from a save.
    pub is_new: bool,
}

impl Wire {
    pub fn new(from: WireEndpoint, to: WireEndpoint, is_new: bool, id: WireId) -> Self {
        Self {
            id,
            from,
            to,
            is_new,
        }
    }

    pub fn propagate(&self) {
        self.to.value.set(self.from.value.get());
    }

    pub fn touches(&self, gate: &GateId) -> bool {
        self.from.gate == *gate || self.to.gate == *gate
    }
}

/// Why a wire endpoint could not be bound to a pin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("{side} gate {gate} does not exist")]
    MissingGate { side: PinSide, gate: GateId },

    #[error("{side} pin {index} is out of range for gate {gate} with {count} pins")]
    PinOutOfRange {
        side: PinSide,
        gate: GateId,
        index: usize,
        count: usize,
    },

    #[error("{side} pin total {total} does not match gate {gate} with {count} pins")]
    TotalMismatch {
        side: PinSide,
        gate: GateId,
        total: usize,
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(gate: &str, value: &PinSlot) -> WireEndpoint {
        WireEndpoint {
            gate: gate.into(),
            index: 0,
            total: 1,
            value: value.clone(),
        }
    }

    #[test]
    fn propagate_copies_source_into_target() {
        let source = PinSlot::default();
        let target = PinSlot::default();
        let wire = Wire::new(endpoint("a", &source), endpoint("b", &target), true, "w".into());

        source.set(true);
        assert!(!target.get());
        wire.propagate();
        assert!(target.get());

        assert!(wire.touches(&"a".into()));
        assert!(wire.touches(&"b".into()));
        assert!(!wire.touches(&"c".into()));
    }
}
