use super::{emit, fold_inputs, FoldGate, GateImpl, GateOutput};

#[derive(Clone)]
pub struct Xor;

impl GateImpl for Xor {
    fn id() -> &'static str {
        "xor"
    }

    fn display_name() -> &'static str {
        "XOR gate"
    }

    fn inputs() -> usize {
        2
    }

    fn outputs() -> usize {
        1
    }

    fn material() -> super::Material {
        super::Material::image("xor_gate")
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]) {
        emit(outputs, [fold_inputs::<Self>(inputs)]);
    }
}

impl FoldGate for Xor {
    fn empty() -> bool {
        false
    }

    fn init_state() -> bool {
        false
    }

    // odd parity, not "exactly one"
    fn fold(state: &mut bool, input: bool) -> GateOutput {
        if input {
            *state = !*state;
        }

        GateOutput {
            out: *state,
            fin: false,
        }
    }
}
