use super::{emit, fold_inputs, FoldGate, GateImpl, GateOutput};

#[derive(Clone)]
pub struct Or;

impl GateImpl for Or {
    fn id() -> &'static str {
        "or"
    }

    fn display_name() -> &'static str {
        "OR gate"
    }

    fn inputs() -> usize {
        2
    }

    fn outputs() -> usize {
        1
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]) {
        emit(outputs, [fold_inputs::<Self>(inputs)]);
    }
}

impl FoldGate for Or {
    fn empty() -> bool {
        false
    }

    fn init_state() -> bool {
        false
    }

    fn fold(state: &mut bool, input: bool) -> GateOutput {
        *state |= input;
        GateOutput {
            out: *state,
            fin: *state,
        }
    }
}
