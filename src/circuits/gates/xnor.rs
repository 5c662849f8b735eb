use super::{emit, fold_inputs, FoldGate, GateImpl, GateOutput};

#[derive(Clone)]
pub struct Xnor;

impl GateImpl for Xnor {
    fn id() -> &'static str {
        "xnor"
    }

    fn display_name() -> &'static str {
        "XNOR gate"
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

impl FoldGate for Xnor {
    fn empty() -> bool {
        true
    }

    fn init_state() -> bool {
        false
    }

    fn fold(state: &mut bool, input: bool) -> GateOutput {
        if input {
            *state = !*state;
        }

        GateOutput {
            out: !*state,
            fin: false,
        }
    }
}
