use super::{emit, fold_inputs, FoldGate, GateImpl, GateOutput};

#[derive(Clone)]
pub struct Nor;

impl GateImpl for Nor {
    fn id() -> &'static str {
        "nor"
    }

    fn display_name() -> &'static str {
        "NOR gate"
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

impl FoldGate for Nor {
    fn empty() -> bool {
        true
    }

    fn init_state() -> bool {
        false
    }

    fn fold(state: &mut bool, input: bool) -> GateOutput {
        if input {
            *state = true;
            GateOutput {
                out: false,
                fin: true,
            }
        } else {
            GateOutput {
                out: true,
                fin: false,
            }
        }
    }
}
