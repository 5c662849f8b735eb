use super::{emit, fold_inputs, FoldGate, GateImpl, GateOutput};

#[derive(Clone)]
pub struct Nand;

impl GateImpl for Nand {
    fn id() -> &'static str {
        "nand"
    }

    fn display_name() -> &'static str {
        "NAND gate"
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

impl FoldGate for Nand {
    fn empty() -> bool {
        false
    }

    fn init_state() -> bool {
        true
    }

    fn fold(state: &mut bool, input: bool) -> GateOutput {
        if !input {
            *state = false;
            GateOutput {
                out: true,
                fin: true,
            }
        } else {
            GateOutput {
                out: !*state,
                fin: false,
            }
        }
    }
}
