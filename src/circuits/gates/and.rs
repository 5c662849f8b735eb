use super::{emit, fold_inputs, FoldGate, GateImpl, GateOutput};

#[derive(Clone)]
pub struct And;

impl GateImpl for And {
    fn id() -> &'static str {
        "and"
    }

    fn display_name() -> &'static str {
        "AND gate"
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

impl FoldGate for And {
    fn empty() -> bool {
        true
    }

    fn init_state() -> bool {
        true
    }

    fn fold(state: &mut bool, input: bool) -> GateOutput {
        *state &= input;
        GateOutput {
            out: *state,
            fin: !*state,
        }
    }
}
