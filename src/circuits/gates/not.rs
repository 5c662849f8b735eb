use super::{emit, GateImpl};

#[derive(Clone)]
pub struct Not;

impl GateImpl for Not {
    fn id() -> &'static str {
        "not"
    }

    fn display_name() -> &'static str {
        "NOT gate"
    }

    fn inputs() -> usize {
        1
    }

    fn outputs() -> usize {
        1
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]) {
        emit(outputs, [!inputs.first().copied().unwrap_or(false)]);
    }
}
