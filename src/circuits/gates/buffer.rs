use super::{emit, GateImpl};

#[derive(Clone)]
pub struct Buffer;

impl GateImpl for Buffer {
    fn id() -> &'static str {
        "buffer"
    }

    fn display_name() -> &'static str {
        "Buffer"
    }

    fn inputs() -> usize {
        1
    }

    fn outputs() -> usize {
        1
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]) {
        emit(outputs, [inputs.first().copied().unwrap_or(false)]);
    }
}
