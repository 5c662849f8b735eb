use crate::template::Category;

use super::{emit, GateImpl};

#[derive(Clone)]
pub struct HalfAdder;

impl GateImpl for HalfAdder {
    fn id() -> &'static str {
        "half adder"
    }

    fn display_name() -> &'static str {
        "Half adder"
    }

    fn inputs() -> usize {
        2
    }

    fn outputs() -> usize {
        2
    }

    fn category() -> Category {
        Category::Math
    }

    fn material() -> super::Material {
        super::Material::image("half-adder")
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]) {
        add(inputs, outputs)
    }
}

/// Outputs `[sum, carry]` of all inputs.
pub(super) fn add(inputs: &[bool], outputs: &mut [bool]) {
    let total = inputs.iter().filter(|v| **v).count();

    emit(outputs, [total % 2 == 1, total >= 2]);
}
