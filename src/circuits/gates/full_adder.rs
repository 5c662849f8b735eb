use crate::template::Category;

use super::GateImpl;

/// Inputs are `a`, `b` and carry-in.
#[derive(Clone)]
pub struct FullAdder;

impl GateImpl for FullAdder {
    fn id() -> &'static str {
        "full adder"
    }

    fn display_name() -> &'static str {
        "Full adder"
    }

    fn inputs() -> usize {
        3
    }

    fn outputs() -> usize {
        2
    }

    fn category() -> Category {
        Category::Math
    }

    fn material() -> super::Material {
        super::Material::image("full-adder")
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]) {
        super::half_adder::add(inputs, outputs)
    }
}
