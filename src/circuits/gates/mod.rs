pub mod and;
pub mod buffer;
pub mod full_adder;
pub mod half_adder;
pub mod nand;
pub mod nor;
pub mod not;
pub mod or;
pub mod xnor;
pub mod xor;

use crate::template::{Category, Material, Template};

/// Compile-time description of a built-in template.
pub trait GateImpl {
    /// Registry name.
    fn id() -> &'static str;
    fn display_name() -> &'static str;

    fn inputs() -> usize;
    fn outputs() -> usize;

    fn category() -> Category {
        Category::Basic
    }

    fn material() -> Material {
        Material::image(Self::id())
    }

    fn activate(inputs: &[bool], outputs: &mut [bool]);
}

pub struct GateOutput {
    pub out: bool,

    /// No later input can change `out`.
    pub fin: bool,
}

/// Single-output gates that reduce their inputs one at a time.
pub trait FoldGate {
    /// Output with no inputs connected.
    fn empty() -> bool;
    fn init_state() -> bool;
    fn fold(state: &mut bool, input: bool) -> GateOutput;
}

pub fn fold_inputs<G: FoldGate>(inputs: &[bool]) -> bool {
    let mut state = G::init_state();
    let mut out = G::empty();
    for &input in inputs {
        let output = G::fold(&mut state, input);
        out = output.out;
        if output.fin {
            break;
        }
    }
    out
}

/// Writes `values` into the leading output slots. Values past the end of
/// `outputs` are discarded.
pub fn emit<const N: usize>(outputs: &mut [bool], values: [bool; N]) {
    for (slot, value) in outputs.iter_mut().zip(values) {
        *slot = value;
    }
}

macro_rules! builtin_gates {
    ($($module:ident),* $(,)?) => {
        paste::paste! {
            pub(crate) fn builtin_templates() -> Vec<Template> {
                vec![$(Template::of::<$module::[<$module:camel>]>()),*]
            }
        }
    };
}

builtin_gates!(and, or, xor, nand, nor, xnor, not, buffer, half_adder, full_adder);
