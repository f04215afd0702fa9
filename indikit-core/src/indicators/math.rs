//! Element-wise vector math.
//!
//! Every function here maps sample `i` of its inputs to sample `i` of the
//! output, so the lookback is always 0 and a NaN stays in its own slot.
//! `round` rounds halves up (floor(x + 0.5)).

use crate::descriptor::{Arity, DescriptorBuilder, IndicatorDescriptor, IndicatorKind};

use super::{lookback_zero, REAL};

macro_rules! unary {
    ($($ctor:ident, $name:literal, $full_name:literal, $f:expr;)*) => {
        $(
            pub fn $ctor() -> DescriptorBuilder {
                fn compute(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
                    let f: fn(f64) -> f64 = $f;
                    outputs[0] = inputs[0].iter().map(|&v| f(v)).collect();
                }
                IndicatorDescriptor::builder($name, $full_name, IndicatorKind::Simple)
                    .fixed_inputs(REAL)
                    .outputs(&[$name])
                    .lookback(lookback_zero)
                    .compute(compute)
            }
        )*

        const UNARY: &[fn() -> DescriptorBuilder] = &[$($ctor),*];
    };
}

macro_rules! binary {
    ($($ctor:ident, $name:literal, $full_name:literal, $op:tt;)*) => {
        $(
            pub fn $ctor() -> DescriptorBuilder {
                fn compute(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
                    outputs[0] = inputs[0]
                        .iter()
                        .zip(inputs[1])
                        .map(|(a, b)| a $op b)
                        .collect();
                }
                IndicatorDescriptor::builder($name, $full_name, IndicatorKind::Simple)
                    .fixed_inputs(&["real", "real"])
                    .outputs(&[$name])
                    .lookback(lookback_zero)
                    .compute(compute)
            }
        )*

        const BINARY: &[fn() -> DescriptorBuilder] = &[$($ctor),*];
    };
}

unary! {
    abs, "abs", "Vector Absolute Value", f64::abs;
    acos, "acos", "Vector Arccosine", f64::acos;
    asin, "asin", "Vector Arcsine", f64::asin;
    atan, "atan", "Vector Arctangent", f64::atan;
    ceil, "ceil", "Vector Ceiling", f64::ceil;
    cos, "cos", "Vector Cosine", f64::cos;
    cosh, "cosh", "Vector Hyperbolic Cosine", f64::cosh;
    exp, "exp", "Vector Exponential", f64::exp;
    floor, "floor", "Vector Floor", f64::floor;
    ln, "ln", "Vector Natural Log", f64::ln;
    log10, "log10", "Vector Base-10 Log", f64::log10;
    round, "round", "Vector Round", |v| (v + 0.5).floor();
    sin, "sin", "Vector Sine", f64::sin;
    sinh, "sinh", "Vector Hyperbolic Sine", f64::sinh;
    sqrt, "sqrt", "Vector Square Root", f64::sqrt;
    tan, "tan", "Vector Tangent", f64::tan;
    tanh, "tanh", "Vector Hyperbolic Tangent", f64::tanh;
    todeg, "todeg", "Vector Degree Conversion", f64::to_degrees;
    torad, "torad", "Vector Radian Conversion", f64::to_radians;
    trunc, "trunc", "Vector Truncate", f64::trunc;
}

binary! {
    add, "add", "Vector Addition", +;
    sub, "sub", "Vector Subtraction", -;
    mul, "mul", "Vector Multiplication", *;
    div, "div", "Vector Division", /;
}

/// Element-wise mean of one or more series.
pub fn mean() -> DescriptorBuilder {
    IndicatorDescriptor::builder("mean", "Vector Mean", IndicatorKind::Simple)
        .inputs(Arity::Variable { min: 1 }, REAL)
        .outputs(&["mean"])
        .lookback(lookback_zero)
        .compute(compute_mean)
}

fn compute_mean(inputs: &[&[f64]], _options: &[f64], outputs: &mut [Vec<f64>]) {
    let scale = 1.0 / inputs.len() as f64;
    for (i, slot) in outputs[0].iter_mut().enumerate() {
        *slot = inputs.iter().map(|series| series[i]).sum::<f64>() * scale;
    }
}

pub fn all() -> Vec<DescriptorBuilder> {
    UNARY
        .iter()
        .chain(BINARY)
        .map(|ctor| ctor())
        .chain(std::iter::once(mean()))
        .collect()
}
