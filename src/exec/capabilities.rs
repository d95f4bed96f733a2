//! Capability handles injected into the sandbox.
//!
//! The capability set is a fixed, enumerated mapping from name to handle:
//! `math` (numeric functions), `ss` (statistics), `Algebrite` (expression
//! evaluation), `Plotly` and `Chart` (drawing handles), and `container` (the
//! per-execution rendering surface). Sandboxed code is compiled against
//! exactly these names plus the engine's own builtins; no host state leaks
//! through closures.
//!
//! `math`, `ss`, and `Algebrite` are native objects backed by Rust. The
//! drawing handles and the surface are defined by a JavaScript prelude that
//! records artifacts onto the container; the host reads the snapshot back
//! after evaluation.

use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{
    Context, JsArgs, JsNativeError, JsObject, JsResult, JsString, JsValue, NativeFunction, Source,
    js_string,
};
use statrs::statistics::Statistics;

/// The fixed set of names bound for sandboxed code.
pub const CAPABILITY_NAMES: [&str; 6] = ["math", "Plotly", "Chart", "ss", "Algebrite", "container"];

/// JavaScript prelude defining the drawing handles and the rendering
/// surface for one execution attempt.
const PRELUDE: &str = r#"
const container = {
    innerHTML: "",
    __artifacts: [],
    append(text) {
        this.__artifacts.push({ kind: "text", content: String(text) });
    },
};

const Plotly = {
    newPlot(target, traces, layout) {
        const t = target && target.__artifacts ? target : container;
        t.__artifacts.push({
            kind: "plot",
            traces: traces === undefined ? [] : traces,
            layout: layout === undefined ? null : layout,
        });
    },
    react(target, traces, layout) {
        this.newPlot(target, traces, layout);
    },
};

class Chart {
    constructor(target, config) {
        const t = target && target.__artifacts ? target : container;
        t.__artifacts.push({
            kind: "chart",
            config: config === undefined ? null : config,
        });
    }
}

function __surfaceSnapshot() {
    return JSON.stringify({
        html: container.innerHTML,
        artifacts: container.__artifacts,
    });
}
"#;

/// Installs the capability set into a fresh engine context.
pub(crate) fn install(context: &mut Context) -> JsResult<()> {
    let math = math_object(context);
    context.register_global_property(js_string!("math"), math, Attribute::all())?;

    let stats = stats_object(context);
    context.register_global_property(js_string!("ss"), stats, Attribute::all())?;

    let symbolic = symbolic_object(context);
    context.register_global_property(js_string!("Algebrite"), symbolic, Attribute::all())?;

    context.eval(Source::from_bytes(PRELUDE.as_bytes()))?;
    Ok(())
}

/// Builds the `math` handle.
fn math_object(context: &mut Context) -> JsObject {
    ObjectInitializer::new(context)
        .function(unary(f64::abs), js_string!("abs"), 1)
        .function(unary(f64::sqrt), js_string!("sqrt"), 1)
        .function(unary(f64::cbrt), js_string!("cbrt"), 1)
        .function(unary(f64::sin), js_string!("sin"), 1)
        .function(unary(f64::cos), js_string!("cos"), 1)
        .function(unary(f64::tan), js_string!("tan"), 1)
        .function(unary(f64::asin), js_string!("asin"), 1)
        .function(unary(f64::acos), js_string!("acos"), 1)
        .function(unary(f64::atan), js_string!("atan"), 1)
        .function(unary(f64::ln), js_string!("log"), 1)
        .function(unary(f64::log10), js_string!("log10"), 1)
        .function(unary(f64::exp), js_string!("exp"), 1)
        .function(unary(f64::floor), js_string!("floor"), 1)
        .function(unary(f64::ceil), js_string!("ceil"), 1)
        .function(unary(f64::round), js_string!("round"), 1)
        .function(unary(factorial), js_string!("factorial"), 1)
        .function(binary(f64::powf), js_string!("pow"), 2)
        .function(binary(f64::atan2), js_string!("atan2"), 2)
        .function(reduce(f64::min, f64::INFINITY), js_string!("min"), 2)
        .function(reduce(f64::max, f64::NEG_INFINITY), js_string!("max"), 2)
        .property(js_string!("PI"), std::f64::consts::PI, Attribute::all())
        .property(js_string!("E"), std::f64::consts::E, Attribute::all())
        .build()
}

/// Builds the `ss` statistics handle.
fn stats_object(context: &mut Context) -> JsObject {
    ObjectInitializer::new(context)
        .function(stat(mean), js_string!("mean"), 1)
        .function(stat(median), js_string!("median"), 1)
        .function(stat(sum), js_string!("sum"), 1)
        .function(stat(sample_min), js_string!("min"), 1)
        .function(stat(sample_max), js_string!("max"), 1)
        .function(stat(variance), js_string!("variance"), 1)
        .function(stat(std_dev), js_string!("standardDeviation"), 1)
        .build()
}

/// Builds the `Algebrite` expression-evaluation handle.
fn symbolic_object(context: &mut Context) -> JsObject {
    ObjectInitializer::new(context)
        .function(
            NativeFunction::from_fn_ptr(symbolic_run),
            js_string!("run"),
            1,
        )
        .function(
            NativeFunction::from_fn_ptr(symbolic_run),
            js_string!("eval"),
            1,
        )
        .build()
}

/// Wraps a unary `f64` function as a native JS function.
fn unary(f: fn(f64) -> f64) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, context| {
        let x = args.get_or_undefined(0).to_number(context)?;
        Ok(JsValue::from(f(x)))
    })
}

/// Wraps a binary `f64` function as a native JS function.
fn binary(f: fn(f64, f64) -> f64) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, context| {
        let a = args.get_or_undefined(0).to_number(context)?;
        let b = args.get_or_undefined(1).to_number(context)?;
        Ok(JsValue::from(f(a, b)))
    })
}

/// Wraps a fold over all numeric arguments as a native JS function.
fn reduce(f: fn(f64, f64) -> f64, init: f64) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, context| {
        let mut acc = init;
        for arg in args {
            acc = f(acc, arg.to_number(context)?);
        }
        Ok(JsValue::from(acc))
    })
}

/// Wraps a slice statistic as a native JS function taking one array.
fn stat(f: fn(&[f64]) -> f64) -> NativeFunction {
    NativeFunction::from_copy_closure(move |_this, args, context| {
        let xs = numbers_arg(args.get_or_undefined(0), context)?;
        if xs.is_empty() {
            return Err(JsNativeError::typ()
                .with_message("expected a non-empty array of numbers")
                .into());
        }
        Ok(JsValue::from(f(&xs)))
    })
}

/// Extracts a `Vec<f64>` from an array-like JS argument.
fn numbers_arg(value: &JsValue, context: &mut Context) -> JsResult<Vec<f64>> {
    let Some(object) = value.as_object() else {
        return Err(JsNativeError::typ()
            .with_message("expected an array of numbers")
            .into());
    };

    let length = object.get(js_string!("length"), context)?.to_length(context)?;
    let mut out = Vec::with_capacity(usize::try_from(length).unwrap_or(0));
    for index in 0..length {
        // Index through string keys, which array exotic objects accept
        let element = object.get(JsString::from(index.to_string()), context)?;
        out.push(element.to_number(context)?);
    }
    Ok(out)
}

/// Evaluates an expression through the shared calculator engine.
fn symbolic_run(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let script = args
        .get_or_undefined(0)
        .to_string(context)?
        .to_std_string_escaped();

    match crate::calc::evaluate(&script) {
        Ok(value) => Ok(JsString::from(value.to_string()).into()),
        Err(e) => Err(JsNativeError::error().with_message(e.to_string()).into()),
    }
}

fn mean(xs: &[f64]) -> f64 {
    Statistics::mean(xs.iter())
}

fn median(xs: &[f64]) -> f64 {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}

fn sum(xs: &[f64]) -> f64 {
    xs.iter().sum()
}

fn sample_min(xs: &[f64]) -> f64 {
    Statistics::min(xs.iter())
}

fn sample_max(xs: &[f64]) -> f64 {
    Statistics::max(xs.iter())
}

fn variance(xs: &[f64]) -> f64 {
    Statistics::variance(xs.iter())
}

fn std_dev(xs: &[f64]) -> f64 {
    Statistics::std_dev(xs.iter())
}

/// Factorial over non-negative integers, `NaN` elsewhere.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn factorial(x: f64) -> f64 {
    if x < 0.0 || x.fract() != 0.0 || x > 170.0 {
        return f64::NAN;
    }
    (1..=(x as u64)).map(|i| i as f64).product()
}
