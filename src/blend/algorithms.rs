//! Built-in blend algorithms.
//!
//! Every function here is a pure map `(bottom, top) -> out` over straight-alpha RGBA8 pixels.
//! The `disjoint_*` family is defined on premultiplied colour and converts at the pixel
//! boundary, so callers never see premultiplied data.

use std::sync::Arc;

use crate::blend::params::{ParamKind, ParamSpec, ParamValue, ResolvedParams};
use crate::blend::registry::{BlendAlgorithm, PixelKernel};
use crate::foundation::error::{BlendError, BlendResult};
use crate::foundation::math::{mul_div255_u8, to_u8, unit};
use crate::pixels::buffer::{Rgba8, demultiply, premultiply};

/// Names of the built-in algorithms, in registration order.
pub const BUILTIN_ALGORITHMS: [&str; 10] = [
    "alpha",
    "multiplicative",
    "source_over",
    "destination_over",
    "mask_top",
    "first_top",
    "first_bottom",
    "disjoint_over",
    "disjoint_under",
    "disjoint_debug",
];

/// Non-premultiplied source-over: `top` painted over `bottom`, weighted by top alpha.
pub fn over(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    let ta = unit(top[3]);
    let ba = unit(bottom[3]);
    let inv = 1.0 - ta;

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = to_u8(f32::from(top[i]) * ta + f32::from(bottom[i]) * inv);
    }
    out[3] = to_u8((ta + ba * inv) * 255.0);
    out
}

/// `alpha`.
pub fn alpha(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    over(bottom, top)
}

/// `source_over`; same arithmetic as [`alpha`].
pub fn source_over(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    over(bottom, top)
}

/// `destination_over`: the bottom layer painted over the top one.
pub fn destination_over(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    over(top, bottom)
}

/// `multiplicative`: channel-wise product of the colours, alpha composited as in [`alpha`].
pub fn multiplicative(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    let a = over(bottom, top)[3];
    [
        mul_div255_u8(u16::from(bottom[0]), u16::from(top[0])),
        mul_div255_u8(u16::from(bottom[1]), u16::from(top[1])),
        mul_div255_u8(u16::from(bottom[2]), u16::from(top[2])),
        a,
    ]
}

/// `mask_top`: top alpha scaled by `factor` selects between bottom and top, all four channels.
///
/// `factor = 1` blends by the top's own alpha; `factor = 0` keeps the bottom untouched.
pub fn mask_top(bottom: Rgba8, top: Rgba8, factor: f32) -> Rgba8 {
    // 0 * inf: a transparent top never selects the top pixel.
    let scaled = unit(top[3]) * factor;
    let m = if scaled.is_nan() {
        0.0
    } else {
        scaled.clamp(0.0, 1.0)
    };
    let inv = 1.0 - m;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = to_u8(f32::from(bottom[i]) * inv + f32::from(top[i]) * m);
    }
    out
}

/// `first_top`: the top pixel unless it is fully transparent.
pub fn first_top(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    if top[3] == 0 { bottom } else { top }
}

/// `first_bottom`: the bottom pixel unless it is fully transparent.
pub fn first_bottom(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    if bottom[3] == 0 { top } else { bottom }
}

/// `disjoint_over`: disjoint Porter-Duff over, top onto bottom.
pub fn disjoint_over(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    let (b, t) = (premultiply(bottom), premultiply(top));
    let (ba, ta) = (unit(b[3]), unit(t[3]));

    let mut out = [0u8; 4];
    for i in 0..3 {
        let (bc, tc) = (f32::from(b[i]), f32::from(t[i]));
        let c = if ta + ba < 1.0 {
            if ba > 0.0 {
                tc + bc * (1.0 - ta) / ba
            } else {
                tc
            }
        } else {
            tc + bc
        };
        out[i] = to_u8(c);
    }
    out[3] = b[3].saturating_add(t[3]);
    demultiply(out)
}

/// `disjoint_under`: disjoint Porter-Duff under, top slid beneath bottom.
pub fn disjoint_under(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    let (b, t) = (premultiply(bottom), premultiply(top));
    let (ba, ta) = (unit(b[3]), unit(t[3]));

    let mut out = [0u8; 4];
    for i in 0..3 {
        let (bc, tc) = (f32::from(b[i]), f32::from(t[i]));
        let c = if ta * ba > 0.0 {
            tc / ta * (1.0 - ba) + bc
        } else {
            tc * (1.0 - ba) + bc
        };
        out[i] = to_u8(c);
    }
    out[3] = b[3].saturating_add(t[3]);
    demultiply(out)
}

/// `disjoint_debug`: green where the two alphas fit side by side, red where they overlap.
pub fn disjoint_debug(bottom: Rgba8, top: Rgba8) -> Rgba8 {
    let fits = unit(top[3]) + unit(bottom[3]) < 1.0;
    let a = bottom[3].saturating_add(top[3]);
    if fits { [0, 255, 0, a] } else { [255, 0, 0, a] }
}

/// A parameterless algorithm backed by a plain pixel function.
pub struct PixelFnAlgorithm {
    name: &'static str,
    f: fn(Rgba8, Rgba8) -> Rgba8,
}

impl PixelFnAlgorithm {
    /// Wrap `f` under `name`.
    pub const fn new(name: &'static str, f: fn(Rgba8, Rgba8) -> Rgba8) -> Self {
        Self { name, f }
    }
}

impl BlendAlgorithm for PixelFnAlgorithm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn kernel(&self, _params: &ResolvedParams) -> BlendResult<PixelKernel> {
        Ok(Arc::new(self.f))
    }
}

static MASK_TOP_PARAMS: [ParamSpec; 1] = [ParamSpec {
    name: "factor",
    kind: ParamKind::Float,
    required: false,
    default: Some(ParamValue::Float(1.0)),
}];

/// `mask_top` with its `factor` parameter.
pub struct MaskTop;

impl BlendAlgorithm for MaskTop {
    fn name(&self) -> &'static str {
        "mask_top"
    }

    fn params(&self) -> &[ParamSpec] {
        &MASK_TOP_PARAMS
    }

    fn kernel(&self, params: &ResolvedParams) -> BlendResult<PixelKernel> {
        let factor = params.float("factor").unwrap_or(1.0);
        if !factor.is_finite() || factor < 0.0 {
            return Err(BlendError::invalid_params(
                self.name(),
                format!("'factor' must be a finite number >= 0, got {factor}"),
            ));
        }
        let factor = factor.min(f64::from(f32::MAX)) as f32;
        Ok(Arc::new(move |bottom, top| mask_top(bottom, top, factor)))
    }
}

/// Every built-in algorithm, boxed for registration.
pub(crate) fn builtins() -> Vec<Arc<dyn BlendAlgorithm>> {
    vec![
        Arc::new(PixelFnAlgorithm::new("alpha", alpha)),
        Arc::new(PixelFnAlgorithm::new("multiplicative", multiplicative)),
        Arc::new(PixelFnAlgorithm::new("source_over", source_over)),
        Arc::new(PixelFnAlgorithm::new("destination_over", destination_over)),
        Arc::new(MaskTop),
        Arc::new(PixelFnAlgorithm::new("first_top", first_top)),
        Arc::new(PixelFnAlgorithm::new("first_bottom", first_bottom)),
        Arc::new(PixelFnAlgorithm::new("disjoint_over", disjoint_over)),
        Arc::new(PixelFnAlgorithm::new("disjoint_under", disjoint_under)),
        Arc::new(PixelFnAlgorithm::new("disjoint_debug", disjoint_debug)),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/blend/algorithms.rs"]
mod tests;
