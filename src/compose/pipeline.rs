use tracing::debug;

use crate::blend::descriptor::AlgorithmPlan;
use crate::blend::registry::{AlgorithmRegistry, ResolvedStep, apply_step};
use crate::foundation::error::{BlendError, BlendResult};
use crate::pixels::buffer::PixelBuffer;

/// Resolve `plan` into one step per compositing step of a `layer_count` stack.
///
/// A uniform plan is resolved once and shared by every step. A per-step plan must hold exactly
/// `layer_count - 1` descriptors. All descriptors are resolved even when the stack has a single
/// layer, so an unknown algorithm is reported regardless of stack height.
pub fn resolve_plan(
    registry: &AlgorithmRegistry,
    plan: &AlgorithmPlan,
    layer_count: usize,
) -> BlendResult<Vec<ResolvedStep>> {
    if layer_count == 0 {
        return Err(BlendError::EmptyStack);
    }
    let steps = layer_count - 1;

    match plan {
        AlgorithmPlan::Uniform(desc) => {
            let step = registry.resolve(desc)?;
            Ok(vec![step; steps])
        }
        AlgorithmPlan::PerStep(descs) => {
            if descs.len() != steps {
                return Err(BlendError::PlanLengthMismatch {
                    expected: steps,
                    actual: descs.len(),
                });
            }
            descs.iter().map(|d| registry.resolve(d)).collect()
        }
    }
}

/// Reduce `layers` (index 0 at the bottom) into a single buffer using `plan`.
pub fn composite(
    registry: &AlgorithmRegistry,
    layers: &[PixelBuffer],
    plan: &AlgorithmPlan,
) -> BlendResult<PixelBuffer> {
    let steps = resolve_plan(registry, plan, layers.len())?;
    composite_resolved(layers, &steps)
}

/// Fold `layers` through already resolved `steps`, strictly bottom-up.
///
/// `steps.len()` must be `layers.len() - 1`. Every layer must match the base layer's size; this
/// is checked before any pixel work starts so a failure never leaves a partial result behind.
pub fn composite_resolved(
    layers: &[PixelBuffer],
    steps: &[ResolvedStep],
) -> BlendResult<PixelBuffer> {
    let Some((base, rest)) = layers.split_first() else {
        return Err(BlendError::EmptyStack);
    };
    if steps.len() != rest.len() {
        return Err(BlendError::PlanLengthMismatch {
            expected: rest.len(),
            actual: steps.len(),
        });
    }
    if let Some(bad) = rest.iter().find(|l| !l.same_size(base)) {
        return Err(BlendError::DimensionMismatch {
            expected: base.dimensions(),
            actual: bad.dimensions(),
        });
    }

    let mut acc = base.clone();
    for (i, (step, top)) in steps.iter().zip(rest).enumerate() {
        debug!(step = i + 1, algorithm = step.name(), "compositing layer");
        acc = apply_step(step, &acc, top)?;
    }
    Ok(acc)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pipeline.rs"]
mod tests;
