//! Kernel length normalization

use hgm_core::Signal;

/// Truncate or zero-pad `kernel` to `target` samples.
///
/// `None` returns the kernel unchanged. Samples inside the overlapping range
/// are never modified, and applying the same target twice is a no-op.
pub fn normalize(kernel: &Signal, target: Option<usize>) -> Signal {
    match target {
        Some(len) if len != kernel.len() => kernel.resize(len),
        _ => kernel.clone(),
    }
}
