//! Static nonlinear basis functions of a Hammerstein group model.
//!
//! Each branch of the model applies one of these to the input before its
//! linear filter. Sine-sweep identification pairs with the power series,
//! cosine-sweep identification with Chebyshev polynomials of the first kind,
//! because `T_n(cos θ) = cos(nθ)` maps each branch onto exactly one harmonic.

use serde::{Deserialize, Serialize};

use crate::Signal;

/// Family of basis functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonlinearFamily {
    /// `x^n`
    Power,
    /// Chebyshev polynomial of the first kind, `T_n(x)`
    Chebyshev,
}

impl core::fmt::Display for NonlinearFamily {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NonlinearFamily::Power => f.write_str("power"),
            NonlinearFamily::Chebyshev => f.write_str("chebyshev"),
        }
    }
}

/// One basis function: a family and a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonlinearFunction {
    family: NonlinearFamily,
    degree: usize,
}

impl NonlinearFunction {
    /// Create a basis function.
    pub fn new(family: NonlinearFamily, degree: usize) -> Self {
        Self { family, degree }
    }

    /// `x^degree`
    pub fn power(degree: usize) -> Self {
        Self::new(NonlinearFamily::Power, degree)
    }

    /// `T_degree(x)`
    pub fn chebyshev(degree: usize) -> Self {
        Self::new(NonlinearFamily::Chebyshev, degree)
    }

    /// Family of this function.
    pub fn family(&self) -> NonlinearFamily {
        self.family
    }

    /// Degree of this function. Also the highest harmonic it produces.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluate at one point.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.family {
            NonlinearFamily::Power => x.powi(self.degree as i32),
            NonlinearFamily::Chebyshev => chebyshev_t(self.degree, x),
        }
    }

    /// Apply sample-wise to every channel of a signal.
    pub fn apply(&self, signal: &Signal) -> Signal {
        signal.map(|x| self.evaluate(x))
    }
}

/// Chebyshev polynomial of the first kind via the three-term recurrence
/// `T_{n+1} = 2x·T_n − T_{n−1}`.
fn chebyshev_t(degree: usize, x: f64) -> f64 {
    match degree {
        0 => 1.0,
        1 => x,
        _ => {
            let (mut prev, mut curr) = (1.0, x);
            for _ in 1..degree {
                let next = 2.0 * x * curr - prev;
                prev = curr;
                curr = next;
            }
            curr
        }
    }
}

/// Map branch indices to basis functions of one family.
///
/// The output follows the caller's order exactly, so `[3, 1, 5]` yields
/// degrees 3, 1, 5 in that order.
pub fn select_for(branches: &[usize], family: NonlinearFamily) -> Vec<NonlinearFunction> {
    branches
        .iter()
        .map(|&degree| NonlinearFunction::new(family, degree))
        .collect()
}
