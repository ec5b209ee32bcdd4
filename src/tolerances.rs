// SPDX-License-Identifier: AGPL-3.0-only

//! Named tolerances for the plaquette checks.
//!
//! Layout conversion is a verbatim copy and is always compared bit for bit;
//! only the floating-point observable needs thresholds.

/// Plaquette of a field whose value is known in closed form.
///
/// A handful of `ncol³` products and one normalizing division; the
/// residual is a few ulp of an O(1) number.
pub const PLAQUETTE_EXACT_ABS: f64 = 1e-12;

/// Same plaquette sum accumulated in a different order.
///
/// Parallel reduction, a split into temporal + spatial planes, or a
/// translated field all reorder the same terms. Relative to the reference sum.
pub const PLAQUETTE_SUM_ORDER_REL: f64 = 1e-10;
