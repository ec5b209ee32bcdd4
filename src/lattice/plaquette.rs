// SPDX-License-Identifier: AGPL-3.0-only

//! Average plaquette of a canonical-layout gauge field.
//!
//! The plaquette is the smallest closed loop of links:
//!
//!   `P_μν`(x) = `U_μ`(x) `U_ν`(x+μ) `U_μ`†(x+ν) `U_ν`†(x)
//!
//! Its real trace is evaluated as Re Tr(`P1` · `P2`†) with
//!
//!   `P1` = `U_μ`(x) `U_ν`(x+μ),   `P2` = `U_ν`(x) `U_μ`(x+ν)
//!
//! so each plaquette costs two `ncol³` products and one `ncol²` contraction.
//! The average is not divided by `ncol`: a field of identity links gives
//! exactly `ncol`.
//!
//! # References
//!
//! - Wilson, PRD 10, 2445 (1974)
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 3

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::color::{matmul, re_trace_mul_adj};
use super::complex_f64::Complex64;
use super::field::CanonicalView;
use super::geometry::{Geometry, Odometer};
use crate::error::{LayoutError, Result};

/// Direction pairs `(mu, nu)` with `mu_start ≤ mu < mu_end` and
/// `mu < nu < nu_end`.
///
/// Direction 0 is time in the openQCD convention, so
/// [`Planes::temporal`] and [`Planes::spatial`] split the full set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planes {
    /// First direction `mu` included.
    pub mu_start: usize,
    /// One past the last direction `mu`.
    pub mu_end: usize,
    /// One past the last partner direction `nu`.
    pub nu_end: usize,
}

impl Planes {
    /// Every unordered pair of distinct directions.
    #[must_use]
    pub const fn all(ndims: usize) -> Self {
        Self {
            mu_start: 0,
            mu_end: ndims,
            nu_end: ndims,
        }
    }

    /// Pairs containing direction 0.
    #[must_use]
    pub const fn temporal(ndims: usize) -> Self {
        Self {
            mu_start: 0,
            mu_end: if ndims > 0 { 1 } else { 0 },
            nu_end: ndims,
        }
    }

    /// Pairs not containing direction 0.
    #[must_use]
    pub const fn spatial(ndims: usize) -> Self {
        Self {
            mu_start: if ndims > 0 { 1 } else { 0 },
            mu_end: ndims,
            nu_end: ndims,
        }
    }

    /// Number of selected pairs per site.
    #[must_use]
    pub fn count(&self) -> usize {
        (self.mu_start..self.mu_end)
            .map(|mu| self.nu_end.saturating_sub(mu + 1))
            .sum()
    }

    fn validate(&self, ndims: usize) -> Result<()> {
        if self.mu_start > self.mu_end || self.mu_end > ndims || self.nu_end > ndims {
            return Err(LayoutError::InvalidDimension(format!(
                "plane selection mu {}..{}, nu < {} outside 0..{ndims}",
                self.mu_start, self.mu_end, self.nu_end
            )));
        }
        if self.count() == 0 {
            return Err(LayoutError::DegenerateGeometry { ndims });
        }
        Ok(())
    }
}

/// Plaquette sum, number of plaquettes, and their average.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaquetteSummary {
    /// Σ Re Tr `P_μν`(x) over the selected plaquettes.
    pub sum: f64,
    /// Number of plaquettes measured.
    pub count: usize,
    /// `sum / count`.
    pub average: f64,
}

/// Per-call scratch: neighbor coordinates and the two half-loop products.
struct Scratch {
    x_mu: Vec<usize>,
    x_nu: Vec<usize>,
    p1: Vec<Complex64>,
    p2: Vec<Complex64>,
}

impl Scratch {
    fn new(geometry: &Geometry) -> Self {
        Self {
            x_mu: vec![0; geometry.ndims()],
            x_nu: vec![0; geometry.ndims()],
            p1: vec![Complex64::ZERO; geometry.link_len()],
            p2: vec![Complex64::ZERO; geometry.link_len()],
        }
    }
}

/// Σ Re Tr over the selected plaquettes rooted at `pos`.
fn site_sum(view: &CanonicalView<'_>, pos: &[usize], planes: Planes, s: &mut Scratch) -> f64 {
    let geometry = view.geometry();
    let ncol = geometry.ncol();
    let mut sum = 0.0;
    for mu in planes.mu_start..planes.mu_end {
        geometry.forward_into(pos, mu, &mut s.x_mu);
        for nu in (mu + 1)..planes.nu_end {
            geometry.forward_into(pos, nu, &mut s.x_nu);
            matmul(&mut s.p1, view.link(pos, mu), view.link(&s.x_mu, nu), ncol);
            matmul(&mut s.p2, view.link(pos, nu), view.link(&s.x_nu, mu), ncol);
            sum += re_trace_mul_adj(&s.p1, &s.p2);
        }
    }
    sum
}

fn summarize(sum: f64, geometry: &Geometry, planes: Planes) -> PlaquetteSummary {
    let count = geometry.volume() * planes.count();
    PlaquetteSummary {
        sum,
        count,
        average: sum / count as f64,
    }
}

/// Plaquette sum over `planes`, visiting sites with an odometer.
///
/// # Errors
///
/// - [`LayoutError::InvalidDimension`] if `planes` reaches past `ndims`.
/// - [`LayoutError::DegenerateGeometry`] if `planes` selects no pair
///   (always the case for `ndims = 1`).
/// - [`LayoutError::BufferSizeMismatch`] if `u` is not `geometry.field_len()` long.
pub fn plaquette_summary(
    u: &[Complex64],
    geometry: &Geometry,
    planes: Planes,
) -> Result<PlaquetteSummary> {
    planes.validate(geometry.ndims())?;
    let view = CanonicalView::new(geometry, u)?;

    let mut scratch = Scratch::new(geometry);
    let mut odometer = Odometer::new(geometry);
    let mut sum = 0.0;
    while let Some(pos) = odometer.position() {
        sum += site_sum(&view, pos, planes, &mut scratch);
        odometer.advance();
    }
    Ok(summarize(sum, geometry, planes))
}

/// Average Re Tr `P_μν`(x) over all sites and all pairs `mu < nu`.
///
/// # Errors
///
/// See [`plaquette_summary`]; `ndims < 2` gives
/// [`LayoutError::DegenerateGeometry`].
pub fn plaquette(u: &[Complex64], geometry: &Geometry) -> Result<f64> {
    plaquette_summary(u, geometry, Planes::all(geometry.ndims())).map(|s| s.average)
}

/// [`plaquette_summary`] with sites distributed over the rayon pool.
///
/// Agrees with the serial result up to floating-point summation order.
///
/// # Errors
///
/// See [`plaquette_summary`].
pub fn par_plaquette_summary(
    u: &[Complex64],
    geometry: &Geometry,
    planes: Planes,
) -> Result<PlaquetteSummary> {
    planes.validate(geometry.ndims())?;
    let view = CanonicalView::new(geometry, u)?;

    let sum: f64 = (0..geometry.volume())
        .into_par_iter()
        .map_init(
            || (vec![0; geometry.ndims()], Scratch::new(geometry)),
            |(pos, scratch), site| {
                geometry.site_coords_into(site, pos);
                site_sum(&view, pos, planes, scratch)
            },
        )
        .sum();
    Ok(summarize(sum, geometry, planes))
}

/// [`plaquette`] with sites distributed over the rayon pool.
///
/// # Errors
///
/// See [`plaquette_summary`].
pub fn par_plaquette(u: &[Complex64], geometry: &Geometry) -> Result<f64> {
    par_plaquette_summary(u, geometry, Planes::all(geometry.ndims())).map(|s| s.average)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::field::{cold_field, hot_field, CanonicalViewMut};
    use crate::tolerances;

    #[test]
    fn cold_start_plaquette_is_ncol() {
        for ncol in 1..=4 {
            let g = Geometry::new(&[4, 2, 2, 4], ncol).unwrap();
            let p = plaquette(&cold_field(&g), &g).unwrap();
            assert_eq!(p, ncol as f64, "ncol = {ncol}");
        }
    }

    #[test]
    fn u1_two_by_two_is_one() {
        let g = Geometry::new(&[2, 2], 1).unwrap();
        let u = vec![Complex64::ONE; g.field_len()];
        assert_eq!(plaquette(&u, &g).unwrap(), 1.0);
    }

    #[test]
    fn u1_single_flux_plaquette() {
        // One link at -1 flips the two plaquettes that contain it.
        let g = Geometry::new(&[4, 4], 1).unwrap();
        let mut u = vec![Complex64::ONE; g.field_len()];
        let mut view = CanonicalViewMut::new(&g, &mut u).unwrap();
        view.link_mut(&[1, 2], 0)[0] = Complex64::new(-1.0, 0.0);
        let s = plaquette_summary(&u, &g, Planes::all(2)).unwrap();
        assert_eq!(s.count, 16);
        assert_eq!(s.sum, 16.0 - 4.0);
    }

    #[test]
    fn u1_phase_gives_cosine() {
        // U_0 = e^{iθ} on the x_1 = 0 slice: the plaquettes at x_1 = 0 and
        // x_1 = 3 each pick up a phase of ±θ.
        let g = Geometry::new(&[2, 4], 1).unwrap();
        let theta = 0.7_f64;
        let mut u = vec![Complex64::ONE; g.field_len()];
        let mut view = CanonicalViewMut::new(&g, &mut u).unwrap();
        for x0 in 0..2 {
            view.link_mut(&[x0, 0], 0)[0] = Complex64::new(theta.cos(), theta.sin());
        }
        let p = plaquette(&u, &g).unwrap();
        let expected = (4.0 + 4.0 * theta.cos()) / 8.0;
        assert!(
            (p - expected).abs() < tolerances::PLAQUETTE_EXACT_ABS,
            "got {p}, expected {expected}"
        );
    }

    #[test]
    fn one_dimension_is_degenerate() {
        let g = Geometry::new(&[4], 3).unwrap();
        let u = cold_field(&g);
        assert_eq!(
            plaquette(&u, &g),
            Err(LayoutError::DegenerateGeometry { ndims: 1 })
        );
        assert_eq!(
            par_plaquette(&u, &g),
            Err(LayoutError::DegenerateGeometry { ndims: 1 })
        );
    }

    #[test]
    fn undersized_buffer_rejected() {
        let g = Geometry::new(&[2, 2, 2], 2).unwrap();
        let u = vec![Complex64::ONE; g.field_len() - 4];
        assert_eq!(
            plaquette(&u, &g),
            Err(LayoutError::BufferSizeMismatch {
                expected: g.field_len(),
                actual: g.field_len() - 4
            })
        );
    }

    #[test]
    fn plane_counts() {
        assert_eq!(Planes::all(4).count(), 6);
        assert_eq!(Planes::temporal(4).count(), 3);
        assert_eq!(Planes::spatial(4).count(), 3);
        assert_eq!(Planes::all(1).count(), 0);
        assert_eq!(Planes::spatial(2).count(), 0);
    }

    #[test]
    fn temporal_plus_spatial_is_total() {
        let g = Geometry::new(&[2, 4, 2, 2], 3).unwrap();
        let u = hot_field(&g, 77);
        let all = plaquette_summary(&u, &g, Planes::all(4)).unwrap();
        let t = plaquette_summary(&u, &g, Planes::temporal(4)).unwrap();
        let s = plaquette_summary(&u, &g, Planes::spatial(4)).unwrap();
        assert_eq!(all.count, t.count + s.count);
        let scale = all.sum.abs().max(1.0);
        assert!((all.sum - (t.sum + s.sum)).abs() < tolerances::PLAQUETTE_SUM_ORDER_REL * scale);
    }

    #[test]
    fn planes_out_of_range_rejected() {
        let g = Geometry::new(&[2, 2], 1).unwrap();
        let u = cold_field(&g);
        let bad = Planes {
            mu_start: 0,
            mu_end: 3,
            nu_end: 3,
        };
        assert!(matches!(
            plaquette_summary(&u, &g, bad),
            Err(LayoutError::InvalidDimension(_))
        ));
        assert_eq!(
            plaquette_summary(&u, &g, Planes::spatial(2)),
            Err(LayoutError::DegenerateGeometry { ndims: 2 })
        );
    }

    #[test]
    fn parallel_matches_serial() {
        let g = Geometry::new(&[4, 2, 4, 2], 3).unwrap();
        let u = hot_field(&g, 1234);
        let serial = plaquette_summary(&u, &g, Planes::all(4)).unwrap();
        let parallel = par_plaquette_summary(&u, &g, Planes::all(4)).unwrap();
        assert_eq!(serial.count, parallel.count);
        let scale = serial.sum.abs().max(1.0);
        assert!(
            (serial.sum - parallel.sum).abs() < tolerances::PLAQUETTE_SUM_ORDER_REL * scale,
            "serial {} vs parallel {}",
            serial.sum,
            parallel.sum
        );
    }
}
