// SPDX-License-Identifier: AGPL-3.0-only

//! Canonical-layout gauge field addressing.
//!
//! A canonical field is a flat `[Complex64]` indexed by
//! (site, direction, row, column), sites in row-major coordinate order.
//! The offset of link `U_mu(x)` is
//!
//!   `(site_index(x) · ndims + mu) · ncol²`
//!
//! [`link_index`] and [`link_offset`] are the only place this formula is
//! written down. The layout converter calls [`link_index`] with linear site
//! indices, the plaquette evaluator goes through [`address`] and the views.

use super::complex_f64::Complex64;
use super::constants::lcg_gaussian;
use super::geometry::Geometry;
use crate::error::{LayoutError, Result};

/// Index of link `(site, mu)` counted in whole links.
#[inline]
#[must_use]
pub fn link_index(geometry: &Geometry, site: usize, mu: usize) -> usize {
    site * geometry.ndims() + mu
}

/// Element offset of link `(site, mu)` in a canonical field.
#[inline]
#[must_use]
pub fn link_offset(geometry: &Geometry, site: usize, mu: usize) -> usize {
    link_index(geometry, site, mu) * geometry.link_len()
}

/// Element offset of link `U_mu(pos)` in a canonical field.
#[inline]
#[must_use]
pub fn address(geometry: &Geometry, pos: &[usize], mu: usize) -> usize {
    link_offset(geometry, geometry.site_index(pos), mu)
}

/// Read-only canonical field with a length-checked buffer.
#[derive(Clone, Copy, Debug)]
pub struct CanonicalView<'a> {
    geometry: &'a Geometry,
    data: &'a [Complex64],
}

impl<'a> CanonicalView<'a> {
    /// Wrap `data`, which must hold exactly `geometry.field_len()` elements.
    ///
    /// # Errors
    ///
    /// [`LayoutError::BufferSizeMismatch`] otherwise.
    pub fn new(geometry: &'a Geometry, data: &'a [Complex64]) -> Result<Self> {
        geometry.check_len(data.len(), geometry.link_len())?;
        Ok(Self { geometry, data })
    }

    #[must_use]
    pub const fn geometry(&self) -> &'a Geometry {
        self.geometry
    }

    /// Link matrix `U_mu(pos)`, row-major `ncol × ncol`.
    #[inline]
    #[must_use]
    pub fn link(&self, pos: &[usize], mu: usize) -> &'a [Complex64] {
        let start = address(self.geometry, pos, mu);
        &self.data[start..start + self.geometry.link_len()]
    }
}

/// Mutable canonical field with a length-checked buffer.
#[derive(Debug)]
pub struct CanonicalViewMut<'a> {
    geometry: &'a Geometry,
    data: &'a mut [Complex64],
}

impl<'a> CanonicalViewMut<'a> {
    /// Wrap `data`, which must hold exactly `geometry.field_len()` elements.
    ///
    /// # Errors
    ///
    /// [`LayoutError::BufferSizeMismatch`] otherwise.
    pub fn new(geometry: &'a Geometry, data: &'a mut [Complex64]) -> Result<Self> {
        geometry.check_len(data.len(), geometry.link_len())?;
        Ok(Self { geometry, data })
    }

    /// Mutable link matrix `U_mu(pos)`.
    #[inline]
    pub fn link_mut(&mut self, pos: &[usize], mu: usize) -> &mut [Complex64] {
        let start = address(self.geometry, pos, mu);
        &mut self.data[start..start + self.geometry.link_len()]
    }
}

/// Translate a field one lattice step: `out_mu(x) = in_mu(x + e_axis)`.
///
/// # Errors
///
/// [`LayoutError::InvalidDimension`] if `axis >= ndims`,
/// [`LayoutError::BufferSizeMismatch`] if either buffer has the wrong length.
pub fn translate(
    out: &mut [Complex64],
    input: &[Complex64],
    geometry: &Geometry,
    axis: usize,
) -> Result<()> {
    let ndims = geometry.ndims();
    if axis >= ndims {
        return Err(LayoutError::InvalidDimension(format!(
            "translation axis {axis} outside 0..{ndims}"
        )));
    }
    let src = CanonicalView::new(geometry, input)?;
    let mut dst = CanonicalViewMut::new(geometry, out)?;
    let mut pos = vec![0; ndims];
    let mut fwd = vec![0; ndims];
    for site in 0..geometry.volume() {
        geometry.site_coords_into(site, &mut pos);
        geometry.forward_into(&pos, axis, &mut fwd);
        for mu in 0..ndims {
            dst.link_mut(&pos, mu).copy_from_slice(src.link(&fwd, mu));
        }
    }
    Ok(())
}

/// Byte view of a complex field, `<c16` element order.
#[must_use]
pub fn as_bytes(field: &[Complex64]) -> &[u8] {
    bytemuck::cast_slice(field)
}

/// View raw bytes as complex doubles without copying.
///
/// # Errors
///
/// [`LayoutError::ByteCast`] if the length is not a multiple of 16 bytes or
/// the buffer is not 8-byte aligned.
pub fn try_from_bytes(bytes: &[u8]) -> Result<&[Complex64]> {
    bytemuck::try_cast_slice(bytes).map_err(|e| LayoutError::ByteCast(e.to_string()))
}

/// Cold start: every link is the `ncol × ncol` identity.
#[must_use]
pub fn cold_field(geometry: &Geometry) -> Vec<Complex64> {
    let ncol = geometry.ncol();
    let mut field = vec![Complex64::ZERO; geometry.field_len()];
    for link in field.chunks_exact_mut(geometry.link_len()) {
        for i in 0..ncol {
            link[i * ncol + i] = Complex64::ONE;
        }
    }
    field
}

/// Hot start: independent N(0, 1) real and imaginary parts, reproducible
/// from `seed`. The links are not group elements.
#[must_use]
pub fn hot_field(geometry: &Geometry, seed: u64) -> Vec<Complex64> {
    let mut state = seed;
    (0..geometry.field_len())
        .map(|_| {
            let re = lcg_gaussian(&mut state);
            let im = lcg_gaussian(&mut state);
            Complex64::new(re, im)
        })
        .collect()
}
