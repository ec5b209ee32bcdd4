// SPDX-License-Identifier: AGPL-3.0-only

//! openQCD ⇄ canonical gauge field layout.
//!
//! The openQCD layout stores links only at the `volume / 2` slots of one
//! parity class. Slot `s` holds, for every direction `mu`, two records:
//!
//! | Record | Contents |
//! |--------|----------|
//! | `(s, mu, 0)` | `U_mu(x)` for the directly stored site `x` with `x / 2 = s` |
//! | `(s, mu, 1)` | `U_mu(y)` for the other-class site `y` with `y + e_mu = x` |
//!
//! Record `(s, mu, h)` sits at link index `(s · ndims + mu) · 2 + h`.
//! Which class is stored directly is [`site_parity`] with the `swap` flag.
//!
//! Conversion is a pure relayout: every record is copied verbatim, nothing
//! is recomputed. With even extents on every axis the map is a bijection, so
//! [`to_canonical`] and [`to_openqcd`] are exact inverses.
//!
//! Input and output must be disjoint; the `&mut`/`&` signatures make
//! overlap impossible.

use super::complex_f64::Complex64;
use super::constants::COMPLEX64_BYTES;
use super::field::link_index;
use super::geometry::{site_parity, Geometry};
use crate::error::Result;

/// Link index of openQCD record `(slot, mu, second)`.
#[inline]
#[must_use]
pub fn openqcd_record(geometry: &Geometry, slot: usize, mu: usize, second: bool) -> usize {
    link_index(geometry, slot, mu) * 2 + usize::from(second)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    ToCanonical,
    ToOpenQcd,
}

/// Visit every link as `(canonical link index, openQCD record index)`.
fn for_each_link(geometry: &Geometry, swap: bool, mut visit: impl FnMut(usize, usize)) {
    let ndims = geometry.ndims();
    let mut pos = vec![0; ndims];
    for site in 0..geometry.volume() {
        geometry.site_coords_into(site, &mut pos);
        if site_parity(&pos, swap) {
            for mu in 0..ndims {
                visit(
                    link_index(geometry, site, mu),
                    openqcd_record(geometry, site / 2, mu, false),
                );
            }
        } else {
            for mu in 0..ndims {
                let fwd = geometry.forward_site(site, mu);
                visit(
                    link_index(geometry, site, mu),
                    openqcd_record(geometry, fwd / 2, mu, true),
                );
            }
        }
    }
}

/// Copy `unit`-element link records between the two layouts.
fn relayout<T: Copy>(
    out: &mut [T],
    input: &[T],
    geometry: &Geometry,
    swap: bool,
    unit: usize,
    direction: Direction,
) -> Result<()> {
    geometry.require_even_extents()?;
    geometry.check_len(input.len(), unit)?;
    geometry.check_len(out.len(), unit)?;

    for_each_link(geometry, swap, |canonical, openqcd| {
        let (dst, src) = match direction {
            Direction::ToCanonical => (canonical, openqcd),
            Direction::ToOpenQcd => (openqcd, canonical),
        };
        out[dst * unit..(dst + 1) * unit].copy_from_slice(&input[src * unit..(src + 1) * unit]);
    });
    Ok(())
}

/// Reorder an openQCD-layout field into canonical layout.
///
/// # Errors
///
/// - [`LayoutError::OddExtent`](crate::error::LayoutError::OddExtent) if any extent is odd.
/// - [`LayoutError::BufferSizeMismatch`](crate::error::LayoutError::BufferSizeMismatch)
///   if either buffer is not `geometry.field_len()` long.
pub fn to_canonical(
    out: &mut [Complex64],
    input: &[Complex64],
    geometry: &Geometry,
    swap: bool,
) -> Result<()> {
    relayout(
        out,
        input,
        geometry,
        swap,
        geometry.link_len(),
        Direction::ToCanonical,
    )
}

/// Reorder a canonical-layout field into openQCD layout.
///
/// # Errors
///
/// Same conditions as [`to_canonical`].
pub fn to_openqcd(
    out: &mut [Complex64],
    input: &[Complex64],
    geometry: &Geometry,
    swap: bool,
) -> Result<()> {
    relayout(
        out,
        input,
        geometry,
        swap,
        geometry.link_len(),
        Direction::ToOpenQcd,
    )
}

/// [`to_canonical`] on raw `<c16` bytes; no alignment requirement.
///
/// # Errors
///
/// Same conditions as [`to_canonical`], with lengths counted in bytes.
pub fn to_canonical_bytes(
    out: &mut [u8],
    input: &[u8],
    geometry: &Geometry,
    swap: bool,
) -> Result<()> {
    relayout(
        out,
        input,
        geometry,
        swap,
        geometry.link_len() * COMPLEX64_BYTES,
        Direction::ToCanonical,
    )
}

/// [`to_openqcd`] on raw `<c16` bytes; no alignment requirement.
///
/// # Errors
///
/// Same conditions as [`to_canonical`], with lengths counted in bytes.
pub fn to_openqcd_bytes(
    out: &mut [u8],
    input: &[u8],
    geometry: &Geometry,
    swap: bool,
) -> Result<()> {
    relayout(
        out,
        input,
        geometry,
        swap,
        geometry.link_len() * COMPLEX64_BYTES,
        Direction::ToOpenQcd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::lattice::field::{as_bytes, hot_field};

    /// One complex element per link, tagged by its index.
    fn tagged(n: usize) -> Vec<Complex64> {
        (0..n).map(|k| Complex64::new(k as f64, 0.0)).collect()
    }

    fn tags(field: &[Complex64]) -> Vec<usize> {
        field.iter().map(|z| z.re as usize).collect()
    }

    #[test]
    fn one_dimensional_by_hand() {
        let g = Geometry::new(&[4], 1).unwrap();
        let input = tagged(4);
        let mut out = vec![Complex64::ZERO; 4];

        to_canonical(&mut out, &input, &g, false).unwrap();
        assert_eq!(tags(&out), [1, 0, 3, 2]);

        to_canonical(&mut out, &input, &g, true).unwrap();
        assert_eq!(tags(&out), [0, 3, 2, 1]);
    }

    #[test]
    fn two_dimensional_by_hand() {
        let g = Geometry::new(&[2, 2], 1).unwrap();
        let input = tagged(8);
        let mut out = vec![Complex64::ZERO; 8];
        to_canonical(&mut out, &input, &g, false).unwrap();
        assert_eq!(tags(&out), [5, 3, 0, 2, 4, 6, 1, 7]);
    }

    #[test]
    fn every_record_visited_once() {
        for (dims, swap) in [
            (vec![4, 2, 6], false),
            (vec![2, 4, 2, 2], true),
            (vec![8], false),
        ] {
            let g = Geometry::new(&dims, 1).unwrap();
            let n = g.volume() * g.ndims();
            let mut canonical_hits = vec![0u32; n];
            let mut openqcd_hits = vec![0u32; n];
            for_each_link(&g, swap, |c, o| {
                canonical_hits[c] += 1;
                openqcd_hits[o] += 1;
            });
            assert!(canonical_hits.iter().all(|&h| h == 1), "dims {dims:?}");
            assert!(openqcd_hits.iter().all(|&h| h == 1), "dims {dims:?}");
        }
    }

    #[test]
    fn roundtrip_is_exact() {
        let g = Geometry::new(&[4, 2, 2, 4], 3).unwrap();
        let original = hot_field(&g, 11);
        let mut canonical = vec![Complex64::ZERO; g.field_len()];
        let mut back = vec![Complex64::ZERO; g.field_len()];
        for swap in [false, true] {
            to_canonical(&mut canonical, &original, &g, swap).unwrap();
            to_openqcd(&mut back, &canonical, &g, swap).unwrap();
            assert_eq!(back, original, "swap = {swap}");
        }
    }

    #[test]
    fn swap_changes_the_layout() {
        let g = Geometry::new(&[2, 2, 2], 2).unwrap();
        let input = hot_field(&g, 5);
        let mut plain = vec![Complex64::ZERO; g.field_len()];
        let mut swapped = vec![Complex64::ZERO; g.field_len()];
        to_canonical(&mut plain, &input, &g, false).unwrap();
        to_canonical(&mut swapped, &input, &g, true).unwrap();
        assert_ne!(plain, swapped);
    }

    #[test]
    fn records_move_whole() {
        let g = Geometry::new(&[2, 2], 2).unwrap();
        let input = hot_field(&g, 9);
        let mut out = vec![Complex64::ZERO; g.field_len()];
        to_canonical(&mut out, &input, &g, false).unwrap();
        // canonical link 0 is U_0(0,0), stored in openQCD record 5
        assert_eq!(out[..4], input[5 * 4..6 * 4]);
    }

    #[test]
    fn bytes_match_complex_path() {
        let g = Geometry::new(&[2, 4], 3).unwrap();
        let input = hot_field(&g, 21);
        let mut out = vec![Complex64::ZERO; g.field_len()];
        to_canonical(&mut out, &input, &g, true).unwrap();

        let mut out_bytes = vec![0u8; g.field_len() * COMPLEX64_BYTES];
        to_canonical_bytes(&mut out_bytes, as_bytes(&input), &g, true).unwrap();
        assert_eq!(out_bytes.as_slice(), as_bytes(&out));

        let mut back = vec![0u8; out_bytes.len()];
        to_openqcd_bytes(&mut back, &out_bytes, &g, true).unwrap();
        assert_eq!(back.as_slice(), as_bytes(&input));
    }

    #[test]
    fn undersized_buffers_rejected() {
        let g = Geometry::new(&[2, 2], 3).unwrap();
        let input = vec![Complex64::ZERO; g.field_len() - 1];
        let mut out = vec![Complex64::ZERO; g.field_len()];
        assert_eq!(
            to_canonical(&mut out, &input, &g, false),
            Err(LayoutError::BufferSizeMismatch {
                expected: 72,
                actual: 71
            })
        );
        let input = vec![Complex64::ZERO; g.field_len()];
        let mut out = vec![Complex64::ZERO; g.field_len() + 9];
        assert!(matches!(
            to_openqcd(&mut out, &input, &g, false),
            Err(LayoutError::BufferSizeMismatch { .. })
        ));
        let mut out_bytes = vec![0u8; 10];
        assert!(matches!(
            to_canonical_bytes(&mut out_bytes, as_bytes(&input), &g, false),
            Err(LayoutError::BufferSizeMismatch { .. })
        ));
    }

    #[test]
    fn odd_extent_rejected() {
        let g = Geometry::new(&[4, 3], 1).unwrap();
        let input = vec![Complex64::ZERO; g.field_len()];
        let mut out = vec![Complex64::ZERO; g.field_len()];
        assert_eq!(
            to_canonical(&mut out, &input, &g, false),
            Err(LayoutError::OddExtent { axis: 1, extent: 3 })
        );
        assert!(out.iter().all(|z| *z == Complex64::ZERO), "nothing written");
    }
}
