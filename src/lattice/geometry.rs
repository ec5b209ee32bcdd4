// SPDX-License-Identifier: AGPL-3.0-only

//! Periodic N-dimensional lattice geometry.
//!
//! Sites are numbered row-major: the last axis varies fastest, so the
//! stride ("face") of axis `i` is `dims[i+1] * ... * dims[ndims-1]`.
//! Every offset computation in the crate goes through the strides held here.
//!
//! `LayoutParams` is the serializable form of a geometry plus the openQCD
//! parity swap, with the defaults of the openQCD convention (`ncol = 3`,
//! `swap = false`).

use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_N_COLORS;
use crate::error::{LayoutError, Result};

/// Validated lattice shape and color dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    dims: Vec<usize>,
    ncol: usize,
    faces: Vec<usize>,
    volume: usize,
    field_len: usize,
}

impl Geometry {
    /// Validate `dims` and `ncol` and precompute strides and volume.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidDimension`] when `dims` is empty, an extent is
    /// zero, `ncol` is zero, or the field length overflows `usize`.
    pub fn new(dims: &[usize], ncol: usize) -> Result<Self> {
        if dims.is_empty() {
            return Err(LayoutError::InvalidDimension(
                "ndims must be at least 1".into(),
            ));
        }
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(LayoutError::InvalidDimension(format!(
                "extent of axis {axis} must be positive"
            )));
        }
        if ncol == 0 {
            return Err(LayoutError::InvalidDimension(
                "ncol must be positive".into(),
            ));
        }

        let overflow = || LayoutError::InvalidDimension("lattice size overflows usize".into());

        let mut faces = vec![0; dims.len()];
        let mut volume = 1usize;
        for i in (0..dims.len()).rev() {
            faces[i] = volume;
            volume = volume.checked_mul(dims[i]).ok_or_else(overflow)?;
        }
        let field_len = volume
            .checked_mul(dims.len())
            .and_then(|n| n.checked_mul(ncol))
            .and_then(|n| n.checked_mul(ncol))
            .ok_or_else(overflow)?;

        Ok(Self {
            dims: dims.to_vec(),
            ncol,
            faces,
            volume,
            field_len,
        })
    }

    #[must_use]
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[must_use]
    pub const fn ncol(&self) -> usize {
        self.ncol
    }

    /// Per-axis site strides; the last axis has stride 1.
    #[must_use]
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Total number of lattice sites.
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.volume
    }

    /// Complex elements per link matrix (`ncol²`).
    #[must_use]
    pub const fn link_len(&self) -> usize {
        self.ncol * self.ncol
    }

    /// Complex elements in a full field (`volume · ndims · ncol²`).
    #[must_use]
    pub const fn field_len(&self) -> usize {
        self.field_len
    }

    /// Number of unordered direction pairs, `ndims (ndims - 1) / 2`.
    #[must_use]
    pub fn nplanes(&self) -> usize {
        self.ndims() * (self.ndims() - 1) / 2
    }

    /// Linear site index of coordinate vector `pos`.
    #[must_use]
    pub fn site_index(&self, pos: &[usize]) -> usize {
        debug_assert_eq!(pos.len(), self.ndims());
        pos.iter().zip(&self.faces).map(|(&x, &f)| x * f).sum()
    }

    /// Decompose a linear site index into `out`, last axis first.
    pub fn site_coords_into(&self, site: usize, out: &mut [usize]) {
        let mut rem = site;
        for i in (0..self.ndims()).rev() {
            out[i] = rem % self.dims[i];
            rem /= self.dims[i];
        }
    }

    /// Coordinates of a linear site index.
    #[must_use]
    pub fn site_coords(&self, site: usize) -> Vec<usize> {
        let mut pos = vec![0; self.ndims()];
        self.site_coords_into(site, &mut pos);
        pos
    }

    /// Linear index of the forward neighbor `site + e_mu` (periodic).
    ///
    /// At the last slice the axis contribution is subtracted to wrap to 0,
    /// otherwise one stride is added.
    #[must_use]
    pub fn forward_site(&self, site: usize, mu: usize) -> usize {
        let l = (site / self.faces[mu]) % self.dims[mu];
        if l + 1 == self.dims[mu] {
            site - l * self.faces[mu]
        } else {
            site + self.faces[mu]
        }
    }

    /// Write `pos + e_mu` (periodic) into `out`.
    pub fn forward_into(&self, pos: &[usize], mu: usize, out: &mut [usize]) {
        out.copy_from_slice(pos);
        out[mu] = (pos[mu] + 1) % self.dims[mu];
    }

    /// The openQCD even/odd split is a bijection only for even extents.
    ///
    /// # Errors
    ///
    /// [`LayoutError::OddExtent`] naming the first odd axis.
    pub fn require_even_extents(&self) -> Result<()> {
        match self.dims.iter().position(|d| d % 2 != 0) {
            Some(axis) => Err(LayoutError::OddExtent {
                axis,
                extent: self.dims[axis],
            }),
            None => Ok(()),
        }
    }

    /// Check that a buffer of `actual` elements holds a full field whose
    /// links are `unit` elements wide.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::BufferSizeMismatch`] on any difference.
    /// - [`LayoutError::InvalidDimension`] if the full field would not fit
    ///   in `usize` units of this width.
    pub fn check_len(&self, actual: usize, unit: usize) -> Result<()> {
        // At most field_len, since ncol >= 1.
        let links = self.volume * self.ndims();
        let expected = links.checked_mul(unit).ok_or_else(|| {
            LayoutError::InvalidDimension(format!(
                "{links} links of {unit} elements overflow usize"
            ))
        })?;
        if actual == expected {
            Ok(())
        } else {
            Err(LayoutError::BufferSizeMismatch { expected, actual })
        }
    }
}

/// Parity of a site: XOR of `x_i mod 2` over all axes, inverted by `swap`.
///
/// `true` marks the class the openQCD layout stores directly.
#[must_use]
pub fn site_parity(pos: &[usize], swap: bool) -> bool {
    pos.iter().fold(swap, |odd, &x| odd ^ (x % 2 == 1))
}

/// Odometer traversal of every lattice site.
///
/// Axis 0 turns fastest and carries into higher axes on overflow. Visits
/// `volume` positions, starting at the origin.
#[derive(Debug)]
pub struct Odometer<'a> {
    dims: &'a [usize],
    pos: Vec<usize>,
    done: bool,
}

impl<'a> Odometer<'a> {
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        Self {
            dims: geometry.dims(),
            pos: vec![0; geometry.ndims()],
            done: false,
        }
    }

    /// Current position, or `None` once every site has been visited.
    #[must_use]
    pub fn position(&self) -> Option<&[usize]> {
        if self.done {
            None
        } else {
            Some(&self.pos)
        }
    }

    /// Step to the next site. Returns `false` after the last site.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        for (x, &d) in self.pos.iter_mut().zip(self.dims) {
            *x += 1;
            if *x < d {
                return true;
            }
            *x = 0;
        }
        self.done = true;
        false
    }
}

/// Serializable layout parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    /// Lattice extents, one per direction.
    pub dims: Vec<usize>,
    /// Color dimension of each link matrix.
    #[serde(default = "default_ncol")]
    pub ncol: usize,
    /// Exchange the even and odd classes of the openQCD split.
    #[serde(default)]
    pub swap: bool,
}

const fn default_ncol() -> usize {
    DEFAULT_N_COLORS
}

impl LayoutParams {
    /// Parameters with the default color count and no swap.
    #[must_use]
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
            ncol: DEFAULT_N_COLORS,
            swap: false,
        }
    }

    /// Parse parameters from JSON, e.g. `{"dims": [8, 4, 4, 4], "swap": true}`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Config`] if the text is not valid parameter JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| LayoutError::Config(e.to_string()))
    }

    /// Validate into a [`Geometry`].
    ///
    /// # Errors
    ///
    /// See [`Geometry::new`].
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(&self.dims, self.ncol)
    }
}
