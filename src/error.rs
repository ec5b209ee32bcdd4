// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for gauge field layout conversion and observables.
//!
//! Every failure is a deterministic function of the input geometry and
//! buffer sizes, so callers can pattern-match on the variant instead of
//! parsing strings. Nothing is retried.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors arising from invalid lattice geometry, buffers, or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// `ndims < 1`, a zero extent, `ncol == 0`, or a plane range outside
    /// the lattice directions.
    InvalidDimension(String),

    /// The openQCD parity split needs an even extent along every axis.
    OddExtent {
        /// Axis with the offending extent.
        axis: usize,
        /// Extent along that axis.
        extent: usize,
    },

    /// No direction pairs exist, so the plaquette average is undefined.
    DegenerateGeometry {
        /// Number of lattice dimensions supplied.
        ndims: usize,
    },

    /// Buffer length does not equal `volume * ndims * ncol²` elements.
    BufferSizeMismatch {
        /// Required number of elements.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },

    /// A raw byte buffer cannot be viewed as complex doubles.
    ByteCast(String),

    /// Layout parameters could not be parsed.
    Config(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension(msg) => write!(f, "Invalid lattice dimension: {msg}"),
            Self::OddExtent { axis, extent } => write!(
                f,
                "openQCD layout requires even extents, axis {axis} has extent {extent}"
            ),
            Self::DegenerateGeometry { ndims } => write!(
                f,
                "Plaquette needs at least one direction pair, got ndims = {ndims}"
            ),
            Self::BufferSizeMismatch { expected, actual } => write!(
                f,
                "Buffer size mismatch: expected {expected} elements, got {actual}"
            ),
            Self::ByteCast(msg) => write!(f, "Cannot view bytes as Complex64: {msg}"),
            Self::Config(msg) => write!(f, "Invalid layout parameters: {msg}"),
        }
    }
}

impl std::error::Error for LayoutError {}
