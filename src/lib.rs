// SPDX-License-Identifier: AGPL-3.0-only

//! Lattice gauge field layout conversion and the average plaquette.
//!
//! Converts gauge configurations between the openQCD even/odd layout and
//! the canonical lexicographic layout, and evaluates the average plaquette
//! of a canonical field for any number of dimensions and colors.
//! Buffers are owned by the caller; nothing here touches files.
//!
//! ```
//! use gauge_layout::lattice::{field, geometry::Geometry, layout, plaquette};
//! use gauge_layout::Complex64;
//!
//! let geometry = Geometry::new(&[4, 4, 4, 4], 3)?;
//! let openqcd = field::cold_field(&geometry);
//! let mut canonical = vec![Complex64::ZERO; geometry.field_len()];
//! layout::to_canonical(&mut canonical, &openqcd, &geometry, false)?;
//! assert_eq!(plaquette::plaquette(&canonical, &geometry)?, 3.0);
//! # Ok::<(), gauge_layout::error::LayoutError>(())
//! ```
//!
//! ## Modules
//!   - `lattice`: geometry, layout conversion, plaquette
//!   - `error`: `LayoutError`
//!   - `tolerances`: named numeric thresholds
//!   - `validation`: pass/fail harness for `validate_gauge_layout`

pub mod error;
pub mod lattice;
pub mod tolerances;
pub mod validation;

pub use error::{LayoutError, Result};
pub use lattice::complex_f64::Complex64;
pub use lattice::geometry::{site_parity, Geometry, LayoutParams};
pub use lattice::layout::{to_canonical, to_openqcd};
pub use lattice::plaquette::{plaquette, Planes, PlaquetteSummary};
