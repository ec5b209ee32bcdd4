// SPDX-License-Identifier: AGPL-3.0-only

//! Lattice gauge fields in memory: layout and the plaquette observable.
//!
//! A gauge field on a periodic N-dimensional lattice stores one
//! `ncol × ncol` complex link matrix per (site, direction). Two memory
//! layouts are supported:
//!
//! | Layout | Site order | Links stored at |
//! |--------|-----------|-----------------|
//! | canonical | row-major coordinates | every site, directions contiguous |
//! | openQCD | one parity class, `volume / 2` slots | each slot: own link + backward neighbor's link |
//!
//! Data flow: a reader hands over an openQCD buffer, [`layout::to_canonical`]
//! reorders it, and [`plaquette::plaquette`] measures the canonical field.
//! [`layout::to_openqcd`] is the exact inverse for writers.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `complex_f64` | `<c16` complex element, zero-copy byte views |
//! | `constants` | color default, element width, LCG PRNG |
//! | `geometry` | extents, strides, parity, odometer, layout parameters |
//! | `field` | canonical link addressing and views |
//! | `color` | dense `ncol × ncol` matrix kernels |
//! | `layout` | openQCD ⇄ canonical conversion |
//! | `plaquette` | average plaquette, serial and rayon-parallel |

/// Dense `ncol × ncol` complex matrix product and trace contraction.
pub mod color;
/// Complex f64 (re, im), `#[repr(C)]` and `bytemuck::Pod`.
pub mod complex_f64;
/// Color default, element width, and the LCG PRNG for synthetic fields.
pub mod constants;
/// Canonical link addressing, typed views, cold/hot fields.
pub mod field;
/// Lattice extents, strides, site parity, odometer traversal.
pub mod geometry;
/// openQCD ⇄ canonical layout conversion.
pub mod layout;
/// Average plaquette over all or selected planes.
pub mod plaquette;
