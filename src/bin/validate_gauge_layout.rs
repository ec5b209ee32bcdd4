// SPDX-License-Identifier: AGPL-3.0-only

//! Gauge field layout and plaquette validation.
//!
//! Builds synthetic configurations in memory, pushes them through the
//! openQCD ⇄ canonical conversion, and checks the plaquette against values
//! known in closed form.
//!
//! # Validation targets
//!
//! | Observable | Expected | Tolerance | Basis |
//! |-----------|----------|-----------|-------|
//! | Cold plaquette, SU(3) 8·4³ | 3.0 | exact | Tr 1 = ncol |
//! | Cold plaquette, U(1) 2² | 1.0 | exact | Definition |
//! | openQCD roundtrip | bitwise | exact | Relayout is a permutation |
//! | Translated plaquette | unchanged | summation order | Periodicity |
//! | Serial vs rayon | unchanged | summation order | Same terms |
//! | Invalid inputs | rejected | n/a | Typed errors |

use gauge_layout::lattice::constants::COMPLEX64_BYTES;
use gauge_layout::lattice::field::{as_bytes, cold_field, hot_field, translate};
use gauge_layout::lattice::geometry::{Geometry, LayoutParams};
use gauge_layout::lattice::layout::{to_canonical, to_canonical_bytes, to_openqcd};
use gauge_layout::lattice::plaquette::{
    par_plaquette_summary, plaquette, plaquette_summary, Planes,
};
use gauge_layout::tolerances;
use gauge_layout::validation::ValidationHarness;
use gauge_layout::{Complex64, LayoutError};

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Gauge Field Layout Validation                              ║");
    println!("║  openQCD ⇄ canonical relayout + average plaquette           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("gauge_layout");

    let params = LayoutParams::new(&[8, 4, 4, 4]);
    let geometry = match params.geometry() {
        Ok(g) => g,
        Err(e) => {
            println!("  geometry setup failed: {e}");
            harness.check_bool("geometry setup", false);
            harness.finish();
        }
    };

    cold_start(&mut harness, &geometry);
    roundtrip(&mut harness, &geometry);
    observables(&mut harness, &geometry);
    rejections(&mut harness);

    harness.finish();
}

fn cold_start(harness: &mut ValidationHarness, geometry: &Geometry) {
    println!("═══ Cold Start ═══");
    let openqcd = cold_field(geometry);
    let mut canonical = vec![Complex64::ZERO; geometry.field_len()];
    let converted = to_canonical(&mut canonical, &openqcd, geometry, false);
    harness.check_bool("cold field converts", converted.is_ok());

    match plaquette(&canonical, geometry) {
        Ok(p) => {
            println!("  SU(3) plaquette: {p:.12} (expected 3.0)");
            harness.check_abs(
                "cold plaquette SU(3)",
                p,
                3.0,
                tolerances::PLAQUETTE_EXACT_ABS,
            );
        }
        Err(e) => {
            println!("  SU(3) plaquette failed: {e}");
            harness.check_bool("cold plaquette SU(3)", false);
        }
    }

    let u1 = Geometry::new(&[2, 2], 1).map(|g| {
        let links = vec![Complex64::ONE; g.field_len()];
        plaquette(&links, &g)
    });
    match u1 {
        Ok(Ok(p)) => {
            println!("  U(1) 2x2 plaquette: {p:.12} (expected 1.0)");
            harness.check_abs(
                "cold plaquette U(1)",
                p,
                1.0,
                tolerances::PLAQUETTE_EXACT_ABS,
            );
        }
        Ok(Err(e)) | Err(e) => {
            println!("  U(1) plaquette failed: {e}");
            harness.check_bool("cold plaquette U(1)", false);
        }
    }
    println!();
}

fn roundtrip(harness: &mut ValidationHarness, geometry: &Geometry) {
    println!("═══ openQCD Roundtrip ═══");
    let original = hot_field(geometry, 42);
    let mut canonical = vec![Complex64::ZERO; geometry.field_len()];
    let mut back = vec![Complex64::ZERO; geometry.field_len()];

    for swap in [false, true] {
        let ok = to_canonical(&mut canonical, &original, geometry, swap)
            .and_then(|()| to_openqcd(&mut back, &canonical, geometry, swap))
            .is_ok();
        let exact = ok && as_bytes(&back) == as_bytes(&original);
        println!("  swap={swap}: bitwise roundtrip {exact}");
        harness.check_bool(&format!("roundtrip swap={swap}"), exact);
    }

    let mut via_bytes = vec![0u8; geometry.field_len() * COMPLEX64_BYTES];
    let bytes_ok = to_canonical_bytes(&mut via_bytes, as_bytes(&original), geometry, true)
        .and_then(|()| to_canonical(&mut canonical, &original, geometry, true))
        .is_ok();
    harness.check_bool(
        "byte path matches complex path",
        bytes_ok && via_bytes.as_slice() == as_bytes(&canonical),
    );
    println!();
}

fn observables(harness: &mut ValidationHarness, geometry: &Geometry) {
    println!("═══ Plaquette Invariances ═══");
    let ndims = geometry.ndims();
    let u = hot_field(geometry, 7);
    let Ok(reference) = plaquette_summary(&u, geometry, Planes::all(ndims)) else {
        harness.check_bool("hot plaquette", false);
        return;
    };
    println!(
        "  hot plaquette: sum={:.6e} count={} avg={:.6e}",
        reference.sum, reference.count, reference.average
    );

    let mut shifted = vec![Complex64::ZERO; geometry.field_len()];
    for axis in 0..ndims {
        let label = format!("translated plaquette axis {axis}");
        let p = translate(&mut shifted, &u, geometry, axis)
            .and_then(|()| plaquette_summary(&shifted, geometry, Planes::all(ndims)));
        match p {
            Ok(p) => harness.check_rel(
                &label,
                p.sum,
                reference.sum,
                tolerances::PLAQUETTE_SUM_ORDER_REL,
            ),
            Err(_) => harness.check_bool(&label, false),
        }
    }

    match par_plaquette_summary(&u, geometry, Planes::all(ndims)) {
        Ok(p) => {
            println!("  rayon threads: {}", rayon::current_num_threads());
            harness.check_rel(
                "rayon plaquette",
                p.sum,
                reference.sum,
                tolerances::PLAQUETTE_SUM_ORDER_REL,
            );
        }
        Err(_) => harness.check_bool("rayon plaquette", false),
    }

    let temporal = plaquette_summary(&u, geometry, Planes::temporal(ndims));
    let spatial = plaquette_summary(&u, geometry, Planes::spatial(ndims));
    match (temporal, spatial) {
        (Ok(t), Ok(s)) => harness.check_rel(
            "temporal + spatial",
            t.sum + s.sum,
            reference.sum,
            tolerances::PLAQUETTE_SUM_ORDER_REL,
        ),
        _ => harness.check_bool("temporal + spatial", false),
    }
    println!();
}

fn rejections(harness: &mut ValidationHarness) {
    println!("═══ Rejected Inputs ═══");
    let degenerate = Geometry::new(&[4], 3)
        .and_then(|g| plaquette(&cold_field(&g), &g));
    println!("  ndims=1 plaquette: {degenerate:?}");
    let rejected = matches!(degenerate, Err(LayoutError::DegenerateGeometry { .. }));
    harness.check_bool("ndims=1 plaquette rejected", rejected);

    let undersized = Geometry::new(&[2, 2, 2, 2], 3).and_then(|g| {
        let input = vec![Complex64::ZERO; g.field_len() - 1];
        let mut out = vec![Complex64::ZERO; g.field_len()];
        to_canonical(&mut out, &input, &g, false)
    });
    println!("  undersized buffer: {undersized:?}");
    let rejected = matches!(undersized, Err(LayoutError::BufferSizeMismatch { .. }));
    harness.check_bool("undersized buffer rejected", rejected);

    let odd = Geometry::new(&[4, 3], 1).and_then(|g| {
        let input = vec![Complex64::ZERO; g.field_len()];
        let mut out = vec![Complex64::ZERO; g.field_len()];
        to_canonical(&mut out, &input, &g, false)
    });
    println!("  odd extent: {odd:?}");
    let rejected = matches!(odd, Err(LayoutError::OddExtent { axis: 1, extent: 3 }));
    harness.check_bool("odd extent rejected", rejected);

    let no_colors = Geometry::new(&[2, 2], 0);
    println!("  ncol=0: {no_colors:?}");
    let rejected = matches!(no_colors, Err(LayoutError::InvalidDimension(_)));
    harness.check_bool("ncol=0 rejected", rejected);
    println!();
}
