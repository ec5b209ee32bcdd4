// SPDX-License-Identifier: AGPL-3.0-only

//! Dense `ncol × ncol` complex matrix kernels for link variables.
//!
//! Links are row-major slices of `ncol²` [`Complex64`] values taken straight
//! out of a canonical field, so these kernels work for any color count:
//! U(1) (`ncol = 1`), SU(2), SU(3), and beyond.

use super::complex_f64::Complex64;

/// `m = a · b`, plain triple loop.
///
/// `m` cannot alias `a` or `b`: it is the only mutable borrow.
pub fn matmul(m: &mut [Complex64], a: &[Complex64], b: &[Complex64], ncol: usize) {
    debug_assert_eq!(m.len(), ncol * ncol);
    debug_assert_eq!(a.len(), ncol * ncol);
    debug_assert_eq!(b.len(), ncol * ncol);
    for i in 0..ncol {
        let row = &a[i * ncol..(i + 1) * ncol];
        for j in 0..ncol {
            let mut s = Complex64::ZERO;
            for (k, &aik) in row.iter().enumerate() {
                s += aik * b[k * ncol + j];
            }
            m[i * ncol + j] = s;
        }
    }
}

/// Re Tr(`p · q`†) = Σ\_ij Re(`p_ij` conj(`q_ij`)).
///
/// Avoids forming the adjoint or the product.
#[must_use]
pub fn re_trace_mul_adj(p: &[Complex64], q: &[Complex64]) -> f64 {
    debug_assert_eq!(p.len(), q.len());
    p.iter().zip(q).map(|(&x, &y)| x.re_mul_conj(y)).sum()
}
