//! Random polynomials over Zr, evaluation, and Lagrange interpolation —
//! the machinery `spec.md` S:4.3 and S:4.7 describe as shared between
//! Encrypt's share distribution and Decrypt's reconstruction.

use crate::pairing::Zr;

/// `randomPolynomial(degree, constantTerm)`: `[constantTerm, a_1, ..., a_d]`
/// with each `a_i` uniform in Zr.
pub fn random_polynomial(degree: usize, constant_term: Zr) -> Vec<Zr> {
    let mut coeffs = Vec::with_capacity(degree + 1);
    coeffs.push(constant_term);
    for _ in 0..degree {
        coeffs.push(Zr::random());
    }
    coeffs
}

/// Evaluates `poly` at `x` via Horner's method: `poly[0] + x*(poly[1] + ...)`.
pub fn eval(poly: &[Zr], x: Zr) -> Zr {
    let mut acc = Zr::zero();
    for coeff in poly.iter().rev() {
        acc = acc * x + *coeff;
    }
    acc
}

/// The standard Lagrange coefficient at 0: `Delta_{i,S}(0) = prod_{j in S, j
/// != i} (-j)/(i-j)`. Deliberately written with the `(-j)/(i-j)` form
/// rather than the sign-equivalent `j/(j-i)` — `spec.md` S:4.3 calls out
/// that the two only agree up to parity of `|S|-1` and the wrong one is a
/// classic trap.
pub fn lagrange_coefficient(i: Zr, s: &[Zr]) -> Zr {
    let mut result = Zr::one();
    for &j in s {
        if j != i {
            let numerator = j.neg();
            let denominator = i - j;
            let inv = denominator
                .inverse()
                .expect("Lagrange set must not contain duplicate points");
            result = result * (numerator * inv);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_matches_naive_sum() {
        let poly = vec![Zr::from_u64(3), Zr::from_u64(5), Zr::from_u64(7)];
        let x = Zr::from_u64(2);
        // 3 + 5*2 + 7*4 = 41
        assert_eq!(eval(&poly, x), Zr::from_u64(41));
    }

    #[test]
    fn lagrange_reconstructs_constant_term() {
        let degree = 3;
        let secret = Zr::random();
        let poly = random_polynomial(degree, secret);
        let points: Vec<Zr> = (1..=(degree as u64 + 1)).map(Zr::from_u64).collect();
        let shares: Vec<Zr> = points.iter().map(|&x| eval(&poly, x)).collect();

        let mut recovered = Zr::zero();
        for (idx, &point) in points.iter().enumerate() {
            let coeff = lagrange_coefficient(point, &points);
            recovered = recovered + coeff * shares[idx];
        }
        assert_eq!(recovered, secret);
    }

    #[test]
    fn constant_polynomial_is_the_secret_everywhere() {
        let secret = Zr::random();
        let poly = random_polynomial(0, secret);
        assert_eq!(eval(&poly, Zr::from_u64(1)), secret);
        assert_eq!(eval(&poly, Zr::from_u64(42)), secret);
    }
}
