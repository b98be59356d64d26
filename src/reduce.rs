use crate::Q;

/// `q^-1 mod 2^16` as a signed 16-bit value.
const QINV: i16 = -3327;


/// Montgomery reduction: for `a` with `|a| <= q * 2^15`, computes a 16-bit
/// integer congruent to `a * R^-1 mod q` where `R = 2^16`, in `(-q, q)`.
///
/// The low half of `a` is multiplied by `q^-1` with wrapping 16-bit semantics,
/// and the quotient estimate is cleared out of `a` with an arithmetic right
/// shift of the signed 32-bit difference.
#[inline(always)]
#[allow(clippy::inline_always, clippy::cast_possible_truncation)]
pub(crate) fn montgomery_reduce(a: i32) -> i16 {
    let u = (a as i16).wrapping_mul(QINV);
    ((a - i32::from(u) * i32::from(Q)) >> 16) as i16
}


/// Barrett reduction: computes the centered representative congruent to
/// `a mod q` in `[-(q-1)/2, (q-1)/2]`.
#[inline(always)]
#[allow(clippy::inline_always, clippy::cast_possible_truncation)]
pub(crate) fn barrett_reduce(a: i16) -> i16 {
    const V: i32 = ((1 << 26) + (Q as i32) / 2) / (Q as i32);
    let t = ((V * i32::from(a) + (1 << 25)) >> 26) as i16;
    (i32::from(a) - i32::from(t) * i32::from(Q)) as i16
}


#[cfg(test)]
mod tests {
    use super::{barrett_reduce, montgomery_reduce, QINV};
    use crate::Q;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_constants() {
        // q^-1 * q == 1 mod 2^16
        assert_eq!(QINV.wrapping_mul(Q), 1);
    }

    #[test]
    fn test_montgomery_congruence_and_range() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let bound = i32::from(Q) << 15;
        for _ in 0..10_000 {
            let a = rng.gen_range(-bound..bound);
            let t = montgomery_reduce(a);
            assert!(t > -Q && t < Q, "montgomery output {t} out of (-q, q)");
            // t * R == a mod q
            assert_eq!((i64::from(t) * 65_536 - i64::from(a)).rem_euclid(i64::from(Q)), 0);
        }
    }

    #[test]
    fn test_barrett_congruence_and_range() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        for _ in 0..10_000 {
            let a: i16 = rng.gen();
            let t = barrett_reduce(a);
            assert!(t >= -(Q - 1) / 2 && t <= (Q - 1) / 2, "barrett output {t} not centered");
            assert_eq!((i32::from(a) - i32::from(t)).rem_euclid(i32::from(Q)), 0);
        }
    }
}
