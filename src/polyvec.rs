use crate::poly::{Domain, Normal, Ntt, Poly};
use crate::{N, Q};

/// A length-K vector of ring elements, all in the same domain `D`.
#[derive(Clone, Copy)]
pub(crate) struct PolyVec<const K: usize, D: Domain> {
    pub(crate) vec: [Poly<D>; K],
}


impl<const K: usize, D: Domain> PolyVec<K, D> {
    pub(crate) fn zero() -> Self {
        Self { vec: [Poly::zero(); K] }
    }

    /// Element-wise vector sum; no reduction is performed.
    #[must_use]
    pub(crate) fn add(&self, other: &Self) -> Self {
        Self { vec: core::array::from_fn(|i| self.vec[i].add(&other.vec[i])) }
    }

    /// Barrett-reduce every coefficient of every element.
    pub(crate) fn reduce(&mut self) {
        for p in &mut self.vec {
            p.reduce();
        }
    }

    /// Serialize all K elements, 384 bytes each.
    pub(crate) fn to_bytes(&self, r: &mut [u8]) {
        debug_assert_eq!(r.len(), 384 * K, "polyvec serialization needs 384*K bytes");
        for (i, chunk) in r.chunks_mut(384).enumerate() {
            self.vec[i].to_bytes(chunk);
        }
    }

    /// Deserialize all K elements; inverse of `to_bytes`.
    pub(crate) fn from_bytes(a: &[u8]) -> Self {
        debug_assert_eq!(a.len(), 384 * K, "polyvec deserialization needs 384*K bytes");
        Self { vec: core::array::from_fn(|i| Poly::from_bytes(&a[384 * i..384 * (i + 1)])) }
    }
}


impl<const K: usize> PolyVec<K, Normal> {
    /// Forward NTT applied to each element.
    #[must_use]
    pub(crate) fn ntt(self) -> PolyVec<K, Ntt> {
        PolyVec { vec: self.vec.map(Poly::ntt) }
    }

    /// Lossy d-bit compression and serialization of all K elements;
    /// d = 10 (320 bytes per element) or d = 11 (352 bytes per element),
    /// selected by the compression width `du`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn compress(&self, r: &mut [u8], du: u32) {
        debug_assert_eq!(r.len(), 32 * du as usize * K, "polyvec compression length mismatch");
        let q = u32::from(Q as u16);
        match du {
            10 => {
                let mut t = [0u16; 4];
                for i in 0..K {
                    let out = &mut r[320 * i..320 * (i + 1)];
                    for j in 0..N / 4 {
                        for k in 0..4 {
                            let mut u = self.vec[i].coeffs[4 * j + k];
                            u += (u >> 15) & Q;
                            t[k] = (((u32::from(u as u16) << 10) + q / 2) / q) as u16 & 0x3FF;
                        }
                        out[5 * j] = t[0] as u8;
                        out[5 * j + 1] = ((t[0] >> 8) | (t[1] << 2)) as u8;
                        out[5 * j + 2] = ((t[1] >> 6) | (t[2] << 4)) as u8;
                        out[5 * j + 3] = ((t[2] >> 4) | (t[3] << 6)) as u8;
                        out[5 * j + 4] = (t[3] >> 2) as u8;
                    }
                }
            }
            11 => {
                let mut t = [0u16; 8];
                for i in 0..K {
                    let out = &mut r[352 * i..352 * (i + 1)];
                    for j in 0..N / 8 {
                        for k in 0..8 {
                            let mut u = self.vec[i].coeffs[8 * j + k];
                            u += (u >> 15) & Q;
                            t[k] = (((u32::from(u as u16) << 11) + q / 2) / q) as u16 & 0x7FF;
                        }
                        out[11 * j] = t[0] as u8;
                        out[11 * j + 1] = ((t[0] >> 8) | (t[1] << 3)) as u8;
                        out[11 * j + 2] = ((t[1] >> 5) | (t[2] << 6)) as u8;
                        out[11 * j + 3] = (t[2] >> 2) as u8;
                        out[11 * j + 4] = ((t[2] >> 10) | (t[3] << 1)) as u8;
                        out[11 * j + 5] = ((t[3] >> 7) | (t[4] << 4)) as u8;
                        out[11 * j + 6] = ((t[4] >> 4) | (t[5] << 7)) as u8;
                        out[11 * j + 7] = (t[5] >> 1) as u8;
                        out[11 * j + 8] = ((t[5] >> 9) | (t[6] << 2)) as u8;
                        out[11 * j + 9] = ((t[6] >> 6) | (t[7] << 5)) as u8;
                        out[11 * j + 10] = (t[7] >> 3) as u8;
                    }
                }
            }
            d => unreachable!("unsupported polyvec compression width {d}"),
        }
    }

    /// Deserialization and decompression; approximate inverse of `compress`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub(crate) fn decompress(a: &[u8], du: u32) -> Self {
        debug_assert_eq!(a.len(), 32 * du as usize * K, "polyvec decompression length mismatch");
        let q = u32::from(Q as u16);
        let mut r = Self::zero();
        match du {
            10 => {
                let mut t = [0u16; 4];
                for i in 0..K {
                    let a = &a[320 * i..320 * (i + 1)];
                    for j in 0..N / 4 {
                        let a = &a[5 * j..5 * j + 5];
                        t[0] = u16::from(a[0]) | (u16::from(a[1]) << 8);
                        t[1] = u16::from(a[1] >> 2) | (u16::from(a[2]) << 6);
                        t[2] = u16::from(a[2] >> 4) | (u16::from(a[3]) << 4);
                        t[3] = u16::from(a[3] >> 6) | (u16::from(a[4]) << 2);
                        for k in 0..4 {
                            r.vec[i].coeffs[4 * j + k] =
                                ((u32::from(t[k] & 0x3FF) * q + 512) >> 10) as i16;
                        }
                    }
                }
            }
            11 => {
                let mut t = [0u16; 8];
                for i in 0..K {
                    let a = &a[352 * i..352 * (i + 1)];
                    for j in 0..N / 8 {
                        let a = &a[11 * j..11 * j + 11];
                        t[0] = u16::from(a[0]) | (u16::from(a[1]) << 8);
                        t[1] = u16::from(a[1] >> 3) | (u16::from(a[2]) << 5);
                        t[2] = u16::from(a[2] >> 6)
                            | (u16::from(a[3]) << 2)
                            | (u16::from(a[4]) << 10);
                        t[3] = u16::from(a[4] >> 1) | (u16::from(a[5]) << 7);
                        t[4] = u16::from(a[5] >> 4) | (u16::from(a[6]) << 4);
                        t[5] = u16::from(a[6] >> 7)
                            | (u16::from(a[7]) << 1)
                            | (u16::from(a[8]) << 9);
                        t[6] = u16::from(a[8] >> 2) | (u16::from(a[9]) << 6);
                        t[7] = u16::from(a[9] >> 5) | (u16::from(a[10]) << 3);
                        for k in 0..8 {
                            r.vec[i].coeffs[8 * j + k] =
                                ((u32::from(t[k] & 0x7FF) * q + 1024) >> 11) as i16;
                        }
                    }
                }
            }
            d => unreachable!("unsupported polyvec compression width {d}"),
        }
        r
    }
}


impl<const K: usize> PolyVec<K, Ntt> {
    /// Inverse NTT applied to each element, with the Montgomery factor
    /// absorbed by the transform's final constant.
    #[must_use]
    pub(crate) fn invntt_tomont(self) -> PolyVec<K, Normal> {
        PolyVec { vec: self.vec.map(Poly::invntt_tomont) }
    }

    /// NTT-domain dot product: multiply element-wise, accumulate, divide by
    /// the Montgomery factor, and reduce.
    #[must_use]
    pub(crate) fn basemul_acc_montgomery(&self, other: &Self) -> Poly<Ntt> {
        let mut r = self.vec[0].basemul_montgomery(&other.vec[0]);
        for i in 1..K {
            r = r.add(&self.vec[i].basemul_montgomery(&other.vec[i]));
        }
        r.reduce();
        r
    }
}


#[cfg(test)]
mod tests {
    use super::PolyVec;
    use crate::poly::Normal;
    use crate::Q;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_bytes_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(55);
        let mut v = PolyVec::<3, Normal>::zero();
        for p in &mut v.vec {
            for coeff in &mut p.coeffs {
                *coeff = rng.gen_range(0..Q);
            }
        }
        let mut bytes = [0u8; 3 * 384];
        v.to_bytes(&mut bytes);
        let w = PolyVec::<3, Normal>::from_bytes(&bytes);
        for i in 0..3 {
            assert_eq!(v.vec[i].coeffs, w.vec[i].coeffs);
        }
    }

    #[test]
    fn test_compress_error_bound() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(66);
        for &du in &[10u32, 11] {
            let bound = (i32::from(Q) + (1 << du) - 1) >> du; // ceil(q / 2^du)
            let mut v = PolyVec::<2, Normal>::zero();
            for p in &mut v.vec {
                for coeff in &mut p.coeffs {
                    *coeff = rng.gen_range(0..Q);
                }
            }
            let mut bytes = [0u8; 2 * 352];
            let len = 32 * du as usize * 2;
            v.compress(&mut bytes[..len], du);
            let w = PolyVec::<2, Normal>::decompress(&bytes[..len], du);
            for i in 0..2 {
                for j in 0..256 {
                    let mut diff = (i32::from(w.vec[i].coeffs[j]) - i32::from(v.vec[i].coeffs[j]))
                        .rem_euclid(i32::from(Q));
                    if diff > i32::from(Q) / 2 {
                        diff -= i32::from(Q);
                    }
                    assert!(diff.abs() <= bound, "error {diff} exceeds {bound} at du={du}");
                }
            }
        }
    }
}
