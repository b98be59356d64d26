use core::marker::PhantomData;

use crate::ntt::{basemul, invntt, ntt, ZETAS};
use crate::reduce::{barrett_reduce, montgomery_reduce};
use crate::{N, Q};


/// Marker for the basis a polynomial's coefficients are expressed in.
/// `ntt()` and `invntt_tomont()` are the only transitions between the two,
/// so applying an operation in the wrong domain is a type error.
pub(crate) trait Domain: Copy {}

/// Standard (coefficient) basis.
#[derive(Clone, Copy)]
pub(crate) struct Normal;

/// Bit-reversed NTT basis.
#[derive(Clone, Copy)]
pub(crate) struct Ntt;

impl Domain for Normal {}
impl Domain for Ntt {}


/// An element of `R_q = Z_q[X]/(X^256 + 1)`: 256 signed 16-bit coefficients,
/// lazily reduced. The domain tag `D` records which basis they live in.
#[derive(Clone, Copy)]
pub(crate) struct Poly<D: Domain> {
    pub(crate) coeffs: [i16; N],
    domain: PhantomData<D>,
}


impl<D: Domain> Poly<D> {
    pub(crate) const fn zero() -> Self {
        Self { coeffs: [0i16; N], domain: PhantomData }
    }

    /// Coefficient-wise sum; no reduction is performed.
    #[must_use]
    pub(crate) fn add(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        for i in 0..N {
            r.coeffs[i] = self.coeffs[i] + other.coeffs[i];
        }
        r
    }

    /// Coefficient-wise difference; no reduction is performed.
    #[must_use]
    pub(crate) fn sub(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        for i in 0..N {
            r.coeffs[i] = self.coeffs[i] - other.coeffs[i];
        }
        r
    }

    /// Barrett-reduce every coefficient into `[-(q-1)/2, (q-1)/2]`.
    pub(crate) fn reduce(&mut self) {
        for coeff in &mut self.coeffs {
            *coeff = barrett_reduce(*coeff);
        }
    }

    /// Serialize: two 12-bit canonical coefficients per three output bytes,
    /// little-endian. Negative representatives are lifted into `[0, q)` by a
    /// masked conditional add of q.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn to_bytes(&self, r: &mut [u8]) {
        debug_assert_eq!(r.len(), 384, "poly serialization needs 384 bytes");
        for i in 0..N / 2 {
            let mut t0 = self.coeffs[2 * i];
            t0 += (t0 >> 15) & Q;
            let mut t1 = self.coeffs[2 * i + 1];
            t1 += (t1 >> 15) & Q;
            let (t0, t1) = (t0 as u16, t1 as u16);
            r[3 * i] = t0 as u8;
            r[3 * i + 1] = ((t0 >> 8) | (t1 << 4)) as u8;
            r[3 * i + 2] = (t1 >> 4) as u8;
        }
    }

    /// Deserialize; inverse of `to_bytes` on canonical inputs. Coefficients
    /// come back in `[0, 2^12)` without a modular check (totality; the opaque
    /// key types validate canonicity at the trust boundary instead).
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn from_bytes(a: &[u8]) -> Self {
        debug_assert_eq!(a.len(), 384, "poly deserialization needs 384 bytes");
        let mut r = Self::zero();
        for i in 0..N / 2 {
            let (a0, a1, a2) = (u16::from(a[3 * i]), u16::from(a[3 * i + 1]), u16::from(a[3 * i + 2]));
            r.coeffs[2 * i] = ((a0 | (a1 << 8)) & 0xFFF) as i16;
            r.coeffs[2 * i + 1] = (((a1 >> 4) | (a2 << 4)) & 0xFFF) as i16;
        }
        r
    }
}


impl Poly<Normal> {
    /// Forward NTT followed by a Barrett reduce of the grown coefficients.
    #[must_use]
    pub(crate) fn ntt(self) -> Poly<Ntt> {
        let mut r = Poly::<Ntt> { coeffs: self.coeffs, domain: PhantomData };
        ntt(&mut r.coeffs);
        r.reduce();
        r
    }

    /// Map a 32-byte message to a polynomial: bit 1 becomes (q+1)/2, bit 0
    /// becomes 0, via a constant-time mask.
    #[allow(clippy::cast_possible_wrap)]
    pub(crate) fn from_msg(msg: &[u8; 32]) -> Self {
        let mut r = Self::zero();
        for i in 0..N / 8 {
            for j in 0..8 {
                let mask = i16::from((msg[i] >> j) & 1).wrapping_neg();
                r.coeffs[8 * i + j] = mask & ((Q + 1) / 2);
            }
        }
        r
    }

    /// Round each coefficient to one bit and pack, LSB first.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn to_msg(&self, msg: &mut [u8; 32]) {
        for i in 0..N / 8 {
            msg[i] = 0;
            for j in 0..8 {
                let mut t = self.coeffs[8 * i + j];
                t += (t >> 15) & Q;
                let bit = (((u32::from(t as u16) << 1) + u32::from(Q as u16) / 2)
                    / u32::from(Q as u16))
                    & 1;
                msg[i] |= (bit as u8) << j;
            }
        }
    }

    /// Lossy d-bit compression and serialization; d = 4 (128 bytes) or
    /// d = 5 (160 bytes), selected by the output length. Packed bytes are
    /// assembled in full width and truncated, so the mask covers the whole
    /// byte.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn compress(&self, r: &mut [u8]) {
        let q = u32::from(Q as u16);
        match r.len() {
            128 => {
                let mut t = [0u16; 8];
                for i in 0..N / 8 {
                    for j in 0..8 {
                        let mut u = self.coeffs[8 * i + j];
                        u += (u >> 15) & Q;
                        t[j] = (((u32::from(u as u16) << 4) + q / 2) / q) as u16 & 0xF;
                    }
                    r[4 * i] = (t[0] | (t[1] << 4)) as u8;
                    r[4 * i + 1] = (t[2] | (t[3] << 4)) as u8;
                    r[4 * i + 2] = (t[4] | (t[5] << 4)) as u8;
                    r[4 * i + 3] = (t[6] | (t[7] << 4)) as u8;
                }
            }
            160 => {
                let mut t = [0u16; 8];
                for i in 0..N / 8 {
                    for j in 0..8 {
                        let mut u = self.coeffs[8 * i + j];
                        u += (u >> 15) & Q;
                        t[j] = (((u32::from(u as u16) << 5) + q / 2) / q) as u16 & 0x1F;
                    }
                    r[5 * i] = (t[0] | (t[1] << 5)) as u8;
                    r[5 * i + 1] = ((t[1] >> 3) | (t[2] << 2) | (t[3] << 7)) as u8;
                    r[5 * i + 2] = ((t[3] >> 1) | (t[4] << 4)) as u8;
                    r[5 * i + 3] = ((t[4] >> 4) | (t[5] << 1) | (t[6] << 6)) as u8;
                    r[5 * i + 4] = ((t[6] >> 2) | (t[7] << 3)) as u8;
                }
            }
            len => unreachable!("unsupported poly compression length {len}"),
        }
    }

    /// Deserialization and decompression; approximate inverse of `compress`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub(crate) fn decompress(a: &[u8]) -> Self {
        let q = u32::from(Q as u16);
        let mut r = Self::zero();
        match a.len() {
            128 => {
                for i in 0..N / 2 {
                    r.coeffs[2 * i] = ((u32::from(a[i] & 15) * q + 8) >> 4) as i16;
                    r.coeffs[2 * i + 1] = ((u32::from(a[i] >> 4) * q + 8) >> 4) as i16;
                }
            }
            160 => {
                let mut t = [0u16; 8];
                for i in 0..N / 8 {
                    let a = &a[5 * i..5 * i + 5];
                    t[0] = u16::from(a[0]);
                    t[1] = u16::from(a[0] >> 5) | (u16::from(a[1]) << 3);
                    t[2] = u16::from(a[1] >> 2);
                    t[3] = u16::from(a[1] >> 7) | (u16::from(a[2]) << 1);
                    t[4] = u16::from(a[2] >> 4) | (u16::from(a[3]) << 4);
                    t[5] = u16::from(a[3] >> 1);
                    t[6] = u16::from(a[3] >> 6) | (u16::from(a[4]) << 2);
                    t[7] = u16::from(a[4] >> 3);
                    for j in 0..8 {
                        r.coeffs[8 * i + j] = ((u32::from(t[j] & 0x1F) * q + 16) >> 5) as i16;
                    }
                }
            }
            len => unreachable!("unsupported poly compression length {len}"),
        }
        r
    }
}


impl Poly<Ntt> {
    /// Inverse NTT; the output carries the Montgomery factor 2^16 absorbed
    /// by the transform's final constant.
    #[must_use]
    pub(crate) fn invntt_tomont(self) -> Poly<Normal> {
        let mut r = Poly::<Normal> { coeffs: self.coeffs, domain: PhantomData };
        invntt(&mut r.coeffs);
        r
    }

    /// Pointwise product in the NTT domain: 128 degree-one multiplications
    /// modulo `X^2 - zeta`, with the sign of zeta alternating pair to pair.
    #[must_use]
    pub(crate) fn basemul_montgomery(&self, other: &Self) -> Self {
        let mut r = Self::zero();
        for i in 0..N / 4 {
            basemul(
                &mut r.coeffs[4 * i..4 * i + 2],
                &self.coeffs[4 * i..4 * i + 2],
                &other.coeffs[4 * i..4 * i + 2],
                ZETAS[64 + i],
            );
            basemul(
                &mut r.coeffs[4 * i + 2..4 * i + 4],
                &self.coeffs[4 * i + 2..4 * i + 4],
                &other.coeffs[4 * i + 2..4 * i + 4],
                -ZETAS[64 + i],
            );
        }
        r
    }

    /// Lift every coefficient into the Montgomery domain (multiply by R).
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) fn tomont(&mut self) {
        const F: i16 = ((1u64 << 32) % (Q as u64)) as i16;
        for coeff in &mut self.coeffs {
            *coeff = montgomery_reduce(i32::from(*coeff) * i32::from(F));
        }
    }
}
