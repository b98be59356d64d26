use sha3::digest::XofReader;

use crate::poly::{Normal, Ntt, Poly};
use crate::symmetric::{prf, XOF_BLOCKBYTES};
use crate::{N, Q};

/// Blocks squeezed up front per matrix entry: enough for all 256 uniform
/// candidates in the common case (expected rejection rate is q/2^12).
pub(crate) const GEN_MATRIX_NBLOCKS: usize =
    (12 * N / 8 * (1 << 12) / (Q as usize) + XOF_BLOCKBYTES) / XOF_BLOCKBYTES;


/// Rejection-sample coefficients uniform mod q from a byte buffer. Each
/// 3-byte chunk yields two 12-bit candidates; candidates below q are kept in
/// order. Stops when `r` is full or fewer than three bytes remain, and
/// returns the number of coefficients written.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub(crate) fn rej_uniform(r: &mut [i16], buf: &[u8]) -> usize {
    let mut ctr = 0usize;
    let mut pos = 0usize;
    while ctr < r.len() && pos + 3 <= buf.len() {
        let val0 = (u16::from(buf[pos]) | (u16::from(buf[pos + 1]) << 8)) & 0xFFF;
        let val1 = (u16::from(buf[pos + 1]) >> 4) | (u16::from(buf[pos + 2]) << 4);
        pos += 3;

        if val0 < Q as u16 {
            r[ctr] = val0 as i16;
            ctr += 1;
        }
        if ctr < r.len() && val1 < Q as u16 {
            r[ctr] = val1 as i16;
            ctr += 1;
        }
    }
    ctr
}


/// Sample one uniformly-random NTT-domain ring element from an XOF stream.
///
/// Squeezes `GEN_MATRIX_NBLOCKS` blocks up front; on a shortfall, the
/// `buflen mod 3` trailing bytes are carried in front of one more squeezed
/// block and sampling resumes. This loop depends only on the public seed, so
/// it need not be constant time.
pub(crate) fn sample_uniform(mut xof_reader: impl XofReader) -> Poly<Ntt> {
    let mut buf = [0u8; GEN_MATRIX_NBLOCKS * XOF_BLOCKBYTES + 2];
    let mut buflen = GEN_MATRIX_NBLOCKS * XOF_BLOCKBYTES;
    xof_reader.read(&mut buf[..buflen]);

    let mut r = Poly::zero();
    let mut ctr = rej_uniform(&mut r.coeffs, &buf[..buflen]);
    while ctr < N {
        let off = buflen % 3;
        for k in 0..off {
            buf[k] = buf[buflen - off + k];
        }
        xof_reader.read(&mut buf[off..off + XOF_BLOCKBYTES]);
        buflen = off + XOF_BLOCKBYTES;
        ctr += rej_uniform(&mut r.coeffs[ctr..], &buf[..buflen]);
    }
    r
}


// Centered binomial distribution with eta = 2: per 32-bit little-endian
// group, pairwise bit sums give eight coefficients a - b in [-2, 2].
#[allow(clippy::cast_possible_truncation)]
fn cbd2(buf: &[u8]) -> Poly<Normal> {
    debug_assert_eq!(buf.len(), 128, "cbd2 needs eta*N/4 = 128 bytes");
    let mut r = Poly::zero();
    for i in 0..N / 8 {
        let t = u32::from_le_bytes(buf[4 * i..4 * (i + 1)].try_into().expect("cbd2 chunk"));
        let d = (t & 0x5555_5555) + ((t >> 1) & 0x5555_5555);
        for j in 0..8 {
            let a = (d >> (4 * j)) & 0x3;
            let b = (d >> (4 * j + 2)) & 0x3;
            r.coeffs[8 * i + j] = a as i16 - b as i16;
        }
    }
    r
}


// Centered binomial distribution with eta = 3, only reachable at K = 2:
// per 24-bit group, triple bit sums give four coefficients in [-3, 3].
#[allow(clippy::cast_possible_truncation)]
fn cbd3(buf: &[u8]) -> Poly<Normal> {
    debug_assert_eq!(buf.len(), 192, "cbd3 needs eta*N/4 = 192 bytes");
    let mut r = Poly::zero();
    for i in 0..N / 4 {
        let t = u32::from(buf[3 * i])
            | (u32::from(buf[3 * i + 1]) << 8)
            | (u32::from(buf[3 * i + 2]) << 16);
        let d = (t & 0x0024_9249) + ((t >> 1) & 0x0024_9249) + ((t >> 2) & 0x0024_9249);
        for j in 0..4 {
            let a = (d >> (6 * j)) & 0x7;
            let b = (d >> (6 * j + 3)) & 0x7;
            r.coeffs[4 * i + j] = a as i16 - b as i16;
        }
    }
    r
}


/// Sample a CBD-distributed noise polynomial; eta is selected by the buffer
/// length (64 bytes per unit of eta).
fn sample_poly_cbd(buf: &[u8]) -> Poly<Normal> {
    if buf.len() == 192 {
        cbd3(buf)
    } else {
        cbd2(buf)
    }
}


/// Derive a noise polynomial from a seed and one-byte nonce through the PRF.
/// `ETA_64` is the PRF output length, eta * 64 bytes.
#[must_use]
pub(crate) fn poly_getnoise<const ETA_64: usize>(seed: &[u8; 32], nonce: u8) -> Poly<Normal> {
    let buf: [u8; ETA_64] = prf(seed, nonce);
    sample_poly_cbd(&buf)
}
