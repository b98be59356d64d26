use zeroize::Zeroize;

use crate::poly::{Normal, Ntt, Poly};
use crate::polyvec::PolyVec;
use crate::sampling::{poly_getnoise, sample_uniform};
use crate::symmetric::{hash_g, xof};
use crate::Q;


/// Serialize the public key: the NTT-domain vector t, then the matrix seed.
fn pack_pk<const K: usize>(r: &mut [u8], pk: &PolyVec<K, Ntt>, seed: &[u8; 32]) {
    pk.to_bytes(&mut r[..384 * K]);
    r[384 * K..].copy_from_slice(seed);
}


/// Recover the vector t and the matrix seed from a packed public key.
fn unpack_pk<const K: usize>(packed: &[u8]) -> (PolyVec<K, Ntt>, [u8; 32]) {
    let pk = PolyVec::from_bytes(&packed[..384 * K]);
    let seed = packed[384 * K..].try_into().expect("pk seed slice");
    (pk, seed)
}


/// Serialize the ciphertext: the compressed vector u, then the compressed
/// polynomial v. The compression widths come from the parameter set.
fn pack_ciphertext<const K: usize>(
    r: &mut [u8], b: &PolyVec<K, Normal>, v: &Poly<Normal>, du: u32, dv: u32,
) {
    let split = 32 * du as usize * K;
    b.compress(&mut r[..split], du);
    v.compress(&mut r[split..32 * (du as usize * K + dv as usize)]);
}


/// Decompress a ciphertext back into the vector u and the polynomial v.
fn unpack_ciphertext<const K: usize>(
    c: &[u8], du: u32, dv: u32,
) -> (PolyVec<K, Normal>, Poly<Normal>) {
    let split = 32 * du as usize * K;
    let b = PolyVec::decompress(&c[..split], du);
    let v = Poly::decompress(&c[split..32 * (du as usize * K + dv as usize)]);
    (b, v)
}


/// True iff every serialized 12-bit coefficient of the packed public key is
/// canonical (below q). Used when importing key bytes from outside.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn pk_is_canonical<const K: usize>(packed: &[u8]) -> bool {
    debug_assert_eq!(packed.len(), 384 * K + 32, "pk length mismatch");
    let mut ok = true;
    for chunk in packed[..384 * K].chunks(3) {
        let d1 = (u16::from(chunk[0]) | (u16::from(chunk[1]) << 8)) & 0xFFF;
        let d2 = (u16::from(chunk[1]) >> 4) | (u16::from(chunk[2]) << 4);
        ok &= (d1 < Q as u16) & (d2 < Q as u16);
    }
    ok
}


/// Deterministically expand the 32-byte matrix seed into the K x K matrix A
/// (rows of NTT-domain elements), or its transpose. Entry (i, j) comes from
/// a fresh XOF stream over the seed and the two index bytes.
pub(crate) fn gen_matrix<const K: usize>(
    seed: &[u8; 32], transposed: bool,
) -> [PolyVec<K, Ntt>; K] {
    core::array::from_fn(|i| PolyVec {
        vec: core::array::from_fn(|j| {
            let (x, y) = if transposed { (i, j) } else { (j, i) };
            sample_uniform(xof(seed, x.to_le_bytes()[0], y.to_le_bytes()[0]))
        }),
    })
}


/// Key generation for the IND-CPA encryption scheme underlying the KEM.
///
/// Expands the seed d into (rho, sigma), samples A from rho and the secret
/// and error vectors from sigma, and computes t = A s + e in the NTT domain.
/// Writes the packed public key (384K + 32 bytes) and secret key (384K).
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub(crate) fn indcpa_keypair<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], pk: &mut [u8], sk: &mut [u8],
) {
    debug_assert_eq!(pk.len(), 384 * K + 32, "indcpa pk len not 384*K + 32");
    debug_assert_eq!(sk.len(), 384 * K, "indcpa sk len not 384*K");

    let (rho, mut sigma) = hash_g(&[d]);
    let a = gen_matrix::<K>(&rho, false);

    let mut nonce = 0u8;
    let s: PolyVec<K, Normal> = PolyVec {
        vec: core::array::from_fn(|_| {
            let p = poly_getnoise::<ETA1_64>(&sigma, nonce);
            nonce += 1;
            p
        }),
    };
    let e: PolyVec<K, Normal> = PolyVec {
        vec: core::array::from_fn(|_| {
            let p = poly_getnoise::<ETA1_64>(&sigma, nonce);
            nonce += 1;
            p
        }),
    };
    sigma.zeroize();

    let s_hat = s.ntt();
    let e_hat = e.ntt();

    // t = A s + e; the accumulating product divides by R, so lift back
    let a_s = PolyVec::<K, Ntt> {
        vec: core::array::from_fn(|i| {
            let mut p = a[i].basemul_acc_montgomery(&s_hat);
            p.tomont();
            p
        }),
    };
    let mut t_hat = a_s.add(&e_hat);
    t_hat.reduce();

    s_hat.to_bytes(sk);
    pack_pk(pk, &t_hat, &rho);
}


/// Encryption: encrypt the 32-byte message m under the packed public key,
/// with all randomness derived from the 32-byte coins.
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub(crate) fn indcpa_enc<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    ct: &mut [u8], m: &[u8; 32], pk: &[u8], coins: &[u8; 32], du: u32, dv: u32,
) {
    debug_assert_eq!(pk.len(), 384 * K + 32, "indcpa pk len not 384*K + 32");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "indcpa ct len not 32*(du*K + dv)"
    );

    let (t_hat, rho) = unpack_pk::<K>(pk);
    let k = Poly::from_msg(m);
    let at = gen_matrix::<K>(&rho, true);

    let mut nonce = 0u8;
    let sp: PolyVec<K, Normal> = PolyVec {
        vec: core::array::from_fn(|_| {
            let p = poly_getnoise::<ETA1_64>(coins, nonce);
            nonce += 1;
            p
        }),
    };
    let ep: PolyVec<K, Normal> = PolyVec {
        vec: core::array::from_fn(|_| {
            let p = poly_getnoise::<ETA2_64>(coins, nonce);
            nonce += 1;
            p
        }),
    };
    let epp = poly_getnoise::<ETA2_64>(coins, nonce);

    let sp_hat = sp.ntt();

    let b_hat = PolyVec::<K, Ntt> {
        vec: core::array::from_fn(|i| at[i].basemul_acc_montgomery(&sp_hat)),
    };
    let v_hat = t_hat.basemul_acc_montgomery(&sp_hat);

    let mut b = b_hat.invntt_tomont().add(&ep);
    let mut v = v_hat.invntt_tomont().add(&epp).add(&k);
    b.reduce();
    v.reduce();

    pack_ciphertext(ct, &b, &v, du, dv);
}


/// Decryption: recover the 32-byte message from a ciphertext with the packed
/// IND-CPA secret key.
#[allow(clippy::similar_names)]
pub(crate) fn indcpa_dec<const K: usize>(
    m: &mut [u8; 32], ct: &[u8], sk: &[u8], du: u32, dv: u32,
) {
    debug_assert_eq!(sk.len(), 384 * K, "indcpa sk len not 384*K");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "indcpa ct len not 32*(du*K + dv)"
    );

    let (b, v) = unpack_ciphertext::<K>(ct, du, dv);
    let s_hat = PolyVec::<K, Ntt>::from_bytes(sk);

    let b_hat = b.ntt();
    let mp = s_hat.basemul_acc_montgomery(&b_hat).invntt_tomont();

    let mut mp = v.sub(&mp);
    mp.reduce();
    mp.to_msg(m);
}


#[cfg(test)]
mod tests {
    use super::{gen_matrix, indcpa_dec, indcpa_enc, indcpa_keypair, pk_is_canonical};
    use rand::{Rng, SeedableRng};

    const K: usize = 2;
    const ETA1_64: usize = 192;
    const ETA2_64: usize = 128;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const PK_LEN: usize = 384 * K + 32;
    const SK_LEN: usize = 384 * K;
    const CT_LEN: usize = 32 * (DU as usize * K + DV as usize);

    #[test]
    fn test_enc_dec_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(321);
        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        let mut ct = [0u8; CT_LEN];
        for _ in 0..10 {
            let d: [u8; 32] = rng.gen();
            indcpa_keypair::<K, ETA1_64>(&d, &mut pk, &mut sk);
            assert!(pk_is_canonical::<K>(&pk));

            let m: [u8; 32] = rng.gen();
            let coins: [u8; 32] = rng.gen();
            indcpa_enc::<K, ETA1_64, ETA2_64>(&mut ct, &m, &pk, &coins, DU, DV);

            let mut m2 = [0u8; 32];
            indcpa_dec::<K>(&mut m2, &ct, &sk, DU, DV);
            assert_eq!(m, m2);
        }
    }

    #[test]
    fn test_matrix_transpose_relation() {
        let seed = [5u8; 32];
        let a = gen_matrix::<3>(&seed, false);
        let at = gen_matrix::<3>(&seed, true);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(a[i].vec[j].coeffs, at[j].vec[i].coeffs);
            }
        }
    }
}
