use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::indcpa::{indcpa_dec, indcpa_enc, indcpa_keypair};
use crate::symmetric::{hash_g, hash_h, kdf};
use crate::verify::{cmov, verify};
use crate::SharedSecretKey;


/// Deterministic KEM key generation from the seeds d and z.
///
/// The secret key is laid out as `sk_pke || pk || H(pk) || z`; the hash of
/// the public key is cached for encapsulation binding, z is the implicit
/// rejection secret.
pub(crate) fn kem_keypair_internal<const K: usize, const ETA1_64: usize>(
    d: &[u8; 32], z: &[u8; 32], pk: &mut [u8], sk: &mut [u8],
) {
    debug_assert_eq!(pk.len(), 384 * K + 32, "kem pk len not 384*K + 32");
    debug_assert_eq!(sk.len(), 768 * K + 96, "kem sk len not 768*K + 96");

    let p1 = 384 * K;
    indcpa_keypair::<K, ETA1_64>(d, pk, &mut sk[..p1]);

    let h_pk = hash_h(pk);
    let p2 = p1 + pk.len();
    let p3 = p2 + h_pk.len();
    sk[p1..p2].copy_from_slice(pk);
    sk[p2..p3].copy_from_slice(&h_pk);
    sk[p3..].copy_from_slice(z);
}


/// KEM key generation: draws the two 32-byte seeds from the given RNG and
/// defers to the deterministic path.
///
/// # Errors
/// Fails only if the random number generator fails.
pub(crate) fn kem_keypair<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, pk: &mut [u8], sk: &mut [u8],
) -> Result<(), &'static str> {
    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| "random number generator failed for d")?;
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z).map_err(|_| "random number generator failed for z")?;

    kem_keypair_internal::<K, ETA1_64>(&d, &z, pk, sk);
    d.zeroize();
    z.zeroize();
    Ok(())
}


/// Deterministic encapsulation from a 32-byte seed.
///
/// The seed is hashed before use so raw RNG output never reaches the wire;
/// the shared secret binds both the public key and the ciphertext through
/// `ss = KDF(K_bar || H(ct))`.
#[allow(clippy::similar_names)]
pub(crate) fn kem_encaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    seed: &[u8; 32], pk: &[u8], ct: &mut [u8], du: u32, dv: u32,
) -> SharedSecretKey {
    debug_assert_eq!(pk.len(), 384 * K + 32, "kem pk len not 384*K + 32");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "kem ct len not 32*(du*K + dv)"
    );

    let mut m = hash_h(seed);
    let h_pk = hash_h(pk);
    let (k_bar, coins) = hash_g(&[&m, &h_pk]);

    indcpa_enc::<K, ETA1_64, ETA2_64>(ct, &m, pk, &coins, du, dv);
    m.zeroize();

    SharedSecretKey(kdf(&[&k_bar, &hash_h(ct)]))
}


/// Encapsulation: draws the message seed from the given RNG and defers to
/// the deterministic path.
///
/// # Errors
/// Fails only if the random number generator fails.
pub(crate) fn kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, pk: &[u8], ct: &mut [u8], du: u32, dv: u32,
) -> Result<SharedSecretKey, &'static str> {
    let mut seed = [0u8; 32];
    rng.try_fill_bytes(&mut seed).map_err(|_| "random number generator failed for m")?;
    let ssk = kem_encaps_internal::<K, ETA1_64, ETA2_64>(&seed, pk, ct, du, dv);
    seed.zeroize();
    Ok(ssk)
}


/// Decapsulation with implicit rejection.
///
/// Decrypts, re-derives the coins, re-encrypts, and compares the ciphertexts
/// over their full length. On mismatch the pre-key is replaced by z with a
/// constant-time move, so a forged ciphertext yields a pseudo-random secret
/// indistinguishable from success. Total: every well-sized input produces a
/// shared secret.
#[allow(clippy::similar_names)]
pub(crate) fn kem_decaps<
    const K: usize,
    const ETA1_64: usize,
    const ETA2_64: usize,
    const CT_LEN: usize,
>(
    sk: &[u8], ct: &[u8; CT_LEN], du: u32, dv: u32,
) -> SharedSecretKey {
    debug_assert_eq!(sk.len(), 768 * K + 96, "kem sk len not 768*K + 96");
    debug_assert_eq!(
        CT_LEN,
        32 * (du as usize * K + dv as usize),
        "kem ct len not 32*(du*K + dv)"
    );

    let sk_pke = &sk[..384 * K];
    let pk = &sk[384 * K..768 * K + 32];
    let h_pk: &[u8; 32] = sk[768 * K + 32..768 * K + 64].try_into().expect("h(pk) slice");
    let z = &sk[768 * K + 64..768 * K + 96];

    let mut m = [0u8; 32];
    indcpa_dec::<K>(&mut m, ct, sk_pke, du, dv);

    let (mut k_bar, coins) = hash_g(&[&m, h_pk]);

    let mut cmp = [0u8; CT_LEN];
    indcpa_enc::<K, ETA1_64, ETA2_64>(&mut cmp, &m, pk, &coins, du, dv);
    m.zeroize();

    let fail = verify(ct, &cmp);
    cmov(&mut k_bar, z, fail);

    let ssk = SharedSecretKey(kdf(&[&k_bar, &hash_h(ct)]));
    k_bar.zeroize();
    ssk
}


#[cfg(test)]
mod tests {
    use rand_core::SeedableRng;

    use super::{kem_decaps, kem_encaps, kem_keypair};

    // Kyber512 parameters
    const K: usize = 2;
    const ETA1_64: usize = 192;
    const ETA2_64: usize = 128;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const PK_LEN: usize = 800;
    const SK_LEN: usize = 1632;
    const CT_LEN: usize = 768;

    #[test]
    fn test_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        let mut ct = [0u8; CT_LEN];

        kem_keypair::<K, ETA1_64>(&mut rng, &mut pk, &mut sk).unwrap();
        let ssk1 = kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, &pk, &mut ct, DU, DV).unwrap();
        let ssk2 = kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(&sk, &ct, DU, DV);
        assert_eq!(ssk1, ssk2);
    }

    #[test]
    fn test_forged_ciphertext_rejects() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
        let mut pk = [0u8; PK_LEN];
        let mut sk = [0u8; SK_LEN];
        let mut ct = [0u8; CT_LEN];

        kem_keypair::<K, ETA1_64>(&mut rng, &mut pk, &mut sk).unwrap();
        let ssk1 = kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, &pk, &mut ct, DU, DV).unwrap();

        ct[0] ^= 1;
        let ssk2 = kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(&sk, &ct, DU, DV);
        assert_ne!(ssk1, ssk2);
    }
}
