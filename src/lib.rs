#![no_std]
#![deny(clippy::pedantic)]
#![deny(warnings)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]


// Implements the CRYSTALS-Kyber KEM (round-3 submission) over
// R_q = Z_q[X]/(X^256 + 1) with q = 3329.
//
// Layer map:
//   Montgomery/Barrett reductions          --> reduce.rs
//   NTT, inverse NTT, basemul              --> ntt.rs
//   SHAKE/SHA3 role binding (XOF/PRF/...)  --> symmetric.rs
//   Poly type, codecs, message maps        --> poly.rs
//   PolyVec type, lifted codecs            --> polyvec.rs
//   Uniform/CBD samplers                   --> sampling.rs
//   IND-CPA keygen/enc/dec + packing       --> indcpa.rs
//   IND-CCA2 KEM (FO transform)            --> kem.rs
//   Constant-time verify/cmov              --> verify.rs
//
// The three parameter sets are modules in this file with injected macro code
// connecting them to the generic internals.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::traits::SerDes;

mod indcpa;
mod kem;
mod ntt;
mod poly;
mod polyvec;
mod reduce;
mod sampling;
mod symmetric;
mod verify;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

// Relevant to all parameter sets
pub(crate) const N: usize = 256;
pub(crate) const Q: i16 = 3329;

/// Shared secret length for all Kyber variants (in bytes).
pub const SSK_LEN: usize = 32;

/// The (opaque) shared secret; de/serializable by each party.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecretKey([u8; SSK_LEN]);

impl SerDes for SharedSecretKey {
    type ByteArray = [u8; SSK_LEN];

    fn into_bytes(self) -> Self::ByteArray { self.0 }

    fn try_from_bytes(ssk: Self::ByteArray) -> Result<Self, &'static str> {
        // No validation is possible on 32 opaque bytes; Result is kept for
        // symmetry with the other SerDes impls.
        Ok(SharedSecretKey(ssk))
    }
}


// Secrets are compared without early exit.
impl PartialEq for SharedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        let mut result = true;
        for i in 0..self.0.len() {
            result &= self.0[i] == other.0[i];
        }
        result
    }
}


// This common functionality is injected into each parameter set module
macro_rules! functionality {
    () => {
        const ETA1_64: usize = ETA1 as usize * 64; // Rust does not (yet) allow expressions over
        const ETA2_64: usize = ETA2 as usize * 64; // ...mode consts in generic position, so these
                                                   // PRF output lengths are spelled out manually.

        use crate::indcpa::pk_is_canonical;
        use crate::kem::{kem_decaps, kem_encaps, kem_keypair, kem_keypair_internal};
        use crate::symmetric::hash_h;
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use crate::SharedSecretKey;
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};

        /// Correctly sized public (encapsulation) key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct PublicKey([u8; PK_LEN]);

        /// Correctly sized secret (decapsulation) key specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct SecretKey([u8; SK_LEN]);

        /// Correctly sized ciphertext specific to this parameter set.
        #[derive(Clone, Zeroize, ZeroizeOnDrop)]
        pub struct CipherText([u8; CT_LEN]);


        /// Key generation entry point for this parameter set; implements the
        /// `KeyGen` trait.
        pub struct KG();

        impl KeyGen for KG {
            type PublicByteArray = [u8; PK_LEN];
            type PublicKey = PublicKey;
            type SecretByteArray = [u8; SK_LEN];
            type SecretKey = SecretKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(PublicKey, SecretKey), &'static str> {
                let (mut pk, mut sk) = ([0u8; PK_LEN], [0u8; SK_LEN]);
                kem_keypair::<K, ETA1_64>(rng, &mut pk, &mut sk)?;
                Ok((PublicKey(pk), SecretKey(sk)))
            }

            fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (PublicKey, SecretKey) {
                let (mut pk, mut sk) = ([0u8; PK_LEN], [0u8; SK_LEN]);
                kem_keypair_internal::<K, ETA1_64>(&d, &z, &mut pk, &mut sk);
                (PublicKey(pk), SecretKey(sk))
            }

            fn validate_keypair_vartime(pk: &[u8; PK_LEN], sk: &[u8; SK_LEN]) -> bool {
                let p1 = 384 * K;
                let p2 = p1 + PK_LEN;
                let same_pk = *pk == sk[p1..p2];
                let same_h = hash_h(pk) == sk[p2..p2 + 32];
                same_pk & same_h
            }
        }


        impl Encaps for PublicKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(SharedSecretKey, CipherText), &'static str> {
                let mut ct = [0u8; CT_LEN];
                let ssk = kem_encaps::<K, ETA1_64, ETA2_64>(rng, &self.0, &mut ct, DU, DV)?;
                Ok((ssk, CipherText(ct)))
            }
        }


        impl Decaps for SecretKey {
            type CipherText = CipherText;
            type SharedSecretKey = SharedSecretKey;

            fn try_decaps(&self, ct: &CipherText) -> Result<SharedSecretKey, &'static str> {
                Ok(kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(&self.0, &ct.0, DU, DV))
            }
        }


        impl SerDes for PublicKey {
            type ByteArray = [u8; PK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(pk: Self::ByteArray) -> Result<Self, &'static str> {
                // An imported public key must deserialize to coefficients
                // already below q; fixed array size covers the length check.
                if !pk_is_canonical::<K>(&pk) {
                    return Err("public key coefficients not canonical");
                }
                Ok(PublicKey(pk))
            }
        }


        impl SerDes for SecretKey {
            type ByteArray = [u8; SK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(sk: Self::ByteArray) -> Result<Self, &'static str> {
                // Decapsulation is total on well-sized inputs; Result is kept
                // in case future opportunities for validation arise.
                Ok(SecretKey(sk))
            }
        }


        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, &'static str> {
                // Any well-sized ciphertext decapsulates (implicit rejection
                // covers forgeries), so there is nothing to validate.
                Ok(CipherText(ct))
            }
        }
    };
}


/// Functionality for Kyber512 (K = 2, NIST security category 1).
#[cfg(feature = "kyber-512")]
pub mod kyber512 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` and sends `pk.into_bytes()` to the remote party.
    //! 2. The remote party rebuilds the key via `PublicKey::try_from_bytes(..)`, runs
    //!    `try_encaps()` for the shared secret and ciphertext, and sends `ct.into_bytes()` back.
    //! 3. The originator rebuilds the ciphertext via `CipherText::try_from_bytes(..)` and runs
    //!    `sk.try_decaps(&ct)`; both parties now hold the same shared secret.

    const K: usize = 2;
    const ETA1: u32 = 3;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized public key length (in bytes).
    pub const PK_LEN: usize = 800;
    /// Serialized secret key length (in bytes).
    pub const SK_LEN: usize = 1632;
    /// Serialized ciphertext length (in bytes).
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// Functionality for Kyber768 (K = 3, NIST security category 3).
#[cfg(feature = "kyber-768")]
pub mod kyber768 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` and sends `pk.into_bytes()` to the remote party.
    //! 2. The remote party rebuilds the key via `PublicKey::try_from_bytes(..)`, runs
    //!    `try_encaps()` for the shared secret and ciphertext, and sends `ct.into_bytes()` back.
    //! 3. The originator rebuilds the ciphertext via `CipherText::try_from_bytes(..)` and runs
    //!    `sk.try_decaps(&ct)`; both parties now hold the same shared secret.

    const K: usize = 3;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;

    /// Serialized public key length (in bytes).
    pub const PK_LEN: usize = 1184;
    /// Serialized secret key length (in bytes).
    pub const SK_LEN: usize = 2400;
    /// Serialized ciphertext length (in bytes).
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// Functionality for Kyber1024 (K = 4, NIST security category 5).
#[cfg(feature = "kyber-1024")]
pub mod kyber1024 {
    //! Typical usage flow:
    //! 1. The originator runs `KG::try_keygen()` and sends `pk.into_bytes()` to the remote party.
    //! 2. The remote party rebuilds the key via `PublicKey::try_from_bytes(..)`, runs
    //!    `try_encaps()` for the shared secret and ciphertext, and sends `ct.into_bytes()` back.
    //! 3. The originator rebuilds the ciphertext via `CipherText::try_from_bytes(..)` and runs
    //!    `sk.try_decaps(&ct)`; both parties now hold the same shared secret.

    const K: usize = 4;
    const ETA1: u32 = 2;
    const ETA2: u32 = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;

    /// Serialized public key length (in bytes).
    pub const PK_LEN: usize = 1568;
    /// Serialized secret key length (in bytes).
    pub const SK_LEN: usize = 3168;
    /// Serialized ciphertext length (in bytes).
    pub const CT_LEN: usize = 1568;

    functionality!();
}
