use rand_core::{CryptoRng, CryptoRngCore, RngCore};

#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait covers key generation for a parameter set; it is
/// implemented on a per-set marker struct so consumers can use trait objects.
pub trait KeyGen {
    /// The (public) key used by the remote party to encapsulate.
    type PublicKey;
    /// The (private) key used by the originator to decapsulate.
    type SecretKey;
    /// A serialized public key byte array of the correct length.
    type PublicByteArray;
    /// A serialized secret key byte array of the correct length.
    type SecretByteArray;


    /// Generates a keypair using the OS default random number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "kyber-512", feature = "default-rng"))] {
    /// use kyber_kem::kyber512; // Could also be kyber768 or kyber1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (pk, sk) = kyber512::KG::try_keygen()?; // Originator generates both keys
    /// let pk_bytes = pk.into_bytes(); // ... and sends the public key bytes over
    ///
    /// let pk = kyber512::PublicKey::try_from_bytes(pk_bytes)?; // Remote party
    /// let (ssk_remote, ct) = pk.try_encaps()?; // ... encapsulates a shared secret
    ///
    /// let ssk_local = sk.try_decaps(&ct)?; // Originator decapsulates
    /// assert_eq!(ssk_local, ssk_remote);
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::SecretKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }


    /// Generates a keypair using a provided random number generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::PublicKey, Self::SecretKey), &'static str>;


    /// Deterministic keypair generation from the key seed `d` and the
    /// implicit-rejection seed `z`, e.g. when reproducing known-answer
    /// vectors. Production code should prefer the randomized entry points.
    #[must_use]
    fn keygen_from_seed(d: [u8; 32], z: [u8; 32]) -> (Self::PublicKey, Self::SecretKey);


    /// Checks that serialized public and secret keys correspond: the secret
    /// key embeds a copy of the public key and its hash, and both must
    /// match. Not constant-time; intended for keys restored from storage.
    fn validate_keypair_vartime(pk: &Self::PublicByteArray, sk: &Self::SecretByteArray) -> bool;
}


/// The `Encaps` trait covers generation of a shared secret and ciphertext
/// from a public key.
pub trait Encaps {
    /// The shared secret type produced alongside the ciphertext.
    type SharedSecretKey;
    /// The ciphertext type sent to the decapsulating party.
    type CipherText;


    /// Encapsulates a fresh shared secret using the OS default random number
    /// generator, returning it with the transporting ciphertext.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
        self.try_encaps_with_rng(&mut OsRng)
    }


    /// Encapsulates a fresh shared secret using a provided random number
    /// generator.
    ///
    /// # Errors
    /// Returns an error if the random number generator fails.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str>;


    /// Deterministic encapsulation from a 32-byte seed standing in for the
    /// random message draw, e.g. when reproducing known-answer vectors.
    /// Production code should prefer the randomized entry points.
    fn encaps_from_seed(&self, seed: &[u8; 32]) -> (Self::SharedSecretKey, Self::CipherText) {
        self.try_encaps_with_rng(&mut DummyRng { data: *seed })
            .expect("deterministic rng cannot fail")
    }
}


// Replays a fixed 32-byte value as "randomness" for the deterministic
// encapsulation variant.
struct DummyRng {
    data: [u8; 32],
}

impl RngCore for DummyRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        out.copy_from_slice(&self.data);
        Ok(())
    }
}

impl CryptoRng for DummyRng {}


/// The `Decaps` trait covers recovery of the shared secret from a
/// ciphertext with the secret key.
pub trait Decaps {
    /// The ciphertext type received from the encapsulating party.
    type CipherText;
    /// The shared secret type recovered from the ciphertext.
    type SharedSecretKey;


    /// Decapsulates the shared secret. This operation is total and intended
    /// to run in constant time: a forged ciphertext yields a pseudo-random
    /// secret derived from the implicit-rejection value rather than an
    /// observable failure.
    ///
    /// # Errors
    /// Reserved for future validation; the current implementation always
    /// succeeds on well-sized inputs.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, &'static str>;
}


/// The `SerDes` trait provides fixed-size serialization for the opaque
/// key, ciphertext and shared secret types.
pub trait SerDes {
    /// The fixed-size byte array this type serializes to.
    type ByteArray;


    /// Produces the serialized byte array.
    fn into_bytes(self) -> Self::ByteArray;


    /// Consumes a byte array and validates it where the format allows;
    /// public keys are checked for canonical coefficient encoding.
    ///
    /// # Errors
    /// Returns an error on malformed input.
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
