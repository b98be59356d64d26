#![no_main]

use kyber_kem::kyber512;
use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use libfuzzer_sys::fuzz_target;
use rand_core::{CryptoRng, RngCore};

const RND_SIZE: usize = 32;


struct TestRng {
    data: Vec<Vec<u8>>,
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, out: &mut [u8]) {
        let x = self.data.pop().expect("TestRng problem");
        out.copy_from_slice(&x)
    }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(out);
        Ok(()) // panic on probs is OK
    }
}

impl CryptoRng for TestRng {}

impl TestRng {
    fn new() -> Self { TestRng { data: Vec::new() } }

    fn push(&mut self, new_data: &[u8]) {
        let x = new_data.to_vec();
        self.data.push(x);
    }
}

// 2 keygen draws + 1 encaps draw + arbitrary pk, sk and ct images
fuzz_target!(|data: [u8; 3328]| {
    let mut rng = TestRng::new();
    let mut start = 0;
    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;
    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;
    let keypair = kyber512::KG::try_keygen_with_rng(&mut rng); // consumes 2 rng values
    let (pk1, sk1) = keypair.unwrap(); // only rng can fail, which it won't

    let pk2_bytes = &data[start..start + kyber512::PK_LEN];
    start += kyber512::PK_LEN;
    let pk2 = kyber512::PublicKey::try_from_bytes(pk2_bytes.try_into().unwrap());

    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;
    rng.push(&data[start..start + RND_SIZE]);
    start += RND_SIZE;

    if let Ok(pk2) = pk2 {
        let _res = pk2.try_encaps_with_rng(&mut rng);
    }
    let _res = pk1.try_encaps_with_rng(&mut rng);

    let sk2_bytes = &data[start..start + kyber512::SK_LEN];
    start += kyber512::SK_LEN;
    let sk2 = kyber512::SecretKey::try_from_bytes(sk2_bytes.try_into().unwrap());

    let ct_bytes = &data[start..start + kyber512::CT_LEN];
    start += kyber512::CT_LEN;
    let ct = kyber512::CipherText::try_from_bytes(ct_bytes.try_into().unwrap()).unwrap(); // always good

    if let Ok(sk2) = sk2 {
        let _res = sk2.try_decaps(&ct);
    }
    let _res = sk1.try_decaps(&ct);

    assert_eq!(start, data.len());
});
