// Timing harness for the secret-dependent paths of decapsulation: a valid
// ciphertext takes the accept path, a forged one takes implicit rejection.
// Constant-time discipline says the two classes must be indistinguishable.

use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use kyber_kem::kyber512;
use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};

use crate::kyber512::CipherText;

fn decaps_accept_vs_reject(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_OUTER: usize = 1000;
    const ITERATIONS_INNER: usize = 100;

    let (pk, sk) = kyber512::KG::try_keygen().unwrap();
    let (_ssk, ct_good) = pk.try_encaps().unwrap();

    // Same ciphertext with a single flipped bit: decaps walks the identical
    // code path but lands in the implicit-rejection cmov.
    let mut forged_bytes = ct_good.clone().into_bytes();
    forged_bytes[kyber512::CT_LEN / 2] ^= 0x10;
    let ct_bad = CipherText::try_from_bytes(forged_bytes).unwrap();

    let mut inputs: Vec<CipherText> = Vec::new();
    let mut classes = Vec::new();

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ct_good.clone());
        classes.push(Class::Left);
    }

    for _ in 0..ITERATIONS_OUTER {
        inputs.push(ct_bad.clone());
        classes.push(Class::Right);
    }

    for (class, input) in classes.into_iter().zip(inputs.into_iter()) {
        runner.run_one(class, || {
            for _ in 0..ITERATIONS_INNER {
                let _ = sk.try_decaps(&input);
            }
        })
    }
}

ctbench_main!(decaps_accept_vs_reject);

/*
See https://docs.rs/dudect-bencher/latest/dudect_bencher/

$ cargo run --release -- --continuous decaps_accept_vs_reject
*/
