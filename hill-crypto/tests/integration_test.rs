use hill_crypto::errors::HillCryptoError;
use hill_crypto::keypair::KeyManager;
use hill_crypto::ring::{Matrix, Ring};

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn random_blocks(ring: &Ring, rows: usize, block_length: usize, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut blocks = Matrix::with_shape(rows, block_length, ring);
    blocks.populate_row_major((0..rows * block_length).map(|_| ring.random_element(&mut rng)));
    blocks
}

#[test]
fn happy_flow() -> Result<(), HillCryptoError> {
    let ring = Ring::try_with(29)?;
    let keys = KeyManager::with_seed(ring.clone(), 4, 12345)?;

    let plaintext = random_blocks(&ring, 10, 4, 1);
    let ciphertext = keys.encrypt_blocks(&plaintext)?;
    let decrypted = keys.decrypt_blocks(&ciphertext)?;

    assert_ne!(ciphertext, plaintext);
    assert_eq!(decrypted, plaintext);

    Ok(())
}

#[test]
fn composite_modulus_flow() -> Result<(), HillCryptoError> {
    // Z_26 has zero divisors, so many random candidates get rejected
    let ring = Ring::try_with(26)?;
    let keys = KeyManager::with_seed(ring.clone(), 3, 2024)?;

    let plaintext = random_blocks(&ring, 8, 3, 2);
    let decrypted = keys.decrypt_blocks(&keys.encrypt_blocks(&plaintext)?)?;
    assert_eq!(decrypted, plaintext);

    Ok(())
}

#[test]
fn same_seed_gives_identical_keys() -> Result<(), HillCryptoError> {
    let ring = Ring::try_with(29)?;
    let a = KeyManager::with_seed(ring.clone(), 5, 777)?;
    let b = KeyManager::with_seed(ring.clone(), 5, 777)?;
    let c = KeyManager::with_seed(ring, 5, 778)?;

    assert_eq!(a.encrypt_matrix(), b.encrypt_matrix());
    assert_eq!(a.decrypt_matrix(), b.decrypt_matrix());
    assert_ne!(a.encrypt_matrix(), c.encrypt_matrix());

    Ok(())
}

#[test]
fn zero_divisor_pivot_is_skipped() -> Result<(), HillCryptoError> {
    let ring = Ring::try_with(4)?;
    let mut keys = KeyManager::new(ring.clone(), 2)?;
    keys.install_key(&[2, 1, 1, 1])?;

    let encrypt = keys.encrypt_matrix().unwrap();
    let decrypt = keys.decrypt_matrix().unwrap();
    assert!(decrypt.multiply(encrypt)?.is_identity());
    assert!(encrypt.multiply(decrypt)?.is_identity());

    Ok(())
}

#[test]
fn singular_install_leaves_key_untouched() -> Result<(), HillCryptoError> {
    let ring = Ring::try_with(29)?;
    let mut keys = KeyManager::with_seed(ring, 3, 9)?;
    let before = keys.to_serialized()?;

    let identical_rows = [1, 2, 3, 1, 2, 3, 4, 5, 6];
    assert!(matches!(
        keys.install_key(&identical_rows),
        Err(HillCryptoError::InvalidKey { .. })
    ));

    assert_eq!(keys.to_serialized()?, before);
    assert!(keys.decrypt_matrix().unwrap().multiply(keys.encrypt_matrix().unwrap())?.is_identity());

    Ok(())
}

#[test]
fn persisted_key_reloads() -> Result<(), HillCryptoError> {
    let ring = Ring::try_with(29)?;
    let keys = KeyManager::with_seed(ring.clone(), 3, 31)?;

    let json = keys.to_serialized()?.to_json()?;
    let reloaded = KeyManager::from_serialized(&hill_crypto::SerializedKey::from_json(&json)?)?;

    let plaintext = random_blocks(&ring, 4, 3, 3);
    assert_eq!(
        reloaded.decrypt_blocks(&keys.encrypt_blocks(&plaintext)?)?,
        plaintext
    );

    Ok(())
}

#[quickcheck]
fn prop_round_trip(modulus: u8, block_length: u8, seed: u64) -> TestResult {
    let modulus = modulus as u64 % 60 + 2;
    let block_length = block_length as usize % 5 + 1;

    let Ok(ring) = Ring::try_with(modulus) else {
        return TestResult::error("ring construction failed");
    };
    let keys = match KeyManager::with_seed(ring.clone(), block_length, seed) {
        Ok(keys) => keys,
        // small rings can legitimately run out of attempts
        Err(HillCryptoError::KeyGenerationExhausted { .. }) => return TestResult::discard(),
        Err(e) => return TestResult::error(e.to_string()),
    };

    let plaintext = random_blocks(&ring, 3, block_length, seed.wrapping_add(1));
    let result = keys
        .encrypt_blocks(&plaintext)
        .and_then(|c| keys.decrypt_blocks(&c));

    match result {
        Ok(decrypted) => TestResult::from_bool(decrypted == plaintext),
        Err(e) => TestResult::error(e.to_string()),
    }
}

#[quickcheck]
fn prop_inverse_is_two_sided(entries: Vec<i64>, seed: u8) -> TestResult {
    let ring = match Ring::try_with(seed as u64 % 40 + 2) {
        Ok(ring) => ring,
        Err(e) => return TestResult::error(e.to_string()),
    };
    let mut m = Matrix::zeros(3, &ring);
    m.populate_row_major(entries);

    match m.inverse() {
        Ok(inv) => {
            let left = inv.multiply(&m).map(|p| p.is_identity()).unwrap_or(false);
            let right = m.multiply(&inv).map(|p| p.is_identity()).unwrap_or(false);
            TestResult::from_bool(left && right)
        }
        Err(HillCryptoError::NotInvertible { .. }) => TestResult::discard(),
        Err(e) => TestResult::error(e.to_string()),
    }
}
