//! Fuzz target for key unsealing
//!
//! Feed arbitrary bytes through `KeySealer::unseal` and confirm the AEAD
//! boundary holds
//!
//! # Strategy
//!
//! - Arbitrary sealed blobs: empty, shorter than the framing, giant
//! - Arbitrary handles, including empty
//! - Legitimate blobs with single-byte corruption at arbitrary offsets
//!
//! # Invariants
//!
//! - Unseal never panics on any input
//! - A genuine seal always unseals under the same key and handle
//! - Any corruption or handle mismatch is rejected, never misdecrypted

#![no_main]

use arbitrary::Arbitrary;
use keyward_crypto::{KeySealer, SEAL_KEY_SIZE, SEAL_NONCE_SIZE, SealError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    key: [u8; SEAL_KEY_SIZE],
    handle: Vec<u8>,
    blob: Vec<u8>,
    corrupt_offset: usize,
    flip: u8,
}

fuzz_target!(|input: Input| {
    let sealer = KeySealer::new(input.key);

    // Arbitrary bytes must be rejected cleanly or decrypt to something -
    // either way, no panic.
    let _ = sealer.unseal(&input.blob, &input.handle);

    // A genuine seal round-trips.
    let nonce = [0x77u8; SEAL_NONCE_SIZE];
    let sealed = sealer.seal(&input.blob, &input.handle, nonce);
    let unsealed = sealer.unseal(&sealed, &input.handle).expect("genuine seal must unseal");
    assert_eq!(unsealed, input.blob);

    // Single-byte corruption anywhere in the blob fails authentication.
    if input.flip != 0 {
        let mut corrupted = sealed.clone();
        let offset = input.corrupt_offset % corrupted.len();
        corrupted[offset] ^= input.flip;
        assert_eq!(
            sealer.unseal(&corrupted, &input.handle),
            Err(SealError::AuthenticationFailed)
        );
    }

    // Handle mismatch fails authentication.
    let mut other_handle = input.handle.clone();
    other_handle.push(0x01);
    assert_eq!(
        sealer.unseal(&sealed, &other_handle),
        Err(SealError::AuthenticationFailed)
    );
});
