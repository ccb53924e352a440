//! End-to-end scenarios: the real dispatcher wired to the reference
//! collaborators.
//!
//! Exercises the full invocation surface the way an enclave host would - raw
//! opcodes in, slots out - including the seal/unseal round trip and the
//! decrypt-lock guarantees.

use keyward_core::{DispatchError, KeyHandler, LockState};
use keyward_crypto::{KeySealer, SEAL_KEY_SIZE, SEAL_OVERHEAD, SealerService, SystemEntropy};
use keyward_proto::{Opcode, OutBuf, Param, Params, ResultCode, Value};
use proptest::prelude::*;

type Service = KeyHandler<SealerService, SystemEntropy>;

fn start_service() -> Service {
    let sealer = KeySealer::new([0x24; SEAL_KEY_SIZE]);
    KeyHandler::new(SealerService::new(sealer), SystemEntropy::new())
}

fn crypto_params<'a>(input: &'a [u8], handle: &'a [u8], out: &'a mut [u8]) -> Params<'a> {
    Params::new([
        Param::BufferIn(input),
        Param::BufferIn(handle),
        Param::BufferOut(OutBuf::new(out)),
        Param::None,
    ])
}

fn read_lock(service: &mut Service) -> u32 {
    let mut params = Params::new([
        Param::ValueOut(Value::default()),
        Param::None,
        Param::None,
        Param::None,
    ]);
    service.dispatch(Opcode::GetLock.to_u32(), &mut params).unwrap();
    params.value(0).unwrap().a
}

fn encrypt(service: &mut Service, key_blob: &[u8], handle: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; key_blob.len() + SEAL_OVERHEAD];
    let mut params = crypto_params(key_blob, handle, &mut out);
    service.dispatch(Opcode::KeyEncrypt.to_u32(), &mut params).unwrap();
    params.buffer_out(2).unwrap().written().to_vec()
}

/// Scenario A: fresh service reports unlocked, then seals and unseals a key
/// blob back to the original.
#[test]
fn scenario_round_trip_on_fresh_service() {
    let mut service = start_service();
    assert_eq!(read_lock(&mut service), 0);

    let key_blob = b"full-disk-encryption KEK";
    let handle = b"nvme0n1p3";
    let sealed = encrypt(&mut service, key_blob, handle);
    assert_eq!(sealed.len(), key_blob.len() + SEAL_OVERHEAD);

    let mut plain = vec![0u8; key_blob.len()];
    let mut params = crypto_params(&sealed, handle, &mut plain);
    service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut params).unwrap();
    assert_eq!(params.buffer_out(2).unwrap().written(), key_blob);
}

/// Scenario B: once locked, decryption of a perfectly valid blob is refused.
#[test]
fn scenario_lock_refuses_valid_decrypt() {
    let mut service = start_service();
    let sealed = encrypt(&mut service, b"kek", b"h");

    service.dispatch(Opcode::Lock.to_u32(), &mut Params::empty()).unwrap();

    let mut plain = vec![0u8; 3];
    let mut params = crypto_params(&sealed, b"h", &mut plain);
    let result = service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut params);
    assert_eq!(result, Err(DispatchError::AccessDenied));
    assert_eq!(
        result.unwrap_err().result_code(),
        ResultCode::ACCESS_DENIED
    );
}

/// Scenario C: a shape-rejected decrypt changes no state.
#[test]
fn scenario_bad_shape_is_a_pure_rejection() {
    let mut service = start_service();

    // Decrypt requires two input buffers and an output buffer.
    let result = service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut Params::empty());
    assert!(matches!(result, Err(DispatchError::BadParameters { .. })));

    assert_eq!(read_lock(&mut service), 0);
}

/// Scenario D: opcodes outside the command set are unsupported.
#[test]
fn scenario_unknown_opcode() {
    let mut service = start_service();
    let result = service.dispatch(0xFFFF, &mut Params::empty());
    assert_eq!(result, Err(DispatchError::UnsupportedCommand(0xFFFF)));
    assert_eq!(
        result.unwrap_err().result_code(),
        ResultCode::NOT_SUPPORTED
    );
}

#[test]
fn lock_is_terminal_and_idempotent() {
    let mut service = start_service();
    let sealed = encrypt(&mut service, b"kek", b"h");

    for _ in 0..3 {
        service.dispatch(Opcode::Lock.to_u32(), &mut Params::empty()).unwrap();
        assert_eq!(read_lock(&mut service), 1);

        let mut plain = vec![0u8; 3];
        let mut params = crypto_params(&sealed, b"h", &mut plain);
        assert_eq!(
            service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut params),
            Err(DispatchError::AccessDenied)
        );
    }
}

#[test]
fn encrypt_is_permitted_while_locked() {
    let mut service = start_service();
    service.dispatch(Opcode::Lock.to_u32(), &mut Params::empty()).unwrap();

    let sealed = encrypt(&mut service, b"kek after lock", b"h");
    assert_eq!(sealed.len(), b"kek after lock".len() + SEAL_OVERHEAD);
}

#[test]
fn get_lock_is_side_effect_free() {
    let mut service = start_service();
    for _ in 0..5 {
        assert_eq!(read_lock(&mut service), 0);
    }
    assert_eq!(service.lock_state(), LockState::Unlocked);
}

#[test]
fn lock_does_not_persist_across_instances() {
    let mut first = start_service();
    first.dispatch(Opcode::Lock.to_u32(), &mut Params::empty()).unwrap();
    drop(first);

    let mut second = start_service();
    assert_eq!(read_lock(&mut second), 0);
}

#[test]
fn decrypt_under_wrong_handle_propagates_mac_failure() {
    let mut service = start_service();
    let sealed = encrypt(&mut service, b"kek", b"handle-a");

    let mut plain = vec![0u8; 3];
    let mut params = crypto_params(&sealed, b"handle-b", &mut plain);
    let result = service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut params);
    assert_eq!(result.unwrap_err().result_code(), ResultCode::MAC_INVALID);
}

#[test]
fn gen_random_fills_requested_bytes() {
    let mut service = start_service();
    let mut out = [0u8; 32];
    let mut params = Params::new([
        Param::BufferOut(OutBuf::new(&mut out)),
        Param::None,
        Param::None,
        Param::None,
    ]);

    service.dispatch(Opcode::GenRandom.to_u32(), &mut params).unwrap();
    assert_eq!(params.buffer_out(0).unwrap().written_len(), 32);
}

#[test]
fn debug_forwards_caller_buffer() {
    let mut service = start_service();
    let message = b"initrd: unlocking root volume";
    let mut params = Params::new([
        Param::BufferIn(message),
        Param::None,
        Param::None,
        Param::None,
    ]);

    service.dispatch(Opcode::Debug.to_u32(), &mut params).unwrap();
}

/// Property: any key blob round-trips through the full dispatch surface, and
/// is refused after locking.
#[test]
fn prop_dispatch_round_trip_then_lock() {
    proptest!(|(key_blob in prop::collection::vec(any::<u8>(), 0..128),
                handle in prop::collection::vec(any::<u8>(), 0..32))| {
        let mut service = start_service();
        let sealed = encrypt(&mut service, &key_blob, &handle);

        let mut plain = vec![0u8; key_blob.len()];
        let mut params = crypto_params(&sealed, &handle, &mut plain);
        service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut params)?;
        prop_assert_eq!(params.buffer_out(2).unwrap().written(), key_blob.as_slice());

        service.dispatch(Opcode::Lock.to_u32(), &mut Params::empty())?;

        let mut plain = vec![0u8; key_blob.len()];
        let mut params = crypto_params(&sealed, &handle, &mut plain);
        let result = service.dispatch(Opcode::KeyDecrypt.to_u32(), &mut params);
        prop_assert_eq!(result, Err(DispatchError::AccessDenied));
    });
}
