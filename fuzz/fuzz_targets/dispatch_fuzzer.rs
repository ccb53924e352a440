//! Fuzz target for the command dispatcher
//!
//! Drive a live handler with arbitrary opcodes and slot layouts and check
//! the lock-state invariants (HIGH priority)
//!
//! # Strategy
//!
//! - Opcodes: known values, boundary values (6, 0xFFFF), arbitrary u32
//! - Slot layouts: every kind in every slot, mismatched and matching shapes
//! - Interleaving: lock commands mixed freely with crypto commands
//!
//! # Invariants
//!
//! - Lock state is monotonic: once locked, never observed unlocked
//! - After any Lock, every KeyDecrypt fails with AccessDenied
//! - Rejected invocations (unknown opcode, bad shape) never change the lock
//! - Dispatch never panics, whatever the caller supplies

#![no_main]

use arbitrary::Arbitrary;
use keyward_core::{DispatchError, KeyHandler, LockState};
use keyward_crypto::{KeySealer, SEAL_KEY_SIZE, SEAL_OVERHEAD, SealerService, SystemEntropy};
use keyward_proto::{Opcode, OutBuf, Param, Params, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum SlotChoice {
    None,
    ValueIn { a: u32, b: u32 },
    ValueOut,
    ValueInOut { a: u32, b: u32 },
    BufferIn(Vec<u8>),
    BufferOut(u16),
    BufferInOut(u16),
}

#[derive(Debug, Arbitrary)]
enum OpcodeChoice {
    Known(u8),
    Boundary,
    Raw(u32),
}

#[derive(Debug, Arbitrary)]
struct Invocation {
    opcode: OpcodeChoice,
    slots: [SlotChoice; 4],
}

fuzz_target!(|invocations: Vec<Invocation>| {
    let sealer = KeySealer::new([0x5A; SEAL_KEY_SIZE]);
    let mut handler = KeyHandler::new(SealerService::new(sealer), SystemEntropy::new());
    let mut model_locked = false;

    for invocation in invocations {
        let opcode = match invocation.opcode {
            OpcodeChoice::Known(v) => u32::from(v % 6),
            OpcodeChoice::Boundary => 0xFFFF,
            OpcodeChoice::Raw(v) => v,
        };

        let mut storage: [Vec<u8>; 4] = [const { Vec::new() }; 4];
        for (slot, choice) in invocation.slots.iter().enumerate() {
            if let SlotChoice::BufferOut(len) | SlotChoice::BufferInOut(len) = choice {
                storage[slot] = vec![0u8; usize::from(*len) % 4096];
            }
        }
        let mut storage_iter = storage.iter_mut();

        let mut slots: Vec<Param<'_>> = Vec::with_capacity(4);
        for choice in &invocation.slots {
            let out = storage_iter.next().unwrap();
            slots.push(match choice {
                SlotChoice::None => Param::None,
                SlotChoice::ValueIn { a, b } => Param::ValueIn(Value::new(*a, *b)),
                SlotChoice::ValueOut => Param::ValueOut(Value::default()),
                SlotChoice::ValueInOut { a, b } => Param::ValueInOut(Value::new(*a, *b)),
                SlotChoice::BufferIn(bytes) => Param::BufferIn(bytes),
                SlotChoice::BufferOut(_) => Param::BufferOut(OutBuf::new(out)),
                SlotChoice::BufferInOut(_) => Param::BufferInOut(OutBuf::new(out)),
            });
        }
        let slots: [Param<'_>; 4] = match slots.try_into() {
            Ok(slots) => slots,
            Err(_) => unreachable!("exactly four slots are pushed"),
        };
        let mut params = Params::new(slots);

        let result = handler.dispatch(opcode, &mut params);

        match result {
            Ok(()) => {
                if opcode == Opcode::Lock.to_u32() {
                    model_locked = true;
                }
                if opcode == Opcode::KeyDecrypt.to_u32() && model_locked {
                    panic!("decrypt succeeded while locked");
                }
            }
            Err(DispatchError::AccessDenied) => {
                assert_eq!(opcode, Opcode::KeyDecrypt.to_u32());
                assert!(model_locked, "AccessDenied while model is unlocked");
            }
            Err(DispatchError::UnsupportedCommand(raw)) => {
                assert_eq!(raw, opcode);
                assert!(Opcode::from_u32(opcode).is_none());
            }
            Err(_) => {}
        }

        // Model and handler agree after every invocation.
        let expected = if model_locked { LockState::Locked } else { LockState::Unlocked };
        assert_eq!(handler.lock_state(), expected);
    }

    // Exercise the seal path end to end when the run never locked.
    if !model_locked {
        let mut sealed = vec![0u8; 8 + SEAL_OVERHEAD];
        let mut params = Params::new([
            Param::BufferIn(&[0x11; 8]),
            Param::BufferIn(&[0x22; 4]),
            Param::BufferOut(OutBuf::new(&mut sealed)),
            Param::None,
        ]);
        handler
            .dispatch(Opcode::KeyEncrypt.to_u32(), &mut params)
            .expect("well-shaped encrypt must succeed");
    }
});
