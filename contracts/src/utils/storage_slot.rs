//! Helper for reading and writing primitive types to specific storage slots.
use alloy_primitives::{B256, U256};
use ledger::storage::StorageType;

/// Helper for reading and writing primitive types to specific storage slots.
///
/// Storage slots are often used to avoid storage conflict when dealing with
/// upgradeable contracts. This library helps with reading and writing to such
/// slots without the need for low-level operations.
///
/// The functions in this library return appropriate storage types that can be
/// used to read or write through the execution context.
///
/// Example usage to set the implementation slot:
///
/// ```rust
/// use alloy_primitives::{Address, B256};
/// use ledger::{storage::StorageAddress, Context};
/// use upgradeable_proxy::utils::storage_slot::StorageSlot;
///
/// const IMPLEMENTATION_SLOT: B256 = StorageSlot::derive(b"proxy.implementation");
///
/// fn set_implementation(ctx: &mut Context<'_>, new_implementation: Address) {
///     StorageSlot::get_slot::<StorageAddress>(IMPLEMENTATION_SLOT)
///         .set(ctx, new_implementation);
/// }
/// ```
pub struct StorageSlot;

impl StorageSlot {
    /// Returns a [`StorageType`] located at `slot`.
    ///
    /// # Arguments
    ///
    /// * `slot` - The slot to get the value from.
    #[must_use]
    pub fn get_slot<ST: StorageType>(slot: B256) -> ST {
        ST::new(U256::from_be_bytes(slot.0))
    }

    /// Derives the slot identifier of a named singleton value.
    ///
    /// The identifier is the keccak-256 hash of `name`, computed at compile
    /// time when used in a `const`.
    #[must_use]
    pub const fn derive(name: &[u8]) -> B256 {
        B256::new(keccak_const::Keccak256::new().update(name).finalize())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256, keccak256, uint, Address};
    use ledger::{
        prelude::*,
        storage::{StorageAddress, StorageU256},
    };

    use super::*;

    const IMPLEMENTATION_SLOT: B256 = b256!(
        "0x0000000000000000000000000000000000000000000000000000000000003039"
    );
    const ZERO_SLOT: B256 = B256::ZERO;

    const ALICE: Address = address!("0x00000000000000000000000000000000000A11CE");
    const IMPL_ADDRESS: Address =
        address!("0x00000000000000000000000000000000001A3B1E");

    /// Writes an address both to a fixed slot and to slot zero.
    struct SlotExample;

    impl Contract for SlotExample {
        fn call(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
            let (target, at_zero) = match calldata {
                [0] => (IMPL_ADDRESS, false),
                [1] => (ctx.msg_sender(), true),
                _ => return Err(Vec::new()),
            };
            let slot = if at_zero { ZERO_SLOT } else { IMPLEMENTATION_SLOT };
            StorageSlot::get_slot::<StorageAddress>(slot).set(ctx, target);
            Ok(Vec::new())
        }
    }

    #[test]
    fn derive_matches_runtime_hash() {
        let slot = StorageSlot::derive(b"proxy.implementation");
        assert_eq!(slot, keccak256(b"proxy.implementation"));
        assert_ne!(slot, StorageSlot::derive(b"proxy.admin"));
    }

    #[test]
    fn get_slot_points_at_given_slot() {
        let slot = StorageSlot::get_slot::<StorageU256>(B256::with_last_byte(7));
        assert_eq!(slot.slot(), uint!(7_U256));
    }

    #[test]
    fn storage_slot() {
        const IMPLEMENTATION: U256 = uint!(12345_U256);
        let mut ledger = Ledger::default();
        let contract = ledger.deploy(ALICE, SlotExample);

        assert_eq!(ledger.storage_at(contract, IMPLEMENTATION), U256::ZERO);

        ledger
            .sender(ALICE)
            .transact(contract, &[0])
            .expect("should set implementation slot");
        assert_eq!(
            ledger.storage_at(contract, IMPLEMENTATION),
            U256::from_be_slice(IMPL_ADDRESS.as_slice())
        );
        assert_eq!(ledger.storage_at(contract, U256::ZERO), U256::ZERO);

        ledger
            .sender(ALICE)
            .transact(contract, &[1])
            .expect("should set slot zero");
        assert_eq!(
            ledger.storage_at(contract, IMPLEMENTATION),
            U256::from_be_slice(IMPL_ADDRESS.as_slice())
        );
        assert_eq!(
            ledger.storage_at(contract, U256::ZERO),
            U256::from_be_slice(ALICE.as_slice())
        );
    }
}
