//! Typed handles to single storage words.
//!
//! A handle only knows its slot. Every access goes through a [`Context`], so
//! the same handle reads the proxy's storage when the code runs delegated and
//! the code's own storage when it is called directly.
use alloy_primitives::{Address, B256, U256};

use crate::context::Context;

/// A storage value located at a fixed slot.
pub trait StorageType {
    /// Creates a handle to the value at `slot`.
    fn new(slot: U256) -> Self;

    /// Gets the slot the value is stored at.
    fn slot(&self) -> U256;
}

/// Storage handle to a [`U256`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageU256 {
    slot: U256,
}

impl StorageU256 {
    /// Gets the stored value.
    pub fn get(&self, ctx: &mut Context<'_>) -> U256 {
        ctx.sload(self.slot)
    }

    /// Sets the stored value.
    pub fn set(&self, ctx: &mut Context<'_>, value: U256) {
        ctx.sstore(self.slot, value);
    }

    /// Clears the stored value.
    pub fn erase(&self, ctx: &mut Context<'_>) {
        ctx.sstore(self.slot, U256::ZERO);
    }
}

impl StorageType for StorageU256 {
    fn new(slot: U256) -> Self {
        Self { slot }
    }

    fn slot(&self) -> U256 {
        self.slot
    }
}

/// Storage handle to an [`Address`], right-aligned in its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageAddress {
    slot: U256,
}

impl StorageAddress {
    /// Gets the stored address.
    pub fn get(&self, ctx: &mut Context<'_>) -> Address {
        let word = ctx.sload(self.slot);
        Address::from_word(B256::from(word.to_be_bytes::<32>()))
    }

    /// Sets the stored address.
    pub fn set(&self, ctx: &mut Context<'_>, value: Address) {
        ctx.sstore(self.slot, U256::from_be_slice(value.as_slice()));
    }

    /// Clears the stored address.
    pub fn erase(&self, ctx: &mut Context<'_>) {
        ctx.sstore(self.slot, U256::ZERO);
    }
}

impl StorageType for StorageAddress {
    fn new(slot: U256) -> Self {
        Self { slot }
    }

    fn slot(&self) -> U256 {
        self.slot
    }
}

/// Storage handle to a `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageBool {
    slot: U256,
}

impl StorageBool {
    /// Gets the stored flag.
    pub fn get(&self, ctx: &mut Context<'_>) -> bool {
        !ctx.sload(self.slot).is_zero()
    }

    /// Sets the stored flag.
    pub fn set(&self, ctx: &mut Context<'_>, value: bool) {
        ctx.sstore(self.slot, U256::from(u8::from(value)));
    }
}

impl StorageType for StorageBool {
    fn new(slot: U256) -> Self {
        Self { slot }
    }

    fn slot(&self) -> U256 {
        self.slot
    }
}
