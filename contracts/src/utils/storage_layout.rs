//! Declared storage layouts and the upgrade conformance check.
//!
//! An implementation behind a proxy stores its fields in the proxy's storage,
//! one field per slot starting at slot `0`. A new version must keep every
//! field of the previous version at the same slot with the same type and may
//! only append new fields after them. Nothing enforces this at runtime; the
//! check in this module is meant for tests and release tooling.

/// Type of a value occupying a full storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A 256-bit unsigned integer.
    Uint256,
    /// A 20-byte account address, right-aligned.
    Address,
    /// A boolean flag.
    Bool,
}

/// A named field at a fixed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Name of the field, for diagnostics only.
    pub name: &'static str,
    /// Type stored in the field's slot.
    pub kind: FieldKind,
}

impl Field {
    /// Creates a new field description.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// An implementation with a declared storage layout.
pub trait StorageLayout {
    /// Fields in slot order: the field at index `i` occupies slot `i`.
    const FIELDS: &'static [Field];
}

/// A layout change that would reinterpret existing storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The field at `slot` changed its type.
    #[error("slot {slot}: `{previous}` of type {previous_kind:?} became `{next}` of type {next_kind:?}")]
    FieldMismatch {
        /// Slot of the field.
        slot: usize,
        /// Name of the field in the previous version.
        previous: &'static str,
        /// Type of the field in the previous version.
        previous_kind: FieldKind,
        /// Name of the field in the next version.
        next: &'static str,
        /// Type of the field in the next version.
        next_kind: FieldKind,
    },
    /// The next version no longer declares the field at `slot`.
    #[error("slot {slot}: `{name}` was removed")]
    FieldRemoved {
        /// Slot of the field.
        slot: usize,
        /// Name of the removed field.
        name: &'static str,
    },
}

/// Checks that `next` keeps every field of `previous` in place.
///
/// Fields are compared by type only, renaming a field keeps its data.
///
/// # Arguments
///
/// * `previous` - Layout of the version currently behind the proxy.
/// * `next` - Layout of the version to upgrade to.
///
/// # Errors
///
/// * [`LayoutError::FieldMismatch`] - If a field changed its type.
/// * [`LayoutError::FieldRemoved`] - If `next` declares fewer fields.
pub fn check_layout_upgrade(
    previous: &[Field],
    next: &[Field],
) -> Result<(), LayoutError> {
    for (slot, old) in previous.iter().enumerate() {
        let Some(new) = next.get(slot) else {
            return Err(LayoutError::FieldRemoved { slot, name: old.name });
        };
        if old.kind != new.kind {
            return Err(LayoutError::FieldMismatch {
                slot,
                previous: old.name,
                previous_kind: old.kind,
                next: new.name,
                next_kind: new.kind,
            });
        }
    }
    Ok(())
}
