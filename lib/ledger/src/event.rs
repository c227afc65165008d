use alloy_primitives::Address;
use alloy_sol_types::SolEvent;

use crate::ledger::Receipt;

/// Extension trait for asserting an event gets emitted.
pub trait EventExt<E> {
    /// Asserts the transaction emitted the `expected` event.
    fn emits(&self, expected: E) -> bool;

    /// Asserts `emitter` emitted the `expected` event.
    fn emits_from(&self, emitter: Address, expected: E) -> bool;
}

impl<E: SolEvent> EventExt<E> for Receipt {
    fn emits(&self, expected: E) -> bool {
        let expected = expected.encode_log_data();
        self.logs.iter().any(|log| log.data == expected)
    }

    fn emits_from(&self, emitter: Address, expected: E) -> bool {
        let expected = expected.encode_log_data();
        self.logs
            .iter()
            .filter(|log| log.address == emitter)
            .any(|log| log.data == expected)
    }
}
