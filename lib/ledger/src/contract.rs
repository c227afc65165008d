//! Code that can be installed on an account.
use crate::{call::ArbResult, context::Context};

/// Executable contract code.
///
/// Code is stateless: every piece of persistent data goes through the
/// [`Context`], which decides whose storage is read and written. The same
/// code therefore runs unchanged when it is called directly and when another
/// account delegates to it.
pub trait Contract: Send + Sync {
    /// Runs `calldata` in the frame described by `ctx`.
    ///
    /// # Arguments
    ///
    /// * `&self` - The code being executed.
    /// * `ctx` - Execution context of the current frame.
    /// * `calldata` - Raw input of the call, selector included.
    ///
    /// # Errors
    ///
    /// Returns the revert data when execution is rejected. Every state change
    /// made by the frame is discarded in that case.
    fn call(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult;
}
