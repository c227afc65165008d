//! # Ledger - Journaled Account State for Contract Code
//!
//! This crate runs contract code against an in-memory, account-based ledger.
//! Each account holds a balance, a nonce, optional code and a word-addressed
//! storage map. Code is any type implementing [`Contract`]; it reaches the
//! ledger only through the [`Context`] of the frame it runs in.
//!
//! Frames are opened either as a regular call, where the callee acts on its
//! own storage, or as a delegate call, where the callee's code acts on the
//! caller's storage with the caller's sender and value. Every frame is
//! journaled: a failing frame discards its own changes and leaves its caller
//! free to continue, and a failing transaction discards everything except
//! the sender's nonce.
//!
//! ## Usage
//!
//! ```rust
//! use alloy_primitives::{address, Address};
//! use ledger::prelude::*;
//!
//! struct Echo;
//!
//! impl Contract for Echo {
//!     fn call(&self, _ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
//!         Ok(calldata.to_vec())
//!     }
//! }
//!
//! const ALICE: Address = address!("0x00000000000000000000000000000000000A11CE");
//!
//! let mut ledger = Ledger::default();
//! let echo = ledger.deploy(ALICE, Echo);
//! let receipt = ledger.sender(ALICE).transact(echo, &[1, 2, 3]).unwrap();
//! assert_eq!(receipt.output, vec![1, 2, 3]);
//! ```
#![deny(rustdoc::broken_intra_doc_links)]
pub mod call;
mod context;
mod contract;
pub mod environment;
mod error;
mod event;
pub mod gas;
mod ledger;
pub mod prelude;
mod state;
pub mod storage;

pub use crate::{
    context::{Context, Frame},
    contract::Contract,
    environment::Environment,
    error::ErrorExt,
    event::EventExt,
    ledger::{Ledger, Receipt, Revert, Sender},
};
