// Descriptor wallet library extending bitcoin & miniscript functionality
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@pandoracore.com>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

//! Script-level building blocks for P2SH payments: typed script wrappers,
//! a tokenizer/compiler for script instructions and the base58check address
//! codec.

// Coding conventions
#![recursion_limit = "256"]
#![deny(dead_code, missing_docs)]

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub mod address;
pub mod token;
mod types;

pub use address::{AddressError, ScriptHashAddress};
pub use token::{compile, is_push_only, tokenize, Token, TokenizeError};
pub use types::{PubkeyScript, RedeemScript, SigScript, P2SH_SCRIPT_LEN};
