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

//! Pay-to-script-hash payment descriptors.
//!
//! A [`P2sh`] payment is constructed from any subset of its representations
//! (address, script hash, output script, redeem script with its satisfaction,
//! full input script or witness) and derives all the others on demand,
//! checking that the provided ones are consistent with each other.
//!
//! ```
//! use payments::{P2sh, P2shParts, Redeem};
//! use payments::scripts::RedeemScript;
//!
//! let payment = P2sh::new(P2shParts {
//!     redeem: Some(Redeem {
//!         output: Some(RedeemScript::from(vec![0x51])),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! })
//! .unwrap();
//! assert_eq!(payment.address(), Some("3MaB7QVq3k4pQx3BhsvEADgzQonLSBwMdj"));
//! ```

// Coding conventions
#![recursion_limit = "256"]
#![deny(dead_code, missing_docs)]

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub extern crate bitcoin_scripts as scripts;

mod error;
pub mod memo;
mod network;
mod p2sh;
mod validate;

pub use error::{Error, ErrorKind};
pub use network::ChainParams;
pub use p2sh::{P2sh, P2shParts, PaymentOpts, Redeem};
