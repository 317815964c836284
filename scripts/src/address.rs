// BP foundation libraries Bitcoin crates implementing the foundations of
// Bitcoin protocol by LNP/BP Association (https://lnp-bp.org)
//
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// This software is distributed without any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

//! Base58check text encoding of script hash addresses.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use bitcoin::hashes::Hash;
use bitcoin::util::base58;
use bitcoin::ScriptHash;

/// Errors parsing base58check-encoded address
#[derive(Debug, Display, From)]
#[display(doc_comments)]
pub enum AddressError {
    /// invalid base58check address encoding: {0}
    #[from]
    Base58(base58::Error),

    /// address data does not contain version byte
    NoVersion,
}

impl std::error::Error for AddressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AddressError::Base58(err) => Some(err),
            AddressError::NoVersion => None,
        }
    }
}

/// Base58check address content: a version byte followed by the payload.
///
/// The payload length is not checked on parsing, so the structure can carry
/// malformed addresses for later inspection; use
/// [`ScriptHashAddress::script_hash`] to get a well-formed hash.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ScriptHashAddress {
    /// Address version byte, defined by the network parameters
    pub version: u8,

    /// Address payload following the version byte
    pub payload: Vec<u8>,
}

impl ScriptHashAddress {
    /// Constructs address from the version byte and script hash
    pub fn new(version: u8, hash: ScriptHash) -> Self {
        ScriptHashAddress {
            version,
            payload: hash[..].to_vec(),
        }
    }

    /// Returns script hash, if the payload has exactly 20 bytes
    pub fn script_hash(&self) -> Option<ScriptHash> { ScriptHash::from_slice(&self.payload).ok() }
}

impl Display for ScriptHashAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut data = Vec::with_capacity(self.payload.len() + 1);
        data.push(self.version);
        data.extend_from_slice(&self.payload);
        f.write_str(&base58::check_encode_slice(&data))
    }
}

impl FromStr for ScriptHashAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = base58::from_check(s)?;
        let (version, payload) = data.split_first().ok_or(AddressError::NoVersion)?;
        Ok(ScriptHashAddress {
            version: *version,
            payload: payload.to_vec(),
        })
    }
}
