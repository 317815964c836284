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

use amplify::Wrapper;
use bitcoin::blockdata::opcodes;
use bitcoin::blockdata::opcodes::all::{OP_EQUAL, OP_HASH160, OP_PUSHBYTES_20};
use bitcoin::blockdata::script::Script;
use bitcoin::hashes::Hash;
use bitcoin::ScriptHash;

/// Length of a P2SH `scriptPubkey`: `OP_HASH160 <20 bytes> OP_EQUAL`.
pub const P2SH_SCRIPT_LEN: usize = 23;

/// A content of `scriptPubkey` from a transaction output
#[derive(
    Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Display, From
)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
#[display("{0}", alt = "{0:x}")]
#[wrapper(LowerHex, UpperHex)]
pub struct PubkeyScript(Script);

impl PubkeyScript {
    /// Constructs P2SH `scriptPubkey` locking to the given script hash.
    #[inline]
    pub fn p2sh(hash: &ScriptHash) -> Self { Script::new_p2sh(hash).into() }

    /// Returns the script hash committed by a P2SH `scriptPubkey`, or `None`
    /// if the script does not match `OP_HASH160 <20 bytes> OP_EQUAL` exactly.
    pub fn p2sh_hash(&self) -> Option<ScriptHash> {
        let bytes = self.as_inner().as_bytes();
        if bytes.len() != P2SH_SCRIPT_LEN
            || opcodes::All::from(bytes[0]) != OP_HASH160
            || opcodes::All::from(bytes[1]) != OP_PUSHBYTES_20
            || opcodes::All::from(bytes[22]) != OP_EQUAL
        {
            return None;
        }
        self.embedded_hash()
    }

    /// Reads 20 bytes at the position where P2SH `scriptPubkey` keeps its
    /// script hash, without checking the surrounding opcodes.
    pub fn embedded_hash(&self) -> Option<ScriptHash> {
        self.as_inner()
            .as_bytes()
            .get(2..22)
            .and_then(|slice| ScriptHash::from_slice(slice).ok())
    }

    /// Returns raw script bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { self.as_inner().as_bytes() }
}

impl From<Vec<u8>> for PubkeyScript {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self { PubkeyScript(Script::from(bytes)) }
}

/// A content of `scriptSig` from a transaction input
#[derive(
    Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Display, From
)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
#[display("{0}", alt = "{0:x}")]
#[wrapper(LowerHex, UpperHex)]
pub struct SigScript(Script);

impl SigScript {
    /// Returns raw script bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { self.as_inner().as_bytes() }

    /// Detects empty `scriptSig`
    #[inline]
    pub fn is_empty(&self) -> bool { self.as_inner().is_empty() }
}

impl From<Vec<u8>> for SigScript {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self { SigScript(Script::from(bytes)) }
}

/// Redeem script as part of the `witness` or `scriptSig` structure; it is
/// hashed for P2SH output.
#[derive(
    Wrapper, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Display, From
)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
#[display("{0}", alt = "{0:x}")]
#[wrapper(LowerHex, UpperHex)]
pub struct RedeemScript(Script);

impl RedeemScript {
    /// Computes script commitment hash which participates in [`PubkeyScript`]
    #[inline]
    pub fn script_hash(&self) -> ScriptHash { self.as_inner().script_hash() }

    /// Returns raw script bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { self.as_inner().as_bytes() }
}

impl From<Vec<u8>> for RedeemScript {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self { RedeemScript(Script::from(bytes)) }
}
