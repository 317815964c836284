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

//! Pay-to-script-hash payments.
//!
//! A P2SH payment can be given by any subset of its forms:
//! ```text
//! address <-> hash <-> output: OP_HASH160 <hash> OP_EQUAL
//!               ^
//!               | hash160
//! redeem { output, input, witness } <-> input: [redeem.input ...] <redeem.output>
//! ```
//! [`P2sh`] keeps the provided forms and derives the missing ones on demand.

use std::str::FromStr;

use amplify::Wrapper;
use bitcoin::{ScriptHash, Witness};
use bitcoin_scripts::{
    compile, tokenize, PubkeyScript, RedeemScript, ScriptHashAddress, SigScript, Token,
    P2SH_SCRIPT_LEN,
};

use crate::memo::Memo;
use crate::{ChainParams, Error};

/// Options for payment construction
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct PaymentOpts {
    /// Cross-check all provided fields for consistency and script rules.
    /// When disabled, inconsistent fields are derived without errors.
    pub validate: bool,
}

impl Default for PaymentOpts {
    fn default() -> Self { PaymentOpts { validate: true } }
}

/// Redeem script and the data satisfying it
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Redeem {
    /// Network the redeem data belong to
    pub network: Option<ChainParams>,

    /// Redeem script, which hash is committed by the payment
    pub output: Option<RedeemScript>,

    /// `scriptSig` satisfying redeem script, without the redeem script itself
    pub input: Option<SigScript>,

    /// Witness satisfying redeem script for segwit spendings
    pub witness: Option<Witness>,
}

/// P2SH payment fields provided for [`P2sh`] construction; all are optional
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct P2shParts {
    /// Payment network; defaults to the redeem network or bitcoin mainnet
    pub network: Option<ChainParams>,

    /// Base58check address
    pub address: Option<String>,

    /// Redeem script hash
    pub hash: Option<ScriptHash>,

    /// P2SH `scriptPubkey`
    pub output: Option<PubkeyScript>,

    /// Redeem script with its satisfaction
    pub redeem: Option<Redeem>,

    /// Complete `scriptSig` ending with the redeem script push
    pub input: Option<SigScript>,

    /// Complete witness stack
    pub witness: Option<Witness>,
}

impl P2shParts {
    fn is_sufficient(&self) -> bool {
        self.address.is_some()
            || self.hash.is_some()
            || self.output.is_some()
            || self.redeem.is_some()
            || self.input.is_some()
    }

    fn check_shape(&self) -> Result<(), Error> {
        match self.output {
            Some(ref output) if output.as_bytes().len() != P2SH_SCRIPT_LEN => {
                Err(Error::OutputLength(output.as_bytes().len()))
            }
            _ => Ok(()),
        }
    }
}

/// Pay-to-script-hash payment.
///
/// Fields provided at construction are returned as-is; the rest are derived
/// from them on the first access and cached.
#[derive(Clone, Debug)]
pub struct P2sh {
    network: ChainParams,
    parts: P2shParts,
    address: Memo<String>,
    hash: Memo<ScriptHash>,
    output: Memo<PubkeyScript>,
    redeem: Memo<Redeem>,
    input: Memo<SigScript>,
    witness: Memo<Witness>,
    input_tokens: Memo<Vec<Token>>,
}

impl P2sh {
    /// Constructs payment from the provided fields, validating their
    /// consistency.
    #[inline]
    pub fn new(parts: P2shParts) -> Result<Self, Error> { P2sh::with_opts(parts, default!()) }

    /// Constructs payment from the provided fields using custom options.
    pub fn with_opts(parts: P2shParts, opts: PaymentOpts) -> Result<Self, Error> {
        if !parts.is_sufficient() {
            return Err(Error::InsufficientData);
        }
        parts.check_shape()?;

        let network = parts
            .network
            .or_else(|| parts.redeem.as_ref().and_then(|redeem| redeem.network))
            .unwrap_or_default();

        let payment = P2sh {
            network,
            parts,
            address: Memo::new("address"),
            hash: Memo::new("hash"),
            output: Memo::new("output"),
            redeem: Memo::new("redeem"),
            input: Memo::new("input"),
            witness: Memo::new("witness"),
            input_tokens: Memo::new("input tokens"),
        };
        if opts.validate {
            payment.validate()?;
        }
        Ok(payment)
    }

    /// Returns fields provided at construction
    #[inline]
    pub fn parts(&self) -> &P2shParts { &self.parts }

    /// Returns payment network parameters
    #[inline]
    pub fn network(&self) -> ChainParams { self.network }

    /// Returns base58check address
    pub fn address(&self) -> Option<&str> {
        match self.parts.address {
            Some(ref address) => Some(address),
            None => self
                .address
                .get_or_derive(|| self.derive_address())
                .map(String::as_str),
        }
    }

    /// Returns redeem script hash
    pub fn hash(&self) -> Option<ScriptHash> {
        self.parts
            .hash
            .or_else(|| self.hash.get_or_derive(|| self.derive_hash()).copied())
    }

    /// Returns P2SH `scriptPubkey`
    pub fn output(&self) -> Option<&PubkeyScript> {
        self.parts
            .output
            .as_ref()
            .or_else(|| self.output.get_or_derive(|| self.derive_output()))
    }

    /// Returns redeem script with its satisfaction
    pub fn redeem(&self) -> Option<&Redeem> {
        self.parts.redeem.as_ref().or_else(|| self.input_redeem())
    }

    /// Returns complete `scriptSig`
    pub fn input(&self) -> Option<&SigScript> {
        self.parts
            .input
            .as_ref()
            .or_else(|| self.input.get_or_derive(|| self.derive_input()))
    }

    /// Returns complete witness stack
    pub fn witness(&self) -> Option<&Witness> {
        self.parts
            .witness
            .as_ref()
            .or_else(|| self.witness.get_or_derive(|| self.derive_witness()))
    }

    /// Tokens of the provided `scriptSig`; `None` if no input was provided or
    /// it can't be tokenized.
    pub(crate) fn input_tokens(&self) -> Option<&Vec<Token>> {
        self.input_tokens.get_or_derive(|| {
            let input = self.parts.input.as_ref()?;
            tokenize(input.as_inner())
                .map_err(|err| log::warn!("unable to tokenize P2SH input {:x}: {}", input, err))
                .ok()
        })
    }

    /// Redeem data extracted from the provided `scriptSig`
    pub(crate) fn input_redeem(&self) -> Option<&Redeem> {
        self.redeem.get_or_derive(|| self.derive_redeem())
    }

    /// Decodes provided address
    pub(crate) fn decode_address(&self) -> Option<Result<ScriptHashAddress, Error>> {
        self.parts
            .address
            .as_deref()
            .map(|address| ScriptHashAddress::from_str(address).map_err(Error::from))
    }

    fn derive_address(&self) -> Option<String> {
        let hash = self.hash()?;
        Some(ScriptHashAddress::new(self.network.script_hash, hash).to_string())
    }

    fn derive_hash(&self) -> Option<ScriptHash> {
        if let Some(ref output) = self.parts.output {
            return output.embedded_hash();
        }
        if let Some(address) = self.decode_address() {
            return address
                .map_err(|err| log::warn!("unable to derive hash from P2SH address: {}", err))
                .ok()
                .and_then(|address| address.script_hash());
        }
        self.redeem()?
            .output
            .as_ref()
            .map(RedeemScript::script_hash)
    }

    fn derive_output(&self) -> Option<PubkeyScript> {
        self.hash().map(|hash| PubkeyScript::p2sh(&hash))
    }

    fn derive_redeem(&self) -> Option<Redeem> {
        let (last, rest) = self.input_tokens()?.split_last()?;
        Some(Redeem {
            network: Some(self.network),
            output: last.as_push().map(|data| RedeemScript::from(data.to_vec())),
            input: Some(SigScript::from(compile(rest))),
            witness: Some(self.parts.witness.clone().unwrap_or_default()),
        })
    }

    fn derive_input(&self) -> Option<SigScript> {
        let redeem = self.parts.redeem.as_ref()?;
        let (input, output) = (redeem.input.as_ref()?, redeem.output.as_ref()?);
        let mut tokens = tokenize(input.as_inner())
            .map_err(|err| log::warn!("unable to tokenize P2SH redeem input {:x}: {}", input, err))
            .ok()?;
        tokens.push(Token::Push(output.as_bytes().to_vec()));
        Some(SigScript::from(compile(&tokens)))
    }

    fn derive_witness(&self) -> Option<Witness> {
        if let Some(witness) = self.redeem().and_then(|redeem| redeem.witness.as_ref()) {
            return Some(witness.clone());
        }
        self.input().map(|_| Witness::default())
    }
}
