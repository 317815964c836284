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

//! Consistency checks for P2SH payment fields.
//!
//! Checks run in a fixed order, carrying the script hash implied by the
//! fields checked so far. The first field implying a hash sets it; every later
//! one must match it.

use amplify::Wrapper;
use bitcoin::ScriptHash;
use bitcoin_scripts::{is_push_only, tokenize};

use crate::{Error, P2sh, Redeem};

type Check = fn(&P2sh, Option<ScriptHash>) -> Result<Option<ScriptHash>, Error>;

const CHECKS: [Check; 6] = [
    check_address,
    check_hash,
    check_output,
    check_input,
    check_redeem,
    check_witness,
];

impl P2sh {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        let hash = CHECKS
            .iter()
            .try_fold(None, |hash, check| check(self, hash))
            .map_err(|err| {
                log::debug!("P2SH payment validation failed: {}", err);
                err
            })?;
        match hash {
            Some(hash) => log::debug!("P2SH payment for script hash {} is valid", hash),
            None => log::debug!("P2SH payment is valid; no script hash is known"),
        }
        Ok(())
    }
}

fn commit(known: Option<ScriptHash>, hash: ScriptHash) -> Result<Option<ScriptHash>, Error> {
    match known {
        Some(known) if known != hash => Err(Error::HashMismatch),
        _ => Ok(Some(hash)),
    }
}

fn check_address(payment: &P2sh, hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    let Some(address) = payment.decode_address() else {
        return Ok(hash);
    };
    let address = address?;
    let expected = payment.network().script_hash;
    if address.version != expected {
        return Err(Error::AddressVersion {
            found: address.version,
            expected,
        });
    }
    let found = address
        .script_hash()
        .ok_or(Error::AddressPayload(address.payload.len()))?;
    commit(hash, found)
}

fn check_hash(payment: &P2sh, hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    match payment.parts().hash {
        Some(found) => commit(hash, found),
        None => Ok(hash),
    }
}

fn check_output(payment: &P2sh, hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    let Some(ref output) = payment.parts().output else {
        return Ok(hash);
    };
    let found = output.p2sh_hash().ok_or(Error::InvalidOutput)?;
    commit(hash, found)
}

fn check_input(payment: &P2sh, hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    if payment.parts().input.is_none() {
        return Ok(hash);
    }
    if payment.input_tokens().map(Vec::is_empty).unwrap_or(true) {
        return Err(Error::InputTooShort);
    }
    let redeem = payment
        .input_redeem()
        .filter(|redeem| redeem.output.is_some())
        .ok_or(Error::InvalidInput)?;
    check_redeem_data(redeem, hash)
}

fn check_redeem(payment: &P2sh, hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    let Some(ref redeem) = payment.parts().redeem else {
        return Ok(hash);
    };
    if matches!(redeem.network, Some(network) if network != payment.network()) {
        return Err(Error::NetworkMismatch);
    }
    if let Some(derived) = payment.parts().input.as_ref().and(payment.input_redeem()) {
        if matches!((&redeem.output, &derived.output), (Some(a), Some(b)) if a != b) {
            return Err(Error::RedeemOutputMismatch);
        }
        if matches!((&redeem.input, &derived.input), (Some(a), Some(b)) if a != b) {
            return Err(Error::RedeemInputMismatch);
        }
    }
    check_redeem_data(redeem, hash)
}

fn check_witness(payment: &P2sh, hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    let parts = payment.parts();
    let redeem_witness = parts
        .redeem
        .as_ref()
        .and_then(|redeem| redeem.witness.as_ref());
    match (&parts.witness, redeem_witness) {
        (Some(witness), Some(redeem_witness)) if witness != redeem_witness => {
            Err(Error::WitnessMismatch)
        }
        _ => Ok(hash),
    }
}

/// Checks redeem data, either provided or extracted from the input
fn check_redeem_data(redeem: &Redeem, mut hash: Option<ScriptHash>) -> Result<Option<ScriptHash>, Error> {
    if let Some(ref output) = redeem.output {
        if tokenize(output.as_inner()).map(|tokens| tokens.is_empty()).unwrap_or(true) {
            return Err(Error::RedeemOutputTooShort);
        }
        hash = commit(hash, output.script_hash())?;
    }

    if let Some(ref input) = redeem.input {
        let has_input = !input.is_empty();
        let has_witness = redeem
            .witness
            .as_ref()
            .map(|witness| !witness.is_empty())
            .unwrap_or_default();
        match (has_input, has_witness) {
            (false, false) => return Err(Error::EmptyInput),
            (true, true) => return Err(Error::InputAndWitness),
            _ => {}
        }
        if has_input
            && !tokenize(input.as_inner())
                .map(|tokens| is_push_only(&tokens))
                .unwrap_or_default()
        {
            return Err(Error::NonPushOnly);
        }
    }

    Ok(hash)
}

#[cfg(test)]
mod test {
    use bitcoin::hashes::Hash;
    use bitcoin::Witness;
    use bitcoin_scripts::{PubkeyScript, RedeemScript, ScriptHashAddress, SigScript};

    use super::*;
    use crate::{ChainParams, ErrorKind, P2shParts, PaymentOpts};

    fn hash(byte: u8) -> ScriptHash { ScriptHash::from_slice(&[byte; 20]).unwrap() }

    fn redeem_script() -> RedeemScript { RedeemScript::from(vec![0x51]) }

    fn build(parts: P2shParts) -> Result<P2sh, Error> { P2sh::new(parts) }

    #[test]
    fn commit_hash() {
        assert_eq!(commit(None, hash(1)).unwrap(), Some(hash(1)));
        assert_eq!(commit(Some(hash(1)), hash(1)).unwrap(), Some(hash(1)));
        assert!(matches!(commit(Some(hash(1)), hash(2)), Err(Error::HashMismatch)));
    }

    #[test]
    fn insufficient_data() {
        let err = build(P2shParts::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData));
        assert_eq!(err.kind(), ErrorKind::InsufficientInput);

        // network and witness alone do not identify a payment
        let err = build(P2shParts {
            network: Some(ChainParams::TESTNET),
            witness: Some(Witness::from_vec(vec![vec![1]])),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InsufficientData));
    }

    #[test]
    fn hash_output_mismatch() {
        let err = build(P2shParts {
            hash: Some(hash(1)),
            output: Some(PubkeyScript::p2sh(&hash(2))),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::HashMismatch));
        assert_eq!(err.kind(), ErrorKind::InconsistentFields);
    }

    #[test]
    fn invalid_output() {
        let mut bytes = PubkeyScript::p2sh(&hash(1)).as_bytes().to_vec();
        bytes[22] = 0x88; // OP_EQUALVERIFY
        let err = build(P2shParts {
            output: Some(PubkeyScript::from(bytes)),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOutput));
        assert_eq!(err.kind(), ErrorKind::MalformedField);
    }

    #[test]
    fn address_network_mismatch() {
        let address = P2sh::new(P2shParts {
            hash: Some(hash(1)),
            network: Some(ChainParams::TESTNET),
            ..default!()
        })
        .unwrap()
        .address()
        .unwrap()
        .to_owned();
        let err = build(P2shParts {
            address: Some(address),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::AddressVersion {
            found: 0xc4,
            expected: 0x05
        }));
        assert_eq!(err.kind(), ErrorKind::NetworkMismatch);
    }

    #[test]
    fn address_payload_length() {
        let address = ScriptHashAddress {
            version: ChainParams::BITCOIN.script_hash,
            payload: vec![7; 19],
        };
        let err = build(P2shParts {
            address: Some(address.to_string()),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::AddressPayload(19)));
        assert_eq!(err.kind(), ErrorKind::MalformedField);
    }

    #[test]
    fn redeem_output_hash_mismatch() {
        let err = build(P2shParts {
            hash: Some(hash(1)),
            redeem: Some(Redeem {
                output: Some(redeem_script()),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::HashMismatch));
    }

    #[test]
    fn redeem_output_too_short() {
        let err = build(P2shParts {
            redeem: Some(Redeem {
                output: Some(RedeemScript::default()),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::RedeemOutputTooShort));

        // truncated push
        let err = build(P2shParts {
            redeem: Some(Redeem {
                output: Some(RedeemScript::from(vec![0x4c])),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::RedeemOutputTooShort));
    }

    #[test]
    fn redeem_input_and_witness() {
        let err = build(P2shParts {
            redeem: Some(Redeem {
                output: Some(redeem_script()),
                input: Some(SigScript::from(vec![0x01, 0xff])),
                witness: Some(Witness::from_vec(vec![vec![0xff]])),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InputAndWitness));
        assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    }

    #[test]
    fn redeem_empty_input() {
        let err = build(P2shParts {
            redeem: Some(Redeem {
                output: Some(redeem_script()),
                input: Some(SigScript::default()),
                witness: Some(Witness::default()),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn redeem_non_push_only() {
        let err = build(P2shParts {
            redeem: Some(Redeem {
                output: Some(redeem_script()),
                // <ff> OP_CHECKSIG
                input: Some(SigScript::from(vec![0x01, 0xff, 0xac])),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::NonPushOnly));
    }

    #[test]
    fn input_too_short() {
        let err = build(P2shParts {
            input: Some(SigScript::default()),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InputTooShort));

        let err = build(P2shParts {
            input: Some(SigScript::from(vec![0x02, 0xff])),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InputTooShort));
    }

    #[test]
    fn input_ending_with_opcode() {
        let err = build(P2shParts {
            input: Some(SigScript::from(vec![0x01, 0xff, 0xac])),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput));
    }

    #[test]
    fn input_ending_with_number_push() {
        // <81> pushed with OP_PUSHBYTES_1 is OP_1NEGATE, not a redeem script
        let err = build(P2shParts {
            input: Some(SigScript::from(vec![0x01, 0x81])),
            witness: Some(Witness::from_vec(vec![vec![0x01]])),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput));

        let err = build(P2shParts {
            input: Some(SigScript::from(vec![0x00])),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput));
        assert_eq!(err.kind(), ErrorKind::MalformedField);
    }

    #[test]
    fn redeem_network_mismatch() {
        let err = build(P2shParts {
            network: Some(ChainParams::TESTNET),
            redeem: Some(Redeem {
                network: Some(ChainParams::REGTEST),
                output: Some(redeem_script()),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::NetworkMismatch));
        assert_eq!(err.kind(), ErrorKind::NetworkMismatch);
    }

    #[test]
    fn redeem_input_mismatch() {
        // <ff> <51>
        let input = SigScript::from(vec![0x01, 0xff, 0x01, 0x51]);
        let err = build(P2shParts {
            input: Some(input.clone()),
            redeem: Some(Redeem {
                output: Some(RedeemScript::from(vec![0x52])),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::RedeemOutputMismatch));

        let err = build(P2shParts {
            input: Some(input),
            redeem: Some(Redeem {
                input: Some(SigScript::from(vec![0x01, 0xfe])),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::RedeemInputMismatch));
    }

    #[test]
    fn witness_mismatch() {
        let err = P2sh::with_opts(
            P2shParts {
                redeem: Some(Redeem {
                    output: Some(redeem_script()),
                    input: Some(SigScript::default()),
                    witness: Some(Witness::from_vec(vec![vec![1], vec![2]])),
                    ..default!()
                }),
                witness: Some(Witness::from_vec(vec![vec![1], vec![3]])),
                ..default!()
            },
            PaymentOpts { validate: true },
        )
        .unwrap_err();
        assert!(matches!(err, Error::WitnessMismatch));

        let payment = P2sh::new(P2shParts {
            redeem: Some(Redeem {
                output: Some(redeem_script()),
                input: Some(SigScript::default()),
                witness: Some(Witness::from_vec(vec![vec![1], vec![2]])),
                ..default!()
            }),
            witness: Some(Witness::from_vec(vec![vec![1], vec![2]])),
            ..default!()
        })
        .unwrap();
        assert_eq!(payment.witness(), Some(&Witness::from_vec(vec![vec![1], vec![2]])));
    }

    #[test]
    fn checks_order() {
        // output pattern is checked before the redeem script
        let mut bytes = PubkeyScript::p2sh(&hash(1)).as_bytes().to_vec();
        bytes[0] = 0x76;
        let err = build(P2shParts {
            output: Some(PubkeyScript::from(bytes)),
            redeem: Some(Redeem {
                output: Some(RedeemScript::default()),
                ..default!()
            }),
            ..default!()
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOutput));
    }

    #[test]
    fn validation_disabled() {
        let payment = P2sh::with_opts(
            P2shParts {
                hash: Some(hash(1)),
                output: Some(PubkeyScript::p2sh(&hash(2))),
                ..default!()
            },
            PaymentOpts { validate: false },
        )
        .unwrap();
        assert_eq!(payment.hash(), Some(hash(1)));
        assert_eq!(payment.output(), Some(&PubkeyScript::p2sh(&hash(2))));
    }
}
