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

use bitcoin_scripts::AddressError;

/// Class of P2SH payment construction errors
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display(doc_comments)]
pub enum ErrorKind {
    /// none of the identifying payment fields were provided
    InsufficientInput,

    /// a provided field violates its own format
    MalformedField,

    /// independently provided fields contradict each other
    InconsistentFields,

    /// unlocking data violates script structure rules
    StructuralViolation,

    /// provided data belong to a different network
    NetworkMismatch,
}

/// Errors constructing or validating P2SH payment
#[derive(Debug, Display, From)]
#[display(doc_comments)]
pub enum Error {
    /// not enough data: at least one of address, hash, output, redeem or input
    /// must be provided
    InsufficientData,

    /// P2SH output script must be 23 bytes long, while {0} bytes were provided
    OutputLength(usize),

    /// invalid address. Details: {0}
    #[from]
    AddressEncoding(AddressError),

    /// invalid address version {found} or network mismatch: the network uses
    /// version {expected} for script hash addresses
    AddressVersion {
        /// Version byte found in the address
        found: u8,
        /// Script hash version byte of the payment network
        expected: u8,
    },

    /// invalid address: payload must be a 20-byte script hash, while it has
    /// {0} bytes
    AddressPayload(usize),

    /// script hash mismatch between provided payment fields
    HashMismatch,

    /// output script is not a valid P2SH script
    InvalidOutput,

    /// redeem output script is too short
    RedeemOutputTooShort,

    /// redeem input is empty: either scriptSig or witness must be provided
    EmptyInput,

    /// both redeem scriptSig and witness are provided
    InputAndWitness,

    /// redeem scriptSig is not push-only
    NonPushOnly,

    /// input script is too short
    InputTooShort,

    /// input script is invalid: its last instruction must push the redeem
    /// script
    InvalidInput,

    /// redeem network does not match the payment network
    NetworkMismatch,

    /// redeem output script does not match the one from the input script
    RedeemOutputMismatch,

    /// redeem input script does not match the one from the input script
    RedeemInputMismatch,

    /// witness does not match redeem witness
    WitnessMismatch,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AddressEncoding(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// Classifies the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InsufficientData => ErrorKind::InsufficientInput,
            Error::OutputLength(_)
            | Error::AddressEncoding(_)
            | Error::AddressPayload(_)
            | Error::InvalidOutput
            | Error::RedeemOutputTooShort
            | Error::InputTooShort
            | Error::InvalidInput => ErrorKind::MalformedField,
            Error::HashMismatch
            | Error::RedeemOutputMismatch
            | Error::RedeemInputMismatch
            | Error::WitnessMismatch => ErrorKind::InconsistentFields,
            Error::EmptyInput | Error::InputAndWitness | Error::NonPushOnly => {
                ErrorKind::StructuralViolation
            }
            Error::AddressVersion { .. } | Error::NetworkMismatch => ErrorKind::NetworkMismatch,
        }
    }
}
