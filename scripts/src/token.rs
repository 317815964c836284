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

//! Conversion between binary scripts and sequences of script tokens.

use std::fmt::{self, Display, Formatter};

use bitcoin::blockdata::opcodes::all::{OP_PUSHBYTES_0, OP_PUSHNUM_NEG1};
use bitcoin::blockdata::opcodes::{self, Class, ClassifyContext};
use bitcoin::blockdata::script::{self, Builder, Instruction, Script};
use bitcoin::hashes::hex::ToHex;

/// Opcode of `OP_PUSHNUM_1`; `OP_PUSHNUM_2`..`OP_PUSHNUM_16` follow it.
const PUSHNUM_BASE: u8 = 0x50;

/// Single script instruction: either a data push or an opcode.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    /// Literal data push which has no single-opcode form
    Push(Vec<u8>),

    /// Any other opcode. Pushes of empty data, single bytes `1..=16` and
    /// `0x81` are represented by `OP_0`, `OP_1`..`OP_16` and `OP_1NEGATE`.
    Op(opcodes::All),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Push(data) => write!(f, "<{}>", data.to_hex()),
            Token::Op(op) => write!(f, "{:?}", op),
        }
    }
}

impl Token {
    /// Returns pushed data, if the token is a data push
    #[inline]
    pub fn as_push(&self) -> Option<&[u8]> {
        match self {
            Token::Push(data) => Some(data),
            Token::Op(_) => None,
        }
    }
}

/// Errors happening during script tokenization
#[derive(Debug, Display, From)]
#[display(doc_comments)]
pub enum TokenizeError {
    /// script can't be split into instructions: {0}
    #[from]
    Instruction(script::Error),
}

impl std::error::Error for TokenizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TokenizeError::Instruction(err) => Some(err),
        }
    }
}

/// Splits script into tokens. Fails if a push operation runs past the end of
/// the script.
///
/// Pushes having a single-opcode form are returned as that opcode, so
/// `compile(tokenize(script))` re-encodes the script minimally.
pub fn tokenize(script: &Script) -> Result<Vec<Token>, TokenizeError> {
    script
        .instructions()
        .map(|instr| {
            Ok(match instr? {
                Instruction::PushBytes(bytes) => minimal_opcode(bytes)
                    .map(Token::Op)
                    .unwrap_or_else(|| Token::Push(bytes.to_vec())),
                Instruction::Op(op) => Token::Op(op),
            })
        })
        .collect()
}

/// Assembles tokens into a script. Data pushes use minimal encoding: empty
/// data becomes `OP_0`, single bytes `1..=16` and `0x81` become `OP_1`..`OP_16`
/// and `OP_1NEGATE`, the rest use the shortest push opcode.
pub fn compile<'token>(tokens: impl IntoIterator<Item = &'token Token>) -> Script {
    tokens
        .into_iter()
        .fold(Builder::new(), |builder, token| match token {
            Token::Push(data) => push_minimal(builder, data),
            Token::Op(op) => builder.push_opcode(*op),
        })
        .into_script()
}

fn minimal_opcode(data: &[u8]) -> Option<opcodes::All> {
    match data {
        [] => Some(OP_PUSHBYTES_0),
        [n @ 1..=16] => Some(opcodes::All::from(PUSHNUM_BASE + n)),
        [0x81] => Some(OP_PUSHNUM_NEG1),
        _ => None,
    }
}

fn push_minimal(builder: Builder, data: &[u8]) -> Builder {
    match minimal_opcode(data) {
        Some(op) => builder.push_opcode(op),
        None => builder.push_slice(data),
    }
}

/// Detects whether all tokens are data pushes or push-number opcodes
/// (`OP_0`, `OP_1NEGATE`, `OP_1`..`OP_16`).
pub fn is_push_only(tokens: &[Token]) -> bool {
    tokens.iter().all(|token| match token {
        Token::Push(_) => true,
        Token::Op(op) => matches!(
            op.classify(ClassifyContext::Legacy),
            Class::PushNum(_) | Class::PushBytes(_)
        ),
    })
}
