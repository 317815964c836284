// Descriptor wallet library extending bitcoin & miniscript functionality
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

#[macro_use]
extern crate amplify;

use std::str::FromStr;

use amplify::Wrapper;
use bitcoin::hashes::hex::{self, FromHex, ToHex};
use bitcoin::{Network, ScriptHash, Witness};
use clap::Parser;
use colored::Colorize;
use payments::scripts::{PubkeyScript, RedeemScript, SigScript};
use payments::{P2sh, P2shParts, PaymentOpts, Redeem};

/// Hex-encoded byte string argument
#[derive(Wrapper, Clone, PartialEq, Eq, Hash, Debug, From)]
pub struct HexData(Vec<u8>);

impl FromStr for HexData {
    type Err = hex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Vec::<u8>::from_hex(s).map(HexData) }
}

/// Command-line arguments
#[derive(Parser)]
#[derive(Clone, Eq, PartialEq, Debug)]
#[clap(
    author,
    version,
    name = "p2sh",
    about = "Reconstructs P2SH payment from any subset of its fields"
)]
pub struct Args {
    /// Network the payment belongs to
    #[clap(short, long, default_value = "bitcoin")]
    network: Network,

    /// Base58check P2SH address
    #[clap(short, long)]
    address: Option<String>,

    /// Hex-encoded redeem script hash
    #[clap(long)]
    hash: Option<ScriptHash>,

    /// Hex-encoded P2SH `scriptPubkey`
    #[clap(short, long)]
    output: Option<HexData>,

    /// Hex-encoded redeem script
    #[clap(short, long)]
    redeem_output: Option<HexData>,

    /// Hex-encoded `scriptSig` satisfying redeem script
    #[clap(long)]
    redeem_input: Option<HexData>,

    /// Hex-encoded witness element satisfying redeem script; may be repeated
    #[clap(long)]
    redeem_witness: Vec<HexData>,

    /// Hex-encoded complete `scriptSig`
    #[clap(short, long)]
    input: Option<HexData>,

    /// Hex-encoded complete witness element; may be repeated
    #[clap(short, long)]
    witness: Vec<HexData>,

    /// Do not check the provided fields for consistency
    #[clap(long)]
    no_validate: bool,
}

fn witness(elements: &[HexData]) -> Option<Witness> {
    if elements.is_empty() {
        return None;
    }
    Some(Witness::from_vec(
        elements.iter().map(|data| data.as_inner().clone()).collect(),
    ))
}

fn witness_hex(witness: &Witness) -> String {
    witness.iter().map(|element| element.to_hex()).collect::<Vec<_>>().join(" ")
}

fn print_field(name: &str, value: Option<String>) {
    match value {
        Some(value) => println!("{:>16} {}", name.bright_white(), value),
        None => println!("{:>16} {}", name.bright_white(), "-".dimmed()),
    }
}

impl Args {
    fn parts(&self) -> P2shParts {
        let redeem = if self.redeem_output.is_some()
            || self.redeem_input.is_some()
            || !self.redeem_witness.is_empty()
        {
            Some(Redeem {
                network: None,
                output: self
                    .redeem_output
                    .clone()
                    .map(|data| RedeemScript::from(data.into_inner())),
                input: self
                    .redeem_input
                    .clone()
                    .map(|data| SigScript::from(data.into_inner())),
                witness: witness(&self.redeem_witness),
            })
        } else {
            None
        };
        P2shParts {
            network: Some(self.network.into()),
            address: self.address.clone(),
            hash: self.hash,
            output: self
                .output
                .clone()
                .map(|data| PubkeyScript::from(data.into_inner())),
            redeem,
            input: self
                .input
                .clone()
                .map(|data| SigScript::from(data.into_inner())),
            witness: witness(&self.witness),
        }
    }

    pub fn exec(self) -> Result<(), payments::Error> {
        let opts = PaymentOpts {
            validate: !self.no_validate,
        };
        let payment = P2sh::with_opts(self.parts(), opts)?;

        println!("\nP2SH payment on {}", payment.network().to_string().yellow());
        print_field("address", payment.address().map(str::to_owned));
        print_field("hash", payment.hash().map(|hash| hash.to_hex()));
        print_field("output", payment.output().map(|output| format!("{:x}", output)));
        print_field("input", payment.input().map(|input| format!("{:x}", input)));
        print_field("witness", payment.witness().map(witness_hex));
        if let Some(redeem) = payment.redeem() {
            print_field(
                "redeem.output",
                redeem.output.as_ref().map(|output| format!("{:x}", output)),
            );
            print_field(
                "redeem.input",
                redeem.input.as_ref().map(|input| format!("{:x}", input)),
            );
            print_field("redeem.witness", redeem.witness.as_ref().map(witness_hex));
        }
        println!();
        Ok(())
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(err) = args.exec() {
        eprintln!("{}: {}\n", "Error".bright_red(), err);
        log::debug!("construction failed with {:?} error", err.kind());
        std::process::exit(1);
    }
}
