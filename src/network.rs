// Wallet-level libraries for bitcoin protocol by LNP/BP Association
//
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// This software is distributed without any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

use bitcoin::Network;

/// Script hash address version of a bitcoin network
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[display("{network}")]
pub struct ChainParams {
    /// Network these parameters belong to
    pub network: Network,

    /// Version byte of P2SH addresses
    pub script_hash: u8,
}

impl ChainParams {
    /// Bitcoin mainnet
    pub const BITCOIN: ChainParams = ChainParams {
        network: Network::Bitcoin,
        script_hash: 0x05,
    };

    /// Bitcoin testnet3
    pub const TESTNET: ChainParams = ChainParams {
        network: Network::Testnet,
        script_hash: 0xc4,
    };

    /// Bitcoin signet
    pub const SIGNET: ChainParams = ChainParams {
        network: Network::Signet,
        script_hash: 0xc4,
    };

    /// Bitcoin regtest
    pub const REGTEST: ChainParams = ChainParams {
        network: Network::Regtest,
        script_hash: 0xc4,
    };
}

impl Default for ChainParams {
    fn default() -> Self { ChainParams::BITCOIN }
}

impl From<Network> for ChainParams {
    fn from(network: Network) -> Self {
        match network {
            Network::Bitcoin => ChainParams::BITCOIN,
            Network::Testnet => ChainParams::TESTNET,
            Network::Signet => ChainParams::SIGNET,
            Network::Regtest => ChainParams::REGTEST,
        }
    }
}

impl From<ChainParams> for Network {
    fn from(params: ChainParams) -> Self { params.network }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_mainnet() {
        assert_eq!(ChainParams::default(), ChainParams::BITCOIN);
        assert_eq!(ChainParams::default().script_hash, 0x05);
    }

    #[test]
    fn from_network() {
        assert_eq!(ChainParams::from(Network::Testnet).script_hash, 0xc4);
        assert_eq!(ChainParams::from(Network::Regtest).script_hash, 0xc4);
        assert_ne!(ChainParams::TESTNET, ChainParams::REGTEST);
        assert_eq!(Network::from(ChainParams::SIGNET), Network::Signet);
        assert_eq!(ChainParams::TESTNET.to_string(), "testnet");
    }
}
