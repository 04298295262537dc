//! Bech32 and Bech32m encoding/decoding for witness addresses.
//!
//! - Bech32 (BIP 173) for witness version 0 (P2WPKH, P2WSH)
//! - Bech32m (BIP 350) for witness version 1 (P2TR)

use super::{AddressCodec, AddressError, Result};
use crate::bitcoin::{Script, ScriptBuf};
use crate::networks::Network;
use crate::script::{classify, ScriptType};
use bech32::Hrp;

fn parse_hrp(hrp: &str) -> Result<Hrp> {
    Hrp::parse(hrp).map_err(|e| AddressError::Bech32Error(format!("invalid hrp '{}': {}", hrp, e)))
}

/// Encode a witness program. Version 0 uses bech32, version 1 uses bech32m.
pub fn to_bech32(program: &[u8], version: u8, hrp: &str) -> Result<String> {
    let hrp = parse_hrp(hrp)?;
    let encoded = match version {
        0 => bech32::segwit::encode_v0(hrp, program),
        1 => bech32::segwit::encode_v1(hrp, program),
        v => {
            return Err(AddressError::Bech32Error(format!(
                "unsupported witness version {}",
                v
            )))
        }
    };
    encoded.map_err(|e| AddressError::Bech32Error(e.to_string()))
}

/// Decode a segwit address into `(witness version, program)`, checking the hrp.
pub fn from_bech32(address: &str, expected_hrp: &str) -> Result<(u8, Vec<u8>)> {
    let expected = parse_hrp(expected_hrp)?;
    let (hrp, version, program) =
        bech32::segwit::decode(address).map_err(|e| AddressError::Bech32Error(e.to_string()))?;

    if hrp != expected {
        return Err(AddressError::Bech32Error(format!(
            "hrp mismatch: expected '{}', got '{}'",
            expected_hrp, hrp
        )));
    }
    Ok((version.to_u8(), program))
}

fn program_to_array<const N: usize>(program: Vec<u8>) -> Result<[u8; N]> {
    program.try_into().map_err(|p: Vec<u8>| {
        AddressError::Bech32Error(format!("invalid witness program length {}", p.len()))
    })
}

fn to_script(script_type: ScriptType) -> Result<ScriptBuf> {
    script_type
        .to_output_script()
        .ok_or_else(|| AddressError::InvalidAddress(format!("cannot build {} script", script_type)))
}

/// Witness version 0 codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bech32Codec {
    /// Bech32 Human Readable Part (HRP)
    pub hrp: &'static str,
}

impl Bech32Codec {
    pub const fn new(hrp: &'static str) -> Self {
        Self { hrp }
    }

    /// `None` for networks without segwit
    pub fn for_network(network: Network) -> Option<Self> {
        if !network.supports_segwit() {
            return None;
        }
        network.params().bech32.map(Self::new)
    }
}

impl AddressCodec for Bech32Codec {
    fn encode(&self, script: &Script) -> Result<String> {
        match classify(script) {
            ScriptType::WitnessV0KeyHash(hash) => to_bech32(&hash, 0, self.hrp),
            ScriptType::WitnessV0ScriptHash(hash) => to_bech32(&hash, 0, self.hrp),
            other => Err(AddressError::UnsupportedAddressOrScript(format!(
                "bech32 cannot encode {} script",
                other
            ))),
        }
    }

    fn decode(&self, address: &str) -> Result<ScriptBuf> {
        let (version, program) = from_bech32(address, self.hrp)?;
        if version != 0 {
            return Err(AddressError::Bech32Error(format!(
                "expected witness version 0, got {}",
                version
            )));
        }
        let script_type = match program.len() {
            20 => ScriptType::WitnessV0KeyHash(program_to_array(program)?),
            32 => ScriptType::WitnessV0ScriptHash(program_to_array(program)?),
            n => {
                return Err(AddressError::Bech32Error(format!(
                    "invalid witness v0 program length {}",
                    n
                )))
            }
        };
        to_script(script_type)
    }
}

/// Witness version 1 (taproot) codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaprootCodec {
    pub hrp: &'static str,
}

impl TaprootCodec {
    pub const fn new(hrp: &'static str) -> Self {
        Self { hrp }
    }

    /// `None` for networks without taproot
    pub fn for_network(network: Network) -> Option<Self> {
        if !network.supports_taproot() {
            return None;
        }
        network.params().bech32.map(Self::new)
    }
}

impl AddressCodec for TaprootCodec {
    fn encode(&self, script: &Script) -> Result<String> {
        match classify(script) {
            ScriptType::WitnessV1Taproot(key) => to_bech32(&key, 1, self.hrp),
            other => Err(AddressError::UnsupportedAddressOrScript(format!(
                "taproot codec cannot encode {} script",
                other
            ))),
        }
    }

    fn decode(&self, address: &str) -> Result<ScriptBuf> {
        let (version, program) = from_bech32(address, self.hrp)?;
        if version != 1 {
            return Err(AddressError::Bech32Error(format!(
                "expected witness version 1, got {}",
                version
            )));
        }
        to_script(ScriptType::WitnessV1Taproot(program_to_array(program)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bip173_vector() {
        let codec = Bech32Codec::new("bc");
        let expected =
            ScriptBuf::from(hex::decode("0014751e76e8199196d454941c45d1b3a323f1433bd6").unwrap());

        let script = codec
            .decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4")
            .unwrap();
        assert_eq!(script, expected);
        assert_eq!(
            codec.encode(&script).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );

        // uppercase is a valid spelling of the same address
        let upper = codec
            .decode("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4")
            .unwrap();
        assert_eq!(upper, expected);
    }

    #[test]
    fn test_hrp_mismatch() {
        let codec = Bech32Codec::new("ltc");
        assert!(matches!(
            codec.decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            Err(AddressError::Bech32Error(_))
        ));
    }

    #[test]
    fn test_witness_version_separation() {
        let taproot = "bc1prp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qj0fj5d";
        assert!(Bech32Codec::new("bc").decode(taproot).is_err());
        assert!(TaprootCodec::new("bc").decode(taproot).unwrap().is_p2tr());

        let v0 = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        assert!(TaprootCodec::new("bc").decode(v0).is_err());
    }

    #[test]
    fn test_for_network() {
        assert_eq!(
            Bech32Codec::for_network(Network::LitecoinTestnet),
            Some(Bech32Codec::new("tltc"))
        );
        assert_eq!(Bech32Codec::for_network(Network::BitcoinCash), None);
        assert_eq!(
            TaprootCodec::for_network(Network::BitcoinTestnet),
            Some(TaprootCodec::new("tb"))
        );
        assert_eq!(TaprootCodec::for_network(Network::BitcoinGold), None);
    }

    #[test]
    fn test_unsupported_version() {
        assert!(to_bech32(&[0u8; 32], 2, "bc").is_err());
    }
}
