//! Output script classification.
//!
//! Classification is purely structural. Nothing here checks that a pubkey is a valid curve
//! point, only that it has the length and prefix byte of one.

use crate::bitcoin::blockdata::opcodes::all::OP_CHECKMULTISIG;
use crate::bitcoin::blockdata::script::{Builder, Instruction};
use crate::bitcoin::hashes::Hash;
use crate::bitcoin::{PubkeyHash, Script, ScriptBuf, ScriptHash, WPubkeyHash, WScriptHash};
use crate::bitcoin::{WitnessProgram, WitnessVersion};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptType {
    PubKeyHash([u8; 20]),
    ScriptHash([u8; 20]),
    WitnessV0KeyHash([u8; 20]),
    WitnessV0ScriptHash([u8; 32]),
    /// x-only output key
    WitnessV1Taproot([u8; 32]),
    /// Bare `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`
    Multisig {
        m: usize,
        n: usize,
        pubkeys: Vec<Vec<u8>>,
    },
    PubKey(Vec<u8>),
    NullData,
    Unknown,
}

impl ScriptType {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptType::PubKeyHash(_) => "p2pkh",
            ScriptType::ScriptHash(_) => "p2sh",
            ScriptType::WitnessV0KeyHash(_) => "p2wpkh",
            ScriptType::WitnessV0ScriptHash(_) => "p2wsh",
            ScriptType::WitnessV1Taproot(_) => "p2tr",
            ScriptType::Multisig { .. } => "p2ms",
            ScriptType::PubKey(_) => "p2pk",
            ScriptType::NullData => "nulldata",
            ScriptType::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ScriptType::Unknown)
    }

    /// Rebuild the output script for the hash and witness program types.
    pub fn to_output_script(&self) -> Option<ScriptBuf> {
        match self {
            ScriptType::PubKeyHash(h) => {
                Some(ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(*h)))
            }
            ScriptType::ScriptHash(h) => {
                Some(ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(*h)))
            }
            ScriptType::WitnessV0KeyHash(h) => {
                Some(ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array(*h)))
            }
            ScriptType::WitnessV0ScriptHash(h) => {
                Some(ScriptBuf::new_p2wsh(&WScriptHash::from_byte_array(*h)))
            }
            ScriptType::WitnessV1Taproot(key) => WitnessProgram::new(WitnessVersion::V1, key)
                .ok()
                .map(|program| ScriptBuf::new_witness_program(&program)),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn to_array<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.try_into().ok()
}

pub fn classify(script: &Script) -> ScriptType {
    let bytes = script.as_bytes();
    let classified = if script.is_p2pkh() {
        to_array(&bytes[3..23]).map(ScriptType::PubKeyHash)
    } else if script.is_p2sh() {
        to_array(&bytes[2..22]).map(ScriptType::ScriptHash)
    } else if script.is_p2wpkh() {
        to_array(&bytes[2..22]).map(ScriptType::WitnessV0KeyHash)
    } else if script.is_p2wsh() {
        to_array(&bytes[2..34]).map(ScriptType::WitnessV0ScriptHash)
    } else if script.is_p2tr() {
        to_array(&bytes[2..34]).map(ScriptType::WitnessV1Taproot)
    } else if script.is_p2pk() {
        Some(ScriptType::PubKey(bytes[1..bytes.len() - 1].to_vec()))
    } else if script.is_op_return() {
        Some(ScriptType::NullData)
    } else {
        parse_multisig(script)
    };
    classified.unwrap_or(ScriptType::Unknown)
}

fn small_int(instruction: &Instruction) -> Option<usize> {
    match instruction {
        Instruction::Op(op) => match op.to_u8() {
            b @ 0x51..=0x60 => Some((b - 0x50) as usize),
            _ => None,
        },
        _ => None,
    }
}

fn is_pubkey(bytes: &[u8]) -> bool {
    match bytes.len() {
        33 => bytes[0] == 0x02 || bytes[0] == 0x03,
        65 => bytes[0] == 0x04,
        _ => false,
    }
}

fn parse_multisig(script: &Script) -> Option<ScriptType> {
    let instructions: Vec<_> = script.instructions().collect::<Result<Vec<_>, _>>().ok()?;

    // OP_m <pubkey>... OP_n OP_CHECKMULTISIG
    if instructions.len() < 4 {
        return None;
    }
    let last = instructions.len() - 1;
    if instructions[last] != Instruction::Op(OP_CHECKMULTISIG) {
        return None;
    }
    let m = small_int(&instructions[0])?;
    let n = small_int(&instructions[last - 1])?;

    let mut pubkeys = Vec::with_capacity(n);
    for instruction in &instructions[1..last - 1] {
        match instruction {
            Instruction::PushBytes(bytes) if is_pubkey(bytes.as_bytes()) => {
                pubkeys.push(bytes.as_bytes().to_vec())
            }
            _ => return None,
        }
    }

    if m > n || n != pubkeys.len() {
        return None;
    }
    Some(ScriptType::Multisig { m, n, pubkeys })
}

/// Build a bare `m`-of-`pubkeys.len()` multisig script from compressed keys.
pub fn build_multisig_script(m: u8, pubkeys: &[[u8; 33]]) -> ScriptBuf {
    let mut builder = Builder::default().push_int(m as i64);
    for key in pubkeys {
        builder = builder.push_slice(key)
    }
    builder
        .push_int(pubkeys.len() as i64)
        .push_opcode(OP_CHECKMULTISIG)
        .into_script()
}
