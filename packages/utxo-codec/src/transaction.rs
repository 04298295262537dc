//! Network-aware transaction decoding.
//!
//! Zcash transactions use their own layout (see [`crate::zcash`]), every other network
//! uses the bitcoin serialization, with or without witness data.

use crate::bitcoin::consensus::encode::{self, deserialize_partial, serialize};
use crate::bitcoin::{Transaction, TxIn, TxOut, Txid, Wtxid};
use crate::networks::Network;
use crate::zcash::ZcashTransaction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("failed to decode transaction: {0}")]
    Decode(String),
    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(u32),
    #[error("unsupported shielded data: {0}")]
    UnsupportedShieldedData(&'static str),
    #[error("unexpected {0} trailing byte(s) after transaction")]
    TrailingData(usize),
}

impl From<encode::Error> for TransactionError {
    fn from(e: encode::Error) -> Self {
        TransactionError::Decode(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtxoTransaction {
    Bitcoin(Transaction),
    Zcash(ZcashTransaction),
}

impl UtxoTransaction {
    /// Decode a transaction from the start of `bytes`, returning it with the number of
    /// bytes consumed.
    pub fn decode_partial(
        bytes: &[u8],
        network: Network,
    ) -> Result<(Self, usize), TransactionError> {
        if network.is_zcash() {
            let (tx, consumed) = ZcashTransaction::decode_partial(bytes)?;
            return Ok((UtxoTransaction::Zcash(tx), consumed));
        }

        let (tx, consumed): (Transaction, usize) = deserialize_partial(bytes)?;
        // Dash special transactions carry a type in the upper 16 bits and an extra payload
        if network.is_dash() && (tx.version.0 as u32) >> 16 != 0 {
            return Err(TransactionError::UnsupportedVersion(tx.version.0 as u32));
        }
        Ok((UtxoTransaction::Bitcoin(tx), consumed))
    }

    /// Decode a complete transaction, rejecting trailing bytes.
    pub fn decode(bytes: &[u8], network: Network) -> Result<Self, TransactionError> {
        let (tx, consumed) = Self::decode_partial(bytes, network)?;
        if consumed != bytes.len() {
            return Err(TransactionError::TrailingData(bytes.len() - consumed));
        }
        Ok(tx)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            UtxoTransaction::Bitcoin(tx) => serialize(tx),
            UtxoTransaction::Zcash(tx) => tx.to_bytes(),
        }
    }

    pub fn byte_length(&self) -> usize {
        match self {
            UtxoTransaction::Bitcoin(tx) => tx.total_size(),
            UtxoTransaction::Zcash(tx) => tx.byte_length(),
        }
    }

    pub fn txid(&self) -> Txid {
        match self {
            UtxoTransaction::Bitcoin(tx) => tx.compute_txid(),
            UtxoTransaction::Zcash(tx) => tx.txid(),
        }
    }

    /// Witness txid. Equal to the txid for transactions without witness data.
    pub fn wtxid(&self) -> Wtxid {
        match self {
            UtxoTransaction::Bitcoin(tx) => tx.compute_wtxid(),
            UtxoTransaction::Zcash(tx) => Wtxid::from_raw_hash(tx.txid().to_raw_hash()),
        }
    }

    pub fn has_witness(&self) -> bool {
        match self {
            UtxoTransaction::Bitcoin(tx) => tx.input.iter().any(|input| !input.witness.is_empty()),
            UtxoTransaction::Zcash(_) => false,
        }
    }

    pub fn inputs(&self) -> &[TxIn] {
        match self {
            UtxoTransaction::Bitcoin(tx) => &tx.input,
            UtxoTransaction::Zcash(tx) => &tx.input,
        }
    }

    pub fn inputs_mut(&mut self) -> &mut [TxIn] {
        match self {
            UtxoTransaction::Bitcoin(tx) => &mut tx.input,
            UtxoTransaction::Zcash(tx) => &mut tx.input,
        }
    }

    pub fn outputs(&self) -> &[TxOut] {
        match self {
            UtxoTransaction::Bitcoin(tx) => &tx.output,
            UtxoTransaction::Zcash(tx) => &tx.output,
        }
    }

    pub fn is_coinbase(&self) -> bool {
        let inputs = self.inputs();
        inputs.len() == 1 && inputs[0].previous_output.is_null()
    }
}
