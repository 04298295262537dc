pub mod address;
pub mod block;
pub mod networks;
pub mod nonstandard;
pub mod script;
pub mod sighash;
pub mod transaction;
pub mod wasm;
pub mod zcash;

#[cfg(test)]
mod test_utils;

// re-export bitcoin from the miniscript crate
pub use ::miniscript::bitcoin;

pub use address::{
    from_output_script_with_coin, from_output_script_with_network, to_output_script_with_coin,
    to_output_script_with_network, AddressCodec, AddressError, AddressFormat,
};
pub use block::{Block, BlockError, DecodeLimits};
pub use networks::{registry, Network, NetworkError, NetworkRegistry};
pub use nonstandard::{pad_input_script, pad_input_script_in_place, PaddedInput, RepairError};
pub use script::{classify, ScriptType};
pub use sighash::validate_sighash_type;
pub use transaction::{TransactionError, UtxoTransaction};
pub use wasm::{AddressNamespace, WrapBlock};
pub use zcash::ZcashTransaction;
