use crate::block::Block;
use crate::networks::Network;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsError, JsValue};

#[wasm_bindgen]
pub struct WrapBlock(Block);

#[wasm_bindgen]
impl WrapBlock {
    #[wasm_bindgen(js_name = fromBytes)]
    pub fn from_bytes(bytes: Vec<u8>, coin: &str) -> Result<WrapBlock, JsError> {
        let network = Network::from_coin_name(coin)
            .ok_or_else(|| JsError::new(&format!("unknown coin '{}'", coin)))?;
        Ok(WrapBlock(
            Block::from_bytes(&bytes, network).map_err(JsError::from)?,
        ))
    }

    #[wasm_bindgen(js_name = toBytes)]
    pub fn to_bytes(&self, headers_only: bool) -> Vec<u8> {
        self.0.to_bytes(headers_only)
    }

    #[wasm_bindgen(js_name = byteLength)]
    pub fn byte_length(&self, headers_only: bool) -> usize {
        self.0.byte_length(headers_only)
    }

    #[wasm_bindgen(js_name = getId)]
    pub fn get_id(&self) -> String {
        self.0.get_id()
    }

    #[wasm_bindgen(js_name = checkMerkleRoot)]
    pub fn check_merkle_root(&self) -> bool {
        self.0.check_merkle_root()
    }

    #[wasm_bindgen(js_name = checkProofOfWork)]
    pub fn check_proof_of_work(&self) -> bool {
        self.0.check_proof_of_work()
    }

    #[wasm_bindgen(js_name = checkTxRoots)]
    pub fn check_tx_roots(&self) -> bool {
        self.0.check_tx_roots()
    }

    /// Transaction ids in display order, empty for a headers-only block
    pub fn txids(&self) -> js_sys::Array {
        self.0
            .transactions()
            .unwrap_or_default()
            .iter()
            .map(|tx| JsValue::from_str(&tx.txid().to_string()))
            .collect()
    }
}
