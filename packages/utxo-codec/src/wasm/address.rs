use crate::address::networks::{
    from_output_script_with_coin_and_format, to_canonical_format_with_coin,
    to_output_script_with_coin, AddressFormat,
};
use crate::script::classify;
use miniscript::bitcoin::Script;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[wasm_bindgen]
pub struct AddressNamespace;

#[wasm_bindgen]
impl AddressNamespace {
    /// Decode an address in any format supported by `coin`
    #[wasm_bindgen]
    pub fn to_output_script_with_coin(
        address: &str,
        coin: &str,
    ) -> std::result::Result<Vec<u8>, JsValue> {
        to_output_script_with_coin(address, coin)
            .map(|script| script.to_bytes())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// # Arguments
    /// * `script` - The output script as a byte array
    /// * `coin` - BitGo coin name, e.g. "btc" or "tbch"
    /// * `format` - Optional address format: "default" or "cashaddr" (only applicable for Bitcoin Cash and eCash)
    #[wasm_bindgen]
    pub fn from_output_script_with_coin(
        script: &[u8],
        coin: &str,
        format: Option<String>,
    ) -> std::result::Result<String, JsValue> {
        let address_format = AddressFormat::from_optional_str(format.as_deref())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        from_output_script_with_coin_and_format(Script::from_bytes(script), coin, address_format)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn to_canonical_address_with_coin(
        address: &str,
        coin: &str,
    ) -> std::result::Result<String, JsValue> {
        to_canonical_format_with_coin(address, coin).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Script type name: p2pkh, p2sh, p2wpkh, p2wsh, p2tr, p2ms, p2pk, nulldata or unknown
    #[wasm_bindgen]
    pub fn classify_output_script(script: &[u8]) -> String {
        classify(Script::from_bytes(script)).name().to_string()
    }
}
