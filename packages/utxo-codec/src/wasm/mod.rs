mod address;
mod block;

pub use address::AddressNamespace;
pub use block::WrapBlock;
