pub mod errors;

mod abi;
pub use abi::{Abi, AbiEntry, AbiEntryType, AbiParam};

mod address;
pub use address::Address;
