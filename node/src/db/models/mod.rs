mod abi;
pub use abi::AbiRecord;

mod contract;
pub use contract::ContractRecord;

mod deploy;
pub use deploy::{DeployContract, DeployContractWithAddress};

mod listing;
pub use listing::{sort_listing, Listable};
