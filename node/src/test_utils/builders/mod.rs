pub use self::deploy_contract_builder::*;

mod deploy_contract_builder;
