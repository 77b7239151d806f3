mod abi_upload;
pub use abi_upload::AbiUpload;

mod access_tokens;
pub use access_tokens::{AccessToken, EventStreamAuth};

mod representation;
pub use representation::RepresentationQuery;
