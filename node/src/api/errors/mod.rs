pub use self::api_error::*;

mod api_error;
