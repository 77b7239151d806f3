mod app_version_header;
pub use app_version_header::{AppVersionHeader, APP_VERSION, SEMVER_HEADER_NAME};
