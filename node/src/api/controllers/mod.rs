pub mod contracts;
pub mod remote;
pub mod status;
pub mod streams;

use crate::{api::errors::ApiError, publisher::Published};
use actix_web::{http::header, HttpResponse};

/// File name safe for a quoted header parameter: anything but ASCII alphanumerics, `-`, `_` and `.` becomes `_`
fn download_name(file_id: &str) -> String {
    file_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}

/// Response of a published representation, offered as a file when `download` is set
pub(crate) fn published_response(published: Published, download: bool) -> Result<HttpResponse, ApiError> {
    Ok(match published {
        Published::Descriptor { descriptor, file_id } => {
            let mut response = HttpResponse::Ok();
            if download {
                response.insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.swagger.json\"", download_name(&file_id)),
                ));
            }
            let body = serde_json::to_string_pretty(descriptor.raw())
                .map_err(|err| ApiError::Internal(err.to_string()))?;
            response.content_type("application/json").body(body)
        },
        Published::RawInterface(abi) => HttpResponse::Ok().json(abi),
        Published::Summary(summary) => HttpResponse::Ok().json(summary),
        Published::Page(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
    })
}
