//! Classification of array responses into results.

use ifsvol_http::HttpResponse;
use serde::de::DeserializeOwned;

use crate::error::{ApiErrorBody, VolumeError};

/// Turn a non-2xx response into an error.
///
/// A 404 becomes [`VolumeError::NotFound`] only when `volume` names the
/// resource the request addressed; otherwise it stays an API error.
pub(crate) fn check(response: HttpResponse, volume: Option<&str>) -> Result<HttpResponse, VolumeError> {
    if response.is_success() {
        return Ok(response);
    }

    if let (true, Some(name)) = (response.is_not_found(), volume) {
        return Err(VolumeError::NotFound {
            name: name.to_string(),
        });
    }

    let body: ApiErrorBody = serde_json::from_value(response.body.clone()).unwrap_or_default();
    Err(VolumeError::Api {
        status: response.status,
        message: body.summary(&response.status_text),
    })
}

/// Decode a successful body; an empty body decodes to `T::default()`.
///
/// Body text that is present but not JSON is a [`VolumeError::Decode`].
pub(crate) fn decode<T: DeserializeOwned + Default>(response: &HttpResponse) -> Result<T, VolumeError> {
    if response.body.is_null() {
        return match response.body_text.as_deref().map(str::trim) {
            None | Some("") | Some("null") => Ok(T::default()),
            Some(text) => Err(VolumeError::Decode {
                message: format!("response body is not JSON: {}", excerpt(text)),
            }),
        };
    }
    response.json().map_err(|e| VolumeError::Decode {
        message: e.to_string(),
    })
}

fn excerpt(text: &str) -> String {
    const LIMIT: usize = 64;
    match text.char_indices().nth(LIMIT) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
