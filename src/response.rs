//! Response classification and error mapping.
//!
//! Status codes below 400 are success and are converted according to the
//! requested result type. Anything else becomes [`AppwriteError::Api`] with
//! the `message` and `type` fields of the JSON error body when present.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppwriteError;
use crate::http::HttpResponse;

/// Conversion of a successful response body into a result type.
pub trait FromResponse: Sized {
    fn from_body(body: Vec<u8>) -> Result<Self, AppwriteError>;
}

/// Always `true`, whatever the payload.
impl FromResponse for bool {
    fn from_body(_body: Vec<u8>) -> Result<Self, AppwriteError> {
        Ok(true)
    }
}

/// UTF-8 text of the body, empty if it is not valid UTF-8.
impl FromResponse for String {
    fn from_body(body: Vec<u8>) -> Result<Self, AppwriteError> {
        Ok(String::from_utf8(body).unwrap_or_default())
    }
}

/// The raw body.
impl FromResponse for Vec<u8> {
    fn from_body(body: Vec<u8>) -> Result<Self, AppwriteError> {
        Ok(body)
    }
}

/// `true` for an empty body, otherwise the parsed JSON object.
impl FromResponse for Value {
    fn from_body(body: Vec<u8>) -> Result<Self, AppwriteError> {
        if body.is_empty() {
            return Ok(Value::Bool(true));
        }
        parse_object(&body).map(Value::Object)
    }
}

/// Parse a body that must be a JSON object.
pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, AppwriteError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AppwriteError::UnexpectedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(AppwriteError::UnexpectedResponse(format!(
            "invalid JSON body: {e}"
        ))),
    }
}

/// Converter deserializing the response object into `T`.
pub fn deserialize<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T, AppwriteError> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AppwriteError::UnexpectedResponse(format!("cannot decode response: {e}")))
}

/// Map a status >= 400 to an API error; pass success through.
pub fn check_status(response: &HttpResponse) -> Result<(), AppwriteError> {
    if response.is_success() {
        return Ok(());
    }
    Err(api_error(response))
}

fn api_error(response: &HttpResponse) -> AppwriteError {
    let raw = String::from_utf8_lossy(&response.body).into_owned();
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(value) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| response.status.to_string());
            let error_type = value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            AppwriteError::api(response.status, message, error_type, raw)
        }
        Err(_) => AppwriteError::api(response.status, raw.clone(), "", raw),
    }
}

/// Classify a response into `T`.
pub fn classify<T: FromResponse>(response: HttpResponse) -> Result<T, AppwriteError> {
    check_status(&response)?;
    T::from_body(response.body)
}

/// Classify a response, passing the JSON object through `converter`.
///
/// An empty success body reaches the converter as an empty object.
pub fn classify_with<T, F>(response: HttpResponse, converter: F) -> Result<T, AppwriteError>
where
    F: FnOnce(Map<String, Value>) -> Result<T, AppwriteError>,
{
    check_status(&response)?;
    if response.body.is_empty() {
        return converter(Map::new());
    }
    converter(parse_object(&response.body)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
