//! URL query string encoding.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::{ParamValue, Params};
use crate::error::AppwriteError;

/// Characters left as-is: the URL host character set.
///
/// `+` is part of that set but is encoded anyway, since servers read a
/// literal `+` in a query as a space.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b',')
    .remove(b'-')
    .remove(b'.')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'[')
    .remove(b']')
    .remove(b'_')
    .remove(b'~');

/// Encode parameters as a query string (without the leading `?`).
///
/// Arrays become repeated `name[]=item` pairs. Entries without a value are
/// dropped.
pub fn to_query_string(params: &Params) -> Result<String, AppwriteError> {
    let mut pairs: Vec<String> = Vec::new();
    for (name, value) in params.iter() {
        match value {
            ParamValue::Array(items) => {
                for item in items {
                    pairs.push(format!("{name}[]={}", item.to_param_string()?));
                }
            }
            other => pairs.push(format!("{name}={}", other.to_param_string()?)),
        }
    }
    Ok(utf8_percent_encode(&pairs.join("&"), QUERY_ENCODE_SET).to_string())
}
