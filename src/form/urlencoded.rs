//! `application/x-www-form-urlencoded` decoding.

use url::form_urlencoded;

use crate::error::{BoundaryError, Result};
use crate::form::charset;
use crate::form::data::FormData;

/// Decode a URL-encoded body. Blank values are kept and repeated keys
/// accumulate in arrival order.
pub fn parse_urlencoded(body: &[u8], charset: &str) -> Result<FormData> {
    let decoded = charset::decode(body, charset).ok_or_else(BoundaryError::invalid_form_encoding)?;
    Ok(FormData::from_parts(parse_pairs(&decoded), std::iter::empty()))
}

/// Percent-decode `key=value&...` pairs, keeping order.
pub(crate) fn parse_pairs(input: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}
