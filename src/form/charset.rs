//! Charset decoding for form payloads.

/// Decode `bytes` with the named charset. Returns `None` for undecodable
/// bytes or unknown labels.
pub fn decode(bytes: &[u8], charset: &str) -> Option<String> {
    match charset.trim().to_ascii_lowercase().as_str() {
        "utf-8" | "utf8" => std::str::from_utf8(bytes).ok().map(str::to_owned),
        "us-ascii" | "ascii" => bytes
            .is_ascii()
            .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
        "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" => {
            Some(bytes.iter().map(|&b| char::from(b)).collect())
        }
        _ => None,
    }
}
