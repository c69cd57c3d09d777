// Link header parsing.
// Accepts exactly the `<URL>; rel="NAME"` descriptors GitHub emits, comma separated.

use std::sync::LazyLock;

use regex::Regex;

use crate::cache::Relations;
use crate::error::{Result, VanityError};

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<([^>]*)>; rel="([^"]*)"(,\s+)?"#).unwrap());

/// Parse a `Link` header value into a relation name -> URL map.
pub fn parse_link_header(value: &str) -> Result<Relations> {
    let malformed = || VanityError::MalformedLink(value.to_string());

    let mut relations = Relations::new();
    let mut rest = value;
    while !rest.is_empty() {
        let caps = LINK_PATTERN.captures(rest).ok_or_else(malformed)?;
        relations.insert(caps[2].to_string(), caps[1].to_string());

        let separated = caps.get(3).is_some();
        rest = &rest[caps[0].len()..];
        if separated == rest.is_empty() {
            return Err(malformed());
        }
    }
    Ok(relations)
}
