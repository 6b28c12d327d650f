// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Extract the route code from a discovery reference string.
///
/// References come in several shapes: a full detail URL
/// (`https://.../conocerecorrido?codsint=506`), a relative one
/// (`url?codsint=506`), or the bare code (`506`). The code is whatever
/// follows the `codsint` parameter, falling back to the suffix after the
/// last `=`, falling back to the reference itself.
pub fn extract_route_code(reference: &str) -> String {
    if let Ok(parsed) = Url::parse(reference) {
        if let Some(code) = parsed
            .query_pairs()
            .find_map(|(key, value)| (key == "codsint").then(|| value.into_owned()))
        {
            return code;
        }
    }

    if let Ok(pattern) = regex::Regex::new(r"[?&]codsint=([^&]+)") {
        if let Some(caps) = pattern.captures(reference) {
            return caps[1].to_string();
        }
    }

    reference
        .rsplit('=')
        .next()
        .unwrap_or(reference)
        .to_string()
}
