//! Query-string assembly for the JSONP helper.
//!
//! Pure string logic, kept separate from the DOM/script plumbing so it can
//! be unit tested off the browser.

/// Percent-encode one query-string component.
///
/// Follows `encodeURIComponent` rules: ASCII letters, digits, and
/// `- _ . ! ~ * ' ( )` pass through, everything else (including each byte
/// of a multi-byte UTF-8 sequence) is `%XX`-escaped.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Build the full JSONP request URL.
///
/// Appends `callback=<name>` plus one `key=encodedValue` pair per data
/// entry. The joiner is `?` unless the base URL already carries a query.
pub fn build_jsonp_url(url: &str, callback_name: &str, data: &[(String, String)]) -> String {
    let joiner = if url.contains('?') { '&' } else { '?' };
    let mut full = format!("{}{}callback={}", url, joiner, callback_name);
    for (key, value) in data {
        full.push('&');
        full.push_str(key);
        full.push('=');
        full.push_str(&encode_component(value));
    }
    full
}
