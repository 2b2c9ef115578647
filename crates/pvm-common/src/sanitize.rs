//! Input clean-up for form submissions.
//!
//! These mirror the storefront's own text filters so that values saved here
//! look the same as values saved by the storefront itself.

/// Clean a single-line text field: strip markup tags, drop control
/// characters and percent-encoded octets, collapse whitespace runs to one
/// space and trim.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);
    let without_octets = strip_percent_octets(&stripped);

    let mut out = String::with_capacity(without_octets.len());
    let mut pending_space = false;
    for c in without_octets.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// Make a string safe to use as a download file name.
pub fn sanitize_file_name(input: &str) -> String {
    const SPECIAL: &[char] = &[
        '?', '[', ']', '/', '\\', '=', '<', '>', ':', ';', ',', '\'', '"', '&', '$', '#', '*',
        '(', ')', '|', '~', '`', '!', '{', '}', '%', '+', '\u{2019}', '\u{ab}', '\u{bb}',
        '\u{201d}', '\u{201c}', '\0',
    ];

    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if SPECIAL.contains(&c) || (c.is_control() && !c.is_whitespace()) {
            continue;
        }
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.push(c);
    }

    out.trim_matches(|c| matches!(c, '.' | '-' | '_')).to_string()
}

/// Integer coercion of a submitted field: optional sign followed by the
/// leading digit run. Anything else yields 0.
pub fn parse_int_lenient(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());

    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if end > 0 => {
            if negative {
                i64::MIN
            } else {
                i64::MAX
            }
        }
        Err(_) => 0,
    }
}

/// Remove `<tag ...>` sequences. A `<` that does not open a tag is kept.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let opens_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));

        match after.find('>') {
            Some(close) if opens_tag => rest = &after[close + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn strip_percent_octets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut start = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push_str(&input[start..i]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&input[start..]);
    out
}
