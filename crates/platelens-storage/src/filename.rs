//! Stored filename generation
//!
//! Generated names are `{sanitized-base}-{unix_millis}-{token}.{ext}`:
//! human-traceable to the original name, collision-resistant, and safe for
//! both filesystem and URL use (no separators, no special characters).

use chrono::Utc;
use rand::Rng;

const TOKEN_LENGTH: usize = 7;
const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a stored filename for an uploaded file's original name.
pub fn generate_stored_filename(original: &str) -> String {
    build_stored_filename(
        original,
        Utc::now().timestamp_millis(),
        &random_token(TOKEN_LENGTH),
    )
}

/// Deterministic core of filename generation; timestamp and token are injected
/// so collision behavior can be tested.
pub fn build_stored_filename(original: &str, timestamp_millis: i64, token: &str) -> String {
    let (base, extension) = split_extension(original);
    let base = sanitize_base(base);

    match extension {
        Some(ext) => format!(
            "{}-{}-{}.{}",
            base,
            timestamp_millis,
            token,
            ext.to_lowercase()
        ),
        None => format!("{}-{}-{}", base, timestamp_millis, token),
    }
}

/// Split a filename into (base, extension). Leading-dot names have no extension.
fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < filename.len() => {
            (&filename[..idx], Some(&filename[idx + 1..]))
        }
        Some(idx) if idx > 0 => (&filename[..idx], None),
        _ => (filename, None),
    }
}

/// Lower-case the base name, collapse every run of characters outside
/// `[a-z0-9]` into a single hyphen, and trim leading/trailing hyphens.
fn sanitize_base(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_hyphen = false;

    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    out
}

/// Random token over the base36 alphabet `[0-9a-z]`.
fn random_token(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}
