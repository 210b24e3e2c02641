//! util: общие утилиты.
//!
//! Содержит:
//! - printable_key(): ограниченное печатное представление ключа для диагностики.
//! - parse_bool_env(): "1|true|on|yes" => true (как во всех env-тюнаблах).

/// Default number of key bytes rendered in diagnostics.
pub const PRINTABLE_KEY_LIMIT: usize = 1024;

/// Render a key for a diagnostic message.
///
/// - `key_format` "r" / "q" / "Q": column record-number key (8 bytes, big-endian), decimal.
/// - otherwise: first `limit` bytes, printable ASCII as-is, `\` doubled, other bytes `\xx`.
///   Truncation is marked with `...`.
pub fn printable_key(key: &[u8], key_format: &str, limit: usize) -> String {
    if matches!(key_format, "r" | "q" | "Q") && key.len() == 8 {
        let mut b = [0u8; 8];
        b.copy_from_slice(key);
        return u64::from_be_bytes(b).to_string();
    }

    let shown = &key[..key.len().min(limit)];
    let mut out = String::with_capacity(shown.len() + 2);
    for &c in shown {
        match c {
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(c as char),
            _ => out.push_str(&format!("\\{:02x}", c)),
        }
    }
    if key.len() > limit {
        out.push_str("...");
    }
    out
}

/// Env-style boolean: "1|true|on|yes" (case-insensitive) => true.
#[inline]
pub fn parse_bool_env(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}
