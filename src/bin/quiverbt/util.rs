use anyhow::{anyhow, Result};
use std::fmt::Write as _;

/// "hex:deadbeef" → байты, иначе литерал UTF-8.
pub fn decode_bytes_arg(arg: &str) -> Result<Vec<u8>> {
    match arg.strip_prefix("hex:") {
        Some(hx) => decode_hex(hx.trim()),
        None => Ok(arg.as_bytes().to_vec()),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex:{} has odd length", s));
    }
    s.as_bytes()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|p| u8::from_str_radix(p, 16).ok())
                .ok_or_else(|| anyhow!("hex:{} has a bad digit pair at byte {}", s, i))
        })
        .collect()
}

/// Ключи и значения печатаем как текст, если это UTF-8.
pub fn display_text(bytes: &[u8]) -> String {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .unwrap_or_else(|_| format!("(binary {} B)", bytes.len()))
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_arg_literal_and_hex() -> Result<()> {
        assert_eq!(decode_bytes_arg("abc")?, b"abc");
        assert_eq!(decode_bytes_arg("hex:00ff7A")?, vec![0x00, 0xff, 0x7a]);
        assert!(decode_bytes_arg("hex:abc").is_err());
        assert!(decode_bytes_arg("hex:zz").is_err());
        assert_eq!(to_hex(&[0x00, 0xab]), "00ab");
        assert_eq!(display_text(&[0xff]), "(binary 1 B)");
        Ok(())
    }
}
