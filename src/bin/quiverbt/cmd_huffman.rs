use anyhow::Result;

use QuiverBT::check_huffman_applicable;
use QuiverBT::page::PageLayout;

/// CLI: huffman: config gate для Huffman-кодирования ключей.
pub fn exec(layout: String, huffman_key: Option<String>) -> Result<()> {
    let layout: PageLayout = layout.parse()?;
    let len = huffman_key.as_deref().map(str::len).unwrap_or(0);
    check_huffman_applicable(layout, len)?;
    println!("OK: layout={} huffman_key_len={}", layout, len);
    Ok(())
}
