//! huffman: проверка, может ли раскладка использовать Huffman-кодирование ключей.
//!
//! Вызывается один раз при определении таблицы. Само сжатие: внешний сервис.

use crate::errors::BtError;
use crate::metrics::record_huffman_rejection;
use crate::page::PageLayout;

/// Check whether `layout` accepts a Huffman key-encoding request of `requested_len` bytes
/// (0 = not requested).
///
/// - fixed column: always rejected, values have a fixed width
/// - var column: rejected only when requested; keys are record numbers
/// - row: always accepted
pub fn check_huffman_applicable(layout: PageLayout, requested_len: usize) -> Result<(), BtError> {
    let res = match layout {
        PageLayout::FixedColumn => Err(BtError::Config(
            "fixed-size column-store files may not be Huffman encoded".to_string(),
        )),
        PageLayout::VarColumn if requested_len != 0 => Err(BtError::Config(
            "the keys of variable-length column-store files may not be Huffman encoded"
                .to_string(),
        )),
        PageLayout::VarColumn | PageLayout::Row => Ok(()),
    };
    if res.is_err() {
        record_huffman_rejection();
    }
    res
}
