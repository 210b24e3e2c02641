use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Диагностический CLI ядра курсора QuiverBT
#[derive(Parser, Debug)]
#[command(name = "quiverbt", version, about = "QuiverBT cursor core CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Check whether a layout accepts Huffman key encoding
    Huffman {
        /// fix | var | row
        #[arg(long)]
        layout: String,
        /// Huffman table requested for keys (empty = not requested)
        #[arg(long)]
        huffman_key: Option<String>,
    },
    /// Load a page from JSON, position a cursor and classify the position
    ///
    /// JSON формат (поля зависят от layout):
    /// {"layout":"var_column","base_recno":1,
    ///  "cells":[{"value":"a"},{"deleted":true},{"value":"hex:0a0b","rle":3}],
    ///  "append":[{"recno":9,"updates":[{"txn":4,"value":"z"}]}]}
    /// {"layout":"row","rows":[{"key":"b","value":"1","updates":[{"txn":5,"tombstone":true}]}],
    ///  "smallest":[{"key":"a"}],"inserts":{"0":[{"key":"c"}]}}
    Valid {
        #[arg(long)]
        page: PathBuf,
        /// On-page slot the search landed on
        #[arg(long)]
        slot: Option<u32>,
        /// Record number (column layouts); defaults to the slot's record
        #[arg(long)]
        recno: Option<u64>,
        /// Insert list: smallest | append | slot:N
        #[arg(long)]
        insert: Option<String>,
        /// Node index inside the insert list
        #[arg(long, default_value_t = 0)]
        insert_index: usize,
        /// Var column: the insert node also matched the on-page cell
        #[arg(long, default_value_t = false)]
        onpage_match: bool,
        /// Snapshot upper bound (txn ids below it are visible); read-uncommitted if omitted
        #[arg(long)]
        snapshot: Option<u64>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Feed a sequence of returned keys through the key-order checker
    Order {
        /// fix | var | row
        #[arg(long)]
        layout: String,
        /// next | prev
        #[arg(long, default_value = "next")]
        direction: String,
        /// Comma-separated keys (record numbers for column layouts)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
        /// bytes | reverse
        #[arg(long, default_value = "bytes")]
        collator: String,
    },
}
