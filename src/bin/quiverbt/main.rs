use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod page_json;
mod cmd_huffman;
mod cmd_valid;
mod cmd_order;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт: info.
    // Пример: RUST_LOG=debug ./quiverbt valid --page p.json --slot 1
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Huffman { layout, huffman_key } =>
            cmd_huffman::exec(layout, huffman_key),

        cli::Cmd::Valid { page, slot, recno, insert, insert_index, onpage_match, snapshot, json } =>
            cmd_valid::exec(cmd_valid::ValidArgs {
                page,
                slot,
                recno,
                insert,
                insert_index,
                onpage_match,
                snapshot,
                json,
            }),

        cli::Cmd::Order { layout, direction, keys, collator } =>
            cmd_order::exec(layout, direction, keys, collator),
    }
}
