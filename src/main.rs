use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use tokio_util::sync::CancellationToken;

use yt_comment_export::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOGで上書き可能（デフォルトはinfo）
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Ctrl+Cで取得を中断し、取得済みの分を書き出す
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, finishing with comments fetched so far");
            cancel_on_signal.cancel();
        }
    });

    match yt_comment_export::run(cli, cancel).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("Failed to {}", e);
            ExitCode::FAILURE
        }
    }
}
