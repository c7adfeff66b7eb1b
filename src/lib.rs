pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod keyring;
pub mod summary;
pub mod util;
pub mod youtube;

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;

use cli::{Cli, Commands};
use error::AppError;

/// 途中停止（リトライ上限・キャンセル）でCSVが一部のみの場合の終了コード
pub const EXIT_PARTIAL: u8 = 2;

/// サブコマンドを実行し、プロセスの終了コードを返す
pub async fn run(cli: Cli, cancel: CancellationToken) -> Result<ExitCode, AppError> {
    match cli.command {
        Commands::Export(args) => {
            let report = commands::export::run_export(&args, cancel).await?;

            println!("{}", report.summary);
            println!(
                "Exported {} comments from video {} to {}",
                report.summary.total_comments,
                report.video_id,
                report.output.display()
            );

            if report.is_partial() {
                log::warn!("Export is incomplete: {}", report.termination);
                Ok(ExitCode::from(EXIT_PARTIAL))
            } else {
                log::info!("Export complete: {}", report.termination);
                Ok(ExitCode::SUCCESS)
            }
        }
        Commands::Key { action } => {
            commands::key::run_key_command(action).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
