use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::cli::{ExportArgs, VideoTarget};
use crate::error::AppError;
use crate::export::export_comments;
use crate::summary::SummaryReport;
use crate::youtube::{
    api_key_manager::ApiKeyManager, state::HarvestProgress, CommentCollector, Termination,
    YouTubeClient, YouTubeError,
};

/// 1回の実行結果
#[derive(Debug)]
pub struct ExportReport {
    pub video_id: String,
    pub output: PathBuf,
    pub summary: SummaryReport,
    pub progress: HarvestProgress,
    pub termination: Termination,
}

impl ExportReport {
    /// 全件取得できなかった場合true（CSVは取得できた分だけ）
    pub fn is_partial(&self) -> bool {
        !matches!(self.termination, Termination::Complete)
    }
}

/// APIキー取得 → 動画特定 → 全コメント取得 → CSV出力
///
/// リトライ上限・キャンセルで途中停止した場合も、取得済みの分をCSVに書き出してOkを返す。
pub async fn run_export(
    args: &ExportArgs,
    cancel: CancellationToken,
) -> Result<ExportReport, AppError> {
    log::info!("Starting YouTube comment export...");

    let target = args.target().ok_or_else(|| {
        AppError::InvalidArgument("either --video-id or --channel is required".to_string())
    })?;

    // Step 1: APIキー（keyringはブロッキング呼び出し）
    let manager = ApiKeyManager::new(args.api_key.clone(), args.api_key_file.clone());
    let resolved = tokio::task::spawn_blocking(move || manager.resolve()).await??;

    let client =
        YouTubeClient::with_base_url(resolved.key, &args.api_base).map_err(AppError::Resolve)?;

    // Step 2: 動画の特定
    let mut progress = HarvestProgress::new();
    let video_id = resolve_video(&client, target, &mut progress)
        .await
        .map_err(AppError::Resolve)?;

    // Step 3: 全コメント取得
    let collector =
        CommentCollector::new(client, args.retry_policy(), cancel).with_progress(progress);
    let harvest = collector
        .collect(&video_id)
        .await
        .map_err(AppError::Fetch)?;

    if harvest.is_partial() {
        log::warn!(
            "Export will be partial ({}): {} comments fetched",
            harvest.termination,
            harvest.records.len()
        );
    }

    // Step 4: CSV出力
    let output = export_comments(&harvest.records, &args.output)?;

    // Step 5: 集計
    let summary = SummaryReport::from_records(&harvest.records, harvest.is_partial());

    Ok(ExportReport {
        video_id,
        output,
        summary,
        progress: harvest.progress,
        termination: harvest.termination,
    })
}

async fn resolve_video(
    client: &YouTubeClient,
    target: VideoTarget,
    progress: &mut HarvestProgress,
) -> Result<String, YouTubeError> {
    match target {
        VideoTarget::VideoId(id) => Ok(id),
        VideoTarget::LatestFromChannel(name) => {
            progress.record_search();
            let channel_id = client.find_channel(&name).await?;
            progress.record_search();
            client.get_latest_video(&channel_id).await
        }
    }
}
