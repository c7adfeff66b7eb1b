// =============================================================================
// CSV出力モジュール
// =============================================================================
// 取得したコメントを固定の列順でCSVに書き出す
//
// - 列: author_name, likes, reply_count, comment_text
// - 区切り文字・引用符・改行を含む値のみ引用符で囲む（内部の引用符は二重化）
// - 一時ファイルに書いてから置き換えるため、失敗時に中途半端なファイルは残らない
// =============================================================================

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::youtube::types::CommentRecord;

/// 出力CSVの列（この順で書き出す）
///
/// 外部のビューアが列名・列順に依存しているため、変更時は `SCHEMA_VERSION` を上げること。
pub const COLUMNS: [&str; 4] = ["author_name", "likes", "reply_count", "comment_text"];

/// 出力CSVのスキーマバージョン
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error while writing CSV: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to create temporary file in {dir}: {source}")]
    TempFile { dir: PathBuf, source: io::Error },

    #[error("Failed to persist file to {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },
}

/// ヘッダー行とコメント行を書き出し、書き込み先を返す
///
/// 行の順序はコレクションの順序そのまま。
pub fn write_table<W: Write>(records: &[CommentRecord], out: W) -> Result<W, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// CSVファイルに全件書き出す（全件成功か、何も残さないか）
///
/// 出力先と同じディレクトリに一時ファイルを作り、書き込み完了後に置き換える。
pub fn export_comments(
    records: &[CommentRecord],
    final_path: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let final_path = final_path.as_ref().to_path_buf();

    if records.is_empty() {
        log::warn!("No comments to export, writing header only");
    }
    log::info!(
        "Exporting {} comments to {}",
        records.len(),
        final_path.display()
    );

    let parent_dir = match final_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let temp_file = NamedTempFile::new_in(&parent_dir).map_err(|source| ExportError::TempFile {
        dir: parent_dir.clone(),
        source,
    })?;

    // 途中で失敗した場合、temp_fileはdropで削除される
    let buf_writer = write_table(records, BufWriter::new(temp_file))?;
    let named_temp = buf_writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;

    named_temp
        .persist(&final_path)
        .map_err(|e| ExportError::Persist {
            path: final_path.clone(),
            source: e.error,
        })?;

    log::info!("CSV export successful: {}", final_path.display());
    Ok(final_path)
}
