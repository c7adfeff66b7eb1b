use crate::cli::KeyAction;
use crate::error::AppError;
use crate::keyring as secure_storage;
use crate::util::mask_api_key;

// =============================================================================
// セキュアストレージ操作
// =============================================================================
// `key set / clear / status` でOSのセキュアストレージ上のAPIキーを管理する。
// keyringはブロッキング呼び出しなのでspawn_blockingで実行する。
// =============================================================================

pub async fn run_key_command(action: KeyAction) -> Result<(), AppError> {
    match action {
        KeyAction::Set { key } => save_api_key(key).await,
        KeyAction::Clear => delete_api_key().await,
        KeyAction::Status => {
            match load_api_key().await? {
                Some(key) => println!("API key stored: {}", mask_api_key(&key)),
                None => println!("No API key stored"),
            }
            Ok(())
        }
    }
}

/// APIキーをセキュアストレージに保存
async fn save_api_key(api_key: String) -> Result<(), AppError> {
    // 空文字列のバリデーション
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(AppError::InvalidArgument(
            "API key cannot be empty".to_string(),
        ));
    }

    tokio::task::spawn_blocking(move || secure_storage::save_api_key(&api_key)).await??;
    Ok(())
}

/// APIキーをセキュアストレージから取得（未保存ならNone）
async fn load_api_key() -> Result<Option<String>, AppError> {
    match tokio::task::spawn_blocking(secure_storage::get_api_key).await? {
        Ok(api_key) => Ok(Some(api_key)),
        Err(secure_storage::KeyringError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// APIキーをセキュアストレージから削除
async fn delete_api_key() -> Result<(), AppError> {
    tokio::task::spawn_blocking(secure_storage::delete_api_key).await??;
    Ok(())
}
