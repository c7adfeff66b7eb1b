use keyring::Entry;
use thiserror::Error;

/// アプリケーション識別子（サービス名として使用）
const SERVICE_NAME: &str = "yt-comment-export";

/// APIキー用のエントリ名
const API_KEY_ENTRY: &str = "youtube_api_key";

#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("Keyring error: {0}")]
    KeyringError(#[from] keyring::Error),

    #[error("API key not found")]
    NotFound,
}

/// APIキーをOSのセキュアストレージに保存
///
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service API
pub fn save_api_key(api_key: &str) -> Result<(), KeyringError> {
    let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)?;
    entry.set_password(api_key)?;
    log::info!("API key saved to secure storage");
    Ok(())
}

/// APIキーをセキュアストレージから取得
pub fn get_api_key() -> Result<String, KeyringError> {
    read_entry(API_KEY_ENTRY)
}

/// APIキーをセキュアストレージから削除
pub fn delete_api_key() -> Result<(), KeyringError> {
    delete_entry(API_KEY_ENTRY)?;
    log::info!("API key deleted from secure storage");
    Ok(())
}

fn read_entry(name: &str) -> Result<String, KeyringError> {
    let entry = Entry::new(SERVICE_NAME, name)?;
    match entry.get_password() {
        Ok(password) => {
            log::debug!("API key retrieved from secure storage");
            Ok(password)
        }
        Err(keyring::Error::NoEntry) => Err(KeyringError::NotFound),
        Err(e) => Err(KeyringError::KeyringError(e)),
    }
}

fn delete_entry(name: &str) -> Result<(), KeyringError> {
    let entry = Entry::new(SERVICE_NAME, name)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => {
            log::warn!("Attempted to delete non-existent API key");
            Ok(()) // 既に存在しない場合も成功扱い
        }
        Err(e) => Err(KeyringError::KeyringError(e)),
    }
}
