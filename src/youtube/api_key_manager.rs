//! APIキー管理モジュール
//!
//! キーの優先順位:
//! 1. コマンドライン引数 / 環境変数 `YOUTUBE_API_KEY`
//! 2. `--api-key-file` で指定したファイル
//! 3. カレントディレクトリの `api_key.txt` → ユーザー設定ディレクトリの `api_key.txt`
//! 4. OSのセキュアストレージ
//!
//! どれからも取得できない場合、コメント取得を始める前にエラーにする。

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{self, API_KEY_FILE};
use crate::keyring::{self, KeyringError};
use crate::util::mask_api_key;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API key file {0} is empty")]
    EmptyKeyFile(PathBuf),

    #[error("Failed to read API key file {path}: {source}")]
    ReadKeyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read API key from secure storage: {0}")]
    Keyring(#[from] KeyringError),

    #[error(
        "No API key found. Pass --api-key, set YOUTUBE_API_KEY, create api_key.txt \
         with your YouTube Data API key, or run `yt-comment-export key set <KEY>`"
    )]
    NotFound,
}

/// キーの取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    CommandLine,
    KeyFile(PathBuf),
    SecureStorage,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::CommandLine => write!(f, "command line"),
            KeySource::KeyFile(path) => write!(f, "key file {}", path.display()),
            KeySource::SecureStorage => write!(f, "secure storage"),
        }
    }
}

/// 取得済みのAPIキー
pub struct ResolvedKey {
    pub key: String,
    pub source: KeySource,
}

// キー本体をログに出さない
impl fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("key", &mask_api_key(&self.key))
            .field("source", &self.source)
            .finish()
    }
}

/// APIキー管理構造体
#[derive(Debug)]
pub struct ApiKeyManager {
    /// 引数・環境変数で渡されたキー
    cli_key: Option<String>,
    /// 明示的に指定されたキーファイル（存在しなければエラー）
    key_file: Option<PathBuf>,
    /// 存在すれば使うキーファイル
    fallback_key_files: Vec<PathBuf>,
}

impl ApiKeyManager {
    /// 新しいApiKeyManagerを作成
    pub fn new(cli_key: Option<String>, key_file: Option<PathBuf>) -> Self {
        let mut fallback_key_files = vec![PathBuf::from(API_KEY_FILE)];
        fallback_key_files.extend(config::user_api_key_file());

        Self {
            cli_key: cli_key.filter(|k| !k.trim().is_empty()),
            key_file,
            fallback_key_files,
        }
    }

    /// フォールバック先のキーファイルを差し替える
    pub fn with_fallback_files(mut self, files: Vec<PathBuf>) -> Self {
        self.fallback_key_files = files;
        self
    }

    /// 優先順位に従ってキーを取得
    pub fn resolve(&self) -> Result<ResolvedKey, CredentialError> {
        self.resolve_with(keyring::get_api_key)
    }

    /// セキュアストレージの読み出し処理を指定してキーを取得
    pub fn resolve_with<F>(&self, read_secure_storage: F) -> Result<ResolvedKey, CredentialError>
    where
        F: FnOnce() -> Result<String, KeyringError>,
    {
        let resolved = self.resolve_inner(read_secure_storage)?;
        log::info!(
            "Using API key {} from {}",
            mask_api_key(&resolved.key),
            resolved.source
        );
        Ok(resolved)
    }

    fn resolve_inner<F>(&self, read_secure_storage: F) -> Result<ResolvedKey, CredentialError>
    where
        F: FnOnce() -> Result<String, KeyringError>,
    {
        if let Some(key) = &self.cli_key {
            return Ok(ResolvedKey {
                key: key.trim().to_string(),
                source: KeySource::CommandLine,
            });
        }

        if let Some(path) = &self.key_file {
            return read_key_file(path);
        }

        if let Some(path) = self.fallback_key_files.iter().find(|p| p.is_file()) {
            return read_key_file(path);
        }

        match read_secure_storage() {
            Ok(key) if !key.trim().is_empty() => Ok(ResolvedKey {
                key: key.trim().to_string(),
                source: KeySource::SecureStorage,
            }),
            Ok(_) | Err(KeyringError::NotFound) => Err(CredentialError::NotFound),
            Err(e) => Err(CredentialError::Keyring(e)),
        }
    }
}

/// キーファイルを読み込む（前後の空白は除去、空ならエラー）
fn read_key_file(path: &Path) -> Result<ResolvedKey, CredentialError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CredentialError::ReadKeyFile {
        path: path.to_path_buf(),
        source,
    })?;

    let key = contents.trim();
    if key.is_empty() {
        return Err(CredentialError::EmptyKeyFile(path.to_path_buf()));
    }

    Ok(ResolvedKey {
        key: key.to_string(),
        source: KeySource::KeyFile(path.to_path_buf()),
    })
}
