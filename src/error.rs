use thiserror::Error;

use crate::export::ExportError;
use crate::keyring::KeyringError;
use crate::youtube::{api_key_manager::CredentialError, errors::YouTubeError};

/// 実行全体のエラー（どの段階で失敗したかを保持する）
#[derive(Debug, Error)]
pub enum AppError {
    #[error("load credentials: {0}")]
    Credential(#[from] CredentialError),

    #[error("resolve video: {0}")]
    Resolve(YouTubeError),

    #[error("fetch comments: {0}")]
    Fetch(YouTubeError),

    #[error("export CSV: {0}")]
    Export(#[from] ExportError),

    #[error("access secure storage: {0}")]
    Keyring(#[from] KeyringError),

    #[error("parse arguments: {0}")]
    InvalidArgument(String),

    #[error("run background task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    /// 失敗した段階の名前
    pub fn step(&self) -> &'static str {
        match self {
            AppError::Credential(_) => "load credentials",
            AppError::Resolve(_) => "resolve video",
            AppError::Fetch(_) => "fetch comments",
            AppError::Export(_) => "export CSV",
            AppError::Keyring(_) => "access secure storage",
            AppError::InvalidArgument(_) => "parse arguments",
            AppError::Join(_) => "run background task",
        }
    }
}
