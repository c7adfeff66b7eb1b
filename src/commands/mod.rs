pub mod export;
pub mod key;
