//! Infrastructure adapters: database, SMTP, avatar storage

pub mod avatar;
pub mod mail;
pub mod storage;
