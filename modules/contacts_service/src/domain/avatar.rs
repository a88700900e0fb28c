//! Avatar storage seam and Gravatar defaults

use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Remote image storage for user avatars
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Store the image under `public_id`, replacing any previous one, and
    /// return its public URL
    async fn upload(&self, public_id: &str, file_name: &str, bytes: Vec<u8>)
        -> anyhow::Result<String>;
}

/// Storage key for a user's avatar
pub fn avatar_public_id(username: &str) -> String {
    format!("RestApp/{username}")
}

/// Gravatar URL derived from the normalized email address
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("https://www.gravatar.com/avatar/{}", hex::encode(digest))
}
