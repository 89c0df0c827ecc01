//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Returns whether the configured static directory exists; warns when it does not.
pub async fn check_static_dir(static_dir: &str) -> bool {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => true,
        _ => {
            warn!(%static_dir, "frontend assets directory not found; static assets will 404");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_dir_is_reported() {
        assert!(!check_static_dir("/definitely/not/here/homeworks").await);
    }

    #[tokio::test]
    async fn existing_dir_is_accepted() {
        let dir = std::env::temp_dir();
        assert!(check_static_dir(dir.to_str().unwrap()).await);
    }
}
