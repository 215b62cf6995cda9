use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::RwLock};

use crate::error::GatewayResult;

pub const FALLBACK_HEADER: &str = "x-fallback-cookies";

/// Session cookies the backend hands out in a header, kept on disk between runs.
///
/// An absent, blank, `[]` or `{}` value means there is no session to resume.
#[derive(Debug, Default)]
pub struct CookieFallback {
    path: Option<PathBuf>,
    value: RwLock<Option<String>>,
}

impl CookieFallback {
    pub fn in_memory(value: Option<String>) -> Self {
        Self {
            path: None,
            value: RwLock::new(value),
        }
    }

    pub async fn load(path: PathBuf) -> GatewayResult<Self> {
        let value = match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                debug!("Loaded session fallback {}", path.display());
                Some(value)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            value: RwLock::new(value),
        })
    }

    pub async fn get(&self) -> Option<String> {
        let value = self.value.read().await;
        value.as_ref().filter(|v| !is_blank(v)).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.get().await.is_none()
    }

    pub async fn store(&self, value: String) -> GatewayResult<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            write_private(path, &value).await?;
            info!("Saved session fallback {}", path.display());
        }
        *self.value.write().await = Some(value);
        Ok(())
    }

    pub async fn clear(&self) -> GatewayResult<()> {
        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => info!("Removed session fallback {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        *self.value.write().await = None;
        Ok(())
    }
}

/// Write `value` readable by the owner only.
async fn write_private(path: &Path, value: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(value.as_bytes()).await?;
    file.flush().await
}

fn is_blank(value: &str) -> bool {
    matches!(value.trim(), "" | "[]" | "{}")
}
