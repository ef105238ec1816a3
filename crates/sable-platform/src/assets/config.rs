use std::path::PathBuf;

/// Startup configuration for an [`AssetResolver`](super::AssetResolver).
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Prefix prepended to names in the primary lookup. No leading or trailing `/`.
    pub path_prefix: String,
    /// Root of the primary lookup on disk. `None` starts with an empty embedded bundle.
    pub resource_root: Option<PathBuf>,
    /// Fallback directories, searched in order after the primary lookup.
    pub directories: Vec<PathBuf>,
    /// Scale used to enumerate image variants instead of each load's target scale.
    pub asset_scale: Option<f32>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            path_prefix: "assets".to_string(),
            resource_root: None,
            directories: Vec::new(),
            asset_scale: None,
        }
    }
}
