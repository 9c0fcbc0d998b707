//! Asset loading capability handed to the rendering core by its host.
//!
//! Only shader sources are loaded today. Reads are synchronous and happen
//! once per surface, before the first frame.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::InitializationError;

/// Relative path of the cube shader.
pub const CUBE_SHADER: &str = "shaders/cube.wgsl";

/// Source of text assets.
pub trait AssetSource {
    fn load_text(&self, path: &str) -> Result<String, InitializationError>;
}

/// Assets compiled into the crate.
#[derive(Debug, Copy, Clone, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    const FILES: &'static [(&'static str, &'static str)] = &[(
        CUBE_SHADER,
        include_str!("render/shaders/cube.wgsl"),
    )];
}

impl AssetSource for EmbeddedAssets {
    fn load_text(&self, path: &str) -> Result<String, InitializationError> {
        Self::FILES
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| InitializationError::Asset {
                path: PathBuf::from(path),
                source: io::Error::new(io::ErrorKind::NotFound, "no embedded asset"),
            })
    }
}

/// Assets read from a directory on disk, using the same relative paths as
/// `EmbeddedAssets`.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssets {
    fn load_text(&self, path: &str) -> Result<String, InitializationError> {
        let full = self.root.join(path);
        log::debug!("loading asset {}", full.display());
        fs::read_to_string(&full).map_err(|source| InitializationError::Asset { path: full, source })
    }
}

impl<T: AssetSource + ?Sized> AssetSource for &T {
    fn load_text(&self, path: &str) -> Result<String, InitializationError> {
        (**self).load_text(path)
    }
}

impl<T: AssetSource + ?Sized> AssetSource for Box<T> {
    fn load_text(&self, path: &str) -> Result<String, InitializationError> {
        (**self).load_text(path)
    }
}
