use std::path::PathBuf;

use anyhow::{Context, Result};
use cubewear_engine::device::GpuInit;
use cubewear_engine::logging::{init_logging, LoggingConfig};
use cubewear_engine::window::{Runtime, RuntimeConfig};
use cubewear_engine::{AssetSource, CameraConfig, DirAssets, EmbeddedAssets, WatchFaceConfig};

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Host options read from the environment:
/// - `CUBEWEAR_FONT`: overlay font file
/// - `CUBEWEAR_ASSETS`: directory holding `shaders/cube.wgsl`
/// - `CUBEWEAR_AMBIENT=1`: start in ambient mode
/// - `CUBEWEAR_TUMBLING=1`: diagonal-axis camera variant
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn load_font() -> Result<Option<Vec<u8>>> {
    if let Some(path) = std::env::var_os("CUBEWEAR_FONT") {
        let path = PathBuf::from(path);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read font {}", path.display()))?;
        return Ok(Some(bytes));
    }
    Ok(FONT_PATHS.iter().find_map(|p| std::fs::read(p).ok()))
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut face = WatchFaceConfig::default();
    if env_flag("CUBEWEAR_TUMBLING") {
        face.camera = CameraConfig::tumbling();
    }

    let font = match load_font()? {
        Some(bytes) => bytes,
        None => {
            log::warn!("no system font found; frame-rate overlay disabled");
            face.show_frame_rate = false;
            Vec::new()
        }
    };

    let assets: Box<dyn AssetSource> = match std::env::var_os("CUBEWEAR_ASSETS") {
        Some(dir) => Box::new(DirAssets::new(dir)),
        None => Box::new(EmbeddedAssets),
    };

    let config = RuntimeConfig {
        start_ambient: env_flag("CUBEWEAR_AMBIENT"),
        ..RuntimeConfig::default()
    };

    log::info!("starting watch face (A: ambient, Z: re-read time zone, Esc: quit)");
    Runtime::run(config, GpuInit::default(), face, assets, font)
}
