//! Cover image size budgets
//!
//! Platforms reject covers over a byte budget. An oversized cover is
//! re-encoded as PNG at maximum structural compression, at progressively
//! smaller dimensions, until it fits or the scale floor is reached. Running
//! out of attempts is a warning, not a failure; the smallest attempt is
//! still worth offering to the platform.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::GenericImageView;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Scale step between attempts
pub const SCALE_STEP: f32 = 0.05;

/// Maximum number of re-encode attempts
pub const MAX_ATTEMPTS: u32 = 15;

/// Below this scale no further shrinkage is attempted
const SCALE_FLOOR: f32 = 0.3;

/// Result of fitting a cover into a byte budget
#[derive(Debug, Clone)]
pub struct FittedCover {
    /// File to hand to the platforms
    pub path: PathBuf,
    /// Its size in bytes
    pub bytes: u64,
    /// Whether the budget was actually met
    pub within_budget: bool,
    /// Re-encode attempts made (zero when the original already fit)
    pub attempts: u32,
}

/// Fit the image at `path` into `max_bytes`
///
/// Returns the original path untouched when it already fits (re-encoding
/// would only cost quality). Otherwise writes `<stem>_fit.png` next to the
/// source, overwriting it per attempt so the last (smallest) version
/// survives.
pub fn fit_cover(path: &Path, max_bytes: u64, step: f32, max_attempts: u32) -> Result<FittedCover> {
    let original_bytes = fs::metadata(path)
        .map_err(|e| Error::Asset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .len();
    if original_bytes <= max_bytes {
        debug!(bytes = original_bytes, "cover already within budget");
        return Ok(FittedCover {
            path: path.to_path_buf(),
            bytes: original_bytes,
            within_budget: true,
            attempts: 0,
        });
    }

    let source = image::open(path).map_err(|e| Error::Asset {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let (width, height) = source.dimensions();

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    let out_path = path.with_file_name(format!("{stem}_fit.png"));

    let mut last_bytes = original_bytes;
    let mut attempts = 0;
    for attempt in 1..=max_attempts {
        let scale = 1.0 - step * (attempt - 1) as f32;
        // The epsilon keeps the 0.3 floor itself reachable across f32 rounding.
        if scale < SCALE_FLOOR - 1e-4 {
            debug!(attempt, "scale floor reached");
            break;
        }
        attempts = attempt;

        let new_width = ((width as f32 * scale).floor() as u32).max(1);
        let new_height = ((height as f32 * scale).floor() as u32).max(1);
        let resized = source.resize_exact(new_width, new_height, FilterType::Lanczos3);

        let file = fs::File::create(&out_path)?;
        let encoder =
            PngEncoder::new_with_quality(file, CompressionType::Best, PngFilter::Adaptive);
        resized.write_with_encoder(encoder).map_err(|e| Error::Asset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        last_bytes = fs::metadata(&out_path)?.len();
        debug!(attempt, scale, bytes = last_bytes, "cover re-encoded");
        if last_bytes <= max_bytes {
            info!(
                attempts = attempt,
                bytes = last_bytes,
                "cover fits the budget"
            );
            return Ok(FittedCover {
                path: out_path,
                bytes: last_bytes,
                within_budget: true,
                attempts: attempt,
            });
        }
    }

    warn!(
        bytes = last_bytes,
        budget = max_bytes,
        attempts,
        "cover still over budget; offering the smallest attempt"
    );
    Ok(FittedCover {
        path: out_path,
        bytes: last_bytes,
        within_budget: false,
        attempts,
    })
}
