//! Band configuration JSON.
//!
//! ```json
//! { "upper": 630000, "second_upper": 378000, "third_upper": 315000 }
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::BandConfig;
use crate::error::AppError;

/// Read and validate a band configuration file.
pub fn read_band_config(path: &Path) -> Result<BandConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::InvalidConfig(format!("failed to open band config '{}': {e}", path.display())))?;
    let bands: BandConfig = serde_json::from_reader(file)
        .map_err(|e| AppError::InvalidConfig(format!("invalid band config '{}': {e}", path.display())))?;
    bands.validate()?;
    Ok(bands)
}
