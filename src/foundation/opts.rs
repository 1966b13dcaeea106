use crate::foundation::error::{VdpError, VdpResult};

/// Environment variable naming a JSON file with [`DriverOpts`].
pub const CONFIG_ENV: &str = "SOFTVDP_CONFIG";
const MAX_OUTPUT_ENV: &str = "SOFTVDP_MAX_OUTPUT_SURFACE_SIZE";
const MAX_BITMAP_ENV: &str = "SOFTVDP_MAX_BITMAP_SURFACE_SIZE";

/// Fixed limits and strings reported by the capability layer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DriverOpts {
    /// Output surfaces wider or taller than this fail with `InvalidSize`.
    pub max_output_surface_size: u32,
    /// Bitmap surface capability answer; creation does not enforce it.
    pub max_bitmap_surface_size: u32,
    /// Video surface capability answer (width).
    pub max_video_surface_width: u32,
    /// Video surface capability answer (height).
    pub max_video_surface_height: u32,
    /// Returned by `get_information_string`.
    pub information_string: String,
}

impl Default for DriverOpts {
    fn default() -> Self {
        Self {
            max_output_surface_size: 4096,
            max_bitmap_surface_size: 2048,
            max_video_surface_width: 1920,
            max_video_surface_height: 1080,
            information_string: "VAAPI/software backend for VDPAU".to_string(),
        }
    }
}

impl DriverOpts {
    /// Parse options from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> VdpResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| VdpError::invalid_value(format!("driver options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Defaults, then the JSON file named by `SOFTVDP_CONFIG`, then per-field env overrides.
    pub fn from_env() -> VdpResult<Self> {
        let mut opts = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| VdpError::invalid_value(format!("read {path}: {e}")))?;
                Self::from_json_str(&json)?
            }
            Err(_) => Self::default(),
        };

        if let Some(v) = env_u32(MAX_OUTPUT_ENV)? {
            opts.max_output_surface_size = v;
        }
        if let Some(v) = env_u32(MAX_BITMAP_ENV)? {
            opts.max_bitmap_surface_size = v;
        }
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> VdpResult<()> {
        // Packed surfaces are backed by pixmaps with 16-bit extents.
        for (name, v) in [
            ("max_output_surface_size", self.max_output_surface_size),
            ("max_bitmap_surface_size", self.max_bitmap_surface_size),
        ] {
            if v == 0 || v > u32::from(u16::MAX) {
                return Err(VdpError::invalid_value(format!(
                    "{name} must be in 1..={}, got {v}",
                    u16::MAX
                )));
            }
        }
        Ok(())
    }
}

fn env_u32(key: &str) -> VdpResult<Option<u32>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|e| VdpError::invalid_value(format!("{key}={v}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/opts.rs"]
mod tests;
