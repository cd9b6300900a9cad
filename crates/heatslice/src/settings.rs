//! Slicing parameters.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Default distance under which two intersection points are welded together.
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-4;

/// What to do with a connected piece that collapses to a single point,
/// which happens when the plane is tangent to a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Skip pieces with fewer than two distinct points.
    #[default]
    Drop,
    /// Emit them as one-point pieces.
    Keep,
}

/// Slicing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSettings {
    /// Distance under which intersection points are treated as one vertex.
    pub weld_tolerance: f64,
    /// Handling of single-point pieces.
    pub degenerate_pieces: DegeneratePolicy,
    /// Slice meshes on the rayon pool.
    pub parallel: bool,
    /// Reject meshes with more triangles than this.
    pub max_triangles: Option<usize>,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            degenerate_pieces: DegeneratePolicy::Drop,
            parallel: true,
            max_triangles: None,
        }
    }
}

impl SliceSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.weld_tolerance.is_finite() || self.weld_tolerance <= 0.0 {
            return Err(SettingsError::Invalid(
                "weld_tolerance must be positive and finite".into(),
            ));
        }
        if self.max_triangles == Some(0) {
            return Err(SettingsError::Invalid(
                "max_triangles must be positive when set".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from a TOML document. Missing keys take
    /// their default values.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: SliceSettings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string(self).map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SliceSettings::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let settings = SliceSettings {
            weld_tolerance: -0.1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = SliceSettings {
            weld_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = SliceSettings {
            max_triangles: Some(0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = SliceSettings::from_toml_str(
            r#"
            degenerate_pieces = "keep"
            max_triangles = 5000
            "#,
        )
        .unwrap();
        assert_eq!(settings.degenerate_pieces, DegeneratePolicy::Keep);
        assert_eq!(settings.max_triangles, Some(5000));
        assert_eq!(settings.weld_tolerance, DEFAULT_WELD_TOLERANCE);
        assert!(settings.parallel);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            SliceSettings::from_toml_str("weld_tolerance = 0.0"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            SliceSettings::from_toml_str("parallel = \"yes\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = SliceSettings {
            weld_tolerance: 1e-3,
            degenerate_pieces: DegeneratePolicy::Keep,
            parallel: false,
            max_triangles: Some(12),
        };
        let text = settings.to_toml_string().unwrap();
        assert_eq!(SliceSettings::from_toml_str(&text).unwrap(), settings);
    }
}
