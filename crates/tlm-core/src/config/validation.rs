//! Semantic validation for the viewer configuration.

use thiserror::Error;

use super::ViewerConfig;

/// Errors that can occur during semantic validation.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("decimation_target must be 0 (disabled) or at least 2 (got {value})")]
    DecimationTarget { value: usize },

    #[error("percentile must be in [0, 1] (got {value})")]
    PercentileRange { value: f64 },

    #[error("max_file_size must be positive")]
    MaxFileSize,
}

/// Check a parsed config for values the decoder cannot honour.
pub fn validate_config(config: &ViewerConfig) -> Result<(), ValidationError> {
    if config.decimation_target == 1 {
        return Err(ValidationError::DecimationTarget {
            value: config.decimation_target,
        });
    }

    if let Some(&value) = config
        .percentiles
        .iter()
        .find(|p| !(0.0..=1.0).contains(*p))
    {
        return Err(ValidationError::PercentileRange { value });
    }

    if config.max_file_size == 0 {
        return Err(ValidationError::MaxFileSize);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ViewerConfig::default()), Ok(()));
    }

    #[test]
    fn rejects_single_point_target() {
        let config = ViewerConfig {
            decimation_target: 1,
            ..ViewerConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::DecimationTarget { value: 1 })
        );
    }

    #[test]
    fn zero_target_disables_decimation() {
        let config = ViewerConfig {
            decimation_target: 0,
            ..ViewerConfig::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_out_of_range_percentile() {
        let config = ViewerConfig {
            percentiles: vec![0.5, 1.5],
            ..ViewerConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::PercentileRange { value: 1.5 })
        );

        let nan = ViewerConfig {
            percentiles: vec![f64::NAN],
            ..ViewerConfig::default()
        };
        assert!(validate_config(&nan).is_err());
    }

    #[test]
    fn rejects_zero_size_bound() {
        let config = ViewerConfig {
            max_file_size: 0,
            ..ViewerConfig::default()
        };
        assert_eq!(validate_config(&config), Err(ValidationError::MaxFileSize));
    }
}
