use crate::types::{SensorSample, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_STRIDE,
    DEFAULT_WINDOW_SIZE, NUM_CHANNELS};
use thiserror::Error;

/// Errores fatales de configuración. Se detectan en el momento de
/// configurar y nunca se reintentan solos.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("window_size must be >= 1, got {0}")]
    InvalidWindowSize(usize),

    #[error("stride must be >= 1, got {0}")]
    InvalidStride(usize),

    #[error("confidence_threshold must be in [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("Invalid sample length: expected {expected} channels, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Duplicate gesture label: {0}")]
    DuplicateLabel(String),

    #[error("LabelSet is empty")]
    EmptyLabelSet,

    #[error("LabelSet has {labels} labels but the model outputs {outputs} classes")]
    LabelCardinality { labels: usize, outputs: usize },

    #[error("Unknown model version '{requested}'. Available: {}", .available.join(", "))]
    UnknownVersion {
        requested: String,
        available: Vec<String>,
    },
}

/// Opciones reconocidas por el pipeline
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub window_size: usize,
    pub stride: usize,
    pub confidence_threshold: f32,
    pub model_path: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            stride: DEFAULT_STRIDE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            model_path: String::new(),
        }
    }
}

impl PipelineOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 1 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        if self.stride < 1 {
            return Err(ConfigError::InvalidStride(self.stride));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold)
            || self.confidence_threshold.is_nan()
        {
            return Err(ConfigError::InvalidThreshold(self.confidence_threshold));
        }
        Ok(())
    }
}

/// Construye una muestra desde un slice, validando el número de canales.
/// Un largo distinto de 9 es un error del llamante, nunca se rellena en
/// silencio.
pub fn sample_from_slice(values: &[f32]) -> Result<SensorSample, ConfigError> {
    if values.len() != NUM_CHANNELS {
        return Err(ConfigError::ChannelMismatch {
            expected: NUM_CHANNELS,
            actual: values.len(),
        });
    }
    let mut sample = [0.0f32; NUM_CHANNELS];
    sample.copy_from_slice(values);
    Ok(sample)
}
