//! Fixed classifier topology and its geometry

use serde::{Deserialize, Serialize};
use std::fmt;

use super::layers::Activation;
use crate::error::ConfigurationError;

/// Geometry of the classifier; the stage sequence itself never changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Side length of the square input images
    pub image_size: usize,
    /// Input channels (3 for RGB)
    pub channels: usize,
    /// Output classes
    pub classes: usize,
    /// Units of the first dense layer
    pub hidden_units: usize,
    /// Units of the dense layer before the classifier head
    pub bottleneck_units: usize,
    /// Drop probability of both dropout stages
    pub dropout: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            image_size: 227,
            channels: 3,
            classes: 26,
            hidden_units: 256,
            bottleneck_units: 30,
            dropout: 0.5,
        }
    }
}

impl ModelConfig {
    /// Input shape of one image, `[H, W, C]`
    pub fn input_shape(&self) -> [usize; 3] {
        [self.image_size, self.image_size, self.channels]
    }
}

/// One stage of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    Standardize,
    Conv2d {
        filters: usize,
        kernel: usize,
        padding: usize,
        /// Whether the regularization strength applies to this kernel
        regularized: bool,
    },
    BatchNorm,
    MaxPool {
        size: usize,
        stride: usize,
    },
    Dropout {
        rate: f32,
    },
    Dense {
        units: usize,
        activation: Activation,
    },
}

impl Stage {
    pub fn label(&self) -> String {
        match *self {
            Stage::Standardize => "standardize".to_string(),
            Stage::Conv2d { filters, kernel, padding, regularized } => {
                let l2 = if regularized { ", l2" } else { "" };
                format!("conv2d {filters} {kernel}x{kernel} pad {padding}, relu{l2}")
            }
            Stage::BatchNorm => "batch_norm".to_string(),
            Stage::MaxPool { size, stride } => format!("max_pool {size}x{size} / {stride}"),
            Stage::Dropout { rate } => format!("dropout {rate}"),
            Stage::Dense { units, activation } => {
                format!("dense {units}, {}", format!("{activation:?}").to_lowercase())
            }
        }
    }
}

/// Shape of the activations after a stage, batch axis excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageShape {
    /// `[C, H, W]`
    Spatial { channels: usize, height: usize, width: usize },
    /// `[features]`
    Flat(usize),
}

impl StageShape {
    pub fn size(&self) -> usize {
        match *self {
            StageShape::Spatial { channels, height, width } => channels * height * width,
            StageShape::Flat(n) => n,
        }
    }
}

impl fmt::Display for StageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StageShape::Spatial { channels, height, width } => {
                write!(f, "({height}, {width}, {channels})")
            }
            StageShape::Flat(n) => write!(f, "({n})"),
        }
    }
}

/// Validated stage list with inferred shapes and parameter counts
#[derive(Debug, Clone, PartialEq)]
pub struct Architecture {
    config: ModelConfig,
    stages: Vec<Stage>,
    shapes: Vec<StageShape>,
}

/// The thirteen stages for a geometry
fn pipeline(config: &ModelConfig) -> Vec<Stage> {
    vec![
        Stage::Standardize,
        Stage::Conv2d { filters: 64, kernel: 11, padding: 2, regularized: false },
        Stage::BatchNorm,
        Stage::MaxPool { size: 3, stride: 2 },
        Stage::Conv2d { filters: 128, kernel: 5, padding: 2, regularized: true },
        Stage::BatchNorm,
        Stage::Conv2d { filters: 256, kernel: 3, padding: 1, regularized: true },
        Stage::MaxPool { size: 2, stride: 2 },
        Stage::Dropout { rate: config.dropout },
        Stage::Dense { units: config.hidden_units, activation: Activation::Relu },
        Stage::Dropout { rate: config.dropout },
        Stage::Dense { units: config.bottleneck_units, activation: Activation::Relu },
        Stage::Dense { units: config.classes, activation: Activation::Softmax },
    ]
}

fn invalid(message: String) -> ConfigurationError {
    ConfigurationError::InvalidModel(message)
}

impl Architecture {
    /// Number of stages in the pipeline
    pub const STAGES: usize = 13;

    /// Build the pipeline for `config`, checking every stage has a non-empty output
    pub fn new(config: ModelConfig) -> Result<Self, ConfigurationError> {
        for (name, value) in [
            ("image_size", config.image_size),
            ("channels", config.channels),
            ("classes", config.classes),
            ("hidden_units", config.hidden_units),
            ("bottleneck_units", config.bottleneck_units),
        ] {
            if value == 0 {
                return Err(invalid(format!("{name} must be > 0")));
            }
        }
        if !(0.0..1.0).contains(&config.dropout) {
            return Err(invalid(format!("dropout {} must be in [0, 1)", config.dropout)));
        }

        let stages = pipeline(&config);
        let mut shape = StageShape::Spatial {
            channels: config.channels,
            height: config.image_size,
            width: config.image_size,
        };
        let mut shapes = Vec::with_capacity(stages.len());
        for (i, stage) in stages.iter().enumerate() {
            shape = next_shape(shape, stage).ok_or_else(|| {
                invalid(format!("stage {} ({}) has an empty output", i + 1, stage.label()))
            })?;
            shapes.push(shape);
        }
        Ok(Self { config, stages, shapes })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Output shape of every stage
    pub fn output_shapes(&self) -> &[StageShape] {
        &self.shapes
    }

    /// Final output width (number of classes)
    pub fn output_units(&self) -> usize {
        self.shapes.last().map_or(0, StageShape::size)
    }

    /// Trainable parameters per stage
    pub fn parameter_counts(&self) -> Vec<usize> {
        let mut input = StageShape::Spatial {
            channels: self.config.channels,
            height: self.config.image_size,
            width: self.config.image_size,
        };
        let mut counts = Vec::with_capacity(self.stages.len());
        for (stage, &output) in self.stages.iter().zip(&self.shapes) {
            let count = match (*stage, input) {
                (Stage::Conv2d { filters, kernel, .. }, StageShape::Spatial { channels, .. }) => {
                    filters * channels * kernel * kernel + filters
                }
                (Stage::BatchNorm, StageShape::Spatial { channels, .. }) => 2 * channels,
                (Stage::Dense { units, .. }, shape) => shape.size() * units + units,
                _ => 0,
            };
            counts.push(count);
            input = output;
        }
        counts
    }

    /// Total trainable parameters
    pub fn num_parameters(&self) -> usize {
        self.parameter_counts().iter().sum()
    }

    /// Human-readable table of stages, shapes, and parameter counts
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{:<4} {:<36} {:>16} {:>14}\n", "#", "Stage", "Output", "Params"));
        out.push_str(&format!("{}\n", "-".repeat(73)));
        let counts = self.parameter_counts();
        for (i, ((stage, shape), count)) in
            self.stages.iter().zip(&self.shapes).zip(&counts).enumerate()
        {
            out.push_str(&format!(
                "{:<4} {:<36} {:>16} {:>14}\n",
                i + 1,
                stage.label(),
                shape.to_string(),
                count
            ));
        }
        out.push_str(&format!("{}\n", "-".repeat(73)));
        out.push_str(&format!("Total trainable parameters: {}\n", self.num_parameters()));
        out
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn next_shape(input: StageShape, stage: &Stage) -> Option<StageShape> {
    let shape = match (*stage, input) {
        (Stage::Standardize | Stage::BatchNorm | Stage::Dropout { .. }, shape) => shape,
        (
            Stage::Conv2d { filters, kernel, padding, .. },
            StageShape::Spatial { height, width, .. },
        ) => {
            let side = |s: usize| (s + 2 * padding).checked_sub(kernel).map(|v| v + 1);
            StageShape::Spatial { channels: filters, height: side(height)?, width: side(width)? }
        }
        (Stage::MaxPool { size, stride }, StageShape::Spatial { channels, height, width }) => {
            let side = |s: usize| s.checked_sub(size).map(|v| v / stride.max(1) + 1);
            StageShape::Spatial { channels, height: side(height)?, width: side(width)? }
        }
        (Stage::Dense { units, .. }, _) => StageShape::Flat(units),
        _ => return None,
    };
    (shape.size() > 0).then_some(shape)
}
