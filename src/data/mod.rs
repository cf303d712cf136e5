//! Training data: safetensors image sets and WAV augmentation

pub mod audio;
mod dataset;

pub use audio::{augment_dir, change_speed, wav_duration};
pub use dataset::{ImageDataset, IMAGES_TENSOR, LABELS_TENSOR};
