//! Labeled image sets stored as safetensors

use ndarray::{Array4, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use safetensors::tensor::{Dtype, TensorView};
use safetensors::SafeTensors;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Tensor holding `[N, H, W, C]` pixel values
pub const IMAGES_TENSOR: &str = "images";
/// Tensor holding `[N]` class indices or `[N, K]` one-hot rows
pub const LABELS_TENSOR: &str = "labels";

/// NHWC images with one class index per image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDataset {
    images: Array4<f32>,
    labels: Vec<usize>,
}

impl ImageDataset {
    pub fn new(images: Array4<f32>, labels: Vec<usize>) -> Result<Self> {
        let n = images.len_of(Axis(0));
        if labels.len() != n {
            return Err(Error::Dataset(format!("{n} images but {} labels", labels.len())));
        }
        Ok(Self { images, labels })
    }

    /// Read `images` and `labels` from a safetensors file
    ///
    /// Images may be `F32` or `U8`. Labels may be `U8`, `I32`, or `I64`
    /// indices, or `F32` one-hot rows (argmax is taken).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let tensors = SafeTensors::deserialize(&data)
            .map_err(|e| Error::Serialization(format!("SafeTensors parsing failed: {e}")))?;

        let images = tensors
            .tensor(IMAGES_TENSOR)
            .map_err(|_| missing(path, IMAGES_TENSOR))?;
        let images = read_images(&images)?;
        let labels = tensors
            .tensor(LABELS_TENSOR)
            .map_err(|_| missing(path, LABELS_TENSOR))?;
        let labels = read_labels(&labels)?;
        Self::new(images, labels)
    }

    /// Write the dataset as `F32` images and `I64` labels
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let images = self.images.as_standard_layout();
        let image_values = images
            .as_slice()
            .ok_or_else(|| Error::Dataset("image buffer is not contiguous".to_string()))?;
        let image_bytes: &[u8] = bytemuck::cast_slice(image_values);
        let labels: Vec<i64> = self.labels.iter().map(|&l| l as i64).collect();
        let label_bytes: &[u8] = bytemuck::cast_slice(&labels);

        let views = vec![
            (
                IMAGES_TENSOR,
                TensorView::new(Dtype::F32, self.images.shape().to_vec(), image_bytes)
                    .map_err(|e| Error::Serialization(e.to_string()))?,
            ),
            (
                LABELS_TENSOR,
                TensorView::new(Dtype::I64, vec![labels.len()], label_bytes)
                    .map_err(|e| Error::Serialization(e.to_string()))?,
            ),
        ];
        let bytes = safetensors::serialize(views, None::<HashMap<String, String>>)
            .map_err(|e| Error::Serialization(format!("SafeTensors serialization failed: {e}")))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn images(&self) -> &Array4<f32> {
        &self.images
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// `[H, W, C]` of one image
    pub fn image_shape(&self) -> [usize; 3] {
        let (_, h, w, c) = self.images.dim();
        [h, w, c]
    }

    /// Number of classes implied by the largest label
    pub fn num_classes(&self) -> usize {
        self.labels.iter().max().map_or(0, |m| m + 1)
    }

    /// Images and labels at `indices`, in that order
    pub fn batch(&self, indices: &[usize]) -> (Array4<f32>, Vec<usize>) {
        let images = self.images.select(Axis(0), indices);
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        (images, labels)
    }

    /// Seeded shuffle split into `(train, validation)`
    ///
    /// `validation_fraction` of the samples (rounded) go to validation.
    pub fn split(&self, validation_fraction: f64, seed: u64) -> Result<(Self, Self)> {
        if !(validation_fraction > 0.0 && validation_fraction < 1.0) {
            return Err(Error::Dataset(format!(
                "validation fraction {validation_fraction} must be in (0, 1)"
            )));
        }
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));
        let n_val = (self.len() as f64 * validation_fraction).round() as usize;
        let (val, train) = indices.split_at(n_val.min(self.len()));
        let subset = |idx: &[usize]| {
            let (images, labels) = self.batch(idx);
            Self { images, labels }
        };
        Ok((subset(train), subset(val)))
    }
}

fn missing(path: &Path, name: &str) -> Error {
    Error::Dataset(format!("{}: missing tensor '{name}'", path.display()))
}

/// Decode little-endian 4-byte values without assuming alignment
fn decode_f32(bytes: &[u8]) -> Vec<f32> {
    match bytemuck::try_cast_slice::<u8, f32>(bytes) {
        Ok(values) => values.to_vec(),
        Err(_) => bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    }
}

fn read_images(view: &TensorView<'_>) -> Result<Array4<f32>> {
    let shape = view.shape();
    let &[n, h, w, c] = shape else {
        return Err(Error::Dataset(format!("images must be [N, H, W, C], got {shape:?}")));
    };
    let values = match view.dtype() {
        Dtype::F32 => decode_f32(view.data()),
        Dtype::U8 => view.data().iter().map(|&b| f32::from(b)).collect(),
        other => return Err(Error::Dataset(format!("unsupported image dtype {other:?}"))),
    };
    Array4::from_shape_vec((n, h, w, c), values).map_err(|e| Error::Dataset(e.to_string()))
}

fn to_index(value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::Dataset(format!("negative label {value}")))
}

fn read_labels(view: &TensorView<'_>) -> Result<Vec<usize>> {
    let data = view.data();
    match (view.dtype(), view.shape()) {
        (Dtype::U8, [_]) => Ok(data.iter().map(|&b| usize::from(b)).collect()),
        (Dtype::I32, [_]) => data
            .chunks_exact(4)
            .map(|b| to_index(i64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))))
            .collect(),
        (Dtype::I64, [_]) => data
            .chunks_exact(8)
            .map(|b| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(b);
                to_index(i64::from_le_bytes(raw))
            })
            .collect(),
        (Dtype::F32, &[n, k]) if k > 0 => {
            let values = decode_f32(data);
            Ok((0..n)
                .map(|i| {
                    let row = &values[i * k..(i + 1) * k];
                    row.iter()
                        .enumerate()
                        .fold((0, f32::NEG_INFINITY), |best, (j, &v)| {
                            if v > best.1 {
                                (j, v)
                            } else {
                                best
                            }
                        })
                        .0
                })
                .collect())
        }
        (dtype, shape) => Err(Error::Dataset(format!(
            "unsupported labels: dtype {dtype:?}, shape {shape:?}"
        ))),
    }
}
