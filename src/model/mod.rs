//! Model factory and the network runtime behind it
//!
//! [`ModelFactory::build`] turns a learning rate and regularization strength
//! into a [`Classifier`]: the fixed thirteen-stage convolutional topology
//! bound to an Adam optimizer. [`Classifier::instantiate`] materializes the
//! weights as a trainable [`Network`].

mod architecture;
mod classifier;
mod factory;
pub mod layers;
mod network;

pub use architecture::{Architecture, ModelConfig, Stage, StageShape};
pub use classifier::Classifier;
pub use factory::ModelFactory;
pub use network::Network;
