//! Training artifacts and model inference components

pub mod classifier;
pub mod encoders;
pub mod inference;
pub mod loader;
pub mod onnx;
pub mod scaler;

pub use classifier::{Classifier, LogisticClassifier};
pub use encoders::{CategoricalField, CategoryEncoders};
pub use inference::ScoringService;
pub use loader::ModelLoader;
pub use scaler::{ScaledVector, StandardScaler};
