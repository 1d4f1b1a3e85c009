pub mod scaler;
pub mod label_encoder;
pub mod null_handler;

pub use scaler::{ScalerState, StandardScaler};
pub use label_encoder::LabelEncoder;
pub use null_handler::{ImputationState, MedianImputer};
