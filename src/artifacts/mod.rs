//! Perzistencia artefaktov a kontrola, že pochádzajú z jedného tréningového behu.

pub mod envelope;
pub mod manifest;
pub mod bundle;
pub mod store;
pub mod consistency;

pub use envelope::{ArtifactHeader, ArtifactKind, StoredArtifact, TrainingRun};
pub use manifest::{BundleManifest, ManifestEntry, TrainingSummary};
pub use bundle::{ArtifactBundle, StoredFeatures};
pub use store::{ArtifactStore, LoadFailure, Loaded, LoadedArtifacts, MANIFEST_FILE};
