use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SosensError};

pub const MAGIC: [u8; 4] = *b"SOSA";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    LabelEncoder,
    FeatureNames,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Classifier,
        ArtifactKind::Scaler,
        ArtifactKind::LabelEncoder,
        ArtifactKind::FeatureNames,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Classifier => "classifier.bin",
            ArtifactKind::Scaler => "scaler.bin",
            ArtifactKind::LabelEncoder => "label_encoder.bin",
            ArtifactKind::FeatureNames => "feature_names.bin",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::LabelEncoder => "label_encoder",
            ArtifactKind::FeatureNames => "feature_names",
        };
        f.write_str(name)
    }
}

/// Identita tréningového behu, ktorým vznikli artefakty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRun {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TrainingRun {
    pub fn new() -> Self {
        Self { run_id: Uuid::new_v4(), created_at: Utc::now() }
    }
}

impl Default for TrainingRun {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub magic: [u8; 4],
    pub format_version: u32,
    pub kind: ArtifactKind,
    pub run: TrainingRun,
    pub checksum: u32,
    pub payload_len: u64,
}

/// Obálka jedného artefaktu na disku: hlavička + bincode payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub header: ArtifactHeader,
    pub payload: Vec<u8>,
}

pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

impl StoredArtifact {
    pub fn seal<T: Serialize>(kind: ArtifactKind, run: TrainingRun, value: &T) -> Result<Self> {
        let payload = bincode::serialize(value)?;
        Ok(Self {
            header: ArtifactHeader {
                magic: MAGIC,
                format_version: FORMAT_VERSION,
                kind,
                run,
                checksum: checksum(&payload),
                payload_len: payload.len() as u64,
            },
            payload,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MAGIC.len() {
            return Err(SosensError::Artifact("file too short".to_string()));
        }
        let stored: StoredArtifact = bincode::deserialize(bytes)?;
        Ok(stored)
    }

    /// Overí hlavičku a checksum a dekóduje payload
    pub fn open<T: DeserializeOwned>(&self, expected: ArtifactKind) -> Result<T> {
        let header = &self.header;
        if header.magic != MAGIC {
            return Err(SosensError::Artifact("not a sosens artifact".to_string()));
        }
        if header.format_version != FORMAT_VERSION {
            return Err(SosensError::Artifact(format!(
                "unsupported format version {} (expected {})",
                header.format_version, FORMAT_VERSION
            )));
        }
        if header.kind != expected {
            return Err(SosensError::Artifact(format!(
                "expected {} artifact, found {}",
                expected, header.kind
            )));
        }
        if header.payload_len != self.payload.len() as u64 {
            return Err(SosensError::Artifact(format!(
                "payload truncated: {} of {} bytes",
                self.payload.len(),
                header.payload_len
            )));
        }
        let actual = checksum(&self.payload);
        if actual != header.checksum {
            return Err(SosensError::Checksum { expected: header.checksum, actual });
        }
        Ok(bincode::deserialize(&self.payload)?)
    }
}
