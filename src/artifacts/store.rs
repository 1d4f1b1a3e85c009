use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use super::bundle::{ArtifactBundle, StoredFeatures};
use super::consistency;
use super::envelope::{ArtifactHeader, ArtifactKind, StoredArtifact, TrainingRun};
use super::manifest::{BundleManifest, ManifestEntry};
use crate::error::{Result, SosensError};
use crate::models::RandomForestClassifier;
use crate::processing::{LabelEncoder, ScalerState};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Úspešne načítaný artefakt spolu s jeho hlavičkou
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub header: ArtifactHeader,
    pub value: T,
}

impl<T> Loaded<T> {
    pub fn run(&self) -> TrainingRun {
        self.header.run
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFailure {
    pub kind: ArtifactKind,
    pub reason: String,
}

/// Výsledok štartovacieho načítania: každý artefakt samostatne.
///
/// `issues` obsahuje nezhody medzi artefaktmi, ktoré blokujú predikciu;
/// `notes` sú len informatívne.
#[derive(Debug, Default)]
pub struct LoadedArtifacts {
    pub manifest: Option<BundleManifest>,
    pub classifier: Option<Loaded<RandomForestClassifier>>,
    pub scaler: Option<Loaded<ScalerState>>,
    pub label_encoder: Option<Loaded<LabelEncoder>>,
    pub features: Option<Loaded<StoredFeatures>>,
    pub failures: Vec<LoadFailure>,
    pub issues: Vec<String>,
    pub notes: Vec<String>,
}

impl LoadedArtifacts {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }

    /// Beh, ku ktorému sa artefakty vzťahujú: manifest, inak prvý načítaný artefakt
    pub fn reference_run(&self) -> Option<TrainingRun> {
        self.manifest
            .as_ref()
            .map(|m| m.run)
            .or_else(|| self.classifier.as_ref().map(Loaded::run))
            .or_else(|| self.scaler.as_ref().map(Loaded::run))
            .or_else(|| self.label_encoder.as_ref().map(Loaded::run))
            .or_else(|| self.features.as_ref().map(Loaded::run))
    }

    pub fn failure(&self, kind: ArtifactKind) -> Option<&LoadFailure> {
        self.failures.iter().find(|f| f.kind == kind)
    }
}

/// Súborové úložisko artefaktov v jednom adresári
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Zapíše súbor cez dočasný súbor a rename, aby čitateľ nikdy nevidel polovičný zápis.
    /// Pri chybe dočasný súbor zmaže; po rename synchronizuje adresár.
    fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SosensError::Artifact(format!("invalid path {}", path.display())))?;
        let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

        if let Err(e) = Self::write_and_rename(&temp_path, path, bytes) {
            if temp_path.exists() {
                let _ = fs::remove_file(&temp_path);
            }
            return Err(e.into());
        }
        Self::sync_parent(path)
    }

    fn write_and_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        {
            let mut file = fs::File::create(temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)
    }

    #[cfg(unix)]
    fn sync_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::File::open(parent)?.sync_all()?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent(_path: &Path) -> Result<()> {
        Ok(())
    }

    fn write_artifact<T: Serialize>(
        &self,
        kind: ArtifactKind,
        run: TrainingRun,
        value: &T,
    ) -> Result<ManifestEntry> {
        let stored = StoredArtifact::seal(kind, run, value)?;
        let path = self.path(kind);
        Self::write_atomic(&path, &stored.to_bytes()?)?;
        info!(artifact = %kind, path = %path.display(), bytes = stored.payload.len(), "saved artifact");
        Ok(ManifestEntry {
            kind,
            file: kind.file_name().to_string(),
            checksum: stored.header.checksum,
        })
    }

    /// Uloží štyri artefakty a nakoniec manifest
    pub fn save(&self, bundle: &ArtifactBundle) -> Result<BundleManifest> {
        fs::create_dir_all(&self.dir)?;

        let mut manifest = BundleManifest::new(
            bundle.run,
            bundle.features.feature_set.len(),
            bundle.label_encoder.classes().to_vec(),
            bundle.classifier.n_trees(),
        );
        manifest.summary = bundle.summary.clone();
        manifest.artifacts.push(self.write_artifact(ArtifactKind::Classifier, bundle.run, &bundle.classifier)?);
        manifest.artifacts.push(self.write_artifact(ArtifactKind::Scaler, bundle.run, &bundle.scaler)?);
        manifest.artifacts.push(self.write_artifact(
            ArtifactKind::LabelEncoder,
            bundle.run,
            &bundle.label_encoder,
        )?);
        manifest.artifacts.push(self.write_artifact(ArtifactKind::FeatureNames, bundle.run, &bundle.features)?);

        let json = serde_json::to_vec_pretty(&manifest)?;
        Self::write_atomic(&self.manifest_path(), &json)?;
        info!(run_id = %bundle.run.run_id, dir = %self.dir.display(), "saved artifact bundle");
        Ok(manifest)
    }

    pub fn load_manifest(&self) -> Result<Option<BundleManifest>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn load_one<T: DeserializeOwned>(&self, kind: ArtifactKind) -> Result<Loaded<T>> {
        let path = self.path(kind);
        if !path.exists() {
            return Err(SosensError::Artifact(format!("{} not found at {}", kind, path.display())));
        }
        let bytes = fs::read(&path)?;
        let stored = StoredArtifact::from_bytes(&bytes)?;
        let value = stored.open(kind)?;
        Ok(Loaded { header: stored.header, value })
    }

    fn load_slot<T: DeserializeOwned>(
        &self,
        kind: ArtifactKind,
        validate: impl Fn(&T) -> Result<()>,
        failures: &mut Vec<LoadFailure>,
    ) -> Option<Loaded<T>> {
        match self.load_one::<T>(kind).and_then(|loaded| validate(&loaded.value).map(|_| loaded)) {
            Ok(loaded) => {
                info!(artifact = %kind, run_id = %loaded.header.run.run_id, "loaded artifact");
                Some(loaded)
            }
            Err(e) => {
                warn!(artifact = %kind, error = %e, "failed to load artifact");
                failures.push(LoadFailure { kind, reason: e.to_string() });
                None
            }
        }
    }

    /// Načíta každý artefakt nezávisle a potom overí ich vzájomnú konzistenciu.
    /// Nikdy nezlyhá; chyby sú v `failures` a `issues`.
    pub fn load(&self) -> LoadedArtifacts {
        let mut loaded = LoadedArtifacts::default();

        match self.load_manifest() {
            Ok(Some(manifest)) => loaded.manifest = Some(manifest),
            Ok(None) => {
                warn!(path = %self.manifest_path().display(), "manifest not found");
                loaded.notes.push("manifest not found; artifacts linked by run id only".to_string());
            }
            Err(e) => {
                warn!(error = %e, "failed to read manifest");
                loaded.notes.push(format!("manifest unreadable: {}", e));
            }
        }

        let mut failures = Vec::new();
        loaded.classifier = self.load_slot(ArtifactKind::Classifier, RandomForestClassifier::validate, &mut failures);
        loaded.scaler = self.load_slot(ArtifactKind::Scaler, consistency::validate_scaler, &mut failures);
        loaded.label_encoder = self.load_slot(ArtifactKind::LabelEncoder, |_: &LabelEncoder| Ok(()), &mut failures);
        loaded.features = self.load_slot(ArtifactKind::FeatureNames, |_: &StoredFeatures| Ok(()), &mut failures);
        loaded.failures = failures;

        consistency::reconcile(&mut loaded);
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.bin");
        ArtifactStore::write_atomic(&path, b"stats").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"stats");
        assert!(!dir.path().join(".scaler.bin.tmp").exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // Cieľ je neprázdny adresár, rename zlyhá až po zápise dočasného súboru
        let path = dir.path().join("scaler.bin");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(ArtifactStore::write_atomic(&path, b"stats").is_err());
        assert!(!dir.path().join(".scaler.bin.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
