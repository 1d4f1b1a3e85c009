use tracing::warn;
use uuid::Uuid;

use super::envelope::ArtifactKind;
use super::manifest::BundleManifest;
use super::store::{LoadFailure, Loaded, LoadedArtifacts};
use crate::error::{Result, SosensError};
use crate::models::Classifier;
use crate::processing::ScalerState;

pub fn validate_scaler(state: &ScalerState) -> Result<()> {
    if state.mean.is_empty() || state.mean.len() != state.scale.len() {
        return Err(SosensError::Artifact(format!(
            "scaler has {} means and {} scales",
            state.mean.len(),
            state.scale.len()
        )));
    }
    if state.mean.iter().any(|m| !m.is_finite()) || state.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
        return Err(SosensError::Artifact("scaler statistics are not finite".to_string()));
    }
    Ok(())
}

/// Vyradí artefakt z iného behu alebo s checksumom, ktorý nesedí s manifestom
fn reject_stale<T>(
    slot: &mut Option<Loaded<T>>,
    kind: ArtifactKind,
    reference: Uuid,
    manifest: Option<&BundleManifest>,
    failures: &mut Vec<LoadFailure>,
) {
    let reason = match slot.as_ref() {
        None => return,
        Some(loaded) if loaded.header.run.run_id != reference => format!(
            "stale artifact from run {}, expected run {}",
            loaded.header.run.run_id, reference
        ),
        Some(loaded) => match manifest.and_then(|m| m.entry(kind)) {
            Some(entry) if entry.checksum != loaded.header.checksum => format!(
                "checksum {:08x} differs from manifest {:08x}",
                loaded.header.checksum, entry.checksum
            ),
            _ => return,
        },
    };
    warn!(artifact = %kind, %reason, "rejecting artifact");
    failures.push(LoadFailure { kind, reason });
    *slot = None;
}

/// Overí, že načítané artefakty pochádzajú z jedného behu a majú zhodné rozmery
pub fn reconcile(loaded: &mut LoadedArtifacts) {
    let Some(reference) = loaded.reference_run() else {
        return;
    };
    let reference = reference.run_id;
    let manifest = loaded.manifest.as_ref();

    reject_stale(&mut loaded.classifier, ArtifactKind::Classifier, reference, manifest, &mut loaded.failures);
    reject_stale(&mut loaded.scaler, ArtifactKind::Scaler, reference, manifest, &mut loaded.failures);
    reject_stale(&mut loaded.label_encoder, ArtifactKind::LabelEncoder, reference, manifest, &mut loaded.failures);
    reject_stale(&mut loaded.features, ArtifactKind::FeatureNames, reference, manifest, &mut loaded.failures);

    let mut issues = Vec::new();
    let classifier_shape = loaded.classifier.as_ref().map(|c| (c.value.n_features(), c.value.n_classes()));
    let scaler_width = loaded.scaler.as_ref().map(|s| s.value.n_features());
    let feature_count = loaded.features.as_ref().map(|f| f.value.feature_set.len());
    let classes = loaded.label_encoder.as_ref().map(|l| l.value.classes());

    if let (Some((n_features, _)), Some(width)) = (classifier_shape, scaler_width) {
        if n_features != width {
            issues.push(format!("classifier expects {} features, scaler has {}", n_features, width));
        }
    }
    if let (Some(count), Some(width)) = (feature_count, scaler_width) {
        if count != width {
            issues.push(format!("feature set has {} names, scaler has {}", count, width));
        }
    }
    if let (Some(count), Some((n_features, _))) = (feature_count, classifier_shape) {
        if count != n_features {
            issues.push(format!("feature set has {} names, classifier expects {}", count, n_features));
        }
    }
    if let (Some(classes), Some((_, n_classes))) = (classes, classifier_shape) {
        if classes.len() != n_classes {
            issues.push(format!(
                "label encoder has {} classes, classifier predicts {}",
                classes.len(),
                n_classes
            ));
        }
    }
    if let Some(manifest) = manifest {
        if let Some(count) = feature_count.or(scaler_width) {
            if count != manifest.feature_count {
                issues.push(format!("manifest lists {} features, artifacts have {}", manifest.feature_count, count));
            }
        }
        if let Some(classes) = classes {
            if classes != manifest.classes.as_slice() {
                issues.push("label encoder classes differ from manifest".to_string());
            }
        }
    }

    for issue in &issues {
        warn!(%issue, "artifact bundle is inconsistent");
    }
    loaded.issues.extend(issues);
}
