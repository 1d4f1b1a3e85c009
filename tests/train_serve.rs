use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use serde::Serialize;
use serde_json::{json, Value};
use sosens::artifacts::{ArtifactKind, StoredArtifact, MANIFEST_FILE};
use sosens::processing::{LabelEncoder, ScalerState};
use sosens::pipeline::{CORRELATION_FILE, IMPORTANCES_FILE, REPORT_FILE};
use sosens::{
    ArtifactStore, PredictionError, PredictionRequest, PredictionService, SosensConfig, SosensError, Trainer,
    TrainerBuilder,
};
use tempfile::TempDir;

const FEATURES: [&str; 4] = ["N", "P", "K", "Ph"];

/// (plodina, N, P, K, Ph) pre stred klastra
const CROPS: [(&str, f64, f64, f64, f64); 3] = [
    ("rice", 80.0, 40.0, 40.0, 6.0),
    ("maize", 20.0, 60.0, 20.0, 7.0),
    ("lentil", 40.0, 10.0, 70.0, 5.0),
];

fn row(crop: usize, i: usize) -> [f64; 4] {
    let (_, n, p, k, ph) = CROPS[crop];
    let d = i as f64;
    [n + d * 0.5, p + (d % 4.0), k - d * 0.3, ph + d * 0.02]
}

fn dataset_csv() -> String {
    let mut csv = String::from("N,P,K,Ph,Soil,Crop\n");
    for i in 0..15 {
        for (c, (name, ..)) in CROPS.iter().enumerate() {
            let v = row(c, i);
            if i == 7 && c == 1 {
                csv.push_str(&format!("{},{},{},,clay,{}\n", v[0], v[1], v[2], name));
            } else {
                csv.push_str(&format!("{},{},{},{},loam,{}\n", v[0], v[1], v[2], v[3], name));
            }
        }
    }
    csv
}

fn config(dir: &Path) -> SosensConfig {
    let data = dir.join("crops.csv");
    fs::write(&data, dataset_csv()).unwrap();
    let mut config = SosensConfig::default();
    config.dataset.path = data;
    config.models_dir = dir.join("models");
    config.outputs_dir = dir.join("outputs");
    config.training.n_trees = 25;
    config
}

fn train(dir: &Path) -> SosensConfig {
    let config = config(dir);
    Trainer::new(config.clone()).run().unwrap();
    config
}

fn payload(values: [f64; 4]) -> PredictionRequest {
    FEATURES
        .iter()
        .zip(values)
        .map(|(name, v)| (name.to_string(), json!(v)))
        .collect()
}

fn service(config: &SosensConfig) -> PredictionService {
    PredictionService::from_store(&ArtifactStore::new(&config.models_dir))
}

/// Prepíše artefakt novým obsahom s rovnakým run id, ako mal pôvodný súbor
fn reseal<T: Serialize>(models_dir: &Path, kind: ArtifactKind, value: &T) {
    let path = models_dir.join(kind.file_name());
    let old = StoredArtifact::from_bytes(&fs::read(&path).unwrap()).unwrap();
    let sealed = StoredArtifact::seal(kind, old.header.run, value).unwrap();
    assert_ne!(sealed.header.checksum, old.header.checksum);
    fs::write(&path, sealed.to_bytes().unwrap()).unwrap();
}

fn assert_unavailable(service: &PredictionService) {
    let err = service.predict(&payload(row(0, 2))).unwrap_err();
    assert!(matches!(err, PredictionError::ServiceUnavailable(_)), "{:?}", err);
    assert_eq!(err.status_code(), 503);
}

#[test]
fn train_persist_load_predict_cycle() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());

    for file in [REPORT_FILE, IMPORTANCES_FILE, CORRELATION_FILE] {
        assert!(config.outputs_dir.join(file).exists(), "{} missing", file);
    }
    for kind in ArtifactKind::ALL {
        assert!(config.models_dir.join(kind.file_name()).exists());
    }
    assert!(config.models_dir.join(MANIFEST_FILE).exists());
    let report = fs::read_to_string(config.outputs_dir.join(REPORT_FILE)).unwrap();
    assert!(report.contains("Accuracy"));

    let service = service(&config);
    let status = service.status();
    assert!(status.ready, "issues: {:?}, failures: {:?}", status.issues, status.failures);
    assert!(!status.using_fallback);
    assert_eq!(status.class_count, Some(3));

    let schema = service.feature_schema();
    assert_eq!(schema.feature_names, FEATURES);
    assert_eq!(schema.feature_names.len(), status.feature_count);
    assert!(schema.note.is_none());

    let classes = service.classes().unwrap().to_vec();
    assert_eq!(classes, ["lentil", "maize", "rice"]);

    for (c, (name, ..)) in CROPS.iter().enumerate() {
        let response = service.predict(&payload(row(c, 3))).unwrap();
        assert_eq!(&response.predicted_label, name);
        assert!(classes.contains(&response.predicted_label));
        assert_eq!(classes[response.predicted_label_index], response.predicted_label);

        let confidence = response.confidence.unwrap();
        assert!(confidence >= 1.0 / 3.0);

        let top3 = response.top3.unwrap();
        assert_eq!(top3.len(), 3);
        assert_eq!(top3[0].label, response.predicted_label);
        assert_eq!(top3[0].prob, confidence);
        assert!(top3.windows(2).all(|w| w[0].prob >= w[1].prob));
    }
}

#[test]
fn retraining_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let a = train(first.path());
    let b = train(second.path());

    let loaded_a = ArtifactStore::new(&a.models_dir).load();
    let loaded_b = ArtifactStore::new(&b.models_dir).load();

    let scaler_a = &loaded_a.scaler.as_ref().unwrap().value;
    let scaler_b = &loaded_b.scaler.as_ref().unwrap().value;
    assert_eq!(scaler_a, scaler_b);
    assert_eq!(
        loaded_a.label_encoder.as_ref().unwrap().value,
        loaded_b.label_encoder.as_ref().unwrap().value
    );
    assert_eq!(loaded_a.classifier.as_ref().unwrap().value, loaded_b.classifier.as_ref().unwrap().value);
    assert_ne!(loaded_a.reference_run(), loaded_b.reference_run());

    let service_a = PredictionService::from_loaded(loaded_a, None);
    let service_b = PredictionService::from_loaded(loaded_b, None);
    for c in 0..CROPS.len() {
        for i in [0, 6, 14] {
            let request = payload(row(c, i));
            assert_eq!(service_a.predict(&request).unwrap(), service_b.predict(&request).unwrap());
        }
    }
}

#[test]
fn missing_key_is_client_error_naming_key() {
    let dir = TempDir::new().unwrap();
    let service = service(&train(dir.path()));

    let mut request = payload(row(0, 1));
    request.remove("K");
    let err = service.predict(&request).unwrap_err();
    assert_eq!(err, PredictionError::MissingFeature("K".to_string()));
    assert!(err.is_client_error());
    assert_eq!(err.status_code(), 400);

    let mut request = payload(row(0, 1));
    request.insert("Ph".to_string(), Value::Bool(true));
    let err = service.predict(&request).unwrap_err();
    assert_eq!(err.feature(), Some("Ph"));

    let mut request = payload(row(0, 1));
    request.insert("Ph".to_string(), json!("6.1"));
    request.insert("unused".to_string(), json!("x"));
    assert_eq!(service.predict(&request).unwrap().predicted_label, "rice");
}

#[test]
fn missing_mandatory_artifact_blocks_every_prediction() {
    for kind in [ArtifactKind::Classifier, ArtifactKind::Scaler, ArtifactKind::LabelEncoder] {
        let dir = TempDir::new().unwrap();
        let config = train(dir.path());
        fs::remove_file(config.models_dir.join(kind.file_name())).unwrap();

        let service = service(&config);
        assert!(!service.status().ready);
        assert!(service.status().failures.iter().any(|f| f.kind == kind));

        for request in [payload(row(0, 2)), PredictionRequest::new()] {
            let err = service.predict(&request).unwrap_err();
            assert!(matches!(err, PredictionError::ServiceUnavailable(_)), "{:?}", err);
            assert_eq!(err.status_code(), 503);
        }
    }
}

#[test]
fn corrupted_artifact_fails_checksum() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    let path = config.models_dir.join(ArtifactKind::Classifier.file_name());
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&path, bytes).unwrap();

    let loaded = ArtifactStore::new(&config.models_dir).load();
    let failure = loaded.failure(ArtifactKind::Classifier).unwrap();
    assert!(failure.reason.contains("Checksum"), "{}", failure.reason);
    assert!(loaded.scaler.is_some());

    let service = PredictionService::from_loaded(loaded, None);
    assert!(!service.status().model_loaded);
    assert!(matches!(service.predict(&payload(row(1, 1))), Err(PredictionError::ServiceUnavailable(_))));
}

#[test]
fn stale_artifact_from_other_run_is_rejected() {
    let current = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let config = train(current.path());
    let other_config = train(other.path());

    let file = ArtifactKind::Scaler.file_name();
    fs::copy(other_config.models_dir.join(file), config.models_dir.join(file)).unwrap();

    let loaded = ArtifactStore::new(&config.models_dir).load();
    assert!(loaded.scaler.is_none());
    let failure = loaded.failure(ArtifactKind::Scaler).unwrap();
    assert!(failure.reason.contains("stale"), "{}", failure.reason);
    assert!(loaded.classifier.is_some());

    let service = PredictionService::from_loaded(loaded, None);
    assert!(matches!(service.predict(&payload(row(0, 0))), Err(PredictionError::ServiceUnavailable(_))));
}

#[test]
fn missing_manifest_links_artifacts_by_run_id() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    fs::remove_file(config.models_dir.join(MANIFEST_FILE)).unwrap();

    let service = service(&config);
    let status = service.status();
    assert!(status.ready);
    assert!(!status.manifest_loaded);
    assert!(!status.notes.is_empty());
    assert_eq!(service.predict(&payload(row(2, 4))).unwrap().predicted_label, "lentil");
}

#[test]
fn missing_feature_names_fall_back_and_block_prediction() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    fs::remove_file(config.models_dir.join(ArtifactKind::FeatureNames.file_name())).unwrap();

    let service = service(&config);
    let status = service.status();
    assert!(status.using_fallback);
    assert!(!status.feature_names_available);
    assert_eq!(status.feature_count, 14);
    assert!(service.feature_schema().note.is_some());

    // 14 záložných názvov nesedí so scalerom natrénovaným na 4 príznakoch
    let err = service.predict(&payload(row(0, 0))).unwrap_err();
    assert!(matches!(err, PredictionError::ServiceUnavailable(_)));
}

#[test]
fn missing_target_writes_no_artifacts() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("soil.csv");
    fs::write(&data, "N,P,K\n1,2,3\n4,5,6\n").unwrap();

    let trainer = TrainerBuilder::new()
        .dataset(&data)
        .models_dir(dir.path().join("models"))
        .outputs_dir(dir.path().join("outputs"))
        .build()
        .unwrap();
    let err = trainer.run().unwrap_err();
    assert!(matches!(err, SosensError::Config(_)), "{}", err);
    assert!(!dir.path().join("models").exists());
    assert!(!dir.path().join("outputs").exists());
}

#[test]
fn json_dataset_trains_like_csv() {
    let dir = TempDir::new().unwrap();
    let mut rows = Vec::new();
    for i in 0..10 {
        for (c, (name, ..)) in CROPS.iter().enumerate() {
            let v = row(c, i);
            rows.push(json!({"N": v[0], "P": v[1], "K": v[2], "Ph": v[3], "Crop": name}));
        }
    }
    let data = dir.path().join("crops.json");
    fs::write(&data, serde_json::to_string(&rows).unwrap()).unwrap();

    let outcome = TrainerBuilder::new()
        .dataset(&data)
        .target_column("Crop")
        .n_trees(10)
        .models_dir(dir.path().join("models"))
        .outputs_dir(dir.path().join("outputs"))
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(outcome.manifest.feature_count, 4);
    assert_eq!(outcome.manifest.classes, ["lentil", "maize", "rice"]);
    assert_eq!(outcome.manifest.summary.as_ref().unwrap().n_samples, 30);
}

#[test]
fn concurrent_predictions_agree() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(service(&train(dir.path())));
    let expected = service.predict(&payload(row(1, 9))).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..20).map(|_| service.predict(&payload(row(1, 9))).unwrap()).collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for response in handle.join().unwrap() {
            assert_eq!(response, expected);
        }
    }
}

#[test]
fn class_count_mismatch_marks_bundle_inconsistent() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    // Bez manifestu rozhoduje iba run id, takže prepísaný encoder sa načíta
    fs::remove_file(config.models_dir.join(MANIFEST_FILE)).unwrap();
    let encoder = LabelEncoder::fit(&["a", "b", "c", "d"]).unwrap();
    reseal(&config.models_dir, ArtifactKind::LabelEncoder, &encoder);

    let loaded = ArtifactStore::new(&config.models_dir).load();
    assert!(loaded.failures.is_empty(), "{:?}", loaded.failures);
    assert!(loaded.label_encoder.is_some());
    assert!(!loaded.is_consistent());

    let service = PredictionService::from_loaded(loaded, None);
    let status = service.status();
    assert!(!status.ready);
    assert!(
        status.issues.iter().any(|i| i == "label encoder has 4 classes, classifier predicts 3"),
        "{:?}",
        status.issues
    );
    assert_unavailable(&service);
}

#[test]
fn scaler_width_mismatch_marks_bundle_inconsistent() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    fs::remove_file(config.models_dir.join(MANIFEST_FILE)).unwrap();
    let narrow = ScalerState { mean: vec![0.0; 3], scale: vec![1.0; 3], n_samples_seen: 10 };
    reseal(&config.models_dir, ArtifactKind::Scaler, &narrow);

    let service = service(&config);
    let issues = &service.status().issues;
    assert!(issues.iter().any(|i| i == "classifier expects 4 features, scaler has 3"), "{:?}", issues);
    assert!(issues.iter().any(|i| i == "feature set has 4 names, scaler has 3"), "{:?}", issues);
    assert_unavailable(&service);
}

#[test]
fn same_run_artifact_with_foreign_checksum_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    let loaded = ArtifactStore::new(&config.models_dir).load();
    let mut scaler = loaded.scaler.unwrap().value;
    scaler.mean[0] += 1.0;
    reseal(&config.models_dir, ArtifactKind::Scaler, &scaler);

    let loaded = ArtifactStore::new(&config.models_dir).load();
    assert!(loaded.scaler.is_none());
    let failure = loaded.failure(ArtifactKind::Scaler).unwrap();
    assert!(failure.reason.contains("differs from manifest"), "{}", failure.reason);
    assert!(loaded.classifier.is_some() && loaded.label_encoder.is_some() && loaded.features.is_some());

    let service = PredictionService::from_loaded(loaded, None);
    assert!(!service.status().scaler_loaded);
    assert_unavailable(&service);
}

#[test]
fn manifest_shape_mismatch_marks_bundle_inconsistent() {
    let dir = TempDir::new().unwrap();
    let config = train(dir.path());
    let path = config.models_dir.join(MANIFEST_FILE);
    let mut manifest: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    manifest["feature_count"] = json!(5);
    manifest["classes"] = json!(["lentil", "maize", "wheat"]);
    fs::write(&path, serde_json::to_string(&manifest).unwrap()).unwrap();

    let service = service(&config);
    let issues = &service.status().issues;
    assert!(issues.iter().any(|i| i == "manifest lists 5 features, artifacts have 4"), "{:?}", issues);
    assert!(issues.iter().any(|i| i == "label encoder classes differ from manifest"), "{:?}", issues);
    assert!(service.status().failures.is_empty());
    assert_unavailable(&service);
}
