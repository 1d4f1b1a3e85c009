use std::fs;
use std::path::{Path, PathBuf};

use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::info;

use super::split::{stratified_split, Split};
use crate::artifacts::{ArtifactBundle, ArtifactStore, BundleManifest, StoredFeatures, TrainingRun, TrainingSummary};
use crate::config::SosensConfig;
use crate::data_loading::{DataLoaderFactory, Dataset};
use crate::error::{Result, SosensError};
use crate::evaluation::{analysis, EvaluationReport, ModelEvaluator};
use crate::feature_selection::FeatureSelector;
use crate::models::{Classifier, RandomForestClassifier, RandomForestParameters};
use crate::processing::{LabelEncoder, StandardScaler};
use crate::target_analysis::TargetSelectorFactory;

pub const REPORT_FILE: &str = "classification_report.txt";
pub const IMPORTANCES_FILE: &str = "feature_importances.csv";
pub const CORRELATION_FILE: &str = "correlation_matrix.csv";

/// Natrénovaný, zatiaľ neuložený výsledok jedného behu
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub bundle: ArtifactBundle,
    pub report: EvaluationReport,
    pub importances: Vec<(String, f64)>,
    pub correlation: Vec<Vec<f64>>,
    pub split: Split,
}

/// Výsledok behu po zápise artefaktov a reportov
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub manifest: BundleManifest,
    pub report: EvaluationReport,
    pub importances: Vec<(String, f64)>,
    pub models_dir: PathBuf,
    pub report_paths: Vec<PathBuf>,
}

impl TrainingOutcome {
    pub fn run(&self) -> TrainingRun {
        self.manifest.run
    }
}

/// Offline tréning: dataset -> výber príznakov -> scaler, encoder, les -> artefakty
pub struct Trainer {
    config: SosensConfig,
}

impl Trainer {
    pub fn new(config: SosensConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SosensConfig {
        &self.config
    }

    /// Načíta dataset z konfigurovanej cesty a spustí celý beh
    pub fn run(&self) -> Result<TrainingOutcome> {
        let path = &self.config.dataset.path;
        let loader = DataLoaderFactory::for_path(path)?;
        let dataset = loader.load_from_path(path)?;
        self.run_on(&dataset)
    }

    /// Natrénuje model, uloží artefakty a až po úspešnom uložení zapíše reporty.
    /// Chyba pred zápisom nechá adresáre nedotknuté.
    pub fn run_on(&self, dataset: &Dataset) -> Result<TrainingOutcome> {
        let fitted = self.fit(dataset)?;

        let store = ArtifactStore::new(&self.config.models_dir);
        let manifest = store.save(&fitted.bundle)?;
        let report_paths = self.write_reports(&fitted)?;

        info!(
            run_id = %manifest.run.run_id,
            accuracy = fitted.report.accuracy,
            models_dir = %store.dir().display(),
            "training finished"
        );

        Ok(TrainingOutcome {
            manifest,
            report: fitted.report,
            importances: fitted.importances,
            models_dir: self.config.models_dir.clone(),
            report_paths,
        })
    }

    /// Tréning v pamäti, bez zápisu na disk
    pub fn fit(&self, dataset: &Dataset) -> Result<FittedModel> {
        let target_selector = TargetSelectorFactory::from_config(&self.config.dataset);
        let target_idx = target_selector.select(dataset)?;

        let selected = FeatureSelector::from_config(&self.config.dataset).select(dataset, target_idx)?;

        let label_encoder = LabelEncoder::fit(&selected.labels)?;
        let y = label_encoder.transform(&selected.labels)?;
        info!(classes = label_encoder.len(), target = %selected.target, "label encoder fitted");
        if label_encoder.len() < 2 {
            return Err(SosensError::Training(format!(
                "target '{}' has a single class; at least 2 are needed",
                selected.target
            )));
        }

        let scaler = StandardScaler::fit(&selected.x)?;
        let scaled: Vec<Vec<f64>> =
            selected.rows.iter().map(|row| scaler.transform_row(row)).collect::<Result<_>>()?;

        let training = &self.config.training;
        let split = stratified_split(&y, label_encoder.len(), training.test_fraction, training.seed)?;
        info!(train = split.train.len(), test = split.test.len(), "stratified split");

        let (x_train, y_train) = Self::subset(&scaled, &y, &split.train)?;
        let (x_test, y_test) = Self::subset(&scaled, &y, &split.test)?;

        let params = RandomForestParameters::from_config(training);
        let classifier = RandomForestClassifier::fit(&x_train, &y_train, label_encoder.len(), params)?;

        let y_pred = classifier.predict(&x_test)?;
        let report = ModelEvaluator::evaluate_classification(
            &y_test,
            &y_pred,
            label_encoder.classes(),
            classifier.get_name(),
        );
        info!(accuracy = report.accuracy, samples = report.samples(), "evaluated on held-out split");

        let importances =
            analysis::ranked_importances(selected.feature_set.names(), classifier.feature_importances());
        let correlation = analysis::correlation_matrix(&selected.rows);

        let summary = TrainingSummary {
            dataset: Some(self.config.dataset.path.display().to_string()),
            target: selected.target.clone(),
            n_samples: y.len(),
            n_train: split.train.len(),
            n_test: split.test.len(),
            dropped_rows: selected.dropped_rows,
            accuracy: report.accuracy,
        };

        let bundle = ArtifactBundle {
            run: TrainingRun::new(),
            features: StoredFeatures {
                feature_set: selected.feature_set,
                imputation: Some(selected.imputation),
            },
            scaler,
            label_encoder,
            classifier,
            summary: Some(summary),
        };

        Ok(FittedModel { bundle, report, importances, correlation, split })
    }

    fn subset(rows: &[Vec<f64>], y: &[usize], idx: &[usize]) -> Result<(DenseMatrix<f64>, Vec<usize>)> {
        let picked: Vec<Vec<f64>> = idx.iter().map(|&i| rows[i].clone()).collect();
        let x = DenseMatrix::from_2d_vec(&picked).map_err(|e| SosensError::Matrix(e.to_string()))?;
        Ok((x, idx.iter().map(|&i| y[i]).collect()))
    }

    fn write_reports(&self, fitted: &FittedModel) -> Result<Vec<PathBuf>> {
        let dir: &Path = &self.config.outputs_dir;
        fs::create_dir_all(dir)?;

        let report_path = dir.join(REPORT_FILE);
        fs::write(&report_path, fitted.report.to_text())?;

        let importances_path = dir.join(IMPORTANCES_FILE);
        analysis::write_feature_importances_csv(&importances_path, &fitted.importances)?;

        let correlation_path = dir.join(CORRELATION_FILE);
        analysis::write_correlation_csv(
            &correlation_path,
            fitted.bundle.features.feature_set.names(),
            &fitted.correlation,
        )?;

        info!(dir = %dir.display(), "wrote training reports");
        Ok(vec![report_path, importances_path, correlation_path])
    }
}
