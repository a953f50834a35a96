// src/classifier/linear.rs
//! Multinomial logistic model loaded from a JSON artifact.
//!
//! The artifact bundles the standard scaler, the gender label encoder and the
//! per-class weights. Inference: standardize → linear logits → softmax.

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use super::{Classifier, FeatureVector, GenderEncoder, HealthStatus, Probabilities, FEATURE_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk artifact format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    pub feature_columns: Vec<String>,
    /// Class label per row of `coefficients` (any order).
    pub classes: Vec<String>,
    #[serde(default = "default_gender_classes")]
    pub gender_classes: Vec<String>,
    pub scaler: ScalerParams,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

fn default_name() -> String {
    "linear".to_string()
}

fn default_gender_classes() -> Vec<String> {
    vec!["Female".to_string(), "Male".to_string()]
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    gender: GenderEncoder,
    mean: [f64; 7],
    scale: [f64; 7],
    /// Rows in `HealthStatus::index()` order.
    weights: [[f64; 7]; 3],
    bias: [f64; 3],
}

fn to_array7(v: &[f64], what: &str) -> Result<[f64; 7]> {
    let arr: [f64; 7] = v
        .try_into()
        .map_err(|_| anyhow::anyhow!("{what}: expected 7 values, got {}", v.len()))?;
    ensure!(arr.iter().all(|x| x.is_finite()), "{what}: non-finite value");
    Ok(arr)
}

impl LinearModel {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading model artifact {}", path.display()))?;
        let artifact: LinearArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("parsing model artifact {}", path.display()))?;
        let model = Self::from_artifact(artifact)
            .with_context(|| format!("validating model artifact {}", path.display()))?;
        info!(model = %model.name, path = %path.display(), "model artifact loaded");
        Ok(model)
    }

    pub fn from_artifact(a: LinearArtifact) -> Result<Self> {
        ensure!(
            a.feature_columns.iter().map(String::as_str).eq(FEATURE_COLUMNS),
            "feature columns {:?} do not match {:?}",
            a.feature_columns,
            FEATURE_COLUMNS
        );
        ensure!(
            a.classes.len() == 3 && a.coefficients.len() == 3 && a.intercepts.len() == 3,
            "expected 3 classes, coefficient rows and intercepts"
        );

        let mean = to_array7(&a.scaler.mean, "scaler.mean")?;
        let scale = to_array7(&a.scaler.scale, "scaler.scale")?;

        let mut weights = [[0.0; 7]; 3];
        let mut bias = [0.0; 3];
        let mut seen = [false; 3];
        for (row, label) in a.classes.iter().enumerate() {
            let Some(status) = HealthStatus::parse(label) else {
                bail!("unknown class label '{label}'");
            };
            let i = status.index();
            ensure!(!seen[i], "duplicate class label '{label}'");
            seen[i] = true;
            weights[i] = to_array7(&a.coefficients[row], "coefficients")?;
            bias[i] = a.intercepts[row];
        }
        ensure!(bias.iter().all(|b| b.is_finite()), "intercepts: non-finite value");

        Ok(Self {
            name: a.name,
            gender: GenderEncoder::new(a.gender_classes),
            mean,
            scale,
            weights,
            bias,
        })
    }

    fn standardize(&self, x: &FeatureVector) -> [f64; 7] {
        let mut z = [0.0; 7];
        for (j, v) in x.0.iter().enumerate() {
            // A zero-variance column is centered but not scaled.
            let s = if self.scale[j] == 0.0 { 1.0 } else { self.scale[j] };
            z[j] = (v - self.mean[j]) / s;
        }
        z
    }
}

fn softmax(logits: [f64; 3]) -> [f64; 3] {
    let m = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp = logits.map(|l| (l - m).exp());
    let sum: f64 = exp.iter().sum();
    exp.map(|e| e / sum)
}

impl Classifier for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn gender_encoder(&self) -> &GenderEncoder {
        &self.gender
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities> {
        ensure!(
            features.0.iter().all(|v| v.is_finite()),
            "feature vector contains non-finite values"
        );
        let z = self.standardize(features);
        let mut logits = [0.0; 3];
        for (k, l) in logits.iter_mut().enumerate() {
            *l = self.bias[k] + self.weights[k].iter().zip(z.iter()).map(|(w, x)| w * x).sum::<f64>();
        }
        Ok(Probabilities::from_indexed(softmax(logits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> LinearArtifact {
        serde_json::from_str(include_str!("../../model/mental_health_model.json")).unwrap()
    }

    #[test]
    fn bundled_artifact_loads() {
        let m = LinearModel::from_artifact(artifact()).unwrap();
        assert_eq!(m.name(), "mental-health-logreg-v1");
        assert_eq!(m.gender_encoder().transform("Male").unwrap(), 1.0);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let m = LinearModel::from_artifact(artifact()).unwrap();
        let p = m
            .predict_proba(&FeatureVector([0.5, 60.0, 7.0, 8000.0, 35.0, 1.0, 8.0]))
            .unwrap();
        let sum = p.low + p.moderate + p.high;
        assert!((sum - 1.0).abs() < 1e-12);
        assert!([p.low, p.moderate, p.high].iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn class_rows_are_reordered_by_label() {
        let m = LinearModel::from_artifact(artifact()).unwrap();
        let good = FeatureVector([0.95, 90.0, 8.0, 12000.0, 30.0, 0.0, 6.0]);
        let bad = FeatureVector([0.05, 20.0, 4.0, 1000.0, 35.0, 1.0, 14.0]);
        assert_eq!(m.predict(&good).unwrap(), HealthStatus::High);
        assert_eq!(m.predict(&bad).unwrap(), HealthStatus::Low);
        assert!(m.predict_proba(&bad).unwrap().low > 0.8);
    }

    #[test]
    fn rejects_malformed_artifacts() {
        let mut a = artifact();
        a.scaler.mean.pop();
        assert!(LinearModel::from_artifact(a).is_err());

        let mut a = artifact();
        a.classes[0] = "Excellent".into();
        assert!(LinearModel::from_artifact(a).is_err());

        let mut a = artifact();
        a.classes[0] = "Low".into();
        assert!(LinearModel::from_artifact(a).is_err());

        let mut a = artifact();
        a.feature_columns.swap(0, 1);
        assert!(LinearModel::from_artifact(a).is_err());
    }

    #[test]
    fn non_finite_features_are_an_error() {
        let m = LinearModel::from_artifact(artifact()).unwrap();
        let x = FeatureVector([f64::NAN, 60.0, 7.0, 8000.0, 35.0, 1.0, 8.0]);
        assert!(m.predict_proba(&x).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LinearModel::from_path("does/not/exist.json").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
