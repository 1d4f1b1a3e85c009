use serde_json::{Map, Value};

use crate::error::PredictionError;
use crate::feature_selection::FeatureSet;

/// Požiadavka na predikciu: plochá mapa názov príznaku -> hodnota
pub type PredictionRequest = Map<String, Value>;

/// Parsuje telo požiadavky; musí to byť JSON objekt
pub fn parse_request(text: &str) -> Result<PredictionRequest, PredictionError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PredictionError::InvalidPayload("expected a JSON object".to_string())),
        Err(e) => Err(PredictionError::InvalidPayload(format!("malformed JSON: {}", e))),
    }
}

/// Číselná hodnota z JSON: číslo alebo reťazec s konečným číslom
pub fn numeric_value(feature: &str, value: &Value) -> Result<f64, PredictionError> {
    let invalid = |reason: String| PredictionError::InvalidValue {
        feature: feature.to_string(),
        reason,
    };
    let parsed = match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(format!("{} is not representable as f64", n)))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", s)))?,
        Value::Null => return Err(invalid("null".to_string())),
        Value::Bool(_) => return Err(invalid("expected a number, got a boolean".to_string())),
        Value::Array(_) | Value::Object(_) => return Err(invalid("expected a number".to_string())),
    };
    if !parsed.is_finite() {
        return Err(invalid(format!("{} is not finite", parsed)));
    }
    Ok(parsed)
}

/// Vektor hodnôt v poradí FeatureSet; ďalšie kľúče sa ignorujú
pub fn extract_features(features: &FeatureSet, payload: &PredictionRequest) -> Result<Vec<f64>, PredictionError> {
    features
        .iter()
        .map(|name| {
            let value = payload
                .get(name)
                .ok_or_else(|| PredictionError::MissingFeature(name.to_string()))?;
            numeric_value(name, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn features() -> FeatureSet {
        FeatureSet::new(vec!["N".into(), "Ph".into()]).unwrap()
    }

    fn request(value: Value) -> PredictionRequest {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn request_must_be_json_object() {
        assert_eq!(parse_request(r#"{"N": 1}"#).unwrap().len(), 1);
        for bad in ["[1, 2]", "42", "{not json"] {
            let err = parse_request(bad).unwrap_err();
            assert!(matches!(err, PredictionError::InvalidPayload(_)), "{}", bad);
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn extracts_in_feature_order() {
        let payload = request(json!({"Ph": "6.5", "N": 40, "extra": true}));
        assert_eq!(extract_features(&features(), &payload).unwrap(), vec![40.0, 6.5]);
    }

    #[test]
    fn missing_key_is_named() {
        let payload = request(json!({"N": 40}));
        let err = extract_features(&features(), &payload).unwrap_err();
        assert_eq!(err, PredictionError::MissingFeature("Ph".to_string()));
        assert!(err.is_client_error());
    }

    #[test]
    fn rejects_non_numeric_values() {
        for bad in [json!(null), json!(true), json!("abc"), json!([1]), json!("inf"), json!({"v": 1})] {
            let payload = request(json!({"N": 1, "Ph": bad}));
            let err = extract_features(&features(), &payload).unwrap_err();
            assert_eq!(err.feature(), Some("Ph"));
        }
    }
}
