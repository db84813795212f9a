use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub codigo: String,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramDirectory {
    pub programas: Vec<Program>,
}

/// Body of `POST /predict`. Field order and names follow the service contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub edad_ingreso: i64,
    pub sexo: String,
    pub estrato: i64,
    pub programa: String,
    pub promedio_historico: f64,
    pub creditos_maximos: i64,
    pub total_periodos: i64,
    /// Fraction in `0.0..=1.0`.
    pub tasa_aprobacion_media: f64,
    pub rezago_final: f64,
    pub ha_estado_fuera: i64,
    pub tiene_beca: i64,
    pub naturaleza_colegio: String,
    pub calendario: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "BAJO" | "LOW" => RiskLevel::Low,
            "MEDIO" | "MEDIUM" => RiskLevel::Medium,
            "ALTO" | "HIGH" => RiskLevel::High,
            _ => RiskLevel::Unrecognized(value),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => "BAJO".to_string(),
            RiskLevel::Medium => "MEDIO".to_string(),
            RiskLevel::High => "ALTO".to_string(),
            RiskLevel::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub probabilidad: f64,
    pub nivel_riesgo: RiskLevel,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub desertor: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    #[serde(deserialize_with = "display_text")]
    pub valor: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub edad: i64,
    pub promedio: f64,
    #[serde(deserialize_with = "display_text")]
    pub tasa_aprobacion: String,
    pub rezago: f64,
    pub periodos: i64,
    pub programa: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionMetadata {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub modelo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediccion: Prediction,
    pub recomendacion: String,
    #[serde(default)]
    pub factores_riesgo: Vec<RiskFactor>,
    pub perfil: StudentProfile,
    #[serde(default)]
    pub metadata: Option<PredictionMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub modelo_cargado: bool,
    #[serde(default)]
    pub mapeos_cargados: Option<bool>,
}

impl HealthStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.modelo_cargado
    }
}

/// `GET /` descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub nombre: String,
    pub version: String,
    pub estado: String,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: String,
    pub precision: String,
    pub recall: String,
    pub f1_score: String,
    pub roc_auc: String,
}

/// `GET /info` descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub modelo: String,
    #[serde(default)]
    pub tecnica_balanceo: Option<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub metricas: ModelMetrics,
    #[serde(default)]
    pub interpretacion: BTreeMap<String, String>,
}

/// Error body returned by the service on 4xx/5xx.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub error: String,
    #[serde(default)]
    pub detalle: Option<String>,
    #[serde(default)]
    pub campos: Vec<String>,
}

fn display_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_accepts_spanish_and_english_labels() {
        assert_eq!(RiskLevel::from("BAJO".to_string()), RiskLevel::Low);
        assert_eq!(RiskLevel::from("medium".to_string()), RiskLevel::Medium);
        assert_eq!(RiskLevel::from("ALTO".to_string()), RiskLevel::High);
        assert_eq!(
            RiskLevel::from("CRITICO".to_string()),
            RiskLevel::Unrecognized("CRITICO".to_string())
        );
    }

    #[test]
    fn decodes_service_response_with_numeric_factor_value() {
        let body = r##"{
            "prediccion": {"desertor": true, "probabilidad": 72.3, "nivel_riesgo": "ALTO", "color": "#ef4444"},
            "recomendacion": "Intervención urgente necesaria.",
            "factores_riesgo": [{"factor": "Rezago académico", "valor": 2.5, "descripcion": "Rezago superior a 1 periodo"}],
            "perfil": {"edad": 20, "promedio": 3.5, "tasa_aprobacion": "80%", "rezago": 1.0, "periodos": 4, "programa": "Medicina"},
            "metadata": {"threshold": 0.35, "modelo": "Naive Bayes + SMOTE"}
        }"##;

        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.prediccion.nivel_riesgo, RiskLevel::High);
        assert_eq!(response.factores_riesgo[0].valor, "2.5");
        assert_eq!(response.perfil.tasa_aprobacion, "80%");
        assert_eq!(response.metadata.unwrap().threshold, Some(0.35));
    }

    #[test]
    fn unknown_risk_level_does_not_fail_decoding() {
        let body = r#"{
            "prediccion": {"probabilidad": 10.0, "nivel_riesgo": "???"},
            "recomendacion": "",
            "perfil": {"edad": 18, "promedio": 4.0, "tasa_aprobacion": "95%", "rezago": 0.0, "periodos": 2, "programa": "Derecho"}
        }"#;

        let response: PredictionResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            response.prediccion.nivel_riesgo,
            RiskLevel::Unrecognized(_)
        ));
        assert!(response.factores_riesgo.is_empty());
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let request = PredictionRequest {
            edad_ingreso: 19,
            sexo: "F".to_string(),
            estrato: 3,
            programa: "PRMEDICINA12".to_string(),
            promedio_historico: 3.8,
            creditos_maximos: 18,
            total_periodos: 4,
            tasa_aprobacion_media: 0.85,
            rezago_final: 0.5,
            ha_estado_fuera: 0,
            tiene_beca: 1,
            naturaleza_colegio: "PRIVADO".to_string(),
            calendario: "A".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 13);
        assert!(object["edad_ingreso"].is_i64());
        assert!(object["promedio_historico"].is_f64());
        assert!(object["tasa_aprobacion_media"].is_f64());
        assert_eq!(object["programa"], "PRMEDICINA12");
    }
}
