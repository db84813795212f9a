use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{PredictionResponse, RiskFactor, RiskLevel, StudentProfile};

pub const NO_FACTORS_MESSAGE: &str = "No se detectaron factores de riesgo críticos";

/// Needle position for a 0-100 probability: 0 → -90°, 50 → 0°, 100 → 90°.
pub fn gauge_angle(probability: f64) -> f64 {
    -90.0 + probability * 1.8
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub probability: f64,
    pub angle_deg: f64,
    pub readout: String,
}

impl Gauge {
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            angle_deg: gauge_angle(probability),
            readout: format!("{probability:.1}%"),
        }
    }

    pub fn needle_transform(&self) -> String {
        format!("translateX(-50%) rotate({:.2}deg)", self.angle_deg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub level: RiskLevel,
    pub text: &'static str,
    pub class: &'static str,
    pub color: &'static str,
}

impl Badge {
    /// Anything that is not BAJO or MEDIO is presented as ALTO.
    pub fn for_level(level: &RiskLevel) -> Self {
        let (text, class, color) = match level {
            RiskLevel::Low => ("RIESGO BAJO", "bajo", "#10b981"),
            RiskLevel::Medium => ("RIESGO MEDIO", "medio", "#f59e0b"),
            RiskLevel::High | RiskLevel::Unrecognized(_) => ("RIESGO ALTO", "alto", "#ef4444"),
        };
        Self {
            level: level.clone(),
            text,
            class,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorCard {
    pub name: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FactorsPanel {
    Empty,
    Cards(Vec<FactorCard>),
}

impl FactorsPanel {
    pub fn from_factors(factors: &[RiskFactor]) -> Self {
        if factors.is_empty() {
            return FactorsPanel::Empty;
        }
        FactorsPanel::Cards(
            factors
                .iter()
                .map(|factor| FactorCard {
                    name: factor.factor.clone(),
                    value: format!("Valor: {}", factor.valor),
                    description: factor.descripcion.clone(),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub label: &'static str,
    pub value: String,
}

pub fn profile_rows(profile: &StudentProfile) -> Vec<ProfileRow> {
    vec![
        ProfileRow {
            label: "Edad",
            value: format!("{} años", profile.edad),
        },
        ProfileRow {
            label: "Promedio",
            value: format!("{:.2}", profile.promedio),
        },
        ProfileRow {
            label: "Tasa Aprobación",
            value: profile.tasa_aprobacion.clone(),
        },
        ProfileRow {
            label: "Rezago",
            value: format!("{:.1} periodos", profile.rezago),
        },
        ProfileRow {
            label: "Periodos Cursados",
            value: profile.periodos.to_string(),
        },
        ProfileRow {
            label: "Programa",
            value: profile.programa.clone(),
        },
    ]
}

/// Everything the results region shows, derived from one response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub gauge: Gauge,
    pub badge: Badge,
    pub recommendation: String,
    pub factors: FactorsPanel,
    pub profile: Vec<ProfileRow>,
}

impl ResultView {
    pub fn from_response(response: &PredictionResponse) -> Self {
        Self {
            gauge: Gauge::new(response.prediccion.probabilidad),
            badge: Badge::for_level(&response.prediccion.nivel_riesgo),
            recommendation: response.recomendacion.clone(),
            factors: FactorsPanel::from_factors(&response.factores_riesgo),
            profile: profile_rows(&response.perfil),
        }
    }
}

pub fn render_text(view: &ResultView) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Probabilidad de deserción: {} [{}]",
        view.gauge.readout, view.badge.text
    );
    let _ = writeln!(output, "Recomendación: {}", view.recommendation);
    let _ = writeln!(output);
    let _ = writeln!(output, "Factores de riesgo:");

    match &view.factors {
        FactorsPanel::Empty => {
            let _ = writeln!(output, "  {NO_FACTORS_MESSAGE}");
        }
        FactorsPanel::Cards(cards) => {
            for card in cards {
                let _ = writeln!(
                    output,
                    "  - {} ({}): {}",
                    card.name, card.value, card.description
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Perfil del estudiante:");
    for row in &view.profile {
        let _ = writeln!(output, "  {:<18} {}", row.label, row.value);
    }

    output
}

fn escape_html(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

/// Results card markup. Service-supplied text is escaped.
pub fn render_html(view: &ResultView) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "<div id=\"results-card\">");
    let _ = writeln!(
        output,
        "  <div id=\"gauge-needle\" style=\"transform: {}\"></div>",
        view.gauge.needle_transform()
    );
    let _ = writeln!(
        output,
        "  <div id=\"probability-value\">{}</div>",
        view.gauge.readout
    );
    let _ = writeln!(
        output,
        "  <div id=\"risk-badge\" class=\"{}\">{}</div>",
        view.badge.class, view.badge.text
    );
    let _ = writeln!(
        output,
        "  <p id=\"risk-recommendation\">{}</p>",
        escape_html(&view.recommendation)
    );

    let _ = writeln!(output, "  <div id=\"risk-factors-list\">");
    match &view.factors {
        FactorsPanel::Empty => {
            let _ = writeln!(output, "    <p class=\"no-factors\">{NO_FACTORS_MESSAGE}</p>");
        }
        FactorsPanel::Cards(cards) => {
            for card in cards {
                let _ = writeln!(output, "    <div class=\"factor-item\">");
                let _ = writeln!(
                    output,
                    "      <div class=\"factor-name\">{}</div>",
                    escape_html(&card.name)
                );
                let _ = writeln!(
                    output,
                    "      <div class=\"factor-value\">{}</div>",
                    escape_html(&card.value)
                );
                let _ = writeln!(
                    output,
                    "      <div class=\"factor-description\">{}</div>",
                    escape_html(&card.description)
                );
                let _ = writeln!(output, "    </div>");
            }
        }
    }
    let _ = writeln!(output, "  </div>");

    let _ = writeln!(output, "  <div id=\"student-profile\">");
    for row in &view.profile {
        let _ = writeln!(output, "    <div class=\"profile-item\">");
        let _ = writeln!(output, "      <div class=\"profile-label\">{}</div>", row.label);
        let _ = writeln!(
            output,
            "      <div class=\"profile-value\">{}</div>",
            escape_html(&row.value)
        );
        let _ = writeln!(output, "    </div>");
    }
    let _ = writeln!(output, "  </div>");
    let _ = writeln!(output, "</div>");

    output
}

pub fn build_report(
    view: &ResultView,
    response: &PredictionResponse,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Dropout Risk Assessment");
    let _ = writeln!(
        output,
        "Generated {} for {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        response.perfil.programa
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Prediction");
    let _ = writeln!(
        output,
        "- Probability: {} (needle at {:.2}°)",
        view.gauge.readout, view.gauge.angle_deg
    );
    let _ = writeln!(output, "- Risk level: {}", view.badge.text);
    if let Some(dropout) = response.prediccion.desertor {
        let _ = writeln!(
            output,
            "- Classified as dropout: {}",
            if dropout { "yes" } else { "no" }
        );
    }
    if let Some(metadata) = &response.metadata {
        if let Some(model) = &metadata.modelo {
            let _ = writeln!(output, "- Model: {model}");
        }
        if let Some(threshold) = metadata.threshold {
            let _ = writeln!(output, "- Decision threshold: {threshold:.2}");
        }
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendation");
    let _ = writeln!(output, "{}", view.recommendation);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Factors");

    match &view.factors {
        FactorsPanel::Empty => {
            let _ = writeln!(output, "{NO_FACTORS_MESSAGE}");
        }
        FactorsPanel::Cards(cards) => {
            for card in cards {
                let _ = writeln!(
                    output,
                    "- **{}** ({}): {}",
                    card.name, card.value, card.description
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Profile");
    let _ = writeln!(output, "| Field | Value |");
    let _ = writeln!(output, "|---|---|");
    for row in &view.profile {
        let _ = writeln!(output, "| {} | {} |", row.label, row.value);
    }

    output
}
