use crate::directory::ProgramSelect;
use crate::error::{ClientError, FieldError, Result};
use crate::models::PredictionRequest;
use crate::validate::{
    CREDITOS_MAXIMOS, EDAD_INGRESO, PROMEDIO_HISTORICO, REZAGO_FINAL, TASA_APROBACION_MEDIA,
    TOTAL_PERIODOS,
};

/// Raw field values as typed into the prediction form.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub edad_ingreso: String,
    pub sexo: String,
    pub estrato: String,
    pub programa: String,
    pub promedio_historico: String,
    pub creditos_maximos: String,
    pub total_periodos: String,
    /// Percentage, `0..=100`.
    pub tasa_aprobacion_media: String,
    pub rezago_final: String,
    pub ha_estado_fuera: String,
    pub tiene_beca: String,
    pub naturaleza_colegio: String,
    pub calendario: String,
}

const SEXO_OPTIONS: &[&str] = &["M", "F"];
const CALENDARIO_OPTIONS: &[&str] = &["A", "B", "OTRO"];

fn choice(value: &str, options: &[&str]) -> Option<String> {
    let upper = value.trim().to_uppercase();
    options
        .iter()
        .find(|option| **option == upper)
        .map(|option| option.to_string())
}

fn school_type(value: &str) -> Option<String> {
    match value.trim().to_uppercase().as_str() {
        "PUBLICO" | "PÚBLICO" => Some("PÚBLICO".to_string()),
        "PRIVADO" => Some("PRIVADO".to_string()),
        _ => None,
    }
}

fn int_in(value: &str, min: i64, max: i64) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn take<T>(&mut self, field: &'static str, result: std::result::Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldError::new(field, message));
                None
            }
        }
    }
}

impl FormInput {
    /// Parses every field once. Validity messages come back in form order:
    /// ranged fields first, then the choice fields.
    fn parse(&self) -> std::result::Result<PredictionRequest, Vec<FieldError>> {
        let mut c = Collector::default();

        let edad_ingreso = c.take("edad_ingreso", EDAD_INGRESO.check_int(&self.edad_ingreso));
        let promedio_historico = c.take(
            "promedio_historico",
            PROMEDIO_HISTORICO.check(&self.promedio_historico),
        );
        let creditos_maximos = c.take(
            "creditos_maximos",
            CREDITOS_MAXIMOS.check_int(&self.creditos_maximos),
        );
        let tasa_aprobacion_media = c.take(
            "tasa_aprobacion_media",
            TASA_APROBACION_MEDIA.check(&self.tasa_aprobacion_media),
        );
        let rezago_final = c.take("rezago_final", REZAGO_FINAL.check(&self.rezago_final));
        let total_periodos = c.take(
            "total_periodos",
            TOTAL_PERIODOS.check_int(&self.total_periodos),
        );

        let sexo = c.take(
            "sexo",
            choice(&self.sexo, SEXO_OPTIONS).ok_or_else(|| "Seleccione M o F".to_string()),
        );
        let estrato = c.take(
            "estrato",
            int_in(&self.estrato, 1, 6)
                .ok_or_else(|| "El estrato debe estar entre 1 y 6".to_string()),
        );
        let programa = c.take(
            "programa",
            Some(self.programa.trim())
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .ok_or_else(|| "Seleccione un programa".to_string()),
        );
        let ha_estado_fuera = c.take(
            "ha_estado_fuera",
            int_in(&self.ha_estado_fuera, 0, 1)
                .ok_or_else(|| "Debe ser 0 (No) o 1 (Sí)".to_string()),
        );
        let tiene_beca = c.take(
            "tiene_beca",
            int_in(&self.tiene_beca, 0, 1).ok_or_else(|| "Debe ser 0 (No) o 1 (Sí)".to_string()),
        );
        let naturaleza_colegio = c.take(
            "naturaleza_colegio",
            school_type(&self.naturaleza_colegio)
                .ok_or_else(|| "Seleccione PÚBLICO o PRIVADO".to_string()),
        );
        let calendario = c.take(
            "calendario",
            choice(&self.calendario, CALENDARIO_OPTIONS)
                .ok_or_else(|| "Seleccione A, B u OTRO".to_string()),
        );

        let (
            Some(edad_ingreso),
            Some(sexo),
            Some(estrato),
            Some(programa),
            Some(promedio_historico),
            Some(creditos_maximos),
            Some(total_periodos),
            Some(tasa_aprobacion_media),
            Some(rezago_final),
            Some(ha_estado_fuera),
            Some(tiene_beca),
            Some(naturaleza_colegio),
            Some(calendario),
        ) = (
            edad_ingreso,
            sexo,
            estrato,
            programa,
            promedio_historico,
            creditos_maximos,
            total_periodos,
            tasa_aprobacion_media,
            rezago_final,
            ha_estado_fuera,
            tiene_beca,
            naturaleza_colegio,
            calendario,
        )
        else {
            return Err(c.errors);
        };

        Ok(PredictionRequest {
            edad_ingreso,
            sexo,
            estrato,
            programa,
            promedio_historico,
            creditos_maximos,
            total_periodos,
            tasa_aprobacion_media: tasa_aprobacion_media / 100.0,
            rezago_final,
            ha_estado_fuera,
            tiene_beca,
            naturaleza_colegio,
            calendario,
        })
    }

    /// Every validity message for the current values, in form order.
    pub fn check_validity(&self) -> Vec<FieldError> {
        self.parse().err().unwrap_or_default()
    }

    /// The program must be one of the selectable options of a loaded directory.
    pub fn check_program(&self, select: &ProgramSelect) -> Option<FieldError> {
        let code = self.programa.trim();
        if code.is_empty() || select.contains(code) {
            return None;
        }
        Some(FieldError::new(
            "programa",
            format!("El programa {code} no está en la lista"),
        ))
    }

    /// Builds the request body. Fails with every validity message when the
    /// form is not valid, so nothing is sent.
    pub fn serialize(&self) -> Result<PredictionRequest> {
        self.parse().map_err(ClientError::InvalidForm)
    }
}
