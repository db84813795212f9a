/// Inclusive numeric bound for one form field.
#[derive(Debug, Clone, Copy)]
pub struct RangeRule {
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub integer: bool,
}

pub const EDAD_INGRESO: RangeRule = RangeRule {
    field: "edad_ingreso",
    label: "La edad",
    min: 16.0,
    max: 35.0,
    integer: true,
};

pub const PROMEDIO_HISTORICO: RangeRule = RangeRule {
    field: "promedio_historico",
    label: "El promedio",
    min: 0.0,
    max: 5.0,
    integer: false,
};

pub const CREDITOS_MAXIMOS: RangeRule = RangeRule {
    field: "creditos_maximos",
    label: "Los créditos",
    min: 6.0,
    max: 24.0,
    integer: true,
};

pub const TASA_APROBACION_MEDIA: RangeRule = RangeRule {
    field: "tasa_aprobacion_media",
    label: "La tasa de aprobación",
    min: 0.0,
    max: 100.0,
    integer: false,
};

pub const REZAGO_FINAL: RangeRule = RangeRule {
    field: "rezago_final",
    label: "El rezago",
    min: 0.0,
    max: 3.0,
    integer: false,
};

pub const TOTAL_PERIODOS: RangeRule = RangeRule {
    field: "total_periodos",
    label: "Los periodos",
    min: 1.0,
    max: 15.0,
    integer: true,
};

pub const RANGE_RULES: &[RangeRule] = &[
    EDAD_INGRESO,
    PROMEDIO_HISTORICO,
    CREDITOS_MAXIMOS,
    TASA_APROBACION_MEDIA,
    REZAGO_FINAL,
    TOTAL_PERIODOS,
];

pub fn rule_for(field: &str) -> Option<&'static RangeRule> {
    RANGE_RULES.iter().find(|rule| rule.field == field)
}

impl RangeRule {
    fn bound(&self, value: f64) -> String {
        if self.integer {
            format!("{value:.0}")
        } else {
            format!("{value:.1}")
        }
    }

    pub fn message(&self) -> String {
        format!(
            "{} debe estar entre {} y {}",
            self.label,
            self.bound(self.min),
            self.bound(self.max)
        )
    }

    /// Parses and range-checks the value; integer rules reject fractions.
    pub fn check(&self, raw: &str) -> Result<f64, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("Este campo es obligatorio".to_string());
        }

        let value = if self.integer {
            self.check_int(raw)? as f64
        } else {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| "Debe ser un número".to_string())?
        };

        if value < self.min || value > self.max {
            return Err(self.message());
        }

        Ok(value)
    }

    /// Parses and range-checks an integer field.
    pub fn check_int(&self, raw: &str) -> Result<i64, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("Este campo es obligatorio".to_string());
        }

        let value = raw
            .parse::<i64>()
            .map_err(|_| "Debe ser un número entero".to_string())?;

        if (value as f64) < self.min || (value as f64) > self.max {
            return Err(self.message());
        }

        Ok(value)
    }
}

/// Per-input check. Fields without a range rule are always valid.
pub fn check_field(field: &str, raw: &str) -> Result<(), String> {
    match rule_for(field) {
        Some(rule) => rule.check(raw).map(|_| ()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        assert!(check_field("edad_ingreso", "16").is_ok());
        assert!(check_field("edad_ingreso", "35").is_ok());
        assert!(check_field("promedio_historico", "5.0").is_ok());
        assert!(check_field("creditos_maximos", "6").is_ok());
        assert!(check_field("creditos_maximos", "24").is_ok());
        assert!(check_field("tasa_aprobacion_media", "0").is_ok());
        assert!(check_field("tasa_aprobacion_media", "100").is_ok());
        assert!(check_field("rezago_final", "3").is_ok());
        assert!(check_field("total_periodos", "1").is_ok());
        assert!(check_field("total_periodos", "15").is_ok());
    }

    #[test]
    fn out_of_range_values_get_a_message() {
        assert_eq!(
            check_field("edad_ingreso", "15"),
            Err("La edad debe estar entre 16 y 35".to_string())
        );
        assert_eq!(
            check_field("promedio_historico", "5.01"),
            Err("El promedio debe estar entre 0.0 y 5.0".to_string())
        );
        assert!(check_field("creditos_maximos", "25").is_err());
        assert!(check_field("tasa_aprobacion_media", "-1").is_err());
        assert!(check_field("rezago_final", "3.5").is_err());
        assert!(check_field("total_periodos", "0").is_err());
    }

    #[test]
    fn unparseable_and_empty_values_are_invalid() {
        assert_eq!(
            check_field("edad_ingreso", "19.5"),
            Err("Debe ser un número entero".to_string())
        );
        assert_eq!(
            check_field("promedio_historico", "abc"),
            Err("Debe ser un número".to_string())
        );
        assert!(check_field("promedio_historico", "NaN").is_err());
        assert_eq!(
            check_field("rezago_final", "  "),
            Err("Este campo es obligatorio".to_string())
        );
    }

    #[test]
    fn integer_rules_return_the_parsed_value() {
        assert_eq!(EDAD_INGRESO.check_int(" 19 "), Ok(19));
        assert_eq!(TOTAL_PERIODOS.check_int("15"), Ok(15));
        assert_eq!(
            CREDITOS_MAXIMOS.check_int("5"),
            Err("Los créditos debe estar entre 6 y 24".to_string())
        );
        assert_eq!(PROMEDIO_HISTORICO.check("3.25"), Ok(3.25));
    }

    #[test]
    fn fields_without_rules_pass() {
        assert!(check_field("sexo", "").is_ok());
        assert!(check_field("calendario", "anything").is_ok());
    }
}
