use tracing::{info, warn};

use crate::client::PredictionService;
use crate::models::Program;

pub const PLACEHOLDER_LABEL: &str = "Seleccionar programa...";
pub const LOAD_ERROR_LABEL: &str = "Error cargando programas";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

/// Options of the program selection control.
#[derive(Debug, Clone, Default)]
pub struct ProgramSelect {
    pub options: Vec<SelectOption>,
}

impl ProgramSelect {
    /// Placeholder first, then one option per program in the given order.
    pub fn populate(&mut self, programs: &[Program]) {
        self.options.clear();
        self.options.push(SelectOption {
            value: String::new(),
            label: PLACEHOLDER_LABEL.to_string(),
            disabled: false,
        });
        self.options.extend(programs.iter().map(|program| SelectOption {
            value: program.codigo.clone(),
            label: program.nombre.clone(),
            disabled: false,
        }));
    }

    pub fn show_error(&mut self) {
        self.options = vec![SelectOption {
            value: String::new(),
            label: LOAD_ERROR_LABEL.to_string(),
            disabled: true,
        }];
    }

    pub fn is_error(&self) -> bool {
        matches!(self.options.as_slice(), [only] if only.disabled && only.label == LOAD_ERROR_LABEL)
    }

    pub fn contains(&self, code: &str) -> bool {
        !code.is_empty()
            && self
                .options
                .iter()
                .any(|option| !option.disabled && option.value == code)
    }

    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| !option.value.is_empty() && option.value == code)
            .map(|option| option.label.as_str())
    }
}

/// Fetches the program directory once. Failures degrade the control to a
/// single error option and are never surfaced beyond a log line.
pub async fn load_programs<S>(service: &S) -> ProgramSelect
where
    S: PredictionService + ?Sized,
{
    let mut select = ProgramSelect::default();

    match service.programs().await {
        Ok(directory) => {
            select.populate(&directory.programas);
            info!(count = directory.programas.len(), "programs loaded");
        }
        Err(err) => {
            warn!(error = %err, "failed to load programs");
            select.show_error();
        }
    }

    select
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::StubService;
    use crate::error::ClientError;
    use crate::models::ProgramDirectory;

    #[tokio::test]
    async fn populates_placeholder_and_programs_in_order() {
        let service = StubService::default().with_programs(Ok(ProgramDirectory {
            programas: vec![
                Program {
                    codigo: "201".to_string(),
                    nombre: "Medicina".to_string(),
                },
                Program {
                    codigo: "105".to_string(),
                    nombre: "Derecho".to_string(),
                },
            ],
        }));

        let select = load_programs(&service).await;
        let labels: Vec<_> = select.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec![PLACEHOLDER_LABEL, "Medicina", "Derecho"]);
        assert_eq!(select.options[1].value, "201");
        assert!(select.contains("105"));
        assert!(!select.contains(""));
        assert_eq!(select.label_for("201"), Some("Medicina"));
        assert!(!select.is_error());
    }

    #[tokio::test]
    async fn single_program_scenario() {
        let service = StubService::default().with_programs(Ok(ProgramDirectory {
            programas: vec![Program {
                codigo: "201".to_string(),
                nombre: "Medicina".to_string(),
            }],
        }));

        let select = load_programs(&service).await;
        assert_eq!(select.options.len(), 2);
        assert_eq!(select.options[0].value, "");
        assert_eq!(
            select.options[1],
            SelectOption {
                value: "201".to_string(),
                label: "Medicina".to_string(),
                disabled: false,
            }
        );
    }

    #[tokio::test]
    async fn failure_leaves_single_disabled_error_option() {
        let service = StubService::default().with_programs(Err(ClientError::Status {
            status: 502,
            detail: "bad gateway".to_string(),
        }));

        let select = load_programs(&service).await;
        assert!(select.is_error());
        assert_eq!(select.options.len(), 1);
        assert!(!select.contains("201"));
    }

    #[test]
    fn repopulating_replaces_previous_options() {
        let mut select = ProgramSelect::default();
        select.show_error();
        select.populate(&[]);
        assert_eq!(select.options.len(), 1);
        assert_eq!(select.options[0].label, PLACEHOLDER_LABEL);
    }
}
