use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use desercion_risk_client::client::{ApiClient, PredictionService};
use desercion_risk_client::config::{self, ApiConfig};
use desercion_risk_client::error::ClientError;
use desercion_risk_client::form::FormInput;
use desercion_risk_client::view::{self, ViewController, ViewState};
use desercion_risk_client::{directory, health, render};

#[derive(Parser)]
#[command(name = "desercion-risk")]
#[command(about = "Student dropout risk assessment client", long_about = None)]
struct Cli {
    /// Base URL of the prediction service
    #[arg(long, global = true, env = "DESERCION_API_URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,
    /// Request timeout in seconds, 0 to wait forever
    #[arg(long, global = true, env = "DESERCION_API_TIMEOUT", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the academic programs offered by the service
    Programs,
    /// Check that the service is up and its model is loaded
    Health,
    /// Show the service descriptor and model metrics
    Info,
    /// Submit a student's attributes and show the dropout risk assessment
    Predict {
        #[command(flatten)]
        form: FormArgs,
        /// Also write a markdown report to this file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also write the results card as HTML to this file
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FormArgs {
    /// Age at enrollment (16-35)
    #[arg(long)]
    edad_ingreso: String,
    /// M or F
    #[arg(long)]
    sexo: String,
    /// Socioeconomic stratum (1-6)
    #[arg(long)]
    estrato: String,
    /// Program code, see `programs`
    #[arg(long)]
    programa: String,
    /// Historical grade average (0.0-5.0)
    #[arg(long)]
    promedio_historico: String,
    /// Maximum credits per period (6-24)
    #[arg(long)]
    creditos_maximos: String,
    /// Periods enrolled (1-15)
    #[arg(long)]
    total_periodos: String,
    /// Mean course approval rate as a percentage (0-100)
    #[arg(long)]
    tasa_aprobacion_media: String,
    /// Academic lag in periods (0-3)
    #[arg(long)]
    rezago_final: String,
    /// 1 if the student has been on leave, else 0
    #[arg(long)]
    ha_estado_fuera: String,
    /// 1 if the student has a scholarship, else 0
    #[arg(long)]
    tiene_beca: String,
    /// PÚBLICO or PRIVADO
    #[arg(long)]
    naturaleza_colegio: String,
    /// A, B or OTRO
    #[arg(long)]
    calendario: String,
}

impl From<FormArgs> for FormInput {
    fn from(args: FormArgs) -> Self {
        FormInput {
            edad_ingreso: args.edad_ingreso,
            sexo: args.sexo,
            estrato: args.estrato,
            programa: args.programa,
            promedio_historico: args.promedio_historico,
            creditos_maximos: args.creditos_maximos,
            total_periodos: args.total_periodos,
            tasa_aprobacion_media: args.tasa_aprobacion_media,
            rezago_final: args.rezago_final,
            ha_estado_fuera: args.ha_estado_fuera,
            tiene_beca: args.tiene_beca,
            naturaleza_colegio: args.naturaleza_colegio,
            calendario: args.calendario,
        }
    }
}

/// `RUST_LOG` directives, `info` when unset or unparseable.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ApiConfig::new(&cli.api_url, cli.timeout_secs)
        .context("DESERCION_API_URL must point at the prediction service")?;
    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    info!(api = client.config().base_url(), "client initialized");

    match cli.command {
        Commands::Programs => {
            let select = directory::load_programs(&client).await;
            for option in select.options.iter() {
                if option.value.is_empty() {
                    println!("{}", option.label);
                } else {
                    println!("{:<14} {}", option.value, option.label);
                }
            }
        }
        Commands::Health => match health::check_connectivity(&client).await {
            health::Connectivity::Ready => println!("Service healthy, model loaded."),
            health::Connectivity::ModelNotLoaded => {
                println!("Service reachable, model not loaded.")
            }
            health::Connectivity::Unreachable(reason) => {
                println!("Service unreachable: {reason}")
            }
        },
        Commands::Info => {
            let service = client
                .service_info()
                .await
                .context("failed to fetch service descriptor")?;
            println!("{} v{} ({})", service.nombre, service.version, service.estado);
            for (path, description) in service.endpoints.iter() {
                println!("  {path:<12} {description}");
            }

            match client.model_info().await {
                Ok(model) => {
                    println!();
                    println!("Model: {}", model.modelo);
                    if let Some(balancing) = model.tecnica_balanceo.as_deref() {
                        println!("Balancing: {balancing}");
                    }
                    if let Some(threshold) = model.threshold {
                        println!("Threshold: {threshold:.2}");
                    }
                    println!(
                        "Accuracy {} | Precision {} | Recall {} | F1 {} | ROC AUC {}",
                        model.metricas.accuracy,
                        model.metricas.precision,
                        model.metricas.recall,
                        model.metricas.f1_score,
                        model.metricas.roc_auc
                    );
                    for (key, text) in model.interpretacion.iter() {
                        println!("  {key}: {text}");
                    }
                }
                Err(err) => warn!(error = %err, "model info unavailable"),
            }
        }
        Commands::Predict { form, out, html } => {
            let (select, _) = tokio::join!(
                directory::load_programs(&client),
                health::check_connectivity(&client)
            );

            let form = FormInput::from(form);
            let mut controller = ViewController::default();
            let response =
                match view::submit_form(&mut controller, &client, &form, &select).await {
                    Ok(response) => response,
                    Err(ClientError::InvalidForm(errors)) => {
                        for err in errors.iter() {
                            eprintln!("- {err}");
                        }
                        anyhow::bail!("form has {} invalid field(s)", errors.len());
                    }
                    Err(err) => return Err(err.into()),
                };

            match (controller.state(), response) {
                (ViewState::Results(result), Some(response)) => {
                    print!("{}", render::render_text(result));

                    if let Some(path) = out {
                        let report =
                            render::build_report(result, &response, chrono::Utc::now());
                        std::fs::write(&path, report)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        println!("Report written to {}.", path.display());
                    }
                    if let Some(path) = html {
                        std::fs::write(&path, render::render_html(result))
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        println!("HTML written to {}.", path.display());
                    }
                }
                (ViewState::Error(message), _) => anyhow::bail!("{message}"),
                (state, _) => anyhow::bail!("prediction ended in unexpected state {:?}", state.region()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
    }

    #[test]
    fn log_filter_uses_rust_log_directives() {
        let filter = log_filter(Some("desercion_risk_client=debug".to_string()));
        assert_eq!(filter.to_string(), "desercion_risk_client=debug");
    }

    #[test]
    fn predict_args_map_onto_form_fields() {
        let cli = Cli::try_parse_from([
            "desercion-risk",
            "predict",
            "--edad-ingreso", "19",
            "--sexo", "F",
            "--estrato", "3",
            "--programa", "201",
            "--promedio-historico", "3.75",
            "--creditos-maximos", "18",
            "--total-periodos", "4",
            "--tasa-aprobacion-media", "85",
            "--rezago-final", "0.5",
            "--ha-estado-fuera", "0",
            "--tiene-beca", "1",
            "--naturaleza-colegio", "PRIVADO",
            "--calendario", "A",
        ])
        .unwrap();

        let Commands::Predict { form, out, html } = cli.command else {
            panic!("expected predict");
        };
        assert!(out.is_none() && html.is_none());
        let request = FormInput::from(form).serialize().unwrap();
        assert_eq!(request.edad_ingreso, 19);
        assert!((request.tasa_aprobacion_media - 0.85).abs() < 1e-9);
    }
}
