use std::error::Error;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use triaje_lib::ai::{tokens, AiTriageService};
use triaje_lib::config;
use triaje_lib::export;
use triaje_lib::models::{AiEnrichment, AiProvider, Patient, TriageAssessment};
use triaje_lib::store::{AppStore, JsonFileStore};
use triaje_lib::triage::{apply_ai_priority, apply_ai_triage, compute_triage, priority_info};

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(
    name = "triaje",
    version,
    about = "Triaje orientativo de urgencias con enriquecimiento IA opcional."
)]
struct Cli {
    /// State file (defaults to the per-user data directory).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate `{ "patient": .., "assessment": .. }` from a JSON file.
    Triage {
        input: PathBuf,
        /// Store the patient with its result.
        #[arg(long)]
        save: bool,
    },
    /// Run AI enrichment on a stored patient.
    Ai {
        patient_id: String,
        #[arg(long)]
        priority_only: bool,
    },
    #[command(subcommand)]
    Tokens(TokensCommand),
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Seed sample patients (only into an empty list unless `--import`).
    Demo {
        #[arg(long)]
        import: bool,
    },
    /// Export the stored patient list.
    Export {
        format: ExportFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokensCommand {
    List,
    Add { provider: AiProvider, value: String },
    Remove { id: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    Set {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        provider: Option<AiProvider>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Deserialize)]
struct TriageInput {
    patient: Patient,
    assessment: TriageAssessment,
}

#[tokio::main]
async fn main() -> CliResult {
    triaje_lib::init_tracing();
    let cli = Cli::parse();

    let storage = match cli.state {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::at_default_location(),
    };
    tracing::debug!(path = %storage.path().display(), "Opening state");
    let mut store = AppStore::open(storage)?;

    match cli.command {
        Command::Triage { input, save } => run_triage(&mut store, input, save),
        Command::Ai {
            patient_id,
            priority_only,
        } => run_ai(&mut store, &patient_id, priority_only).await,
        Command::Tokens(cmd) => run_tokens(&mut store, cmd),
        Command::Config(cmd) => run_config(&mut store, cmd),
        Command::Demo { import } => run_demo(&mut store, import),
        Command::Export { format, out } => run_export(&store, format, out),
    }
}

fn run_triage(store: &mut AppStore<JsonFileStore>, input: PathBuf, save: bool) -> CliResult {
    let text = std::fs::read_to_string(&input)
        .map_err(|e| format!("No se pudo leer {}: {e}", input.display()))?;
    let TriageInput {
        patient,
        assessment,
    } = serde_json::from_str(&text)?;

    let result = compute_triage(&assessment, &patient);
    let info = priority_info(result.priority);
    println!("Prioridad {} ({}) - {}", result.priority, info.label, result.reason);
    println!("Tiempo máximo: {}", info.wait_label);
    println!();
    println!("{}", result.evolutivo);

    if save {
        let id = patient.id.clone();
        let replaced = store.upsert_patient(patient)?;
        store.set_assessment(&id, assessment, Some(result))?;
        if replaced {
            println!("\nActualizado {id} (datos del paciente reemplazados)");
        } else {
            println!("\nGuardado como {id}");
        }
    }
    Ok(())
}

async fn run_ai(
    store: &mut AppStore<JsonFileStore>,
    patient_id: &str,
    priority_only: bool,
) -> CliResult {
    let patient = store
        .patient(patient_id)
        .cloned()
        .ok_or_else(|| format!("Paciente no encontrado: {patient_id}"))?;
    let assessment = patient
        .assessment
        .clone()
        .ok_or("El paciente no tiene valoración de triaje")?;
    let config = store.config().clone();
    if !config.enabled {
        return Err("La IA está desactivada (triaje config set --enabled true)".into());
    }

    let base = patient
        .result
        .clone()
        .unwrap_or_else(|| compute_triage(&assessment, &patient));
    let service = AiTriageService::default();
    let now = Utc::now();

    let merged = if priority_only {
        match service.generate_ai_priority(&assessment, &patient, &config).await {
            Ok(tagged) => {
                store.record_ai_token_events(&tagged.token_events)?;
                let enrichment = AiEnrichment::from_priority(&config, tagged, now);
                apply_ai_priority(&base, &assessment, &patient, enrichment, now)
            }
            Err(e) => {
                store.record_ai_token_events(e.token_events())?;
                return Err(e.into());
            }
        }
    } else {
        match service.generate_ai_triage(&assessment, &patient, &config).await {
            Ok(tagged) => {
                store.record_ai_token_events(&tagged.token_events)?;
                let enrichment = AiEnrichment::from_triage(&config, tagged, now);
                apply_ai_triage(&base, &assessment, &patient, enrichment, now)
            }
            Err(e) => {
                store.record_ai_token_events(e.token_events())?;
                return Err(e.into());
            }
        }
    };

    let info = priority_info(merged.priority);
    println!("Prioridad {} ({}) - {}", merged.priority, info.label, merged.reason);
    if let Some(original) = merged.deterministic_priority {
        println!("Prioridad determinista original: {original}");
    }
    println!();
    println!("{}", merged.evolutivo);
    store.set_result(patient_id, merged)?;
    Ok(())
}

fn run_tokens(store: &mut AppStore<JsonFileStore>, cmd: TokensCommand) -> CliResult {
    match cmd {
        TokensCommand::List => {
            for token in &store.config().tokens {
                let status = match (&token.last_error, token.last_used_at) {
                    (Some(error), _) => format!("último error: {error}"),
                    (None, Some(used)) => format!("último uso: {}", used.to_rfc3339()),
                    (None, None) => "sin uso".to_string(),
                };
                println!(
                    "{}  {:<7} {}  {status}",
                    token.id,
                    token.provider,
                    tokens::mask_token(&token.value)
                );
            }
        }
        TokensCommand::Add { provider, value } => {
            let token = store.add_token(provider, &value)?;
            println!("Añadido {} ({})", token.id, tokens::mask_token(&token.value));
        }
        TokensCommand::Remove { id } => {
            let token = store.remove_token(&id)?;
            println!("Eliminado {} ({})", token.id, tokens::mask_token(&token.value));
        }
    }
    Ok(())
}

fn run_config(store: &mut AppStore<JsonFileStore>, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show => {
            let config = store.config();
            println!("enabled:  {}", config.enabled);
            println!("provider: {}", config.provider);
            println!("model:    {}", config.model);
            println!(
                "tokens:   {}",
                tokens::provider_tokens(config, config.provider).len()
            );
        }
        ConfigCommand::Set {
            enabled,
            provider,
            model,
        } => {
            let mut config = store.config().clone();
            if let Some(enabled) = enabled {
                config.enabled = enabled;
            }
            if let Some(provider) = provider {
                if provider != config.provider && model.is_none() {
                    config.model = match provider {
                        AiProvider::Gemini => config::DEFAULT_GEMINI_MODEL,
                        AiProvider::OpenAi => config::DEFAULT_OPENAI_MODEL,
                    }
                    .to_string();
                }
                config.provider = provider;
            }
            if let Some(model) = model {
                config.model = model;
            }
            store.update_config(config)?;
            tracing::info!(provider = %store.config().provider, model = %store.config().model, "AI config updated");
        }
    }
    Ok(())
}

fn run_demo(store: &mut AppStore<JsonFileStore>, import: bool) -> CliResult {
    let added = if import {
        store.import_demo_patients()?
    } else {
        store.load_demo()?
    };
    if added == 0 {
        println!("La lista ya tiene pacientes; usa --import para añadir los de ejemplo");
    } else {
        println!("Añadidos {added} pacientes de ejemplo");
    }
    Ok(())
}

fn run_export(
    store: &AppStore<JsonFileStore>,
    format: ExportFormat,
    out: Option<PathBuf>,
) -> CliResult {
    let text = match format {
        ExportFormat::Csv => export::export_list_csv(store.patients()),
        ExportFormat::Json => export::export_list_json(store.patients())?,
    };
    match out {
        Some(path) => {
            std::fs::write(&path, text)?;
            println!("Exportado a {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
