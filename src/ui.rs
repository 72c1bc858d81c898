//! Interface de terminal — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner enquanto a única requisição
//! está em andamento e `console` para estilização com cores. O
//! [`Terminal`] renderiza [`Outcome`]s, listas de jobs e erros.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};

use crate::controller::Outcome;
use crate::workflow::{JobOrderRecord, JobStatus};

/// Spinner exibido durante uma requisição; o equivalente no terminal a
/// desabilitar o botão que disparou a ação.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

/// Saída colorida: verde para sucesso, amarelo para avisos, vermelho para
/// rejeições e erros.
pub struct Terminal {
    json: bool,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Terminal {
    /// Com `json = true`, registros são impressos como JSON em vez de resumo.
    pub fn new(json: bool) -> Self {
        Self {
            json,
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Exibe o resultado de uma ação. Em modo JSON, um único objeto vai
    /// para stdout.
    pub fn outcome(&self, outcome: &Outcome) {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome_json(outcome)).unwrap_or_default()
            );
            return;
        }
        match outcome {
            Outcome::Updated { record, warnings } => {
                for warning in warnings {
                    println!("  {} {warning}", self.yellow.apply_to("!"));
                }
                println!(
                    "  {} {} is now {}",
                    self.green.apply_to("✓"),
                    record.id,
                    record.status
                );
                self.record(record);
            }
            Outcome::Navigate {
                record,
                destination,
            } => {
                match destination {
                    Some(point) => println!(
                        "  {} Head to {} ({point})",
                        self.green.apply_to("→"),
                        display_or(&record.address, "pickup location"),
                    ),
                    None => println!(
                        "  {} Head to {}",
                        self.green.apply_to("→"),
                        display_or(&record.address, "pickup location")
                    ),
                }
                if record.status.blocks_back_navigation() {
                    let hint = "Job is active; finish or cancel it before leaving.";
                    println!("  {}", self.dim.apply_to(hint));
                }
                self.record(record);
            }
            Outcome::Rejected(reason) => {
                println!("  {} {reason}", self.red.apply_to("✗"));
            }
        }
    }

    /// Resumo (ou JSON) de um registro.
    pub fn record(&self, record: &JobOrderRecord) {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(record).unwrap_or_default()
            );
            return;
        }

        let status_style = match record.status {
            JobStatus::Completed => &self.green,
            JobStatus::Cancelled => &self.red,
            _ => &self.yellow,
        };
        println!();
        println!(
            "  {}  {}",
            record.id,
            status_style.apply_to(record.status)
        );
        println!("    address:   {}", display_or(&record.address, "-"));
        println!("    waste:     {}", display_or(&record.waste_type, "-"));
        println!(
            "    amount:    {:.2} + tax {:.2} = {:.2}",
            record.amount, record.tax, record.total_amount
        );
        if let Some(driver) = &record.driver_id {
            println!("    driver:    {driver}");
        }
        if let Some(url) = &record.proof_of_completion_url {
            println!("    proof:     {url}");
        }
        if record.status == JobStatus::Completed {
            match record.service_rating {
                Some(rating) => {
                    println!("    rating:    {} ({}/5)", rating.stars(), rating.value())
                }
                None => println!("    rating:    {}", self.dim.apply_to("not rated yet")),
            }
        }
    }

    /// Lista compacta de jobs.
    pub fn jobs(&self, jobs: &[JobOrderRecord]) {
        if self.json {
            println!("{}", serde_json::to_string_pretty(jobs).unwrap_or_default());
            return;
        }
        if jobs.is_empty() {
            println!("  {}", self.dim.apply_to("No jobs."));
            return;
        }
        for job in jobs {
            let marker = if job.status.is_active() {
                self.yellow.apply_to("●").to_string()
            } else {
                self.dim.apply_to("○").to_string()
            };
            println!(
                "  {marker} {:<12} {:<12} {}",
                job.id,
                job.status.to_string(),
                display_or(&job.address, "-")
            );
        }
    }

    /// Mensagem de erro fatal para a ação.
    pub fn error(&self, err: &dyn std::fmt::Display) {
        eprintln!("  {} {err}", self.red.apply_to("✗"));
    }
}

/// `{"record", "warnings"}`, `{"record", "destination"}` ou `{"rejection"}`.
fn outcome_json(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Updated { record, warnings } => json!({
            "record": record,
            "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }),
        Outcome::Navigate {
            record,
            destination,
        } => json!({
            "record": record,
            "destination": destination,
        }),
        Outcome::Rejected(reason) => json!({ "rejection": reason.to_string() }),
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
