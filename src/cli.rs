//! Interface de linha de comando do cliente de coletas baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (jobs, show, accept,
//! continue, arrive, proof, complete, cancel) e flags globais
//! (--config, --api-url, --json, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pickup — fluxo de ordens de coleta de lixo para motoristas.
#[derive(Debug, Parser)]
#[command(name = "pickup", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: ./pickup.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sobrescreve a URL base da API.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Imprime o registro resultante em JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lista os jobs do motorista (ou os disponíveis com --available).
    Jobs {
        /// Lista ordens ainda não aceitas por nenhum motorista.
        #[arg(long)]
        available: bool,
    },

    /// Mostra uma ordem de coleta.
    Show {
        /// Identificador da ordem.
        job_id: String,
    },

    /// Aceita uma ordem disponível.
    Accept { job_id: String },

    /// Retoma um job ativo e mostra o destino.
    Continue { job_id: String },

    /// Informa chegada ao local de coleta (Accepted → In-Progress).
    Arrive { job_id: String },

    /// Anexa a URL da foto de comprovação.
    Proof {
        job_id: String,
        /// URL da foto já hospedada.
        url: String,
    },

    /// Conclui um job em andamento.
    Complete {
        job_id: String,
        /// Anexa esta foto antes de concluir.
        #[arg(long)]
        proof_url: Option<String>,
    },

    /// Cancela um job aceito.
    Cancel { job_id: String },
}
