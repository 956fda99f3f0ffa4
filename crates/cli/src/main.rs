// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rexd`: a thin developer-facing binary that wires `rex-core`,
//! `rex-backend`, `rex-engine`, and `rex-events` together against the
//! in-memory stores for manual smoke-testing a single job submission. It is
//! not the excluded intake surface (no REST/admin UI/deferred dispatcher
//! live here) — every invocation is a one-shot process with its own
//! throwaway store.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rex_backend::{ExecutionBackend, LocalBackend, RemoteBackend};
use rex_core::store::memory::{MemoryJobStore, MemoryLogStore, MemoryResultStore};
use rex_core::{
    Interpreter, InterpreterId, Job, JobId, JobStore, LogPolicy, LogStore, Server, ServerId,
    SystemClock,
};
use rex_events::NullEventSink;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rexd", version, about = "Remote job execution engine, single-job smoke test driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a program to a target and run it under an interpreter.
    Submit(SubmitArgs),
    /// Install a public key on a remote server for password-free auth.
    DeployKey(KeyArgs),
    /// Remove a previously deployed public key from a remote server.
    DeleteKey(KeyArgs),
}

#[derive(Parser)]
struct SubmitArgs {
    /// Run against the local filesystem instead of an SSH target.
    #[arg(long)]
    local: bool,
    #[arg(long, default_value = "localhost")]
    hostname: String,
    #[arg(long, default_value_t = Server::DEFAULT_PORT)]
    port: u16,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    public_key_path: Option<PathBuf>,
    /// Path to the interpreter binary on the target host, e.g. /usr/bin/python3.
    #[arg(long)]
    interpreter_path: PathBuf,
    #[arg(long, value_delimiter = ',')]
    interpreter_args: Vec<String>,
    /// Path to the program source file to upload, read from the local disk.
    #[arg(long)]
    program: PathBuf,
    #[arg(long, default_value = ".")]
    remote_directory: PathBuf,
    #[arg(long)]
    remote_filename: String,
    #[arg(long, default_value = "cli-user")]
    owner: String,
    #[arg(long, value_enum, default_value = "live")]
    log_policy: LogPolicyArg,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Glob pattern for result files to capture; repeat for multiple.
    #[arg(long = "pattern")]
    result_patterns: Vec<String>,
    /// Working directory for the local backend (ignored with a remote target).
    #[arg(long, default_value = "/tmp/rexd")]
    local_workdir: PathBuf,
    /// Root directory captured result files are copied under.
    #[arg(long, default_value = "media")]
    media_root: PathBuf,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum LogPolicyArg {
    None,
    Live,
    Total,
}

impl From<LogPolicyArg> for LogPolicy {
    fn from(value: LogPolicyArg) -> Self {
        match value {
            LogPolicyArg::None => LogPolicy::None,
            LogPolicyArg::Live => LogPolicy::Live,
            LogPolicyArg::Total => LogPolicy::Total,
        }
    }
}

#[derive(Parser)]
struct KeyArgs {
    #[arg(long, default_value = "localhost")]
    hostname: String,
    #[arg(long, default_value_t = Server::DEFAULT_PORT)]
    port: u16,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    public_key_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Submit(args) => submit(args).await,
        Command::DeployKey(args) => deploy_key(args).await,
        Command::DeleteKey(args) => delete_key(args).await,
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}

async fn submit(args: SubmitArgs) -> Result<()> {
    let interpreter = Interpreter {
        id: InterpreterId::new("cli-interpreter"),
        name: args
            .interpreter_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "interpreter".to_string()),
        path: args.interpreter_path.clone(),
        arguments: args.interpreter_args.clone(),
        created: chrono::Utc::now(),
        modified: chrono::Utc::now(),
    };
    let server = Server {
        id: ServerId::new("cli-server"),
        title: args.hostname.clone(),
        hostname: args.hostname.clone(),
        port: args.port,
        interpreters: BTreeSet::from([interpreter.id.clone()]),
        created: chrono::Utc::now(),
        modified: chrono::Utc::now(),
    };

    let program = tokio::fs::read_to_string(&args.program)
        .await
        .with_context(|| format!("reading program file {}", args.program.display()))?;

    let job_id = JobId::new("cli-job");
    let job = Job::new(
        job_id.clone(),
        args.remote_filename.clone(),
        program,
        args.remote_directory.clone(),
        args.remote_filename.clone(),
        args.owner.clone(),
        &server,
        &interpreter,
        chrono::Utc::now(),
    )?;

    let job_store = MemoryJobStore::default();
    let log_store = MemoryLogStore::default();
    let result_store = MemoryResultStore::default();
    job_store.save(&job).await?;

    let config = rex_engine::SubmitConfig {
        password: args.password.clone(),
        public_key_path: args.public_key_path.clone(),
        timeout: args.timeout_secs.map(Duration::from_secs),
        log_policy: args.log_policy.into(),
        result_patterns: if args.result_patterns.is_empty() {
            None
        } else {
            Some(args.result_patterns.clone())
        },
        media_root: args.media_root.clone(),
    };

    let outcome = if args.local {
        let mut backend = LocalBackend::new(args.local_workdir.clone());
        run(
            &mut backend, &job_store, &log_store, &result_store, &job_id, &server, &interpreter,
            &config,
        )
        .await?
    } else {
        let mut backend = RemoteBackend::new(
            server.hostname.clone(),
            server.port,
            args.username.clone().unwrap_or_else(|| args.owner.clone()),
        );
        run(
            &mut backend, &job_store, &log_store, &result_store, &job_id, &server, &interpreter,
            &config,
        )
        .await?
    };

    print_outcome(&outcome, &log_store).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run<B: ExecutionBackend>(
    backend: &mut B,
    job_store: &MemoryJobStore,
    log_store: &MemoryLogStore,
    result_store: &MemoryResultStore,
    job_id: &JobId,
    server: &Server,
    interpreter: &Interpreter,
    config: &rex_engine::SubmitConfig,
) -> Result<rex_engine::SubmitOutcome> {
    let outcome = rex_engine::submit_job(
        backend,
        job_store,
        log_store,
        result_store,
        &NullEventSink,
        &SystemClock,
        job_id,
        server,
        interpreter,
        config,
    )
    .await?;
    Ok(outcome)
}

async fn print_outcome(outcome: &rex_engine::SubmitOutcome, log_store: &MemoryLogStore) -> Result<()> {
    let logs = log_store.list_for_job(&outcome.job.id).await?;
    for log in &logs {
        match log.stream {
            rex_core::Stream::Stdout => println!("{}", log.content),
            rex_core::Stream::Stderr => eprintln!("{}", log.content),
        }
    }
    let summary = serde_json::json!({
        "job_id": outcome.job.id.as_str(),
        "status": outcome.job.status.to_string(),
        "result_ids": outcome.result_ids.iter().map(|id| id.as_str().to_string()).collect::<Vec<_>>(),
        "ingest_error": outcome.ingest_error,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn deploy_key(args: KeyArgs) -> Result<()> {
    let mut backend = RemoteBackend::new(args.hostname.clone(), args.port, args.username.clone());
    backend
        .connect(args.password.as_deref(), args.public_key_path.as_deref())
        .await?;
    let public_key_path = args
        .public_key_path
        .clone()
        .unwrap_or_else(rex_backend::default_public_key_path);
    rex_backend::copy_key_to_server(&mut backend, &public_key_path).await?;
    backend.close().await?;
    println!("deployed {}", public_key_path.display());
    Ok(())
}

async fn delete_key(args: KeyArgs) -> Result<()> {
    let mut backend = RemoteBackend::new(args.hostname.clone(), args.port, args.username.clone());
    backend
        .connect(args.password.as_deref(), args.public_key_path.as_deref())
        .await?;
    let public_key_path = args
        .public_key_path
        .clone()
        .unwrap_or_else(rex_backend::default_public_key_path);
    rex_backend::delete_key_from_server(&mut backend, &public_key_path).await?;
    backend.close().await?;
    println!("removed {}", public_key_path.display());
    Ok(())
}
