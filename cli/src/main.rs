//! CLI entrypoint for crewboard
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, Role};
use crewboard_application::{
    AnswerClarification, AssignTicket, AssignmentScanner, ClarificationChannel,
    ContextSynchronizer, PollPolicy, RepositoryMirror, TicketOrchestrator, TicketStore,
};
use crewboard_domain::{AgentProfile, RecipientTag, RoleInstruction, TicketId};
use crewboard_infrastructure::{
    BoardConfig, ChatBackendConfig, ConfigLoader, FileConfig, GitMirror, MirrorSettings,
    OpenAiGateway, TrelloStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    if config.board.board_id.is_empty() {
        bail!("board.board_id is not configured; set it in crewboard.toml or CREWBOARD_BOARD__BOARD_ID");
    }

    // === Dependency Injection ===
    let store = Arc::new(TrelloStore::new(BoardConfig {
        api_key: config.board.api_key.clone(),
        api_token: config.board.api_token.clone(),
        board_id: config.board.board_id.clone(),
    }));
    let gateway = Arc::new(OpenAiGateway::new(ChatBackendConfig {
        base_url: config.model.base_url.clone(),
        api_key: config.model.api_key.clone(),
        model: config.model.model.clone(),
    }));

    // Ctrl-C cancels reply waits and stops the scan loop after the current
    // ticket finishes.
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal_token.cancel();
        }
    });

    match cli.command {
        Command::Run { role } => run_loop(&config, store, gateway, role, shutdown).await,
        Command::Decompose { ticket_id } => {
            let orchestrator = orchestrator(&config, store.clone(), gateway, shutdown);
            let ticket = find_ticket(&store, &ticket_id).await?;
            let outcome = orchestrator.direct_decompose(&ticket).await?;
            info!(
                created = outcome.created.len(),
                failed = outcome.failed_creations,
                dropped = outcome.dropped_segments,
                "decomposition finished"
            );
            for child in &outcome.created {
                println!("{}  {}", child.id, child.title);
            }
            Ok(())
        }
        Command::Assign { ticket_id, member } => {
            let assigned = AssignTicket::new(store)
                .execute(&TicketId::new(ticket_id), &member)
                .await?;
            println!("assigned to {}", assigned.name);
            Ok(())
        }
        Command::Answer { ticket_id, to } => {
            let requester = RecipientTag::new(to.unwrap_or_else(|| config.agents.manager_name.clone()));
            let reviewer = RecipientTag::new(&config.agents.reviewer_name);
            let ticket = TicketId::new(ticket_id);

            let comments = store.comments(&ticket).await?;
            let Some(request) = comments.iter().find(|c| reviewer.matches(c)) else {
                bail!("no pending question tagged {} on {}", reviewer, ticket);
            };

            let answer = AnswerClarification::new(store.clone(), gateway)
                .execute(&ticket, request, &requester)
                .await?;
            println!("{}", answer);
            Ok(())
        }
    }
}

fn poll_policy(config: &FileConfig) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(config.poll.interval_secs),
        max_attempts: config.poll.max_attempts,
    }
}

fn profile_for(config: &FileConfig, role: Role) -> AgentProfile {
    match role {
        Role::Manager => {
            AgentProfile::new(config.agents.manager_name.clone(), RoleInstruction::manager())
        }
        Role::Developer => AgentProfile::new(
            config.agents.developer_name.clone(),
            RoleInstruction::developer(),
        ),
    }
}

fn orchestrator(
    config: &FileConfig,
    store: Arc<TrelloStore>,
    gateway: Arc<OpenAiGateway>,
    shutdown: CancellationToken,
) -> TicketOrchestrator<TrelloStore, OpenAiGateway> {
    let channel = ClarificationChannel::new(store.clone(), poll_policy(config))
        .with_cancellation(shutdown);
    TicketOrchestrator::new(
        store,
        gateway,
        channel,
        profile_for(config, Role::Manager),
        RecipientTag::new(&config.agents.reviewer_name),
        config.board.destination_list.clone(),
    )
    .with_processed_list(config.board.processed_list.clone())
}

async fn find_ticket(store: &TrelloStore, ticket_id: &str) -> Result<crewboard_domain::Ticket> {
    let wanted = TicketId::new(ticket_id);
    store
        .board_tickets()
        .await?
        .into_iter()
        .find(|t| t.id == wanted)
        .with_context(|| format!("ticket {} not found on the board", wanted))
}

async fn run_loop(
    config: &FileConfig,
    store: Arc<TrelloStore>,
    gateway: Arc<OpenAiGateway>,
    role: Role,
    shutdown: CancellationToken,
) -> Result<()> {
    let mirror = Arc::new(
        GitMirror::open(MirrorSettings {
            repo_path: PathBuf::from(&config.repo.path),
            remote_url: config.repo.remote_url.clone(),
            author_name: config.repo.author_name.clone(),
            author_email: config.repo.author_email.clone(),
            token: config.repo.token.clone(),
        })
        .context("failed to open repository mirror")?,
    );

    let profile = profile_for(config, role);
    let sync = Arc::new(ContextSynchronizer::new(
        store.clone(),
        mirror.clone(),
        gateway.clone(),
        config.board.guidance_list.clone(),
    ));
    let scanner = AssignmentScanner::new(store.clone(), sync.clone(), profile.clone())
        .skipping_list(config.board.processed_list.clone());
    let orchestrator = orchestrator(config, store, gateway, shutdown.clone());

    info!(persona = %profile.name, "starting crewboard agent");
    sync.install_role(&profile.role).await?;
    sync.refresh_repository_context().await?;
    if sync.load_guidance_digest().await?.is_some() {
        info!("standing guidance loaded");
    }

    let scan_interval = Duration::from_secs(config.poll.scan_interval_secs);
    loop {
        if let Err(e) = mirror.pull().await {
            warn!(error = %e, "mirror pull failed, scanning with local state");
        }

        let tickets = scanner.assigned_tickets().await?;
        info!(assigned = tickets.len(), "scan complete");

        for ticket in &tickets {
            if shutdown.is_cancelled() {
                break;
            }
            info!(ticket = %ticket.id, title = %ticket.title, "handling ticket");
            match orchestrator.handle_ticket(ticket).await {
                Ok(outcome) => info!(
                    ticket = %ticket.id,
                    created = outcome.created.len(),
                    failed = outcome.failed_creations,
                    dropped = outcome.dropped_segments,
                    "ticket decomposed"
                ),
                Err(e) => warn!(ticket = %ticket.id, error = %e, "ticket handling failed"),
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(scan_interval) => {}
        }
    }

    info!("agent stopped");
    Ok(())
}
