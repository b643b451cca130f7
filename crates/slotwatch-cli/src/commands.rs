//! Command handlers for CLI subcommands.

use std::sync::Arc;

use tracing::{info, warn};

use slotwatch_client::{GraphqlClient, SlotService, StaticToken, TokenProvider};
use slotwatch_models::{Goal, Identity};
use slotwatch_runtime::{awaiting_evaluation, collect_current_goals, Notifier, Orchestrator};
use slotwatch_telegram::TelegramNotifier;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::select::{select_goals, Terminal};

/// Execute the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command.clone().unwrap_or_default() {
        Commands::Goals => {
            let (service, identity) = connect(&cli).await?;
            let goals = candidate_goals(service.as_ref(), &identity).await?;
            cmd_goals(&goals)
        }
        Commands::Run { goals: requested, all } => {
            let config = AppConfig::load(&cli.config_path())?;
            let (service, identity) = connect(&cli).await?;
            let goals = candidate_goals(service.as_ref(), &identity).await?;
            let chosen = select_goals(goals, &requested, all, &mut Terminal::default())?;
            cmd_run(service, identity, config, chosen).await
        }
    }
}

/// Builds the remote client and resolves the account.
async fn connect(cli: &Cli) -> Result<(Arc<dyn SlotService>, Identity)> {
    let username = cli
        .username
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            CliError::Config("username not set. Use --username or SLOTWATCH_USERNAME".into())
        })?;
    let token = cli
        .token
        .clone()
        .ok_or_else(|| CliError::Config("token not set. Use --token or SLOTWATCH_TOKEN".into()))?;

    let tokens: Arc<dyn TokenProvider> = Arc::new(StaticToken::new(token)?);
    let mut client = GraphqlClient::new(tokens)?;
    if let Some(school) = &cli.school {
        client = client.with_school(school.clone());
    }
    let service: Arc<dyn SlotService> = Arc::new(client);

    let identity = service.resolve_identity(username).await?;
    info!(username = %username, user_id = %identity.user_id, "resolved account");

    Ok((service, identity))
}

/// Goals that are waiting for peer evaluation.
async fn candidate_goals(service: &dyn SlotService, identity: &Identity) -> Result<Vec<Goal>> {
    let goals = collect_current_goals(service, &identity.user_id).await?;
    let goals = awaiting_evaluation(goals);
    info!(goals = goals.len(), "goals awaiting evaluation");
    Ok(goals)
}

fn cmd_goals(goals: &[Goal]) -> Result<()> {
    if goals.is_empty() {
        println!("No goals awaiting evaluation.");
        return Ok(());
    }

    for goal in goals {
        println!("{}", goal);
    }

    Ok(())
}

/// Notifier for the configured chat, if any.
///
/// A configured chat without a usable bot token is an error.
fn telegram_notifier(chat_id: Option<i64>) -> Result<Option<Arc<dyn Notifier>>> {
    let Some(chat_id) = chat_id else {
        return Ok(None);
    };

    let notifier = TelegramNotifier::from_env(chat_id)?;
    info!(chat_id = chat_id, "telegram notifications enabled");
    Ok(Some(Arc::new(notifier)))
}

async fn cmd_run(
    service: Arc<dyn SlotService>,
    identity: Identity,
    config: AppConfig,
    goals: Vec<Goal>,
) -> Result<()> {
    let mut orchestrator = Orchestrator::new(service, identity, config.ranges, config.runtime);

    if let Some(notifier) = telegram_notifier(config.telegram_chat_id)? {
        orchestrator = orchestrator.with_notifier(notifier);
    }

    let cancel = orchestrator.cancellation_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, stopping workers"),
            Err(e) => warn!(error = %e, "cannot listen for interrupt"),
        }
        cancel.cancel();
    });

    println!("Watching {} goal(s). Press Ctrl-C to stop.", goals.len());
    orchestrator.run(goals).await?;

    Ok(())
}
