use anyhow::{bail, Result};
use asset_tracker_api::{
    helper::{build_valuator, init_tracing_subscriber},
    report::BalanceReport,
    session::{hash_token, Authenticator, InMemorySessionStore, Session},
};
use asset_tracker_config::AppContext;
use asset_tracker_database::{balance_history, strategy, HistoryQuery};
use asset_tracker_task::{next_run_after, BalanceSnapshotTask, Executable, TaskStatus};
use asset_tracker_valuation::{AccountFailure, ExchangeRegistry, Valuator};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "asset-tracker")]
#[command(about = "Multi-account exchange balance tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value every strategy and print preset vs realtime balances
    Report {
        /// Login token, restricts the report to the user's accounts
        #[arg(short, long)]
        token: Option<String>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Take one balance snapshot now
    Snapshot,
    /// Take a balance snapshot every day at the configured time
    Daily,
    /// List balance snapshots of the user's accounts
    History {
        /// Login token
        #[arg(short, long)]
        token: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 20)]
        page_size: i64,
        /// RFC 3339 start time
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// RFC 3339 end time
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },
    /// Print the SHA-256 hash of a token, for users.login_token_hash or auth.admin_token_hash
    HashToken { token: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::HashToken { token } = &cli.command {
        println!("{}", hash_token(token));
        return Ok(());
    }

    let context = AppContext::try_new()?;
    let _guard = init_tracing_subscriber(&context.setting.telemetry)?;

    let valuator = Arc::new(build_valuator(&context.setting));
    let authenticator = Authenticator::new(
        InMemorySessionStore::default(),
        context.setting.auth.admin_token_hash.clone(),
    );

    match cli.command {
        Commands::Report { token, json } => {
            let session = match token {
                Some(token) => Some(login(&authenticator, &context, &token).await?),
                None => None,
            };
            report(&context, &valuator, session, json).await?;
        }
        Commands::Snapshot => snapshot(&context, &valuator).await?,
        Commands::Daily => daily(&context, &valuator).await?,
        Commands::History {
            token,
            page,
            page_size,
            start,
            end,
        } => {
            let session = login(&authenticator, &context, &token).await?;
            let Some(user_id) = session.user_id else {
                bail!("history requires a user token");
            };

            let query = HistoryQuery::builder()
                .page(page)
                .page_size(page_size)
                .maybe_start(start)
                .maybe_end(end)
                .build();

            for history in balance_history::list_by_user(&context.db, user_id, &query).await? {
                println!("{}", serde_json::to_string(&history)?);
            }
        }
        Commands::HashToken { .. } => {}
    }

    Ok(())
}

// 先按管理员令牌校验，再查用户
async fn login(
    authenticator: &Authenticator<InMemorySessionStore>,
    context: &AppContext,
    token: &str,
) -> Result<Session> {
    if let Some(session) = authenticator.admin_login(token) {
        return Ok(session);
    }

    match authenticator.user_login(&context.db, token).await? {
        Some(session) => Ok(session),
        None => bail!("invalid login token"),
    }
}

async fn report(
    context: &AppContext,
    valuator: &Valuator<ExchangeRegistry>,
    session: Option<Session>,
    json: bool,
) -> Result<()> {
    let strategies = match session.and_then(|session| session.user_id) {
        Some(user_id) => strategy::list_by_user(&context.db, user_id).await?,
        None => strategy::list_all(&context.db).await?,
    };
    let (credentials, invalid) = strategy::split_credentials(&strategies);

    let mut batch = valuator.value_batch(&credentials).await;

    // 无法转换的策略也计入失败列表
    for (item, e) in invalid {
        let failure = AccountFailure {
            credential_id: item.id,
            account_id: item.account_id,
            label: item.strategy_name.clone(),
            reason: e.to_string(),
        };
        error!("{}", failure);
        batch.failures.push(failure);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else {
        println!("{}", BalanceReport::from(&batch));
    }

    Ok(())
}

async fn snapshot(context: &AppContext, valuator: &Arc<Valuator<ExchangeRegistry>>) -> Result<()> {
    let task = BalanceSnapshotTask::builder()
        .db(Arc::clone(&context.db))
        .valuator(Arc::clone(valuator))
        .build();

    let mut stream = task.execute().await?;
    let mut written = 0;
    let mut failed = 0;

    while let Some(status) = stream.next().await {
        match status? {
            TaskStatus::Initializing => info!("balance snapshot started"),
            TaskStatus::Running(row) => {
                written += 1;
                info!(
                    strategy = %row.strategy_name,
                    balance = %row.balance,
                    "balance snapshot saved"
                );
            }
            TaskStatus::Failed(_) => failed += 1,
            TaskStatus::Finished => info!(written, failed, "balance snapshot finished"),
        }
    }

    Ok(())
}

async fn daily(context: &AppContext, valuator: &Arc<Valuator<ExchangeRegistry>>) -> Result<()> {
    let schedule = context.setting.snapshot;

    loop {
        let now = Utc::now();
        let next_run = next_run_after(now, schedule.hour, schedule.minute)?;
        info!(%next_run, "waiting for next balance snapshot");

        tokio::time::sleep((next_run - now).to_std()?).await;

        // 单次失败不终止循环
        if let Err(e) = snapshot(context, valuator).await {
            warn!("balance snapshot failed: {:?}", e);
        }
    }
}
