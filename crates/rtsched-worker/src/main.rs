use clap::Parser;
use rtsched_core::{TaskQueue, TieBreak};
use rtsched_worker::{Scheduler, SchedulerConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rtsched")]
#[command(about = "Priority-ordered cooperative task scheduler", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long)]
    config: Option<String>,

    /// Delay before re-polling an empty queue, in milliseconds
    #[arg(long)]
    idle_delay_ms: Option<u64>,

    /// Ordering among equal-priority tasks (lifo or fifo)
    #[arg(long)]
    tie_break: Option<TieBreak>,

    /// Stop after this many milliseconds instead of waiting for Ctrl-C
    #[arg(long)]
    run_for_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        SchedulerConfig::from_file(config_path)?
    } else {
        SchedulerConfig::default()
    };

    // Override with CLI args
    if let Some(idle_delay_ms) = args.idle_delay_ms {
        config.idle_delay_ms = idle_delay_ms;
    }
    if let Some(tie_break) = args.tie_break {
        config.tie_break = tie_break;
    }
    config.validate()?;

    let queue = Arc::new(TaskQueue::with_tie_break(config.tie_break));
    let handle = Scheduler::new(queue.clone(), config)?.spawn()?;

    for (id, priority) in [(1, 1i64), (2, 2), (3, 1)] {
        queue.enqueue(
            id,
            move || println!("Task {} executed with priority {}", id, priority),
            priority,
        );
    }

    match args.run_for_ms {
        Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        None => {
            tokio::signal::ctrl_c().await?;
            tracing::info!("Received shutdown signal");
        }
    }

    let stats = tokio::task::spawn_blocking(move || handle.stop()).await??;
    tracing::info!("Final stats: {}", serde_json::to_string(&stats)?);

    Ok(())
}
