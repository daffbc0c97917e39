//! Order Tracker replay binary.
//!
//! Replays a JSON-lines file of tracker inputs against a fresh tracker and
//! prints every emitted event and command result as one JSON line.
//!
//! ```text
//! order-tracker [--config tracker.yaml] events.jsonl
//! ```
//!
//! Each input line is a [`ReplayCommand`]:
//!
//! ```text
//! {"command":"catalog","catalog":{"BOOSTER_COOKIE":"Booster Cookie"}}
//! {"command":"panel","entries":[...]}
//! {"command":"advance_clock","millis":5000}
//! ```
//!
//! Time only moves on `advance_clock`, so a replay is deterministic.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use order_tracker::config::{TrackerConfig, load_config};
use order_tracker::domain::order_tracking::OrderValueSummary;
use order_tracker::observability::init_metrics;
use order_tracker::telemetry::init_tracing;
use order_tracker::{
    ConfirmationEvent, ErrorCode, FillEvent, ManualClock, MarketSnapshot, OrderProposal,
    OrderTracker, OutstandingOrder, PanelOrderInfo, ProductCatalog, RecordingListener,
    SubmissionDecision, SyncResult, TrackedOrder, TrackedOrderId, TrackerDriver, TrackerError,
    TrackerEvent, TrackerHandle, ValidationResult,
};

/// One line of a replay file.
#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum ReplayCommand {
    Catalog {
        catalog: ProductCatalog,
    },
    Snapshot {
        snapshot: MarketSnapshot,
    },
    Panel {
        entries: Vec<PanelOrderInfo>,
    },
    Stage {
        order: OutstandingOrder,
    },
    Confirm {
        event: ConfirmationEvent,
    },
    Fill {
        event: FillEvent,
    },
    Validate {
        proposal: OrderProposal,
        #[serde(default)]
        override_active: bool,
    },
    AdvanceClock {
        millis: i64,
    },
    Reset,
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "output", rename_all = "snake_case")]
enum ReplayOutput<'a> {
    Event {
        event: &'a TrackerEvent,
    },
    Synced {
        sync: SyncResult,
        value: OrderValueSummary,
    },
    Confirmed {
        order_id: TrackedOrderId,
    },
    Filled {
        order: TrackedOrder,
    },
    Validated {
        validation: ValidationResult,
        decision: SubmissionDecision,
    },
    Rejected {
        code: ErrorCode,
        message: String,
    },
    Ok,
}

struct Args {
    config: Option<PathBuf>,
    input: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = None;
    let mut input = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                bail!("usage: order-tracker [--config <yaml>] <events.jsonl>");
            }
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {arg}"),
        }
    }

    let input = input.context("usage: order-tracker [--config <yaml>] <events.jsonl>")?;
    Ok(Args { config, input })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    init_tracing(&config.observability.logging)?;

    if config.observability.metrics.enabled {
        let addr = config
            .observability
            .metrics
            .listen_addr
            .parse::<std::net::SocketAddr>()
            .context("parsing metrics listen address")?;
        init_metrics(addr)?;
    }

    let clock = ManualClock::at_millis(0);
    let mut tracker = OrderTracker::new(&config, ProductCatalog::new(), Arc::new(clock.clone()))?;
    let recorder = RecordingListener::new();
    tracker.add_listener(recorder.clone());
    let handle = TrackerDriver::spawn(tracker, 64);

    tracing::info!(input = %args.input.display(), "Starting replay");

    let file = std::fs::File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let mut out = std::io::stdout().lock();
    let mut replayed: u64 = 0;

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("reading line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command: ReplayCommand = serde_json::from_str(trimmed)
            .with_context(|| format!("parsing line {line_no}"))?;
        let output = execute(&handle, &clock, command)
            .await
            .with_context(|| format!("replaying line {line_no}"))?;

        for event in recorder.take() {
            write_line(&mut out, &ReplayOutput::Event { event: &event })?;
        }
        write_line(&mut out, &output)?;
        replayed += 1;
    }

    tracing::info!(replayed, "Replay finished");
    Ok(())
}

async fn execute(
    handle: &TrackerHandle,
    clock: &ManualClock,
    command: ReplayCommand,
) -> anyhow::Result<ReplayOutput<'static>> {
    let output = match command {
        ReplayCommand::Catalog { catalog } => {
            handle.set_catalog(catalog).await?;
            ReplayOutput::Ok
        }
        ReplayCommand::Snapshot { snapshot } => {
            handle.apply_snapshot(snapshot).await?;
            ReplayOutput::Ok
        }
        ReplayCommand::Panel { entries } => {
            let sync = handle.sync_panel(entries).await?;
            let value = OrderValueSummary::from_sync(&sync);
            ReplayOutput::Synced { sync, value }
        }
        ReplayCommand::Stage { order } => {
            handle.stage_outstanding(order).await?;
            ReplayOutput::Ok
        }
        ReplayCommand::Confirm { event } => match handle.confirm_outstanding(event).await {
            Ok(order_id) => ReplayOutput::Confirmed { order_id },
            Err(err) => rejected(err)?,
        },
        ReplayCommand::Fill { event } => match handle.remove_filled(event).await {
            Ok(order) => ReplayOutput::Filled { order },
            Err(err) => rejected(err)?,
        },
        ReplayCommand::Validate {
            proposal,
            override_active,
        } => {
            let validation = handle.validate_proposal(proposal.clone()).await?;
            let decision = handle.check_submission(proposal, override_active).await?;
            ReplayOutput::Validated {
                validation,
                decision,
            }
        }
        ReplayCommand::AdvanceClock { millis } => {
            clock.advance_millis(millis);
            ReplayOutput::Ok
        }
        ReplayCommand::Reset => {
            handle.reset().await?;
            ReplayOutput::Ok
        }
    };
    Ok(output)
}

/// Resync signals become output lines; anything else aborts the replay.
fn rejected(err: TrackerError) -> anyhow::Result<ReplayOutput<'static>> {
    if err.code().requires_resync() {
        Ok(ReplayOutput::Rejected {
            code: err.code(),
            message: err.to_string(),
        })
    } else {
        Err(err.into())
    }
}

fn write_line(out: &mut impl Write, output: &ReplayOutput<'_>) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, output)?;
    out.write_all(b"\n")?;
    Ok(())
}
