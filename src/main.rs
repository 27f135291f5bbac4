//! Operator entry point: wires the operation controller together and
//! exposes the three control-surface actions (spec.md §4.E, §6 "Control
//! surface") over a line-oriented stdin console, standing in for the
//! visualization GUI the core does not own (spec.md §1).

use inspection_ops::agent::{SimulatedExplorer, SimulatedInspector};
use inspection_ops::config::{self, PlannerKind};
use inspection_ops::operation::OperationController;
use inspection_ops::{error, info};
use std::env;
use std::io::BufRead;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let base_positions_path = env::var("BASE_POSITIONS_PATH")
        .unwrap_or_else(|_| config::DEFAULT_BASE_POSITIONS_PATH.to_string());
    let planner_kind = match env::var("PLANNER") {
        Err(_) => PlannerKind::NearestNeighbor,
        Ok(raw) => match PlannerKind::parse(&raw) {
            Ok(kind) => kind,
            Err(err) => {
                error!("invalid PLANNER selection: {err}");
                std::process::exit(1);
            }
        },
    };
    info!("planner selected: {planner_kind}");

    let telemetry_state = inspection_ops::telemetry::TelemetryState::new();

    let explorer = Arc::new(SimulatedExplorer::new());
    let inspector = Arc::new(SimulatedInspector::with_telemetry(Some(Arc::clone(&telemetry_state))));

    let controller = match OperationController::new(
        &PathBuf::from(&base_positions_path),
        explorer,
        inspector,
        planner_kind,
    )
    .await
    {
        Ok(controller) => controller,
        Err(err) => {
            error!("failed to construct operation controller: {err}");
            std::process::exit(1);
        }
    };

    let telemetry_cancel = CancellationToken::new();
    let drone_ip = env::var("DRONE_IP").unwrap_or_else(|_| config::DEFAULT_DRONE_IP.to_string());
    let drone_addr: SocketAddr = format!("{drone_ip}:{}", config::DRONE_PORT)
        .parse()
        .unwrap_or_else(|_| ([127, 0, 0, 1], config::DRONE_PORT).into());
    let cancel = telemetry_cancel.clone();
    tokio::spawn(async move {
        inspection_ops::telemetry::run_listener(config::LOCAL_TELEMETRY_PORT, drone_addr, telemetry_state, cancel).await;
    });

    info!("starting operation, base positions loaded from {base_positions_path}");
    controller.start().await;

    info!("operator console ready: commands are 'next', 'stop', 'status', 'quit'");
    run_console(&controller).await;

    telemetry_cancel.cancel();
}

async fn run_console(controller: &Arc<OperationController>) {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        if controller.status().await == inspection_ops::operation::OperationStatus::Finished {
            info!("operation finished, exiting console");
            return;
        }

        let Some(line) = rx.recv().await else { return };
        match line.trim() {
            "next" => controller.next_mission().await,
            "stop" => controller.stop_inspection().await,
            "status" => info!("operation status: {:?}", controller.status().await),
            "quit" | "exit" => return,
            "" => {}
            other => error!("unknown command: {other}"),
        }
    }
}
