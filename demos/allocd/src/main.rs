use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hookline_core::{Coordinator, StartCondition, has_non_sidecar_tasks, has_sidecar_tasks};
use hookline_model::{TaskName, TaskSpec, TaskState, TaskStates, TaskStatus};
use hookline_observe::{LoggerConfig, logger_init};
use hookline_proc::{CgroupMode, TaskIdentity, WranglerConfigs, Wranglers};

const ALLOC_ID: &str = "demo-alloc";
const DEADLINE: Duration = Duration::from_secs(30);

const SAMPLE_ALLOCATION: &str = r#"[
    {"name": "proxy", "lifecycle": {"hook": "prestart", "sidecar": true}},
    {"name": "migrate", "lifecycle": {"hook": "prestart"}},
    {"name": "web", "lifecycle": {"hook": "main"}},
    {"name": "warmup", "lifecycle": {"hook": "poststart"}}
]"#;

type Report = (TaskName, TaskState);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    logger_init(&LoggerConfig::from_env()?)?;

    // 2) Allocation
    let tasks = load_tasks()?;
    info!(alloc = ALLOC_ID, tasks = tasks.len(), "allocation loaded");

    // 3) Sandboxes; the demo never touches the host hierarchy.
    let wranglers = Wranglers::new(WranglerConfigs {
        mode: Some(CgroupMode::Off),
        ..Default::default()
    })?;

    // 4) Coordinator + runners
    let mut coordinator = Coordinator::new(&tasks);
    for issue in coordinator.issues() {
        warn!(%issue, "task will not take part in lifecycle ordering");
    }

    let gates = coordinator.gates();
    let (tx, mut rx) = mpsc::channel::<Report>(64);
    for task in &tasks {
        wranglers.setup(TaskIdentity::new(ALLOC_ID, &task.name))?;
        tokio::spawn(run_task(task.clone(), gates.wait_handle_for(task), tx.clone()));
    }
    drop(tx);

    // 5) Drive: every report becomes a fresh snapshot for the coordinator.
    let by_name: HashMap<&str, &TaskSpec> = tasks.iter().map(|t| (t.name.as_str(), t)).collect();
    let mut states = TaskStates::new();

    let drive = async {
        while let Some((name, state)) = rx.recv().await {
            debug!(task = %name, status = ?state.status, "state reported");
            states.insert(name, state);
            coordinator.on_state_update(&states);

            let live: Vec<&TaskSpec> = states
                .iter()
                .filter(|(_, st)| st.status == TaskStatus::Running)
                .filter_map(|(name, _)| by_name.get(name.as_str()).copied())
                .collect();
            if has_sidecar_tasks(&live) && !has_non_sidecar_tasks(&live) {
                info!(live = live.len(), "only sidecars are running");
            }
        }
    };

    if tokio::time::timeout(DEADLINE, drive).await.is_err() {
        warn!(
            sidecars = ?coordinator.pending_sidecars(),
            ephemerals = ?coordinator.pending_ephemerals(),
            "deadline reached with tasks still waiting"
        );
    }
    info!(
        main_open = coordinator.is_main_open(),
        poststart_open = coordinator.is_poststart_open(),
        "allocation settled"
    );

    // 6) Teardown
    for task in &tasks {
        wranglers.destroy(&TaskIdentity::new(ALLOC_ID, &task.name))?;
    }
    Ok(())
}

fn load_tasks() -> anyhow::Result<Vec<TaskSpec>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading allocation from {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing allocation {path}"))
        }
        None => serde_json::from_str(SAMPLE_ALLOCATION).context("parsing sample allocation"),
    }
}

/// Stand-in task runner: waits for its gate, "starts", and reports back.
async fn run_task(task: TaskSpec, start: StartCondition, tx: mpsc::Sender<Report>) {
    debug!(task = %task.name, gate = %start.kind(), "waiting for start condition");
    start.wait().await;
    info!(task = %task.name, "task started");

    let mut state = TaskState::running();
    if tx.send((task.name.clone(), state.clone())).await.is_err() {
        return;
    }

    let ephemeral = task
        .lifecycle
        .as_ref()
        .is_some_and(|lc| lc.is_prestart() && !lc.is_sidecar());
    if ephemeral {
        tokio::time::sleep(Duration::from_millis(200)).await;
        state.status = TaskStatus::Dead;
        state.finished_at = Some(SystemTime::now());
        info!(task = %task.name, "task finished");
        if tx.send((task.name.clone(), state)).await.is_err() {
            warn!(task = %task.name, "driver stopped before exit was reported");
        }
    }
}
