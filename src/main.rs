mod blackboard;   // shared latest pose and trail, read by the renderer
mod bus;          // broadcast topic for step reports
mod settings;     // config/default.toml plus ODOLINE__* env overrides
mod graphics;     // macroquad window
mod input;        // key bindings
mod odometry;     // task that owns the engine

use anyhow::Context;
use odoline_kinematics::{OdometryEngine, StepReport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bus::Topic;
use settings::Settings;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Odoline started. Loading settings and spawning the odometry task...");

    let settings = settings::load_config().context("failed to load settings")?;
    let engine = build_engine(&settings)?;

    let bb = blackboard::from_engine(&engine);
    let report_topic: Topic<StepReport> = Topic::new(64);
    let reports_rx_for_vis = report_topic.subscribe();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let tokio_rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let odometry = tokio_rt.spawn(odometry::run_odometry_task(
        engine,
        command_rx,
        bb.clone(),
        report_topic,
    ));

    // Blocks until the window closes. The command sender moves into the loop,
    // so leaving it ends the odometry task.
    macroquad::Window::from_config(
        graphics::window_conf(&settings),
        graphics::run_visualization_loop(
            bb,
            reports_rx_for_vis,
            command_tx,
            settings.display.clone(),
        ),
    );

    let steps = tokio_rt.block_on(odometry).context("odometry task failed")?;
    info!(accepted = steps.accepted, rejected = steps.rejected, "Odoline finished.");
    Ok(())
}

fn build_engine(settings: &Settings) -> anyhow::Result<OdometryEngine> {
    let engine = match settings.simulation.fixed_seed() {
        Some(seed) => {
            info!(seed, "Slip draws seeded for replay");
            OdometryEngine::seeded(settings.robot, settings.slip, seed)
        }
        None => OdometryEngine::with_rng(settings.robot, settings.slip, StdRng::from_os_rng()),
    };
    let engine = engine.context("invalid robot configuration")?;
    info!(pose = %engine.pose(), workspace = %engine.config().workspace, "Odometry engine ready");
    Ok(engine)
}
