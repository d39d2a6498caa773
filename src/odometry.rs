use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use odoline_kinematics::{DriveCommand, OdometryEngine, StepCounts, StepReport};

use crate::blackboard::{self, Blackboard};
use crate::bus::Topic;

/// Owns the engine and applies commands one at a time until every sender is dropped.
///
/// # Arguments
/// * `engine` - The engine; nothing else holds it while the task runs.
/// * `commands` - Drive commands from the input side, applied in arrival order.
/// * `bb` - Blackboard mirrored after every step.
/// * `reports` - Topic that receives one `StepReport` per command.
pub async fn run_odometry_task<R: Rng>(
    mut engine: OdometryEngine<R>,
    mut commands: mpsc::UnboundedReceiver<DriveCommand>,
    bb: Blackboard,
    reports: Topic<StepReport>,
) -> StepCounts {
    info!(initial_pose = %engine.pose(), "Odometry task started.");

    while let Some(command) = commands.recv().await {
        let report = engine.drive(command);
        if report.committed {
            debug!(%command, pose = %report.pose, slip = ?report.slip, "Command applied");
        } else {
            warn!(%command, pose = %report.pose, "Command would leave the workspace, ignored");
        }

        blackboard::record_step(&bb, &engine, &report);
        reports.publish(report);
    }

    let steps = engine.steps();
    info!(
        accepted = steps.accepted,
        rejected = steps.rejected,
        trail_length = engine.trajectory().path_length(),
        "Command channel closed. Odometry task finished."
    );
    steps
}
