use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;

use odoline_kinematics::{OdometryEngine, Point2, Pose, StepCounts, StepReport};

/// Latest robot state as seen by readers outside the odometry task.
///
/// Only the odometry task writes here; the renderer only reads.
#[derive(Debug, Default)]
pub struct State {
    pub pose: Pose,
    pub trail: Vec<Point2>,
    pub steps: StepCounts,
}

pub type Blackboard = Arc<RwLock<State>>;

pub fn from_engine<R>(engine: &OdometryEngine<R>) -> Blackboard {
    Arc::new(RwLock::new(State {
        pose: engine.pose(),
        trail: engine.trajectory().points().to_vec(),
        steps: engine.steps(),
    }))
}

/// Borrow the state without copying the trail. Drop the guard before
/// awaiting, or the odometry task blocks on its next write.
pub fn read(bb: &Blackboard) -> RwLockReadGuard<'_, State> {
    bb.read()
}

/// Mirror one step into the blackboard. Rejected steps only bump the counters.
pub fn record_step<R>(bb: &Blackboard, engine: &OdometryEngine<R>, report: &StepReport) {
    let mut g = bb.write();
    g.steps = engine.steps();
    if report.committed {
        g.pose = report.pose;
        g.trail.push(report.pose.position());
    }
}
