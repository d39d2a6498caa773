use std::f64::consts::PI;

use odoline_kinematics::{
    DriveCommand, KinematicsError, OdometryEngine, Point2, RobotConfig, SlipModel, Workspace,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPSILON: f64 = 1e-6;

fn reference_config() -> RobotConfig {
    RobotConfig::new(20.0, 10.0, 100, Workspace::new(400.0, 400.0)).unwrap()
}

#[test]
fn single_forward_step_from_center() {
    let mut engine = OdometryEngine::seeded(reference_config(), SlipModel::disabled(), 0).unwrap();
    let report = engine.advance(10.0, 10.0);

    assert!(report.committed);
    assert!((report.pose.x - 203.14159).abs() < 1e-4);
    assert!((report.pose.y - 200.0).abs() < EPSILON);
    assert!(report.pose.theta.abs() < EPSILON);
    assert_eq!(engine.trajectory().len(), 2);
}

#[test]
fn square_loop_returns_to_start() {
    let mut engine = OdometryEngine::seeded(reference_config(), SlipModel::disabled(), 0).unwrap();

    // Five pivots make a quarter turn for this geometry.
    for _ in 0..4 {
        for _ in 0..10 {
            assert!(engine.drive(DriveCommand::Forward).committed);
        }
        for _ in 0..5 {
            assert!(engine.drive(DriveCommand::PivotLeft).committed);
        }
    }

    let pose = engine.pose();
    assert!((pose.x - 200.0).abs() < EPSILON);
    assert!((pose.y - 200.0).abs() < EPSILON);
    assert!((pose.theta - 2.0 * PI).abs() < EPSILON);

    let trajectory = engine.trajectory();
    assert_eq!(trajectory.len(), 61);
    assert_eq!(trajectory.first(), Point2::new(200.0, 200.0));
    assert!((trajectory.path_length() - 40.0 * PI).abs() < EPSILON);
}

#[test]
fn trajectory_grows_by_at_most_one_per_step() {
    let config = RobotConfig::new(20.0, 10.0, 100, Workspace::new(60.0, 40.0)).unwrap();
    let mut engine = OdometryEngine::seeded(config, SlipModel::default(), 2024).unwrap();
    let mut commands = StdRng::seed_from_u64(8);

    let mut rejected = 0;
    for _ in 0..2_000 {
        let before = engine.trajectory().points().to_vec();
        let command = DriveCommand::ALL[commands.random_range(0..DriveCommand::ALL.len())];
        let report = engine.drive(command);
        let after = engine.trajectory().points();

        if report.committed {
            assert_eq!(after.len(), before.len() + 1);
            assert_eq!(after[before.len()], report.pose.position());
        } else {
            rejected += 1;
            assert_eq!(after.len(), before.len());
        }
        assert_eq!(&after[..before.len()], &before[..]);

        let pose = engine.pose();
        assert!(config.workspace.contains(pose.x, pose.y));
    }

    // A random walk in a small room runs into the walls.
    assert!(rejected > 0);
    assert_eq!(engine.steps().rejected, rejected);
    assert_eq!(engine.steps().total(), 2_000);
}

#[test]
fn same_seed_replays_same_trajectory_with_slip() {
    let slip = SlipModel::new(0.5, 0.9, 1.0).unwrap();
    let script = [
        DriveCommand::Forward,
        DriveCommand::CurveLeft,
        DriveCommand::Forward,
        DriveCommand::CurveRight,
        DriveCommand::PivotLeft,
        DriveCommand::Backward,
    ];

    let run = |seed: u64| {
        let mut engine = OdometryEngine::seeded(reference_config(), slip, seed).unwrap();
        for command in script.iter().cycle().take(120) {
            engine.drive(*command);
        }
        engine.trajectory().clone()
    };

    assert_eq!(run(31), run(31));
}

#[test]
fn invalid_geometry_is_rejected_at_construction() {
    let valid = RobotConfig {
        wheel_spacing: 20.0,
        wheel_diameter: 10.0,
        encoder_resolution: 100,
        workspace: Workspace::new(400.0, 400.0),
    };
    let bad = [
        RobotConfig {
            wheel_spacing: 0.0,
            ..valid
        },
        RobotConfig {
            wheel_diameter: -1.0,
            ..valid
        },
        RobotConfig {
            encoder_resolution: 0,
            ..valid
        },
    ];
    for config in bad {
        let err = OdometryEngine::new(config).unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidConfig(_)));
    }
}
