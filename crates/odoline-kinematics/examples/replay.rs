use odoline_kinematics::*;

fn main() {
    let workspace = Workspace::new(400.0, 400.0);
    let seed = 7;
    let script = [
        (DriveCommand::Forward, 20),
        (DriveCommand::CurveRight, 15),
        (DriveCommand::PivotLeft, 5),
        (DriveCommand::Forward, 80),
        (DriveCommand::CurveLeft, 10),
        (DriveCommand::Backward, 5),
    ];

    let config = match RobotConfig::new(20.0, 10.0, 100, workspace) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to build robot configuration: {}", e);
            return;
        }
    };

    match OdometryEngine::seeded(config, SlipModel::default(), seed) {
        Ok(mut engine) => {
            println!("Initializing replay...");
            println!("  {}", engine.config());
            println!("  {}", engine.slip_model());
            println!("  Seed:         {}", seed);
            println!("  Initial Pose: {}", engine.pose());
            println!();

            for (command, repeat) in script {
                for _ in 0..repeat {
                    let report = engine.drive(command);
                    if !report.committed {
                        println!("{:>12}: rejected at {}", command, report.pose);
                    } else if let Some(slip) = report.slip {
                        println!("{:>12}: slipped {} -> {}", command, slip, report.pose);
                    }
                }
                println!("{:>12} x{:<3} Pose: {}", command, repeat, engine.pose());
            }

            let steps = engine.steps();
            let trajectory = engine.trajectory();
            println!();
            println!("Replay complete.");
            println!("  Steps:       {} accepted, {} rejected", steps.accepted, steps.rejected);
            println!(
                "  Trail:       {} points, {:.2} units",
                trajectory.len(),
                trajectory.path_length()
            );
            println!("  Final Pose:  {}", engine.pose());
            println!("  Net offset:  {:.2}", trajectory.first().distance_to(trajectory.last()));
        }
        Err(e) => {
            eprintln!("Failed to initialize odometry engine: {:?}", e);
        }
    }
}
