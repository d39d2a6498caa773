use macroquad::prelude::*;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use odoline_kinematics::{DriveCommand, Point2, Pose, StepReport};

use crate::blackboard::{self, Blackboard};
use crate::settings::{DisplaySettings, Settings};
use crate::input;

/// Seconds the "rejected" banner stays up after a boundary rejection.
const REJECT_FLASH_SECS: f64 = 0.6;

// Function to configure the macroquad window
pub fn window_conf(settings: &Settings) -> Conf {
    let workspace = settings.robot.workspace;
    Conf {
        window_title: "Odoline Odometry".to_string(),
        window_width: (workspace.width as f32 * settings.display.scale).round() as i32,
        window_height: (workspace.height as f32 * settings.display.scale).round() as i32,
        window_resizable: false,
        high_dpi: true,
        ..Default::default()
    }
}

/// Workspace coordinates map straight onto the window, x right and y down.
fn to_screen(point: Point2, scale: f32) -> Vec2 {
    vec2(point.x as f32 * scale, point.y as f32 * scale)
}

/// Axis-aligned body rectangle centered on the pose.
fn body_rect(pose: &Pose, display: &DisplaySettings) -> Rect {
    let center = to_screen(pose.position(), display.scale);
    let w = display.body_width * display.scale;
    let h = display.body_height * display.scale;
    Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
}

/// Screen-space line segments between consecutive trail points.
fn trail_segments(trail: &[Point2], scale: f32) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    trail
        .windows(2)
        .map(move |pair| (to_screen(pair[0], scale), to_screen(pair[1], scale)))
}

fn heading_line(pose: &Pose, display: &DisplaySettings) -> (Vec2, Vec2) {
    let tip = pose.heading_tip(f64::from(display.heading_length));
    (to_screen(pose.position(), display.scale), to_screen(tip, display.scale))
}

/// Drain pending step reports. Returns `false` once the odometry task is gone.
fn drain_reports(
    reports_rx: &mut broadcast::Receiver<Arc<StepReport>>,
    last_rejection: &mut Option<f64>,
) -> bool {
    loop {
        match reports_rx.try_recv() {
            Ok(report) => {
                if !report.committed {
                    *last_rejection = Some(get_time());
                }
            }
            Err(broadcast::error::TryRecvError::Empty) => return true,
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                warn!("Visualization report receiver lagged by {} messages.", n);
            }
            Err(broadcast::error::TryRecvError::Closed) => {
                error!("Step report channel closed. Exiting visualization loop.");
                return false;
            }
        }
    }
}

pub async fn run_visualization_loop(
    bb: Blackboard,
    mut reports_rx: broadcast::Receiver<Arc<StepReport>>,
    commands: mpsc::UnboundedSender<DriveCommand>,
    display: DisplaySettings,
) {
    info!("Visualization loop starting inside graphics module...");
    let mut last_rejection: Option<f64> = None;

    loop {
        if is_key_pressed(input::QUIT_KEY) {
            info!("Quit key pressed.");
            break;
        }
        for command in input::pressed_commands() {
            if commands.send(command).is_err() {
                error!("Odometry task is gone, dropping {} command.", command);
            }
        }
        if !drain_reports(&mut reports_rx, &mut last_rejection) {
            break;
        }

        clear_background(WHITE);

        // The guard is dropped before `next_frame().await`.
        {
            let state = blackboard::read(&bb);

            for (a, b) in trail_segments(&state.trail, display.scale) {
                draw_line(a.x, a.y, b.x, b.y, 1.0, GRAY);
            }

            let body = body_rect(&state.pose, &display);
            draw_rectangle(body.x, body.y, body.w, body.h, RED);
            let (from, to) = heading_line(&state.pose, &display);
            draw_line(from.x, from.y, to.x, to.y, 2.0, WHITE);

            draw_text(
                &format!(
                    "x={:.2} y={:.2} th={:.2}",
                    state.pose.x,
                    state.pose.y,
                    state.pose.wrapped_heading()
                ),
                10.0,
                20.0,
                20.0,
                BLACK,
            );
            draw_text(
                &format!("steps: {} ok / {} rejected", state.steps.accepted, state.steps.rejected),
                10.0,
                40.0,
                20.0,
                DARKGRAY,
            );
        }
        if last_rejection.is_some_and(|t| get_time() - t < REJECT_FLASH_SECS) {
            draw_text("rejected: workspace boundary", 10.0, 60.0, 20.0, RED);
        }

        next_frame().await
    }

    info!("Visualization loop finished.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use odoline_kinematics::{RobotConfig, SlipModel, Workspace};
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_body_rect_is_centered() {
        let display = DisplaySettings::default();
        let rect = body_rect(&Pose::new(200.0, 100.0, 1.0), &display);
        assert_eq!(rect, Rect::new(180.0, 90.0, 40.0, 20.0));
    }

    #[test]
    fn test_trail_segments_join_consecutive_points() {
        let trail = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(1.0, 2.0)];
        let segments: Vec<_> = trail_segments(&trail, 2.0).collect();
        assert_eq!(
            segments,
            vec![(vec2(0.0, 0.0), vec2(2.0, 0.0)), (vec2(2.0, 0.0), vec2(2.0, 4.0))]
        );
        assert_eq!(trail_segments(&trail[..1], 2.0).count(), 0);
    }

    #[test]
    fn test_heading_line_scaled() {
        let display = DisplaySettings {
            scale: 2.0,
            ..DisplaySettings::default()
        };
        let (from, to) = heading_line(&Pose::new(10.0, 10.0, FRAC_PI_2), &display);
        assert!((from - vec2(20.0, 20.0)).length() < EPSILON);
        assert!((to - vec2(20.0, 50.0)).length() < EPSILON);
    }

    #[test]
    fn test_window_matches_workspace() {
        let settings = Settings {
            robot: RobotConfig::new(20.0, 10.0, 100, Workspace::new(400.0, 300.0)).unwrap(),
            slip: SlipModel::default(),
            simulation: Default::default(),
            display: DisplaySettings {
                scale: 1.5,
                ..DisplaySettings::default()
            },
        };
        let conf = window_conf(&settings);
        assert_eq!(conf.window_width, 600);
        assert_eq!(conf.window_height, 450);
    }
}
