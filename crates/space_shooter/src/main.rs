//! Space Shooter on the headless platform
//!
//! Usage: `space_shooter [config.toml|config.ron] [--peer]`
//!
//! Plays a scripted demo for `demo_frames` frames. With `--peer`, a second
//! thread impersonates another player through the remote inbox.

use arcade_engine::backend::HeadlessPlatform;
use arcade_engine::config::Config;
use arcade_engine::foundation::logging;
use arcade_engine::input::{InputEvent, KeyCode};
use arcade_engine::net::RemoteSender;
use arcade_engine::Engine;
use space_shooter::{RemoteEvent, ShooterConfig, ShooterEvent, SpaceShooter};
use std::thread;
use std::time::Duration;

const DEFAULT_CONFIG: &str = "space_shooter.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting Space Shooter");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let with_peer = args.iter().any(|arg| arg == "--peer");
    let config = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => ShooterConfig::load_from_file(path)?,
        None => ShooterConfig::load_or_default(DEFAULT_CONFIG)?,
    };
    config.validate()?;

    let platform = HeadlessPlatform::new()
        .with_script(demo_script(config.demo_frames))
        .with_frame_limit(config.demo_frames);
    let game = SpaceShooter::new(config.clone())?;
    let mut engine = Engine::new(config.engine.clone(), game, platform)?;

    let peer = with_peer.then(|| {
        let sender = engine.remote_sender();
        let level = (config.engine.level.width as f32, config.engine.level.height as f32);
        thread::spawn(move || run_peer(&sender, level))
    });

    engine.run()?;

    if let Some(handle) = peer {
        if handle.join().is_err() {
            log::warn!("Peer thread panicked");
        }
    }
    log::info!("Space Shooter finished after {} frames", engine.frame_count());
    Ok(())
}

/// Sweep left and right while firing, one batch of events per frame
fn demo_script(frames: u64) -> Vec<Vec<InputEvent>> {
    const SWEEP: u64 = 90;
    (0..frames)
        .map(|frame| {
            let mut events = Vec::new();
            if frame == 0 {
                events.push(InputEvent::KeyDown(KeyCode::Space));
            }
            if frame % SWEEP == 0 {
                let (release, press) = if (frame / SWEEP) % 2 == 0 {
                    (KeyCode::Left, KeyCode::Right)
                } else {
                    (KeyCode::Right, KeyCode::Left)
                };
                events.push(InputEvent::KeyUp(release));
                events.push(InputEvent::KeyDown(press));
            }
            events
        })
        .collect()
}

/// Another player joining, moving and firing a few missiles
fn run_peer(sender: &RemoteSender<ShooterEvent>, level: (f32, f32)) {
    const PLAYER_ID: u64 = 2;
    let send = |event| sender.send(ShooterEvent::Remote(event));

    if send(RemoteEvent::PlayerConnected { player_id: PLAYER_ID, name: "peer".to_string() }).is_err() {
        return;
    }
    let y = level.1 - 50.0;
    for step in 0..20u64 {
        let x = level.0 * (0.2 + 0.03 * step as f32);
        let position = RemoteEvent::PlayerPosition { player_id: PLAYER_ID, x, y, speed_x: 0.0, speed_y: 0.0 };
        let missile = RemoteEvent::MissileFired { player_id: PLAYER_ID, missile_id: step, x, y: y - 20.0 };
        if send(position).is_err() || send(missile).is_err() {
            return;
        }
        thread::sleep(Duration::from_millis(100));
    }
    if send(RemoteEvent::PlayerDisconnected { player_id: PLAYER_ID }).is_err() {
        log::debug!("Engine gone before the peer left");
    }
}
