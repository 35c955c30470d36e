use std::{collections::HashSet, path::PathBuf, process::ExitCode};

use clap::Parser;
use glam::Mat4;
use glow::HasContext;
use levelview::{
    abs::{App, GlDevice},
    camera::Camera,
    logging,
    scene::loader::{LoaderConfig, SceneLoader},
};
use sdl2::{event::Event, event::WindowEvent, keyboard::Keycode};

/// Loads a level file and flies around it.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Level descriptor to load.
    #[arg(default_value = "assets/Level_01.json")]
    level: PathBuf,

    /// Directory that relative mesh and shader paths are resolved against.
    #[arg(long)]
    asset_root: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    #[arg(long)]
    fullscreen: bool,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

const MOUSE_SENSITIVITY: f32 = 0.1;

fn projection(fov: f32, aspect_ratio: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov.to_radians(), aspect_ratio, 0.1, 100.0)
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_level, args.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let mut app = match App::new("levelview", args.width, args.height, args.fullscreen) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to create window: {}", e);
            return ExitCode::FAILURE;
        }
    };

    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
        app.gl.clear_color(0.45, 0.55, 0.60, 1.0);
    }

    let device = GlDevice::new(&app.gl);
    let loader = SceneLoader::new(&device, &device).with_config(LoaderConfig {
        asset_root: args.asset_root.clone(),
    });
    let scene = match loader.load(&args.level) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut camera = Camera::default();
    let mut projection_matrix = projection(args.fov, app.aspect_ratio());
    let mut keys_down: HashSet<Keycode> = HashSet::new();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(width, height),
                    ..
                } => {
                    unsafe {
                        app.gl.viewport(0, 0, width, height);
                    }
                    projection_matrix =
                        projection(args.fov, width as f32 / height.max(1) as f32);
                }
                Event::MouseMotion {
                    mousestate, xrel, yrel, ..
                } if mousestate.left() => {
                    camera.set_yaw_pitch(
                        camera.yaw() + xrel as f32 * MOUSE_SENSITIVITY,
                        camera.pitch() - yrel as f32 * MOUSE_SENSITIVITY,
                    );
                }
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    keys_down.insert(keycode);
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    keys_down.remove(&keycode);
                }
                _ => {}
            }
        }

        for keycode in &keys_down {
            match *keycode {
                Keycode::W => camera.move_forward(),
                Keycode::S => camera.move_backward(),
                Keycode::A => camera.move_left(),
                Keycode::D => camera.move_right(),
                Keycode::Space => camera.move_up(),
                Keycode::LCtrl => camera.move_down(),
                Keycode::Q => camera.rotate_left(),
                Keycode::E => camera.rotate_right(),
                _ => {}
            }
        }

        unsafe {
            app.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        scene.bind(&device, camera.look_at(), projection_matrix);
        app.window.gl_swap_window();
    }

    loader.teardown(scene);
    ExitCode::SUCCESS
}
