use anyhow::Context;
use clap::{Parser, Subcommand};
use skyline_common::SkylineConfig;
use skyline_input::{Action, InputState, KeyBindings};
use skyline_kernel::{StepOutcome, World};
use skyline_render::{CityLayout, CityParams, DebugTextRenderer, RenderView, Renderer};
use skyline_tools::{DebugOverlay, FrameStats};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyline-cli", about = "Headless tools for the skyline fly-through")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML or JSON config file; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective spawn and physics settings
    Info,
    /// Fly a scripted path: accelerate, then brake, with optional turning
    Simulate {
        /// Frames spent holding the forward key
        #[arg(long, default_value = "120")]
        forward: u32,
        /// Frames spent holding the brake key afterwards
        #[arg(long, default_value = "120")]
        brake: u32,
        /// Fixed frame delta in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Horizontal mouse delta applied every frame
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        turn: f32,
        /// Print a frame dump every N frames (0 prints only the last)
        #[arg(long, default_value = "0")]
        every: u32,
    },
    /// Print the effective config as YAML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SkylineConfig> {
    let config = match path {
        Some(path) => SkylineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SkylineConfig::default(),
    };
    Ok(config)
}

/// A scripted flight: holds bound keys for a number of fixed-length frames.
struct Flight<'a> {
    world: World,
    input: InputState,
    bindings: &'a KeyBindings,
    dt: f32,
    turn: f32,
}

impl Flight<'_> {
    /// Hold `action`'s bound key for `frames` frames, stepping the world each one.
    fn hold(
        &mut self,
        action: Action,
        frames: u32,
        mut on_frame: impl FnMut(&World),
    ) -> anyhow::Result<()> {
        let key = self
            .bindings
            .key_for(action)
            .with_context(|| format!("no key bound to {action:?}"))?;
        self.input.press(key);
        for _ in 0..frames {
            if self.turn != 0.0 {
                self.input.mouse_moved(self.turn, 0.0);
            }
            let controls = self.input.control_frame(self.bindings);
            if self.world.step(&controls, self.dt) == StepOutcome::Skipped {
                anyhow::bail!("frame delta {} was rejected", self.dt);
            }
            self.input.end_frame();
            on_frame(&self.world);
        }
        self.input.release(key);
        Ok(())
    }
}

/// `RUST_LOG` when set, otherwise `default`.
fn log_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("skyline-cli v{}", env!("CARGO_PKG_VERSION"));
            let world = World::new(&config);
            let p = world.player().position();
            println!("spawn: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z);
            println!(
                "physics: drag>{} stop<{} gravity={}",
                config.physics.drag_threshold,
                config.physics.stop_threshold,
                if world.gravity_enabled() { "on" } else { "off" }
            );
            println!(
                "player: mass={} drag={} thrust={} brake={}",
                config.player.mass,
                config.player.drag,
                config.player.command_magnitude,
                config.player.braking_constant
            );
            let city = CityLayout::generate(&CityParams::default());
            println!("city: {} buildings", city.buildings().len());
        }
        Commands::Simulate {
            forward,
            brake,
            dt,
            turn,
            every,
        } => {
            let bindings = KeyBindings::from_config(&config.bindings)?;
            let mut flight = Flight {
                world: World::new(&config),
                input: InputState::new(),
                bindings: &bindings,
                dt,
                turn,
            };
            let mut stats = FrameStats::from_config(&config.frame);
            let city = CityLayout::generate(&CityParams::default());
            let renderer = DebugTextRenderer::new();

            let mut dump = |world: &World| {
                stats.record(dt);
                if every > 0 && world.tick() % u64::from(every) == 0 {
                    let view = RenderView::from_player(world.player(), &config.camera);
                    print!("{}", renderer.render(world, &city, &view));
                }
            };

            flight.hold(Action::MoveForward, forward, &mut dump)?;
            let peak = flight.world.player().velocity().length();
            flight.hold(Action::Brake, brake, &mut dump)?;

            let world = &flight.world;
            tracing::info!(
                ticks = world.tick(),
                elapsed = world.elapsed(),
                "scripted flight finished"
            );
            let view = RenderView::from_player(world.player(), &config.camera);
            print!("{}", renderer.render(world, &city, &view));
            println!("peak speed after thrust: {peak:.2}");
            println!("{}", DebugOverlay::capture(world.player(), stats.fps()));
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(bindings: &KeyBindings) -> Flight<'_> {
        Flight {
            world: World::new(&SkylineConfig::default()),
            input: InputState::new(),
            bindings,
            dt: 0.016,
            turn: 0.0,
        }
    }

    #[test]
    fn thrust_then_brake_slows_down() {
        let bindings = KeyBindings::default();
        let mut flight = flight(&bindings);
        flight.hold(Action::MoveForward, 60, |_| {}).unwrap();
        let peak = flight.world.player().velocity().length();
        assert!(peak > 1.0);
        flight.hold(Action::Brake, 60, |_| {}).unwrap();
        assert!(flight.world.player().velocity().length() < peak);
        assert_eq!(flight.world.tick(), 120);
    }

    #[test]
    fn keys_are_released_between_phases() {
        let bindings = KeyBindings::default();
        let mut flight = flight(&bindings);
        flight.hold(Action::MoveForward, 1, |_| {}).unwrap();
        let frame = flight.input.control_frame(&bindings);
        assert!(frame.is_idle());
    }

    #[test]
    fn log_filter_defers_to_rust_log() {
        let filter = log_filter("debug").to_string();
        match std::env::var("RUST_LOG") {
            Ok(value) if EnvFilter::try_new(&value).is_ok() => {
                assert_eq!(filter, EnvFilter::new(value).to_string());
            }
            _ => assert_eq!(filter, "debug"),
        }
    }

    #[test]
    fn rejected_delta_is_an_error() {
        let bindings = KeyBindings::default();
        let mut flight = Flight {
            dt: f32::NAN,
            ..flight(&bindings)
        };
        assert!(flight.hold(Action::MoveForward, 1, |_| {}).is_err());
    }
}
