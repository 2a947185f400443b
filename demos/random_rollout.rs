//! Random-policy rollouts against a scripted emulator.
//!
//! The scripted map is a short corridor on map 79 whose north end opens into
//! map 80, where the default goal tiles live. Run with
//! `RUST_LOG=info cargo run --example random_rollout -- --episodes 5`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gb_nav_gymnasium::{
    evaluate, Button, Env, NavigationConfig, NavigationEnv, RandomPolicy, RecordEpisodeStatistics, ScriptedEmulator,
};
use gb_nav_gymnasium::envs::gameboy::MemoryMap;

#[derive(Parser, Debug)]
#[command(about = "Drive the navigation environment with a random policy")]
struct Args {
    /// Number of episodes to run.
    #[arg(long, default_value_t = 3)]
    episodes: usize,
    /// Root seed for the policy and per-episode resets.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Episode budget in emulator ticks.
    #[arg(long, default_value_t = 60 * 400)]
    max_gameplay_time: u64,
    /// Snapshot file handed to the emulator. A placeholder is created when omitted.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn init_logging() {
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init()
}

fn corridor(map: MemoryMap) -> ScriptedEmulator {
    let (x, y, id, facing) =
        (map.player_x as usize, map.player_y as usize, map.map_id as usize, map.orientation as usize);
    ScriptedEmulator::new()
        .with_byte(map.player_x, 16)
        .with_byte(map.player_y, 14)
        .with_byte(map.map_id, 79)
        .with_byte(map.orientation, 0)
        .with_hook(move |mem, pressed| {
            let Some(button) = pressed else { return };
            match button {
                Button::Up => {
                    mem[facing] = 1;
                    if mem[id] == 79 && mem[y] <= 10 {
                        mem[id] = 80;
                        mem[y] = 14;
                    } else if mem[y] > 0 {
                        mem[y] -= 1;
                    }
                }
                Button::Down => {
                    mem[facing] = 0;
                    mem[y] = mem[y].saturating_add(1).min(14);
                }
                Button::Left => {
                    mem[facing] = 2;
                    mem[x] = mem[x].saturating_sub(1).max(14);
                }
                Button::Right => {
                    mem[facing] = 3;
                    mem[x] = mem[x].saturating_add(1).min(18);
                }
                _ => {}
            }
        })
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let placeholder;
    let snapshot = match args.snapshot {
        Some(path) => path,
        None => {
            placeholder = tempfile::NamedTempFile::new().context("creating placeholder snapshot")?;
            placeholder.as_file().write_all(b"zero_state")?;
            placeholder.path().to_path_buf()
        }
    };

    let config = NavigationConfig::default()
        .with_snapshot_path(&snapshot)
        .with_max_gameplay_time(args.max_gameplay_time);
    let emulator = corridor(config.memory_map);
    let env = NavigationEnv::new(emulator, config)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    let mut policy = RandomPolicy::new(env.action_space().clone(), args.seed);
    let mut env = RecordEpisodeStatistics::new(env);

    let evaluation = evaluate(&mut env, &mut policy, args.episodes, Some(args.seed), None)?;
    log::info!(
        "mean return {:.3} over {} episodes, success rate {:.0}%",
        evaluation.mean_return(),
        evaluation.episodes.len(),
        evaluation.success_rate() * 100.0
    );
    env.close();
    Ok(())
}
