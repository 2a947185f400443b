//! Episode drivers for evaluation and smoke runs.
//!
//! These play the role of the external driver: reset once, step until the
//! environment signals `terminated` or `truncated`, never auto-reset.

use crate::core::{Env, Result};
use crate::envs::gameboy::{Observation, Position};
use crate::spaces::{Discrete, Space};
use crate::utils::rng::{rng_from_seed, split_n, RngStream};

/// Chooses an action index from an observation.
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> usize;
}

impl<F: FnMut(&Observation) -> usize> Policy for F {
    fn act(&mut self, observation: &Observation) -> usize { self(observation) }
}

/// Uniform over an action space, reproducible from a seed.
pub struct RandomPolicy {
    space: Discrete,
    rng: RngStream,
}

impl RandomPolicy {
    pub fn new(space: Discrete, seed: u64) -> Self { Self { space, rng: rng_from_seed(seed) } }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> usize { self.space.sample(&mut self.rng) as usize }
}

/// One row per observed position. Row 0 is the reset observation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryRow {
    pub step: usize,
    pub x: u8,
    pub y: u8,
    pub map_id: u8,
    pub orientation: u8,
    pub reward: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    rows: Vec<TrajectoryRow>,
}

impl Trajectory {
    pub fn push(&mut self, step: usize, position: Position, reward: f32) {
        self.rows.push(TrajectoryRow {
            step,
            x: position.x,
            y: position.y,
            map_id: position.map_id,
            orientation: position.orientation,
            reward,
        });
    }

    pub fn rows(&self) -> &[TrajectoryRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.rows.iter().map(|r| Position::new(r.x, r.y, r.map_id, r.orientation))
    }

    /// Write `step,x,y,map_id,orientation,reward` rows with a header line.
    #[cfg(feature = "csv")]
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> std::result::Result<(), csv::Error> {
        let mut w = csv::Writer::from_writer(writer);
        for row in &self.rows {
            w.serialize(row)?;
        }
        w.flush()?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub total_reward: f64,
    pub steps: usize,
    pub terminated: bool,
    pub truncated: bool,
    pub trajectory: Trajectory,
}

/// Run one episode. Stops on `terminated`/`truncated`, or after `max_steps`
/// steps when given, in which case both flags stay false.
pub fn run_episode<E, P>(env: &mut E, policy: &mut P, seed: Option<u64>, max_steps: Option<usize>) -> Result<EpisodeSummary>
where
    E: Env<Obs = Observation>,
    E::Act: From<usize>,
    P: Policy + ?Sized,
{
    let (mut obs, _info) = env.reset(seed)?;
    let mut summary = EpisodeSummary {
        total_reward: 0.0,
        steps: 0,
        terminated: false,
        truncated: false,
        trajectory: Trajectory::default(),
    };
    if let Some(p) = obs.position() {
        summary.trajectory.push(0, p, 0.0);
    }

    while max_steps.is_none_or(|limit| summary.steps < limit) {
        let action = policy.act(&obs);
        let step = env.step(E::Act::from(action))?;
        summary.steps += 1;
        summary.total_reward += step.reward as f64;
        if let Some(p) = step.observation.position() {
            summary.trajectory.push(summary.steps, p, step.reward);
        }
        obs = step.observation;
        if step.terminated || step.truncated {
            summary.terminated = step.terminated;
            summary.truncated = step.truncated;
            break;
        }
    }
    Ok(summary)
}

/// Results of several consecutive episodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    pub episodes: Vec<EpisodeSummary>,
}

impl Evaluation {
    pub fn returns(&self) -> Vec<f64> { self.episodes.iter().map(|e| e.total_reward).collect() }

    pub fn mean_return(&self) -> f64 {
        if self.episodes.is_empty() { return 0.0; }
        self.episodes.iter().map(|e| e.total_reward).sum::<f64>() / self.episodes.len() as f64
    }

    /// Fraction of episodes that ended by reaching a goal.
    pub fn success_rate(&self) -> f64 {
        if self.episodes.is_empty() { return 0.0; }
        self.episodes.iter().filter(|e| e.terminated).count() as f64 / self.episodes.len() as f64
    }
}

/// Run `episodes` episodes back to back. With a root seed, each reset gets
/// its own derived seed.
pub fn evaluate<E, P>(
    env: &mut E,
    policy: &mut P,
    episodes: usize,
    seed: Option<u64>,
    max_steps: Option<usize>,
) -> Result<Evaluation>
where
    E: Env<Obs = Observation>,
    E::Act: From<usize>,
    P: Policy + ?Sized,
{
    let seeds = seed.map(|s| split_n(s, episodes));
    let mut evaluation = Evaluation::default();
    for i in 0..episodes {
        let episode_seed = seeds.as_ref().map(|s| s[i]);
        let summary = run_episode(env, policy, episode_seed, max_steps)?;
        log::info!(
            "episode {}: return {:.3} in {} steps (terminated: {}, truncated: {})",
            i + 1,
            summary.total_reward,
            summary.steps,
            summary.terminated,
            summary.truncated
        );
        evaluation.episodes.push(summary);
    }
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Info, Step};

    // Walks right one tile per step; reaching x == 3 terminates.
    struct Corridor {
        x: u8,
    }

    impl Env for Corridor {
        type Obs = Observation;
        type Act = usize;

        fn reset(&mut self, _seed: Option<u64>) -> Result<(Self::Obs, Info)> {
            self.x = 0;
            Ok((Observation::from(Position::new(self.x, 0, 1, 0)), Info::new()))
        }

        fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
            if action == 1 {
                self.x += 1;
            }
            let done = self.x >= 3;
            Ok(Step::new(Observation::from(Position::new(self.x, 0, 1, 0)), 1.0, done, false, Info::new()))
        }
    }

    #[test]
    fn run_episode_stops_on_termination() {
        let mut env = Corridor { x: 0 };
        let mut always_right = |_: &Observation| 1usize;
        let summary = run_episode(&mut env, &mut always_right, None, None).unwrap();
        assert_eq!(summary.steps, 3);
        assert!(summary.terminated);
        assert_eq!(summary.total_reward, 3.0);
        let xs: Vec<u8> = summary.trajectory.positions().map(|p| p.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn max_steps_caps_unfinished_episodes() {
        let mut env = Corridor { x: 0 };
        let mut idle = |_: &Observation| 0usize;
        let summary = run_episode(&mut env, &mut idle, None, Some(5)).unwrap();
        assert_eq!(summary.steps, 5);
        assert!(!summary.terminated && !summary.truncated);
    }

    #[test]
    fn evaluation_aggregates_returns() {
        let mut env = Corridor { x: 0 };
        let mut policy = RandomPolicy::new(Discrete::new(2), 11);
        let eval = evaluate(&mut env, &mut policy, 4, Some(1), Some(50)).unwrap();
        assert_eq!(eval.episodes.len(), 4);
        assert!(eval.mean_return() >= 3.0);
        assert_eq!(eval.success_rate(), 1.0);
    }
}
