// Wrappers that compose around any `Env`:
// - TransformObservation
// - RecordEpisodeStatistics

use std::marker::PhantomData;

use crate::core::{Env, Info, InfoValue, Result, Step};

/// Maps observations through a user-provided function.
pub struct TransformObservation<E, F, O2>
where
    E: Env,
    F: Fn(&E::Obs) -> O2,
{
    inner: E,
    f: F,
    _marker: PhantomData<O2>,
}

impl<E, F, O2> TransformObservation<E, F, O2>
where
    E: Env,
    F: Fn(&E::Obs) -> O2,
{
    pub fn new(inner: E, f: F) -> Self { Self { inner, f, _marker: PhantomData } }

    pub fn inner(&self) -> &E { &self.inner }
    pub fn into_inner(self) -> E { self.inner }
}

impl<E, F, O2> Env for TransformObservation<E, F, O2>
where
    E: Env,
    F: Fn(&E::Obs) -> O2,
{
    type Obs = O2;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        let (obs, info) = self.inner.reset(seed)?;
        Ok(((self.f)(&obs), info))
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let s = self.inner.step(action)?;
        Ok(Step::new((self.f)(&s.observation), s.reward, s.terminated, s.truncated, s.info))
    }

    fn close(&mut self) { self.inner.close() }
}

/// Tracks cumulative return and episode length, like a training monitor.
/// On the step that ends an episode it adds to the step's Info:
/// - "episode_return": f64
/// - "episode_length": u64
pub struct RecordEpisodeStatistics<E: Env> {
    inner: E,
    ep_return: f64,
    ep_length: u64,
    completed: Vec<(f64, u64)>,
}

impl<E: Env> RecordEpisodeStatistics<E> {
    pub fn new(inner: E) -> Self { Self { inner, ep_return: 0.0, ep_length: 0, completed: Vec::new() } }

    pub fn inner(&self) -> &E { &self.inner }
    pub fn into_inner(self) -> E { self.inner }

    /// `(return, length)` of every finished episode, oldest first.
    pub fn completed_episodes(&self) -> &[(f64, u64)] { &self.completed }
}

impl<E: Env> Env for RecordEpisodeStatistics<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        let out = self.inner.reset(seed)?;
        self.ep_return = 0.0;
        self.ep_length = 0;
        Ok(out)
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        self.ep_return += s.reward as f64;
        self.ep_length += 1;
        if s.is_done() {
            s.info.insert("episode_return", InfoValue::from(self.ep_return));
            s.info.insert("episode_length", InfoValue::from(self.ep_length));
            log::debug!("episode finished: return {:.3}, length {}", self.ep_return, self.ep_length);
            self.completed.push((self.ep_return, self.ep_length));
            self.ep_return = 0.0;
            self.ep_length = 0;
        }
        Ok(s)
    }

    fn close(&mut self) { self.inner.close() }
}
