//! Environment bindings for Python.
//!
//! Seats are addressed by agent name (`player_<i>`), with per-agent values
//! returned as dicts keyed by that name.

use std::collections::HashMap;

use numpy::PyArray1;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{EnvConfig, EnvError, PlayerId, PlayerMap};
use crate::env::{HighSocietyEnv, Info, Observation};

fn to_py_err(err: EnvError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

fn parse_agent(name: &str, player_count: usize) -> PyResult<PlayerId> {
    name.strip_prefix("player_")
        .and_then(|seat| seat.parse::<u8>().ok())
        .filter(|&seat| usize::from(seat) < player_count)
        .map(PlayerId::new)
        .ok_or_else(|| PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("unknown agent: {name}")))
}

fn by_name<T: Clone>(map: &PlayerMap<T>) -> HashMap<String, T> {
    map.iter().map(|(p, v)| (p.agent_name(), v.clone())).collect()
}

fn observation_dict<'py>(py: Python<'py>, obs: &Observation) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (name, values) in obs.fields() {
        dict.set_item(name, PyArray1::from_slice_bound(py, values))?;
    }
    Ok(dict)
}

/// Python wrapper for HighSocietyEnv.
#[pyclass(name = "HighSocietyEnv")]
#[derive(Clone)]
pub struct PyHighSocietyEnv(pub HighSocietyEnv);

#[pymethods]
impl PyHighSocietyEnv {
    /// Create a new environment.
    ///
    /// # Arguments
    /// - player_count: Number of seats, 3 to 5 (default: 3)
    /// - seed: Seed of the first deal (default: 0)
    /// - max_steps: Truncate after this many steps (default: no limit)
    #[new]
    #[pyo3(signature = (player_count = 3, seed = 0, max_steps = None))]
    fn new(player_count: usize, seed: u64, max_steps: Option<usize>) -> PyResult<Self> {
        let mut config = EnvConfig::new().with_player_count(player_count).with_seed(seed);
        config.max_steps = max_steps;
        HighSocietyEnv::new(config).map(Self).map_err(to_py_err)
    }

    /// Deal a new game. Returns `(observation, info)` for the selected agent.
    #[pyo3(signature = (seed = None))]
    fn reset<'py>(&mut self, py: Python<'py>, seed: Option<u64>) -> PyResult<(Bound<'py, PyDict>, Info)> {
        let (obs, info) = self.0.reset(seed);
        Ok((observation_dict(py, &obs)?, info))
    }

    /// Act for the selected agent with a raise intensity (0 passes).
    fn step(&mut self, action: f32) -> PyResult<()> {
        self.0.step(action).map_err(to_py_err)
    }

    /// Observation of `agent` as a dict of numpy arrays.
    fn observe<'py>(&self, py: Python<'py>, agent: &str) -> PyResult<Bound<'py, PyDict>> {
        let player = parse_agent(agent, self.0.player_count())?;
        let obs = self.0.observe(player).map_err(to_py_err)?;
        observation_dict(py, &obs)
    }

    /// Flattened observation of `agent`, fields in alphabetical order.
    fn observe_flat<'py>(&self, py: Python<'py>, agent: &str) -> PyResult<Bound<'py, PyArray1<f32>>> {
        let player = parse_agent(agent, self.0.player_count())?;
        let obs = self.0.observe(player).map_err(to_py_err)?;
        Ok(PyArray1::from_vec_bound(py, obs.to_vec()))
    }

    #[getter]
    fn agents(&self) -> Vec<String> {
        PlayerId::all(self.0.player_count()).map(PlayerId::agent_name).collect()
    }

    #[getter]
    fn agent_selection(&self) -> String {
        self.0.agent_selection().agent_name()
    }

    #[getter]
    fn rewards(&self) -> HashMap<String, f64> {
        by_name(self.0.rewards())
    }

    #[getter]
    fn cumulative_rewards(&self) -> HashMap<String, f64> {
        by_name(self.0.cumulative_rewards())
    }

    #[getter]
    fn terminations(&self) -> HashMap<String, bool> {
        by_name(self.0.terminations())
    }

    #[getter]
    fn truncations(&self) -> HashMap<String, bool> {
        by_name(self.0.truncations())
    }

    fn info(&self, agent: &str) -> PyResult<Info> {
        let player = parse_agent(agent, self.0.player_count())?;
        Ok(self.0.info(player).cloned().unwrap_or_default())
    }

    #[getter]
    fn obs_dim(&self) -> usize {
        self.0.obs_dim()
    }

    #[getter]
    fn action_dim(&self) -> usize {
        self.0.action_dim()
    }

    #[getter]
    fn round_number(&self) -> u32 {
        self.0.round_number()
    }

    #[getter]
    fn current_bid(&self) -> f64 {
        self.0.current_bid()
    }

    fn __repr__(&self) -> String {
        format!(
            "HighSocietyEnv(players={}, round={}, selection={})",
            self.0.player_count(),
            self.0.round_number(),
            self.0.agent_selection()
        )
    }
}
