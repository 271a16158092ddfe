use super::FemState;
use crate::base::{Config, FemError, Result};

/// Rounds a number to the given number of significant digits
pub fn round_sig_digits(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = f64::floor(f64::log10(f64::abs(value)));
    let factor = f64::powi(10.0, digits - 1 - magnitude as i32);
    (value * factor).round() / factor
}

/// Controls the increment (time step) sizing of one analysis stage
///
/// The first increment is `span/nincs`. With adaptive stepping, a
/// converged increment grows the next Δt by 1.5 (capped at `span/nincs`
/// and at the remaining time) and a failed increment halves it; both are
/// rounded to 3 significant digits for stable reporting. A Δt below
/// `dt_min` is fatal.
pub struct ControlTime<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Maximum increment size (span / nincs)
    dt_max: f64,

    /// Minimum increment size
    dt_min: f64,

    /// Next output time
    t_out: f64,
}

impl<'a> ControlTime<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config) -> Result<Self> {
        let span = config.t_fin - config.t_ini;
        Ok(ControlTime {
            config,
            dt_max: span / (config.nincs as f64),
            dt_min: config.dt_min(),
            t_out: config.t_ini,
        })
    }

    /// Initializes the time and the first increment size
    pub fn initialize(&mut self, state: &mut FemState) -> Result<()> {
        state.t = self.config.t_ini;
        state.dt = round_sig_digits(self.dt_max, 3);
        if state.dt < self.dt_min {
            return Err(FemError::TimestepTooSmall { dt: state.dt });
        }
        self.t_out = if self.config.nouts > 0 {
            self.config.t_ini + (self.config.t_fin - self.config.t_ini) / (self.config.nouts as f64)
        } else {
            f64::INFINITY
        };
        Ok(())
    }

    /// Tells whether the stage has reached its final time or not
    pub fn finished(&self, t: f64) -> bool {
        t >= self.config.t_fin - self.dt_min
    }

    /// Grows the increment after a converged step (adaptive stepping)
    pub fn grow(&self, state: &mut FemState) {
        if !self.config.autoinc {
            return;
        }
        let remaining = self.config.t_fin - state.t;
        state.dt = f64::min(
            f64::min(round_sig_digits(1.5 * state.dt, 3), self.dt_max),
            remaining,
        );
    }

    /// Halves the increment after a failed step; fails when the minimum
    /// allowed increment size is breached
    pub fn halve(&self, state: &mut FemState) -> Result<()> {
        state.dt = round_sig_digits(state.dt / 2.0, 3);
        if state.dt < self.dt_min {
            return Err(FemError::TimestepTooSmall { dt: state.dt });
        }
        Ok(())
    }

    /// Caps the increment by the remaining time of the stage
    pub fn cap_by_remaining(&self, state: &mut FemState) {
        let remaining = self.config.t_fin - state.t;
        if state.dt > remaining {
            state.dt = remaining;
        }
    }

    /// Updates the output schedule and tells whether a snapshot is due
    pub fn output_due(&mut self, t: f64) -> bool {
        if self.config.nouts == 0 || t < self.t_out {
            return false;
        }
        let period = (self.config.t_fin - self.config.t_ini) / (self.config.nouts as f64);
        while self.t_out <= t {
            self.t_out += period;
        }
        true
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
