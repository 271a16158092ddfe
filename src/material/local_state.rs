use russell_lab::Vector;
use russell_tensor::{Mandel, Tensor2};
use serde::{Deserialize, Serialize};

/// Defines the in-place copy of a Gauss point state
///
/// `mirror` copies all fields of `other` into `self` without allocating;
/// this is what makes the committed/trial double buffer cheap.
pub trait MirrorState {
    fn mirror(&mut self, other: &Self);
}

/// Holds the mechanical state at a Gauss (integration) point
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalState {
    /// Holds the stress tensor σ
    pub stress: Tensor2,

    /// Holds the internal values Z of the stress-strain model
    pub internal_values: Vector,

    /// Holds the elastic (vs elastoplastic) flag
    pub elastic: bool,
}

impl LocalState {
    /// Allocates a new instance with zeroed stress and internal values
    pub fn new(mandel: Mandel, n_internal_values: usize) -> Self {
        LocalState {
            stress: Tensor2::new(mandel),
            internal_values: Vector::new(n_internal_values),
            elastic: true,
        }
    }
}

impl MirrorState for LocalState {
    fn mirror(&mut self, other: &Self) {
        let v = self.stress.vector_mut();
        let o = other.stress.vector();
        for i in 0..v.dim() {
            v[i] = o[i];
        }
        for i in 0..self.internal_values.dim() {
            self.internal_values[i] = other.internal_values[i];
        }
        self.elastic = other.elastic;
    }
}

/// Holds the liquid state at a Gauss (integration) point
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalStateLiq {
    /// Holds the liquid pressure
    pub pl: f64,

    /// Holds the porosity
    pub porosity: f64,

    /// Holds the liquid saturation
    pub saturation: f64,
}

impl LocalStateLiq {
    /// Allocates a new instance (fully saturated)
    pub fn new(porosity: f64) -> Self {
        LocalStateLiq {
            pl: 0.0,
            porosity,
            saturation: 1.0,
        }
    }
}

impl MirrorState for LocalStateLiq {
    fn mirror(&mut self, other: &Self) {
        self.pl = other.pl;
        self.porosity = other.porosity;
        self.saturation = other.saturation;
    }
}

/// Holds the coupled solid-liquid state at a Gauss (integration) point
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalStatePorous {
    /// Holds the mechanical state
    pub solid: LocalState,

    /// Holds the liquid state
    pub liq: LocalStateLiq,
}

impl LocalStatePorous {
    /// Allocates a new instance
    pub fn new(mandel: Mandel, n_internal_values: usize, porosity: f64) -> Self {
        LocalStatePorous {
            solid: LocalState::new(mandel, n_internal_values),
            liq: LocalStateLiq::new(porosity),
        }
    }
}

impl MirrorState for LocalStatePorous {
    fn mirror(&mut self, other: &Self) {
        self.solid.mirror(&other.solid);
        self.liq.mirror(&other.liq);
    }
}

/// Holds the state at a Gauss point of a zero-thickness joint
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LocalStateJoint {
    /// Holds the traction vector in the local (tangent, normal) frame
    pub traction: Vector,

    /// Holds the cached effective thickness h = (V1+V2)/(2A)
    pub thickness: f64,
}

impl LocalStateJoint {
    /// Allocates a new instance; the thickness is cached later by the
    /// one-time joint initialization pass
    pub fn new(ndim: usize) -> Self {
        LocalStateJoint {
            traction: Vector::new(ndim),
            thickness: 0.0,
        }
    }
}

impl MirrorState for LocalStateJoint {
    fn mirror(&mut self, other: &Self) {
        for i in 0..self.traction.dim() {
            self.traction[i] = other.traction[i];
        }
        self.thickness = other.thickness;
    }
}

/// Holds the committed and trial state of one integration point
///
/// The two slots implement the backup/rollback protocol:
///
/// * `rollback` restores the trial slot from the committed one (the trial
///   state of a failed or repeated iteration is discarded wholesale);
/// * `commit` swaps the slots, making the trial state permanent.
///
/// The committed slot is only ever replaced by `commit`; it always holds
/// the state as of the last successfully converged increment.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IpState<S> {
    /// State as of the last converged increment
    pub committed: S,

    /// Trial state being built by the current iteration
    pub trial: S,
}

impl<S: MirrorState + Clone> IpState<S> {
    /// Allocates a new instance with both slots equal to the given state
    pub fn new(state: S) -> Self {
        IpState {
            trial: state.clone(),
            committed: state,
        }
    }

    /// Discards the trial state, restoring it from the committed slot
    pub fn rollback(&mut self) {
        self.trial.mirror(&self.committed);
    }

    /// Makes the trial state permanent by swapping the slots
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.committed, &mut self.trial);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
