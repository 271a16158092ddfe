use serde::{Deserialize, Serialize};

/// Defines the stress-strain model parameters
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum ParamStressStrain {
    /// Linear elastic model
    LinearElastic {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,
    },

    /// Hyperbolic stiffness-degrading elastic model
    ///
    /// The secant stiffness decays with the accumulated strain path length:
    /// `σ += D : Δε / (1 + β z)` where `z` is an internal value tracking
    /// the path length. `β = 0` recovers the linear elastic model.
    NonlinElastic {
        /// Young's modulus (initial)
        young: f64,

        /// Poisson's coefficient
        poisson: f64,

        /// Degradation coefficient (≥ 0)
        beta: f64,
    },
}

/// Defines the liquid conductivity (permeability) model parameters
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum ParamConductivity {
    /// Constant anisotropic conductivity tensor (diagonal)
    Constant { kx: f64, ky: f64, kz: f64 },

    /// Isotropic model `k = (1 + β pl) kr I` (I is the identity tensor)
    IsotropicLinear { kr: f64, beta: f64 },
}

/// Holds parameters for mechanical (deformation) elements
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamSolid {
    /// Intrinsic (real) density
    pub density: f64,

    /// Parameters for the stress-strain model
    pub stress_strain: ParamStressStrain,

    /// Number of integration points (None means default for the cell kind)
    pub ngauss: Option<usize>,
}

/// Holds parameters for liquid flow (seepage) elements
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamSeepage {
    /// Initial porosity
    pub porosity: f64,

    /// Specific storage coefficient (zero means incompressible storage)
    pub storativity: f64,

    /// Intrinsic liquid density (for the gravity-driven source term)
    pub density_liquid: f64,

    /// Parameters for the conductivity model
    pub conductivity: ParamConductivity,

    /// Number of integration points (None means default for the cell kind)
    pub ngauss: Option<usize>,
}

/// Holds parameters for coupled deformation/liquid-flow elements
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamPorous {
    /// Intrinsic density of the solid grains
    pub density_solid: f64,

    /// Intrinsic liquid density (for the gravity-driven source term)
    pub density_liquid: f64,

    /// Initial porosity
    pub porosity: f64,

    /// Biot's effective stress coefficient
    pub alpha: f64,

    /// Specific storage coefficient (zero means incompressible storage)
    pub storativity: f64,

    /// Parameters for the stress-strain model
    pub stress_strain: ParamStressStrain,

    /// Parameters for the conductivity model
    pub conductivity: ParamConductivity,

    /// Number of integration points (None means default for the cell kind)
    pub ngauss: Option<usize>,
}

/// Holds parameters for zero-thickness interface (joint) elements
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamJoint {
    /// Normal penalty stiffness
    pub kn: f64,

    /// Shear penalty stiffness
    pub ks: f64,

    /// Transverse (across-joint) conductivity
    pub kt: f64,
}

impl ParamSolid {
    /// Returns sample parameters (linear elastic model)
    pub fn sample_linear_elastic() -> Self {
        ParamSolid {
            density: 2.7, // Mg/m³
            stress_strain: ParamStressStrain::LinearElastic {
                young: 10_000.0, // kPa
                poisson: 0.2,    // [-]
            },
            ngauss: None,
        }
    }

    /// Returns sample parameters (hyperbolic stiffness-degrading model)
    pub fn sample_nonlin_elastic() -> Self {
        ParamSolid {
            density: 2.7,
            stress_strain: ParamStressStrain::NonlinElastic {
                young: 10_000.0,
                poisson: 0.2,
                beta: 100.0,
            },
            ngauss: None,
        }
    }

    /// Returns the number of internal values of the stress-strain model
    pub fn n_int_val(&self) -> usize {
        match self.stress_strain {
            ParamStressStrain::LinearElastic { .. } => 0,
            ParamStressStrain::NonlinElastic { .. } => 1,
        }
    }
}

impl ParamSeepage {
    /// Returns sample parameters (constant isotropic conductivity)
    pub fn sample_constant() -> Self {
        ParamSeepage {
            porosity: 0.4,
            storativity: 0.01,
            density_liquid: 1.0, // Mg/m³
            conductivity: ParamConductivity::Constant {
                kx: 0.1,
                ky: 0.1,
                kz: 0.1,
            },
            ngauss: None,
        }
    }
}

impl ParamPorous {
    /// Returns sample parameters (linear elastic skeleton, constant conductivity)
    pub fn sample_linear_elastic_constant() -> Self {
        ParamPorous {
            density_solid: 2.7,
            density_liquid: 1.0,
            porosity: 0.4,
            alpha: 1.0,
            storativity: 0.01,
            stress_strain: ParamStressStrain::LinearElastic {
                young: 10_000.0,
                poisson: 0.2,
            },
            conductivity: ParamConductivity::Constant {
                kx: 0.1,
                ky: 0.1,
                kz: 0.1,
            },
            ngauss: None,
        }
    }

    /// Returns the number of internal values of the stress-strain model
    pub fn n_int_val(&self) -> usize {
        match self.stress_strain {
            ParamStressStrain::LinearElastic { .. } => 0,
            ParamStressStrain::NonlinElastic { .. } => 1,
        }
    }
}

impl ParamJoint {
    /// Returns sample parameters
    pub fn sample() -> Self {
        ParamJoint {
            kn: 1e6,
            ks: 1e5,
            kt: 0.1,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ParamJoint, ParamPorous, ParamSeepage, ParamSolid, ParamStressStrain};

    #[test]
    fn samples_work() {
        let p = ParamSolid::sample_linear_elastic();
        assert_eq!(p.n_int_val(), 0);

        let p = ParamSolid::sample_nonlin_elastic();
        assert_eq!(p.n_int_val(), 1);
        match p.stress_strain {
            ParamStressStrain::NonlinElastic { young, poisson, beta } => {
                assert_eq!(young, 10_000.0);
                assert_eq!(poisson, 0.2);
                assert_eq!(beta, 100.0);
            }
            _ => panic!("wrong model"),
        }

        let p = ParamSeepage::sample_constant();
        assert_eq!(p.porosity, 0.4);

        let p = ParamPorous::sample_linear_elastic_constant();
        assert_eq!(p.alpha, 1.0);
        assert_eq!(p.n_int_val(), 0);

        let p = ParamJoint::sample();
        assert_eq!(p.kn, 1e6);
    }

    #[test]
    fn derive_works() {
        let p = ParamPorous::sample_linear_elastic_constant();
        let q = p.clone();
        assert_eq!(p, q);
        let json = serde_json::to_string(&p).unwrap();
        let r: ParamPorous = serde_json::from_str(&json).unwrap();
        assert_eq!(p, r);
    }
}
