use crate::base::{Idealization, ParamConductivity, Result};
use russell_tensor::Tensor2;

/// Implements liquid conductivity (permeability) models
pub struct ModelConductivity {
    /// Indicates a 2D conductivity tensor
    two_dim: bool,

    /// Use Constant model
    cte_enabled: bool,

    /// x-component of the constant conductivity tensor
    kx: f64,

    /// y-component of the constant conductivity tensor
    ky: f64,

    /// z-component of the constant conductivity tensor
    kz: f64,

    /// Isotropic model k = (1 + β pl) kᵣ I  (I is the identity tensor)
    iso_kr: f64,

    /// Isotropic model k = (1 + β pl) kᵣ I  (I is the identity tensor)
    iso_beta: f64,
}

impl ModelConductivity {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, param: &ParamConductivity) -> Result<Self> {
        match *param {
            ParamConductivity::Constant { kx, ky, kz } => Ok(ModelConductivity {
                two_dim: ideal.two_dim,
                cte_enabled: true,
                kx,
                ky,
                kz,
                iso_kr: 0.0,
                iso_beta: 0.0,
            }),
            ParamConductivity::IsotropicLinear { kr, beta } => Ok(ModelConductivity {
                two_dim: ideal.two_dim,
                cte_enabled: false,
                kx: 0.0,
                ky: 0.0,
                kz: 0.0,
                iso_kr: kr,
                iso_beta: beta,
            }),
        }
    }

    /// Indicates whether or not the model has a symmetric k
    pub fn has_symmetric_k(&self) -> bool {
        true
    }

    /// Indicates whether the conductivity depends on the liquid pressure or not
    pub fn has_variable_k(&self) -> bool {
        !self.cte_enabled
    }

    /// Calculates the conductivity tensor for a given liquid pressure
    pub fn calc_k(&self, k: &mut Tensor2, pl: f64) -> Result<()> {
        k.clear();
        if self.cte_enabled {
            k.sym_set(0, 0, self.kx);
            k.sym_set(1, 1, self.ky);
            if !self.two_dim {
                k.sym_set(2, 2, self.kz);
            }
        } else {
            // k = (1 + β pl) kᵣ I   (I is the identity tensor)
            let val = (1.0 + self.iso_beta * pl) * self.iso_kr;
            k.sym_set(0, 0, val);
            k.sym_set(1, 1, val);
            if !self.two_dim {
                k.sym_set(2, 2, val);
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
