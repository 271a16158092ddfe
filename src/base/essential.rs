use super::Dof;
use gemlab::mesh::{Edge, Face, PointId};
use std::collections::HashMap;
use std::fmt;

/// Defines a function of space and time: `f(x, t)`
pub type FnSpaceTime = fn(&[f64], f64) -> f64;

/// Defines a prescribed value or load given by a constant or a function of (x, t)
#[derive(Clone, Copy)]
pub enum BcValue {
    /// Constant in space and time
    Constant(f64),

    /// Function of coordinates and time
    Function(FnSpaceTime),
}

impl BcValue {
    /// Evaluates the value at the given coordinates and time
    pub fn value(&self, x: &[f64], t: f64) -> f64 {
        match self {
            BcValue::Constant(v) => *v,
            BcValue::Function(f) => (f)(x, t),
        }
    }
}

impl fmt::Debug for BcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BcValue::Constant(v) => write!(f, "{:?}", v),
            BcValue::Function(..) => write!(f, "f(x,t)"),
        }
    }
}

/// Holds essential (prescribed primary value) boundary conditions
pub struct Essential {
    pub all: HashMap<(PointId, Dof), BcValue>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential { all: HashMap::new() }
    }

    /// Sets a constant essential boundary condition at points
    pub fn points(&mut self, points: &[PointId], dof: Dof, value: f64) -> &mut Self {
        for point_id in points {
            self.all.insert((*point_id, dof), BcValue::Constant(value));
        }
        self
    }

    /// Sets a space-time function essential boundary condition at points
    pub fn points_fn(&mut self, points: &[PointId], dof: Dof, f: FnSpaceTime) -> &mut Self {
        for point_id in points {
            self.all.insert((*point_id, dof), BcValue::Function(f));
        }
        self
    }

    /// Sets a constant essential boundary condition on edges
    pub fn edges(&mut self, edges: &[&Edge], dof: Dof, value: f64) -> &mut Self {
        for edge in edges {
            for point_id in &edge.points {
                self.all.insert((*point_id, dof), BcValue::Constant(value));
            }
        }
        self
    }

    /// Sets a space-time function essential boundary condition on edges
    pub fn edges_fn(&mut self, edges: &[&Edge], dof: Dof, f: FnSpaceTime) -> &mut Self {
        for edge in edges {
            for point_id in &edge.points {
                self.all.insert((*point_id, dof), BcValue::Function(f));
            }
        }
        self
    }

    /// Sets a constant essential boundary condition on faces
    pub fn faces(&mut self, faces: &[&Face], dof: Dof, value: f64) -> &mut Self {
        for face in faces {
            for point_id in &face.points {
                self.all.insert((*point_id, dof), BcValue::Constant(value));
            }
        }
        self
    }

    /// Sets a space-time function essential boundary condition on faces
    pub fn faces_fn(&mut self, faces: &[&Face], dof: Dof, f: FnSpaceTime) -> &mut Self {
        for face in faces {
            for point_id in &face.points {
                self.all.insert((*point_id, dof), BcValue::Function(f));
            }
        }
        self
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of the essential boundary conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Essential boundary conditions\n").unwrap();
        write!(f, "=============================\n").unwrap();
        let mut keys: Vec<_> = self.all.keys().collect();
        keys.sort();
        for key in keys {
            let value = self.all.get(key).unwrap();
            write!(f, "{:?} : {:?} = {:?}\n", key.0, key.1, value).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
