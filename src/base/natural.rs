use super::{BcValue, FnSpaceTime, Nbc, Pbc};
use gemlab::mesh::{Edge, Face, PointId};
use std::fmt;

/// Holds natural (load/flux) boundary conditions
pub struct Natural {
    /// Concentrated loads or point sources
    pub at_points: Vec<(PointId, Pbc, BcValue)>,

    /// Distributed loads or fluxes on edges
    pub on_edges: Vec<(Edge, Nbc, BcValue)>,

    /// Distributed loads or fluxes on faces
    pub on_faces: Vec<(Face, Nbc, BcValue)>,
}

impl Natural {
    /// Allocates a new instance
    pub fn new() -> Self {
        Natural {
            at_points: Vec::new(),
            on_edges: Vec::new(),
            on_faces: Vec::new(),
        }
    }

    /// Sets a constant concentrated load or source at points
    pub fn points(&mut self, points: &[PointId], pbc: Pbc, value: f64) -> &mut Self {
        for point_id in points {
            self.at_points.push((*point_id, pbc, BcValue::Constant(value)));
        }
        self
    }

    /// Sets a space-time function concentrated load or source at points
    pub fn points_fn(&mut self, points: &[PointId], pbc: Pbc, f: FnSpaceTime) -> &mut Self {
        for point_id in points {
            self.at_points.push((*point_id, pbc, BcValue::Function(f)));
        }
        self
    }

    /// Sets a constant distributed load or flux on edges
    pub fn edges(&mut self, edges: &[&Edge], nbc: Nbc, value: f64) -> &mut Self {
        for edge in edges {
            self.on_edges.push(((*edge).clone(), nbc, BcValue::Constant(value)));
        }
        self
    }

    /// Sets a space-time function distributed load or flux on edges
    pub fn edges_fn(&mut self, edges: &[&Edge], nbc: Nbc, f: FnSpaceTime) -> &mut Self {
        for edge in edges {
            self.on_edges.push(((*edge).clone(), nbc, BcValue::Function(f)));
        }
        self
    }

    /// Sets a constant distributed load or flux on faces
    pub fn faces(&mut self, faces: &[&Face], nbc: Nbc, value: f64) -> &mut Self {
        for face in faces {
            self.on_faces.push(((*face).clone(), nbc, BcValue::Constant(value)));
        }
        self
    }

    /// Sets a space-time function distributed load or flux on faces
    pub fn faces_fn(&mut self, faces: &[&Face], nbc: Nbc, f: FnSpaceTime) -> &mut Self {
        for face in faces {
            self.on_faces.push(((*face).clone(), nbc, BcValue::Function(f)));
        }
        self
    }
}

impl fmt::Display for Natural {
    /// Prints a formatted summary of the natural boundary conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Natural boundary conditions\n").unwrap();
        write!(f, "===========================\n").unwrap();
        for (point_id, pbc, value) in &self.at_points {
            write!(f, "point {} : {:?} = {:?}\n", point_id, pbc, value).unwrap();
        }
        for (edge, nbc, value) in &self.on_edges {
            write!(f, "edge {:?} : {:?} = {:?}\n", edge.points, nbc, value).unwrap();
        }
        for (face, nbc, value) in &self.on_faces {
            write!(f, "face {:?} : {:?} = {:?}\n", face.points, nbc, value).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
