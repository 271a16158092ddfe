use hmsim::prelude::*;
use gemlab::mesh::Edge;
use gemlab::shapes::GeoKind;

/// Column of two bulk cells separated by a zero-thickness joint
///
/// The joint thickness must come out as h = (V1+V2)/(2A) = 1 and the
/// penalty stiffness adds a small extra closure to the elastic column
/// response under compression.
#[test]
fn test_joint_column() -> Result<()> {
    let mesh = SampleMeshes::column_with_joint();

    let (young, poisson) = (10_000.0, 0.2);
    let p1 = ParamSolid {
        density: 2.7,
        stress_strain: ParamStressStrain::LinearElastic { young, poisson },
        ngauss: None,
    };
    let p2 = ParamJoint {
        kn: 1e6,
        ks: 1e5,
        kt: 0.1,
    };

    let mut essential = Essential::new();
    essential
        .points(&[0, 1], Dof::Uy, 0.0)
        .points(&[0, 1, 2, 3, 4, 5, 6, 7], Dof::Ux, 0.0)
        .points(&[2, 3, 4, 5], Dof::Pl, 0.0); // the joint liquid DOFs are held
    let base = FemBase::new(&mesh, [(1, Elem::Solid(p1)), (2, Elem::Joint(p2))], &essential)?;

    const Q: f64 = -10.0;
    let top = Edge {
        kind: GeoKind::Lin2,
        points: vec![7, 6],
    };
    let mut natural = Natural::new();
    natural.edges_fn(&[&top], Nbc::Qy, |_, t| Q * t);

    let mut config = Config::new(&mesh);
    config.set_time_span(0.0, 1.0).set_nincs(2).set_tol(1e-8);

    let mut solver = SolverImplicit::new(&mesh, &base, &config, &essential, &natural)?;
    let mut state = FemState::new(&base, &config)?;
    let mut file_io = FileIo::new();
    solver.solve(&mut state, &mut file_io)?;

    // linear problem: one iteration per increment
    assert_eq!(solver.n_iterations_total, 2);

    // the one-time initialization cached h = (V1+V2)/(2A) = 1
    let outputs = solver.elements.scalar_outputs();
    let h = outputs[2].get("h").expect("joint output");
    assert!((h - 1.0).abs() < 1e-12);

    // tip settlement: two bulk cells plus the joint closure Q/kn
    let eps_yy = Q * (1.0 + poisson) * (1.0 - 2.0 * poisson) / (young * (1.0 - poisson));
    let expected = 2.0 * eps_yy + Q / p2.kn;
    let eq_top = base.equations.eq(7, Dof::Uy)?;
    let relative = (state.uu[eq_top] - expected).abs() / expected.abs();
    assert!(relative < 1e-8);

    // the joint normal traction carries the applied stress
    let tn = outputs[2].get("traction_n").expect("joint output");
    assert!((tn.abs() - Q.abs()).abs() < 1e-8);
    Ok(())
}
