use hmsim::prelude::*;
use gemlab::mesh::Edge;
use gemlab::shapes::GeoKind;

/// Consolidation of a porous column loaded at the (draining) top
///
/// The load ramps up during the first part of the stage; the excess pore
/// pressure then dissipates through the drained top boundary. At the end
/// the pressure field is (nearly) zero and the settlement matches the
/// drained elastic solution.
#[test]
fn test_porous_consolidation() -> Result<()> {
    let mesh = SampleMeshes::column_two_qua4();

    let (young, poisson) = (10_000.0, 0.2);
    let p1 = ParamPorous {
        density_solid: 2.7,
        density_liquid: 1.0,
        porosity: 0.4,
        alpha: 1.0,
        storativity: 1e-4,
        stress_strain: ParamStressStrain::LinearElastic { young, poisson },
        conductivity: ParamConductivity::Constant {
            kx: 1e-3,
            ky: 1e-3,
            kz: 1e-3,
        },
        ngauss: None,
    };

    // kinematics: smooth rigid walls and base; drainage at the top only
    let mut essential = Essential::new();
    essential
        .points(&[0, 1], Dof::Uy, 0.0)
        .points(&[0, 1, 2, 3, 4, 5], Dof::Ux, 0.0)
        .points(&[4, 5], Dof::Pl, 0.0);
    let base = FemBase::new(&mesh, [(1, Elem::Porous(p1))], &essential)?;

    // ramp the load over [0, 0.1] and hold afterwards
    const Q: f64 = -10.0;
    let top = Edge {
        kind: GeoKind::Lin2,
        points: vec![5, 4],
    };
    let mut natural = Natural::new();
    natural.edges_fn(&[&top], Nbc::Qy, |_, t| if t < 0.1 { Q * t / 0.1 } else { Q });

    let mut config = Config::new(&mesh);
    config.set_time_span(0.0, 40.0).set_nincs(40).set_tol(1e-7);

    let mut solver = SolverImplicit::new(&mesh, &base, &config, &essential, &natural)?;
    let mut state = FemState::new(&base, &config)?;
    let mut file_io = FileIo::new();
    solver.solve(&mut state, &mut file_io)?;

    // the problem is linear: one iteration per increment
    assert_eq!(solver.n_iterations_total, 40);

    // excess pore pressure fully dissipated at the undrained nodes
    for point_id in [0, 1, 2, 3] {
        let eq = base.equations.eq(point_id, Dof::Pl)?;
        assert!(state.uu[eq].abs() < 1e-2 * Q.abs());
    }

    // drained settlement: uniaxial strain of the skeleton
    let eps_yy = Q * (1.0 + poisson) * (1.0 - 2.0 * poisson) / (young * (1.0 - poisson));
    let eq_top = base.equations.eq(4, Dof::Uy)?;
    let relative = (state.uu[eq_top] - 2.0 * eps_yy).abs() / eps_yy.abs();
    assert!(relative < 1e-2);
    Ok(())
}
