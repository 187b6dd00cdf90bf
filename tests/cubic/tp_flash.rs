use super::{bip_store, mixture};
use approx::assert_relative_eq;
use cubeos::cubic::Cubic;
use cubeos::parameter::NoBinaryInteraction;
use cubeos::{CubicEos, FlashResult, FlashSolver, FlashStatus, PhaseKind, PhaseSplit, SolverOptions};
use ndarray::arr1;
use std::error::Error;
use std::sync::Arc;

fn peng_robinson() -> Arc<CubicEos<Cubic>> {
    Arc::new(CubicEos::new(Cubic::peng_robinson(None)))
}

fn assert_equilibrium(result: &FlashResult) {
    let z = &result.feed;
    let (x, y) = (&result.liquid_molefracs, &result.vapor_molefracs);
    let q = result.vapor_fraction;
    assert_relative_eq!(x.sum(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(y.sum(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(&(y * q + x * (1.0 - q)), z, epsilon = 1e-9);
    assert_relative_eq!(result.k_values, y / x, max_relative = 1e-12);
}

#[test]
fn test_tp_flash_binary() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = FlashSolver::new(peng_robinson(), Arc::new(NoBinaryInteraction));
    let result = solver.tp_flash(&mix, 300.0, 5e5)?;
    assert_eq!(result.status, FlashStatus::Converged);
    assert_eq!(result.phase, Some(PhaseSplit::TwoPhase));
    assert_relative_eq!(result.vapor_fraction, 0.5127423, max_relative = 1e-6);
    assert_relative_eq!(result.liquid_molefracs[0], 0.3528058, max_relative = 1e-6);
    assert_relative_eq!(result.vapor_molefracs[0], 0.6398782, max_relative = 1e-6);
    assert_relative_eq!(result.z_liquid.unwrap(), 0.0185799, max_relative = 1e-5);
    assert_relative_eq!(result.z_vapor.unwrap(), 0.8936733, max_relative = 1e-6);
    assert_equilibrium(&result);

    // equal fugacities of both phases
    let system = solver
        .eos()
        .system(mix.components(), &NoBinaryInteraction, 300.0, 5e5)?;
    let liquid = system.phase(&result.liquid_molefracs, PhaseKind::Liquid)?;
    let vapor = system.phase(&result.vapor_molefracs, PhaseKind::Vapor)?;
    let fl = liquid.fugacities(5e5);
    let fv = vapor.fugacities(5e5);
    assert_relative_eq!(fl, fv, max_relative = 1e-8);
    Ok(())
}

#[test]
fn test_tp_flash_binary_interaction_from_json() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = FlashSolver::new(peng_robinson(), Arc::new(bip_store()?));
    let result = solver.tp_flash(&mix, 300.0, 6e5)?;
    assert_relative_eq!(result.vapor_fraction, 0.1112979, max_relative = 1e-6);
    assert_equilibrium(&result);

    // reversed order of the components
    let reversed = mixture(&["butane", "propane"], arr1(&[0.5, 0.5]))?;
    let result = solver.tp_flash(&reversed, 300.0, 6e5)?;
    assert_relative_eq!(result.vapor_fraction, 0.1112979, max_relative = 1e-6);
    Ok(())
}

#[test]
fn test_tp_flash_ternary() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["methane", "ethane", "propane"], arr1(&[0.3, 0.3, 0.4]))?;
    let solver = FlashSolver::new(peng_robinson(), Arc::new(bip_store()?));
    let result = solver.tp_flash(&mix, 250.0, 2e6)?;
    assert!(result.is_two_phase());
    assert_relative_eq!(result.vapor_fraction, 0.3121957, max_relative = 1e-6);
    assert!(result.vapor_molefracs[0] > result.liquid_molefracs[0]);
    assert!(result.vapor_molefracs[2] < result.liquid_molefracs[2]);
    assert_equilibrium(&result);
    Ok(())
}

#[test]
fn test_single_phase_boundaries() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = FlashSolver::new(peng_robinson(), Arc::new(NoBinaryInteraction));

    let vapor = solver.tp_flash(&mix, 300.0, 4.1e5)?;
    assert_eq!(vapor.phase, Some(PhaseSplit::Vapor));
    assert_eq!(vapor.iterations, 0);
    assert_eq!(vapor.vapor_fraction, 1.0);
    assert_eq!(vapor.vapor_molefracs, mix.molefracs().clone());

    let hot = solver.tp_flash(&mix, 600.0, 1e5)?;
    assert_eq!(hot.phase, Some(PhaseSplit::Vapor));
    assert_eq!(hot.iterations, 0);

    let liquid = solver.tp_flash(&mix, 300.0, 6.1e5)?;
    assert_eq!(liquid.phase, Some(PhaseSplit::Liquid));
    assert_eq!(liquid.vapor_fraction, 0.0);
    assert_eq!(liquid.liquid_molefracs, mix.molefracs().clone());
    Ok(())
}

#[test]
fn test_pure_component_never_splits() -> Result<(), Box<dyn Error>> {
    let solver = FlashSolver::new(peng_robinson(), Arc::new(NoBinaryInteraction));
    let propane = mixture(&["propane"], arr1(&[1.0]))?;
    for p in [5e5, 9e5, 1.1e6, 2e6] {
        let result = solver.tp_flash(&propane, 300.0, p)?;
        assert_eq!(result.iterations, 0);
        assert!(result.vapor_fraction == 0.0 || result.vapor_fraction == 1.0);
    }

    // between the vapor pressure of the equation of state and the Wilson estimate
    let liquid = solver.tp_flash(&propane, 300.0, 1.003e6)?;
    assert_eq!(liquid.phase, Some(PhaseSplit::Liquid));
    assert_eq!(liquid.iterations, 0);
    assert_equilibrium(&liquid);
    Ok(())
}

#[test]
fn test_failed_flash_keeps_feed() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = FlashSolver::new(peng_robinson(), Arc::new(NoBinaryInteraction));

    let result = solver.evaluate(&mix, -10.0, 5e5);
    assert_eq!(result.status, FlashStatus::InvalidInput);
    assert!(result.phase.is_none());
    assert!(result.vapor_fraction.is_nan());
    assert_eq!(result.liquid_molefracs, result.feed);
    assert_eq!(result.vapor_molefracs, result.feed);
    assert!(solver.tp_flash(&mix, -10.0, 5e5).is_err());

    let limited = solver
        .clone()
        .with_options(SolverOptions::new().max_iter(3));
    let result = limited.evaluate(&mix, 300.0, 5e5);
    assert_eq!(result.status, FlashStatus::NotConverged);
    assert_eq!(
        result.status.to_string(),
        "no converged phase split at this (T, P)"
    );
    assert!(result.message.is_some());
    Ok(())
}

#[test]
fn test_evaluate_many() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = FlashSolver::new(peng_robinson(), Arc::new(NoBinaryInteraction));
    let conditions = [(300.0, 4.1e5), (300.0, 5e5), (300.0, 6.1e5), (-1.0, 5e5)];
    let results = solver.evaluate_many(&mix, &conditions);
    let phases: Vec<_> = results.iter().map(|r| r.phase).collect();
    assert_eq!(
        phases,
        vec![
            Some(PhaseSplit::Vapor),
            Some(PhaseSplit::TwoPhase),
            Some(PhaseSplit::Liquid),
            None
        ]
    );
    Ok(())
}
