use super::mixture;
use approx::assert_relative_eq;
use cubeos::cubic::Cubic;
use cubeos::parameter::NoBinaryInteraction;
use cubeos::{CubicEos, EosError, FlashSolver, PhaseKind, PhaseSplit};
use ndarray::arr1;
use std::error::Error;
use std::sync::Arc;

fn solver() -> FlashSolver<Cubic> {
    FlashSolver::new(
        Arc::new(CubicEos::new(Cubic::peng_robinson(None))),
        Arc::new(NoBinaryInteraction),
    )
}

#[test]
fn test_bubble_point() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = solver();
    let bubble = solver.bubble_point_pressure(&mix, 300.0)?;
    assert_relative_eq!(bubble.pressure, 606353.8, max_relative = 1e-6);
    assert_relative_eq!(bubble.vapor_molefracs[0], 0.762117, max_relative = 1e-5);
    assert_relative_eq!(bubble.vapor_molefracs.sum(), 1.0, epsilon = 1e-12);

    let system = solver
        .eos()
        .system(mix.components(), &NoBinaryInteraction, 300.0, bubble.pressure)?;
    let liquid = system.phase(&bubble.liquid_molefracs, PhaseKind::Liquid)?;
    let vapor = system.phase(&bubble.vapor_molefracs, PhaseKind::Vapor)?;
    assert_relative_eq!(
        liquid.fugacities(bubble.pressure),
        vapor.fugacities(bubble.pressure),
        max_relative = 1e-8
    );
    Ok(())
}

#[test]
fn test_dew_point() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let dew = solver().dew_point_pressure(&mix, 300.0)?;
    assert_relative_eq!(dew.pressure, 415361.8, max_relative = 1e-6);
    assert_relative_eq!(dew.liquid_molefracs[0], 0.2324396, max_relative = 1e-5);
    assert_relative_eq!(dew.z_liquid, 0.0156701, max_relative = 1e-4);
    assert_relative_eq!(dew.z_vapor, 0.9058942, max_relative = 1e-5);
    Ok(())
}

#[test]
fn test_saturation_pressures_bracket_two_phase_region() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let solver = solver();
    let bubble = solver.bubble_point_pressure(&mix, 300.0)?;
    let dew = solver.dew_point_pressure(&mix, 300.0)?;
    assert!(dew.pressure < bubble.pressure);

    for (p, phase) in [
        (0.98 * dew.pressure, PhaseSplit::Vapor),
        (0.5 * (dew.pressure + bubble.pressure), PhaseSplit::TwoPhase),
        (1.02 * bubble.pressure, PhaseSplit::Liquid),
    ] {
        assert_eq!(solver.tp_flash(&mix, 300.0, p)?.phase, Some(phase));
    }

    // close to the bubble point almost all of the feed is liquid
    let result = solver.tp_flash(&mix, 300.0, 0.999 * bubble.pressure)?;
    assert!(result.vapor_fraction < 0.05);
    Ok(())
}

#[test]
fn test_supercritical_bubble_point() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["methane"], arr1(&[1.0]))?;
    let result = solver().bubble_point_pressure(&mix, 400.0);
    assert!(matches!(result, Err(EosError::TrivialSolution)));
    Ok(())
}
