use super::mixture;
use approx::assert_relative_eq;
use cubeos::cubic::alpha::{MathiasCopeman, Twu};
use cubeos::cubic::{Cubic, PatelTeja};
use cubeos::parameter::NoBinaryInteraction;
use cubeos::{
    CubicEos, CubicFamily, EosError, FlashSolver, MixingRule, Mixture, PhaseKind, PhaseSplit,
};
use ndarray::arr1;
use std::error::Error;
use std::sync::Arc;

fn solver<F: CubicFamily>(eos: CubicEos<F>) -> FlashSolver<F> {
    FlashSolver::new(Arc::new(eos), Arc::new(NoBinaryInteraction))
}

/// Flash between dew and bubble point and compare the fugacities of both phases.
fn check_two_phase<F: CubicFamily>(
    solver: &FlashSolver<F>,
    mix: &Mixture,
    temperature: f64,
) -> Result<f64, Box<dyn Error>> {
    let bubble = solver.bubble_point_pressure(mix, temperature)?;
    let dew = solver.dew_point_pressure(mix, temperature)?;
    let p = 0.5 * (bubble.pressure + dew.pressure);
    let result = solver.tp_flash(mix, temperature, p)?;
    assert!(result.is_two_phase());

    let system = solver
        .eos()
        .system(mix.components(), &NoBinaryInteraction, temperature, p)?;
    let liquid = system.phase(&result.liquid_molefracs, PhaseKind::Liquid)?;
    let vapor = system.phase(&result.vapor_molefracs, PhaseKind::Vapor)?;
    assert_relative_eq!(liquid.fugacities(p), vapor.fugacities(p), max_relative = 1e-8);
    Ok(bubble.pressure)
}

#[test]
fn test_two_constant_families() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    for (family, bubble) in [
        (Cubic::peng_robinson(None), 606353.8),
        (Cubic::peng_robinson_1978(), 606353.8),
        (Cubic::soave_redlich_kwong(None), 612739.5),
        (Cubic::redlich_kwong(), 729807.0),
        (Cubic::van_der_waals(), 1232351.6),
    ] {
        let flash = solver(CubicEos::new(family));
        let p = check_two_phase(&flash, &mix, 300.0)?;
        assert_relative_eq!(p, bubble, max_relative = 1e-6);

        // single phases just outside of the saturation pressures of each family
        let liquid = flash.tp_flash(&mix, 300.0, 1.01 * p)?;
        assert_eq!(liquid.phase, Some(PhaseSplit::Liquid));
        let dew = flash.dew_point_pressure(&mix, 300.0)?;
        let vapor = flash.tp_flash(&mix, 300.0, 0.99 * dew.pressure)?;
        assert_eq!(vapor.phase, Some(PhaseSplit::Vapor));
    }
    Ok(())
}

#[test]
fn test_patel_teja() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.4, 0.6]))?;
    check_two_phase(&solver(CubicEos::new(PatelTeja)), &mix, 320.0)?;
    Ok(())
}

#[test]
fn test_mathias_copeman_from_json() -> Result<(), Box<dyn Error>> {
    // coefficients in the json file reproduce the Peng-Robinson alpha function
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let family = Cubic::peng_robinson(Some(MathiasCopeman.into()));
    let result = solver(CubicEos::new(family)).tp_flash(&mix, 300.0, 5e5)?;
    assert_relative_eq!(result.vapor_fraction, 0.5127423, max_relative = 1e-6);
    Ok(())
}

#[test]
fn test_missing_alpha_parameters() -> Result<(), Box<dyn Error>> {
    // butane has no Twu parameters
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    let family = Cubic::peng_robinson(None).with_alpha(Twu.into());
    let solver = solver(CubicEos::new(family));
    assert!(matches!(
        solver.tp_flash(&mix, 300.0, 5e5),
        Err(EosError::ParameterError(_))
    ));
    let result = solver.evaluate(&mix, 300.0, 5e5);
    assert!(!result.is_converged());

    let propane = mixture(&["propane"], arr1(&[1.0]))?;
    assert!(solver.bubble_point_pressure(&propane, 300.0).is_ok());
    Ok(())
}

#[test]
fn test_mixing_rules_without_interaction() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["propane", "butane"], arr1(&[0.5, 0.5]))?;
    for rule in ["quadratic", "panagiotopoulos-reid", "stryjek_vera", "melhem"] {
        let rule: MixingRule = rule.parse()?;
        let eos = CubicEos::new(Cubic::peng_robinson(None)).with_mixing_rule(rule);
        let result = solver(eos).tp_flash(&mix, 300.0, 5e5)?;
        assert_relative_eq!(result.vapor_fraction, 0.5127423, max_relative = 1e-6);
    }
    assert!("wong-sandler".parse::<MixingRule>().is_err());
    Ok(())
}
