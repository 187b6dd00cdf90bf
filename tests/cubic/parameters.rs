use super::{bip_store, mixture, COMPONENTS};
use cubeos::parameter::{
    BinaryInteractionSource, Component, IdentifierOption, ParameterError, PureRecord,
};
use cubeos::EosError;
use ndarray::{arr1, arr2};
use std::error::Error;
use std::sync::Arc;

#[test]
fn test_components_in_query_order() -> Result<(), Box<dyn Error>> {
    let mix = mixture(&["butane", "methane"], arr1(&[0.3, 0.7]))?;
    assert_eq!(mix.tc(), arr1(&[425.12, 190.56]));
    assert_eq!(mix.components()[1].identifier.cas.as_deref(), Some("74-82-8"));

    let records: Vec<Component> =
        PureRecord::from_json(&["C3H8", "C2H6"], COMPONENTS, IdentifierOption::Formula)?;
    assert_eq!(records[0].model_record.vc, Some(0.0002));
    assert_eq!(
        records[0].model_record.shape.mathias_copeman,
        Some([0.6032653253232, 0.0, 0.0])
    );
    assert!(records[1].model_record.shape.is_empty());
    Ok(())
}

#[test]
fn test_missing_and_duplicate_components() {
    let missing = mixture(&["propane", "water"], arr1(&[0.5, 0.5]));
    assert!(matches!(
        missing,
        Err(EosError::ParameterError(ParameterError::ComponentsNotFound(_)))
    ));
    let duplicate = mixture(&["propane", "propane"], arr1(&[0.5, 0.5]));
    assert!(matches!(
        duplicate,
        Err(EosError::ParameterError(ParameterError::IncompatibleParameters(_)))
    ));
    let unbalanced = mixture(&["propane", "butane"], arr1(&[0.5, 0.6]));
    assert!(matches!(unbalanced, Err(EosError::InvalidInput(..))));
}

#[test]
fn test_binary_matrix_from_json() -> Result<(), Box<dyn Error>> {
    let store = bip_store()?;
    let families: Vec<_> = store.families().collect();
    assert_eq!(families, vec!["peng-robinson", "soave-redlich-kwong"]);

    let mix = mixture(&["butane", "propane", "methane"], arr1(&[0.2, 0.3, 0.5]))?;
    let components: Vec<Arc<Component>> = mix.components().to_vec();

    let pr = store.binary_matrix(&components, "peng-robinson");
    assert_eq!(
        pr.k_ij(),
        &arr2(&[[0.0, 0.01, 0.0], [0.01, 0.0, 0.0], [0.0, 0.0, 0.0]])
    );
    assert!(pr.is_symmetric());
    assert!(pr.alpha().is_none());

    // asymmetric parameters in the order of the record
    let srk = store.binary_matrix(&components, "soave-redlich-kwong");
    assert_eq!(srk.k_ij()[[0, 1]], 0.02);
    assert_eq!(srk.k_ij()[[1, 0]], 0.015);
    assert!(!srk.is_symmetric());

    // unknown family and pairs without the requested identifier default to zero
    assert_eq!(store.binary_matrix(&components, "patel-teja").k_ij(), &arr2(&[[0.0; 3]; 3]));
    let light = mixture(&["methane", "ethane"], arr1(&[0.5, 0.5]))?;
    let matrix = store.binary_matrix(light.components(), "peng-robinson");
    assert_eq!(matrix.k_ij()[[0, 1]], 0.0);
    Ok(())
}
