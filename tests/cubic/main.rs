mod bubble_dew;
mod families;
mod parameters;
mod tp_flash;

use cubeos::parameter::{BipStore, IdentifierOption};
use cubeos::{EosResult, Mixture};
use ndarray::Array1;

const COMPONENTS: &str = "tests/cubic/test_components.json";
const BINARY: &str = "tests/cubic/test_binary.json";

fn mixture(substances: &[&str], molefracs: Array1<f64>) -> EosResult<Mixture> {
    Mixture::from_json(substances, COMPONENTS, IdentifierOption::Name, molefracs)
}

fn bip_store() -> EosResult<BipStore> {
    Ok(BipStore::from_json(BINARY, IdentifierOption::Name)?)
}
