use ecofactor_core::error::EcofactorError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), EcofactorError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
