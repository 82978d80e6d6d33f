use serde::Serialize;
use swarm_core::ops::{envelope, OpResult};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print the result envelope on stdout. A failed operation still prints its
/// envelope, then comes back as an error so the process exits non-zero.
pub fn emit(result: OpResult) -> anyhow::Result<()> {
    print_json(&envelope(&result))?;
    result.map(|_| ()).map_err(anyhow::Error::new)
}
