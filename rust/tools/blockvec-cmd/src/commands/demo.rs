//! Demo command implementation

use anyhow::{Context, Result};
use blockvec::BlockVec;

use crate::utils::format_values;

pub fn run() -> Result<()> {
    let mut vec = BlockVec::from_slice(&[1i32, 2, 3, 4, 5, 6, 7])
        .context("Failed to build the demo vector")?;
    println!("vector: {}", format_values(vec.as_slice()));

    let view = vec.view(2, 5);
    println!("view [2:5]: {}", format_values(view.as_slice()));

    let popped = vec.pop().context("Failed to pop")?;
    println!("popped: {popped}");
    println!("vector: {}", format_values(vec.as_slice()));
    Ok(())
}
