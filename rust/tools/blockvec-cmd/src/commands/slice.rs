//! Slice command implementation

use anyhow::{Context, Result};
use blockvec::BlockVec;

use crate::utils::{format_values, parse_values};

pub fn run(values: &str, begin: usize, end: usize) -> Result<()> {
    let values = parse_values(values)?;
    let vec = BlockVec::from_slice(&values).context("Failed to build vector")?;

    let view = vec.view(begin, end);
    println!(
        "view [{begin}:{end}] (begin {}, len {}): {}",
        view.begin(),
        view.len(),
        format_values(view.as_slice())
    );
    Ok(())
}
