//! Inspect command implementation

use anyhow::{Context, Result};
use blockvec::{BlockVec, BlockVecConfig};
use serde::Serialize;

use crate::utils::parse_values;

pub struct InspectOptions {
    pub block_size: Option<usize>,
    pub fixed: bool,
    pub resize: Option<usize>,
    pub crop: bool,
    pub verbose: u8,
}

#[derive(Serialize)]
struct InspectSummary {
    len: usize,
    capacity: usize,
    block_size: usize,
    blocks: usize,
    policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<LayoutInfo>,
}

#[derive(Serialize)]
struct LayoutInfo {
    element_size: usize,
    heap_size: usize,
    alignment: usize,
}

pub fn run(values: &str, options: InspectOptions) -> Result<()> {
    let values = parse_values(values)?;

    let mut config = BlockVecConfig::new().with_initial_capacity(values.len());
    if let Some(block_size) = options.block_size {
        config = config.with_block_size(block_size);
    }
    if options.fixed {
        config = config.fixed();
    }

    let mut vec =
        BlockVec::from_slice_with_config(&values, config).context("Failed to build vector")?;

    if let Some(new_len) = options.resize {
        vec.resize(new_len)
            .with_context(|| format!("Failed to resize to {new_len} elements"))?;
    }
    if options.crop {
        vec.crop_capacity().context("Failed to crop capacity")?;
    }

    let summary = summarize(&vec, options.verbose);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(vec: &BlockVec<i64>, verbose: u8) -> InspectSummary {
    let raw = vec.as_raw();
    InspectSummary {
        len: vec.len(),
        capacity: vec.capacity(),
        block_size: vec.block_size(),
        blocks: raw.blocks(),
        policy: format!("{:?}", vec.policy()),
        values: (verbose > 0).then(|| vec.as_slice().to_vec()),
        layout: (verbose > 1).then(|| LayoutInfo {
            element_size: raw.element_size(),
            heap_size: raw.heap_size(),
            alignment: raw.config().alignment,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_fields() {
        let config = BlockVecConfig::new().with_block_size(4);
        let vec = BlockVec::from_slice_with_config(&[1i64, 2, 3, 4, 5], config).unwrap();

        let summary = summarize(&vec, 0);
        assert_eq!(summary.len, 5);
        assert_eq!(summary.capacity, 8);
        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.policy, "Elastic");
        assert!(summary.values.is_none());
        assert!(summary.layout.is_none());

        let summary = summarize(&vec, 2);
        assert_eq!(summary.values.as_deref(), Some(&[1, 2, 3, 4, 5][..]));
        assert_eq!(summary.layout.unwrap().element_size, 8);
    }

    #[test]
    fn test_fixed_resize_fails() {
        let options = InspectOptions {
            block_size: Some(4),
            fixed: true,
            resize: Some(100),
            crop: false,
            verbose: 0,
        };
        assert!(run("1,2,3", options).is_err());
    }
}
