// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::extraction::{AnalysisOutcome, ExtractionGateway, ImageInput, analyze};
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle<G>(store: &mut LedgerStore, gateway: &G, m: &clap::ArgMatches) -> Result<()>
where
    G: ExtractionGateway + ?Sized,
{
    let images = m
        .get_many::<String>("image")
        .into_iter()
        .flatten()
        .map(|p| ImageInput::from_path(Path::new(p.trim())))
        .collect::<Result<Vec<_>, _>>()?;

    match analyze(store, gateway, &images).context("Could not analyse screenshots")? {
        AnalysisOutcome::Added(n) => println!("Added {} transactions", n),
        AnalysisOutcome::NothingRecognized => {
            println!("No transactions recognised. Try a clearer screenshot.")
        }
    }
    Ok(())
}
