//! Cross-tier verification command

use anyhow::{bail, Context, Result};
use vecdsp_dispatch::verify::{self, Tolerance};
use vecdsp_dispatch::{CapabilitySet, DispatchConfig};

const SHOWN_MISMATCHES: usize = 10;

/// Run the sweep for every tier left after `tier` / `disable`.
pub fn execute(
    tier: Option<&str>,
    disable: Option<&str>,
    rel: f32,
    abs: f32,
    verbose: bool,
) -> Result<()> {
    let config = DispatchConfig::from_values(tier, disable).context("Invalid selftest options")?;
    let host = CapabilitySet::host();
    let caps = config.apply(host);
    let tolerance = Tolerance { abs, rel };

    println!("host:    {host}");
    println!("checked: {caps}");
    println!("tolerance: abs {abs:e}, rel {rel:e}");
    println!();

    let reports = verify::sweep(caps, tolerance);
    if reports.is_empty() {
        println!("No SIMD tier available, only the generic reference would run");
        return Ok(());
    }

    let mut failed = 0;
    for (tier, report) in &reports {
        let status = if report.is_ok() { "ok" } else { "FAILED" };
        println!(
            "{:<8} {:>3} operations {:>5} cases  {status}",
            tier.name(),
            report.operations,
            report.cases
        );

        let shown = if verbose {
            report.mismatches.len()
        } else {
            SHOWN_MISMATCHES
        };
        for mismatch in report.mismatches.iter().take(shown) {
            println!("    {mismatch}");
        }
        if report.mismatches.len() > shown {
            println!("    ... {} more", report.mismatches.len() - shown);
        }
        failed += report.mismatches.len();
    }

    if failed > 0 {
        bail!("{failed} mismatching cases");
    }
    Ok(())
}
