use std::{env, process};

use anyhow::{Context, Result};
use log::info;

use descent::{
    DescentErr,
    config::{ConfigParams, ResolvePolicy, Settings},
    dataset,
    objective::LinearObjective,
    optimization::{Fit, GradientDescent},
    preprocessing,
    report::ErrorGraphs,
};

const DATA_FILE: &str = "optimisation.data_file";
const DEFAULT_DATA_FILE: &str = "./data.txt";
const ERR_GRAPH_LOCATION: &str = "optimisation.err_graph_location";
const USE_DEFAULTS_FLAG: &str = "--use-defaults";

// Runs multiple linear regression over the configured dataset.
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <config-file> [key:value ...] [{USE_DEFAULTS_FLAG}]",
            args[0]
        );
        process::exit(1);
    }

    let mut params = ConfigParams::from_file(&args[1])
        .with_context(|| format!("failed to read parameter file {}", args[1]))?;

    let mut policy = ResolvePolicy::Strict;
    for arg in &args[2..] {
        if arg == USE_DEFAULTS_FLAG {
            policy = ResolvePolicy::UseDefaults;
        } else {
            params.add(arg);
        }
    }

    let data_file = params
        .get_string(DATA_FILE)
        .unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string());
    let samples = dataset::load_samples(&data_file)
        .with_context(|| format!("failed to load dataset {data_file}"))?;

    let range = preprocessing::compute_range(&samples)?;
    info!("normalising into [{}, {}]", range.min(), range.max());
    let samples = preprocessing::normalize(samples, range)?;

    let mut gd = GradientDescent::builder(LinearObjective::new(), samples, range)
        .settings(&params)
        .policy(policy)
        .build()?;
    gd.log_samples();

    let result = gd.run();

    // A run that hits the iteration cap still reports the best parameters it saw.
    if let Some(theta) = reported_theta(&result) {
        println!();
        println!("{}", theta_line(theta));
    }

    if params.contains(ERR_GRAPH_LOCATION) {
        let dir = params.get_string(ERR_GRAPH_LOCATION)?;
        ErrorGraphs::new(dir).write(gd.loss_history())?;
    }

    result?;
    Ok(())
}

fn reported_theta(result: &descent::Result<Fit>) -> Option<&[f64]> {
    match result {
        Ok(fit) => Some(fit.theta.as_slice()),
        Err(DescentErr::DidNotConverge { theta, .. }) => Some(theta.as_slice()),
        Err(_) => None,
    }
}

fn theta_line(theta: &[f64]) -> String {
    theta
        .iter()
        .enumerate()
        .map(|(i, t)| format!("Theta_{i}: {t}"))
        .collect::<Vec<_>>()
        .join(" ")
}
