use anyhow::{bail, Context, Result};
use clap::Parser;
use tost::cli::{Cli, InputSource, OutputFormat};
use tost::dataset::Dataset;
use tost::equivalence::equivalence_test;
use tost::json_output::JsonReport;
use tost::simulation::VotSimulation;
use tost::summary::{summarize_group, SampleSummary};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Labelled summary of one group
type Group = (String, SampleSummary);

/// Pick the two compared groups out of a dataset
///
/// Without an explicit choice the dataset must hold exactly two groups,
/// taken in sorted label order.
fn select_groups(
    dataset: &Dataset,
    group1: Option<&str>,
    group2: Option<&str>,
) -> Result<(Group, Group)> {
    let labels = dataset.groups();
    let (label1, label2) = match (group1, group2) {
        (Some(a), Some(b)) => (a.to_string(), b.to_string()),
        (None, None) if labels.len() == 2 => (labels[0].clone(), labels[1].clone()),
        (None, None) => bail!(
            "dataset has {} groups ({}); choose two with --group1/--group2",
            labels.len(),
            labels.join(", ")
        ),
        _ => bail!("--group1 and --group2 must be given together"),
    };
    if label1 == label2 {
        bail!("cannot compare group '{}' with itself", label1);
    }

    let lookup = |label: String| -> Result<Group> {
        let summary = summarize_group(dataset, &label)
            .with_context(|| format!("Failed to summarize group '{}'", label))?;
        Ok((label, summary))
    };
    Ok((lookup(label1)?, lookup(label2)?))
}

/// Raw observations behind the input, if it has any
fn load_dataset(source: &InputSource) -> Result<Option<Dataset>> {
    match source {
        InputSource::Summaries { .. } => Ok(None),
        InputSource::Data { path, .. } => Dataset::from_csv_file(path)
            .map(Some)
            .with_context(|| format!("Failed to read dataset {}", path.display())),
        InputSource::Simulate { seed } => VotSimulation::with_seed(*seed)
            .simulate()
            .map(Some)
            .context("Failed to simulate VOT dataset"),
    }
}

/// Resolve the input into two labelled summaries
fn load_groups(source: &InputSource, dataset: Option<&Dataset>) -> Result<(Group, Group)> {
    match (source, dataset) {
        (InputSource::Summaries { group1, group2 }, _) => {
            let (m1, s1, n1) = *group1;
            let (m2, s2, n2) = *group2;
            let g1 = SampleSummary::new(m1, s1, n1).context("group 1")?;
            let g2 = SampleSummary::new(m2, s2, n2).context("group 2")?;
            Ok((("group1".to_string(), g1), ("group2".to_string(), g2)))
        }
        (InputSource::Data { group1, group2, .. }, Some(dataset)) => {
            select_groups(dataset, group1.as_deref(), group2.as_deref())
        }
        (InputSource::Simulate { seed }, Some(dataset)) => {
            let [reference, comparison] = VotSimulation::with_seed(*seed).groups;
            select_groups(
                dataset,
                Some(reference.label.as_str()),
                Some(comparison.label.as_str()),
            )
        }
        (_, None) => bail!("no observations to summarize"),
    }
}

fn print_group(label: &str, summary: &SampleSummary) {
    println!(
        "  {:<14} mean = {:>8.3}  sd = {:>7.3}  n = {}",
        label, summary.mean, summary.std_dev, summary.size
    );
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let source = args.input_source();
    tracing::debug!(?source, "resolved input");

    let dataset = load_dataset(&source)?;

    if args.emit_data {
        if let Some(dataset) = &dataset {
            print!("{}", dataset.to_csv().context("Failed to write dataset")?);
        }
        return Ok(());
    }

    let config = args
        .resolve_config()
        .context("Invalid analysis configuration")?;
    tracing::debug!(?config, "resolved configuration");

    let ((label1, g1), (label2, g2)) = load_groups(&source, dataset.as_ref())?;

    let result = equivalence_test(&g1, &g2, &config).context("Equivalence test failed")?;

    match args.format {
        OutputFormat::Text => {
            println!("=== Equivalence Analysis ===");
            print_group(&label1, &g1);
            print_group(&label2, &g2);
            println!();
            print!("{}", result.to_report_string());
        }
        OutputFormat::Json => {
            let report =
                JsonReport::from_result([(label1.as_str(), &g1), (label2.as_str(), &g2)], &result);
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}
