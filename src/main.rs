//! Crime Scatter - Main entry point
//!
//! Reads a CSV table and renders a scatter plot of house price against crime
//! rate. Running with no arguments uses the defaults from plot.json; flags
//! override individual properties.

use anyhow::Context;
use crime_scatter::config::PlotConfig;
use crime_scatter::pipeline;
use crime_scatter::table::{registry, PropertyReader};
use tracing_subscriber::{fmt, EnvFilter};

/// Command-line flags and the plot properties they set
const FLAGS: &[(&str, &str)] = &[
    ("--input", "input.path"),
    ("--output", "output.path"),
    ("--x", "column.x"),
    ("--y", "column.y"),
    ("--delimiter", "input.delimiter"),
    ("--title", "plot.title"),
    ("--missing", "missing.values"),
    ("--width", "figure.width"),
    ("--height", "figure.height"),
    ("--dpi", "figure.dpi"),
    ("--point-size", "point.size"),
];

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    println!("Crime Scatter v{}\n", env!("CARGO_PKG_VERSION"));

    match run(&args) {
        Ok(()) => println!("\n✓ Plot generated successfully!"),
        Err(e) => {
            eprintln!("\n✗ {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let props = parse_args(args);
    let config = PlotConfig::from_properties(&props).context("Invalid configuration")?;
    tracing::debug!(?config, "configuration resolved");

    let result = pipeline::generate_plot(&config)?;
    println!(
        "✓ Saved {} ({}x{} {}, {} points)",
        result.output_path.display(),
        result.width,
        result.height,
        result.format.extension(),
        result.n_points
    );
    Ok(())
}

/// Parse command-line arguments into property overrides
fn parse_args(args: &[String]) -> PropertyReader {
    let mut props = PropertyReader::new();
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match FLAGS.iter().find(|(f, _)| *f == flag) {
            Some((_, property)) if i + 1 < args.len() => {
                props.set(property, args[i + 1].as_str());
                i += 2;
            }
            Some(_) => {
                eprintln!("⚠ Flag '{}' expects a value, ignoring", flag);
                i += 1;
            }
            None => {
                eprintln!("⚠ Unknown argument '{}', ignoring", flag);
                i += 1;
            }
        }
    }
    props
}

fn print_usage() {
    let reg = registry();
    println!("Usage: crime_scatter [FLAG VALUE]...\n");
    println!("Flags:");
    for (flag, property) in FLAGS {
        let Some(def) = reg.get_property(property) else {
            continue;
        };
        let choices = def.valid_values();
        if choices.is_empty() {
            println!(
                "  {:<13} {} (default: '{}')",
                flag, def.description, def.default_value
            );
        } else {
            println!(
                "  {:<13} {} [{}] (default: '{}')",
                flag,
                def.description,
                choices.join("|"),
                def.default_value
            );
        }
    }
}
