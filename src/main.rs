use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cloudcost::config::{init_config, Config};
use cloudcost::exit_codes::{codes, exit_code_for_anyhow};
use cloudcost::pricing::{DbInstanceClass, InstanceType, Region, VolumeType, LAMBDA_MEMORY_SIZES};
use cloudcost::{factory, inventory, report, ResourceManager};
use console::style;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloudcost")]
#[command(
    about = "Monthly cost calculator for AWS resources",
    long_about = "cloudcost models EC2 instances, Lambda functions, S3 buckets, EBS volumes and RDS databases\nin memory and reports their aggregate monthly cost.\n\nNo AWS APIs are called; prices come from built-in on-demand tables."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an inventory and print its cost report
    Report {
        /// Inventory file (JSON or TOML); defaults to the config value, then the built-in sample
        #[arg(short, long, env = "CLOUDCOST_INVENTORY")]
        inventory: Option<PathBuf>,
        /// Leave EC2 and RDS resources stopped
        #[arg(long)]
        no_start: bool,
    },
    /// List supported resource types and price tables
    Types,
    /// Initialize configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".cloudcost.toml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Setup logging - only warnings and errors unless verbose
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    // Keep stderr machine-readable alongside JSON output
    if cli.output == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let code = match run(cli) {
        Ok(()) => codes::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            exit_code_for_anyhow(&e)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Report { inventory, no_start } => {
            show_report(&config, inventory, no_start, &cli.output)?;
        }
        Commands::Types => {
            show_types(&cli.output)?;
        }
        Commands::Init { output } => {
            init_config(&output)?;
        }
    }

    Ok(())
}

fn show_report(
    config: &Config,
    inventory_path: Option<PathBuf>,
    no_start: bool,
    output_format: &str,
) -> Result<()> {
    let records = match inventory_path.or_else(|| config.inventory.clone()) {
        Some(path) => inventory::load_inventory(&path)
            .with_context(|| format!("Failed to load inventory: {}", path.display()))?,
        None => {
            debug!("no inventory configured, using built-in sample");
            inventory::sample_inventory()
        }
    };

    let resources =
        factory::create_resources_from_list(&records).context("Invalid resource inventory")?;

    let mut manager = ResourceManager::new();
    for resource in resources {
        manager.add(resource)?;
    }
    info!("Loaded {} resources", manager.len());

    if config.start_resources && !no_start {
        for id in manager.start_all()? {
            info!("Started: {}", id);
        }
    }

    if output_format == "json" {
        println!("{}", report::render_json(&manager)?);
    } else {
        print!("{}", report::render_text(&manager, &config.report));
    }

    Ok(())
}

fn show_types(output_format: &str) -> Result<()> {
    if output_format == "json" {
        let types = serde_json::json!({
            "resource_types": factory::supported_resource_types(),
            "regions": Region::supported(),
            "ec2_instance_types": InstanceType::ALL
                .iter()
                .map(|t| (t.as_str(), t.hourly_rate()))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "lambda_memory_sizes": LAMBDA_MEMORY_SIZES,
            "ebs_volume_types": VolumeType::ALL
                .iter()
                .map(|t| (t.as_str(), t.price_per_gb()))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "rds_instance_classes": DbInstanceClass::ALL
                .iter()
                .map(|c| (c.as_str(), c.hourly_rate()))
                .collect::<std::collections::BTreeMap<_, _>>(),
            "rds_engines": cloudcost::RdsDatabase::supported_engines(),
        });
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    println!("{}", style("Resource types").bold());
    for name in factory::supported_resource_types() {
        println!("  {}", name);
    }
    println!("\n{}", style("Regions").bold());
    println!("  {}", Region::supported().join(", "));
    println!("\n{}", style("EC2 instance types (USD/hour)").bold());
    for t in InstanceType::ALL {
        println!("  {:<14} {}", t.as_str(), t.hourly_rate());
    }
    println!("\n{}", style("Lambda memory sizes (MB)").bold());
    println!("  {:?}", LAMBDA_MEMORY_SIZES);
    println!("\n{}", style("EBS volume types (USD/GB-month)").bold());
    for t in VolumeType::ALL {
        println!("  {:<14} {}", t.as_str(), t.price_per_gb());
    }
    println!("\n{}", style("RDS instance classes (USD/hour)").bold());
    for c in DbInstanceClass::ALL {
        println!("  {:<14} {}", c.as_str(), c.hourly_rate());
    }
    println!("\n{}", style("RDS engines").bold());
    println!("  {}", cloudcost::RdsDatabase::supported_engines().join(", "));

    Ok(())
}
