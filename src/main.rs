use clap::{Parser as ClapParser, Subcommand};
use hcl_read::cli::{self, CliError, ReadOptions};
use hcl_read::output::DEFAULT_OUTPUT_FORMAT;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(ClapParser)]
#[command(name = "hcl-read")]
#[command(about = "hcl-read - Read evaluated values out of HCL configuration files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an address query on an HCL file and print the result
    Read {
        /// Address query, e.g. resource.google_container_node_pool.nodes.node_count
        query: String,

        /// HCL file (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Format to print the values as: go-template='<TEMPLATE>', json or yaml
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FORMAT)]
        output_format: String,

        /// Fall back to the raw expression text if a value cannot be evaluated
        #[arg(long)]
        fallback: bool,
    },

    /// Print the version and build revision
    Version,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Read {
            query,
            file,
            output_format,
            fallback,
        } => run_read(query, file, output_format, fallback),
        Commands::Version => {
            println!("{}", cli::version());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_read(
    query: String,
    file: Option<PathBuf>,
    output_format: String,
    fallback: bool,
) -> Result<(), CliError> {
    let input = match file {
        Some(path) => Some(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = ReadOptions {
        query,
        input,
        output_format,
        fallback,
    };

    print!("{}", cli::execute_read(&options)?);
    Ok(())
}
