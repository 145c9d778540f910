use super::commands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Featurize an a3m alignment into a safetensors file
    Msa {
        #[arg(short, long)]
        input: String,
        #[arg(short, long)]
        output: String,
        /// JSON featurizer configuration
        #[arg(long)]
        config: Option<String>,
        /// JSON reference tables replacing the built-in ones
        #[arg(long)]
        tables: Option<String>,
        /// keep rows with no identity to the query
        #[arg(long)]
        no_filter: bool,
        /// 21-symbol profiles without the gap state
        #[arg(long)]
        no_gaps: bool,
    },
    /// Write the built-in reference tables as JSON
    Tables {
        #[arg(short, long)]
        output: String,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Msa {
                input,
                output,
                config,
                tables,
                no_filter,
                no_gaps,
            } => commands::msa::execute(commands::msa::MsaArgs {
                input,
                output,
                config,
                tables,
                no_filter,
                no_gaps,
            }),
            Commands::Tables { output } => commands::tables::execute(output),
        }
    }
}
