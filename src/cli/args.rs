use clap::{ArgGroup, Parser};

/// Command-line arguments for forgeyml
#[derive(Parser, Debug, Clone)]
#[command(name = "forgeyml")]
#[command(about = "Validate and normalize conda-forge.yml feedstock configuration")]
#[command(long_about = None)]
#[command(version)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
pub struct Args {
    /// Configuration file path
    #[arg(long, value_name = "PATH", default_value = "./conda-forge.yml")]
    pub config: String,

    /// Recipe directory; conda-forge.yml is looked up next to it instead of --config
    #[arg(long = "recipe-dir", value_name = "DIR", conflicts_with = "config")]
    pub recipe_dir: Option<String>,

    /// Print the normalized configuration with every default filled in
    #[arg(long, group = "mode")]
    pub normalized: bool,

    /// Output format for --normalized: yaml or json
    #[arg(
        long = "output-format",
        value_name = "FORMAT",
        default_value = "yaml",
        requires = "normalized"
    )]
    pub output_format: String,

    /// Print lints and hints as markdown bullets
    #[arg(long, group = "mode")]
    pub lint: bool,

    /// Print the markdown reference of every field
    #[arg(long, group = "mode")]
    pub docs: bool,

    /// Print the JSON schema of the configuration file
    #[arg(long, group = "mode")]
    pub schema: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Modes whose stdout is consumed by other tools
    #[must_use]
    pub const fn is_machine_output(&self) -> bool {
        self.normalized || self.docs || self.schema
    }
}
