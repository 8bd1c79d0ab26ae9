use clap::Subcommand;
use std::path::PathBuf;

pub mod compare;
pub mod generate;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Generate DocumentHeader and DocumentInfo from templates
    Generate {
        /// Directory the records are written into
        output: PathBuf,

        /// Bundle to depend on (`file:Mods/MyMod.SC2Mod` or a bare path)
        locator: Option<String>,

        /// Directory holding DocumentHeader.tmpl and DocumentInfo.tmpl
        #[arg(short, long, default_value = ".")]
        templates: PathBuf,

        /// Directory relative bundle locators resolve against (overrides the config)
        #[arg(short, long)]
        base_dir: Option<PathBuf>,

        /// Configuration file (default: galaxydoc.toml in the template directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Warn about unrecognized template fields instead of failing
        #[arg(long)]
        lenient: bool,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Decode a DocumentHeader or DocumentInfo file
    Inspect {
        /// Record file to decode
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Compare generated records against a baseline, byte for byte
    Compare {
        /// Directory with freshly generated records
        generated: PathBuf,

        /// Directory with the expected records
        expected: PathBuf,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Generate {
                output,
                locator,
                templates,
                base_dir,
                config,
                lenient,
                quiet,
            } => generate::execute(
                output,
                locator.as_deref(),
                templates,
                generate::Overrides {
                    base_dir: base_dir.clone(),
                    config: config.clone(),
                    lenient: *lenient,
                },
                !*quiet,
            ),
            Commands::Inspect { file, format } => inspect::execute(file, format == "json"),
            Commands::Compare { generated, expected } => compare::execute(generated, expected),
        }
    }
}
