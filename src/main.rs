use clap::{Parser, Subcommand};
use microdeck::catalogue::Catalogue;
use microdeck::layout::ProfileStore;
use microdeck::{classify, config, output, plan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "microdeck")]
#[command(about = "Slide-deck planner for electron-microscope image sets")]
#[command(long_about = "\
Slide-deck planner for electron-microscope image sets

Filenames are the data source. Instrument exports carry a modality token
(UD, PDBSE, Spectrum, Map, ...) and a group code in every filename; microdeck
classifies them, groups images into slides, and computes aspect-preserving
layouts as a JSON plan for a rendering backend.

Pipeline:

  1. index      images/ -> catalogue.json   (classify every filename)
  2. plan       catalogue.json -> deck-plan.json
  3. render     deck-plan.json -> slides    (external tool)

Classification examples:
  NiCoCr_HT1250c_48h_0001_2_UD.tif  -> group 0001, type UD
  Co K_alpha_1 Map Data 2.tif       -> group MAP2, type Map
  Spectrum 5.tiff                   -> group SPEC5, type Spectrum

Run 'microdeck gen-config' to generate a documented deck.toml.")]
#[command(version)]
struct Cli {
    /// Catalogue file
    #[arg(long, default_value = "catalogue.json", global = true)]
    catalogue: PathBuf,

    /// Layout profiles file
    #[arg(long, default_value = "profiles.json", global = true)]
    profiles: PathBuf,

    /// Deck configuration file
    #[arg(long, default_value = "deck.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index every supported image under a directory into the catalogue
    Index {
        /// Directory to walk
        dir: PathBuf,
    },
    /// Re-run the classifier over every catalogue entry
    Reindex,
    /// Show the catalogue grouped by label
    List,
    /// Search entries by filename, label, or metadata
    Search { query: String },
    /// Classify filenames without touching the catalogue
    Classify {
        /// Filenames to classify
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// Reassign an entry's group (omit GROUP to ungroup)
    SetGroup {
        id: u64,
        group: Option<String>,
    },
    /// Reassign an entry's identifier (omit IDENTIFIER to clear)
    SetType {
        id: u64,
        identifier: Option<String>,
    },
    /// Remove an entry from the catalogue
    Remove { id: u64 },
    /// Compose all groups into a deck plan manifest
    Plan {
        /// Output manifest path
        #[arg(long, default_value = "deck-plan.json")]
        output: PathBuf,
        /// Only include these group labels (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,
    },
    /// Print a stock deck.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Index { dir } => {
            let mut catalogue = Catalogue::load(&cli.catalogue)?;
            let report = catalogue.index_dir(&dir);
            catalogue.save(&cli.catalogue)?;
            output::print_index_report(&report);
        }
        Command::Reindex => {
            let mut catalogue = Catalogue::load(&cli.catalogue)?;
            let changed = catalogue.reclassify_all();
            catalogue.save(&cli.catalogue)?;
            println!(
                "Reclassified {} entr(ies), {} changed",
                catalogue.len(),
                changed
            );
        }
        Command::List => {
            let catalogue = Catalogue::load(&cli.catalogue)?;
            output::print_list_output(&catalogue);
        }
        Command::Search { query } => {
            let catalogue = Catalogue::load(&cli.catalogue)?;
            let results = catalogue.search(&query);
            if results.is_empty() {
                println!("No entries match '{query}'");
            } else {
                for entry in results {
                    println!(
                        "[{}] {} ({}x{})",
                        entry.id, entry.filename, entry.width, entry.height
                    );
                }
            }
        }
        Command::Classify { filenames } => {
            let results: Vec<(String, classify::Classification)> = filenames
                .into_iter()
                .map(|name| {
                    let c = classify::extract(&name);
                    (name, c)
                })
                .collect();
            output::print_classify_output(&results);
        }
        Command::SetGroup { id, group } => {
            let mut catalogue = Catalogue::load(&cli.catalogue)?;
            catalogue.set_group(id, group)?;
            catalogue.save(&cli.catalogue)?;
            if let Some(entry) = catalogue.get(id) {
                println!("[{}] {} -> group '{}'", id, entry.filename, entry.group_label());
            }
        }
        Command::SetType { id, identifier } => {
            // Validate against the taxonomy before touching the catalogue.
            let identifier = identifier.map(|s| s.parse()).transpose()?;
            let mut catalogue = Catalogue::load(&cli.catalogue)?;
            catalogue.set_identifier(id, identifier)?;
            catalogue.save(&cli.catalogue)?;
            if let Some(entry) = catalogue.get(id) {
                println!("[{}] {} -> group '{}'", id, entry.filename, entry.group_label());
            }
        }
        Command::Remove { id } => {
            let mut catalogue = Catalogue::load(&cli.catalogue)?;
            if catalogue.remove(id) {
                catalogue.save(&cli.catalogue)?;
                println!("Removed entry {id}");
            } else {
                println!("No entry with id {id}");
            }
        }
        Command::Plan { output: out, groups } => {
            let catalogue = Catalogue::load(&cli.catalogue)?;
            let profiles = ProfileStore::load(&cli.profiles)?;
            let deck_config = config::load_config(&cli.config)?;

            let include = if groups.is_empty() {
                None
            } else {
                Some(groups.as_slice())
            };
            let deck = plan::build_deck_plan(&catalogue, &profiles, &deck_config.canvas, include)?;

            let json = serde_json::to_string_pretty(&deck)?;
            std::fs::write(&out, json)?;
            output::print_plan_output(&deck);
            println!("Plan written to {}", out.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
