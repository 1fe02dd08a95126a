//! DBAP layout probe
//!
//! Usage:
//!   dbap layout               - List speaker positions and reflections
//!   dbap mix <X> <Y> <Z>      - Print the gain vector for a source
//!   dbap topology <CHANNEL>   - Show next, opposite and reflected channels
//!   dbap groups               - List channel groups
//!
//! Global flags override values read from `--config <file.json>`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rf_dbap::{AudioSource, DbapConfig, LayoutKind, Position3D, SingularityPolicy, SpeakerLayout};

#[derive(Parser)]
#[command(name = "dbap", about = "DBAP speaker layout probe")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Speaker layout (desktop, sphere)
    #[arg(short, long, global = true)]
    layout: Option<LayoutKind>,

    /// Decay in dB
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    decay: Option<f32>,

    /// Clamp source distances below this value instead of snapping to a speaker
    #[arg(long, global = true)]
    clamp: Option<f32>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List speaker positions and reflections
    Layout,
    /// Print the gain vector for a source position
    Mix {
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
        #[arg(allow_negative_numbers = true)]
        z: f32,
    },
    /// Show next, opposite and reflected channels
    Topology { channel: usize },
    /// List channel groups
    Groups,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    log::debug!("Resolved configuration: {:?}", config);

    let layout = config.build().context("building speaker layout")?;

    match cli.command {
        Commands::Layout => print_layout(&layout, cli.json),
        Commands::Mix { x, y, z } => print_mix(layout, Position3D::new(x, y, z), cli.json),
        Commands::Topology { channel } => print_topology(&layout, channel, cli.json),
        Commands::Groups => print_groups(&layout, cli.json),
    }
}

fn resolve_config(cli: &Cli) -> Result<DbapConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            DbapConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => DbapConfig::default(),
    };

    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if let Some(decay) = cli.decay {
        config.decay_db = decay;
    }
    if let Some(min_distance) = cli.clamp {
        if !(min_distance.is_finite() && min_distance >= 0.0) {
            bail!("clamp distance must be a non-negative number, got {min_distance}");
        }
        config.singularity = SingularityPolicy::Clamp { min_distance };
    }

    Ok(config)
}

fn print_layout(layout: &SpeakerLayout, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(layout)?);
        return Ok(());
    }

    println!(
        "{} layout: {} channels, decay {} dB, rolloff {:.4}",
        layout.kind(),
        layout.num_channels(),
        layout.decay_db(),
        layout.rolloff()
    );
    for speaker in layout.speakers() {
        let p = speaker.position;
        let role = if speaker.is_main() { "main" } else { "reserved" };
        println!(
            "{:>3}  {:<8}  {:>8.4} {:>8.4} {:>8.4}  reflect {:>3}",
            speaker.channel,
            role,
            p.x,
            p.y,
            p.z,
            layout.reflect(speaker.channel)
        );
    }
    Ok(())
}

fn print_mix(layout: SpeakerLayout, position: Position3D, json: bool) -> Result<()> {
    let source = AudioSource::at(Arc::new(layout), position);

    if json {
        println!("{}", serde_json::to_string(source.gains())?);
    } else {
        print!("{source}");
    }
    Ok(())
}

fn print_topology(layout: &SpeakerLayout, channel: usize, json: bool) -> Result<()> {
    if channel >= layout.num_channels() {
        bail!(
            "channel {channel} out of range for {} layout ({} channels)",
            layout.kind(),
            layout.num_channels()
        );
    }

    let next = layout.next(channel);
    let opposite = layout.opposite(channel);
    let reflect = layout.reflect(channel);

    if json {
        let value = serde_json::json!({
            "channel": channel,
            "next": next,
            "opposite": opposite,
            "reflect": reflect,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("channel  {channel}");
        println!("next     {next}");
        println!("opposite {opposite}");
        println!("reflect  {reflect}");
    }
    Ok(())
}

fn print_groups(layout: &SpeakerLayout, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(layout.groups())?);
        return Ok(());
    }

    for group in layout.groups() {
        let channels: Vec<String> = group.channels.iter().map(ToString::to_string).collect();
        println!("{:<9} {}", group.name, channels.join(" "));
    }
    Ok(())
}
