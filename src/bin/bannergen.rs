use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;

use bannergen::BannerSpec;

#[derive(Parser, Debug)]
#[command(name = "bannergen", version, about = "Generate a 1500x500 social banner PNG")]
struct Cli {
    /// Main title text.
    #[arg(long)]
    title: Option<String>,

    /// Subtitle or handle.
    #[arg(long)]
    subtitle: Option<String>,

    /// Output PNG path.
    #[arg(long, default_value = bannergen::pipeline::DEFAULT_OUT)]
    out: PathBuf,

    /// RNG seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Optional banner spec JSON; CLI flags override its fields.
    #[arg(long = "spec")]
    spec_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut spec = match &cli.spec_path {
        Some(path) => read_spec_json(path)?,
        None => BannerSpec::default(),
    };
    if let Some(title) = cli.title {
        spec.title = title;
    }
    if let Some(subtitle) = cli.subtitle {
        spec.subtitle = subtitle;
    }
    if let Some(seed) = cli.seed {
        spec.seed = Some(seed);
    }

    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }

    bannergen::generate(&spec, &cli.out)?;
    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

fn read_spec_json(path: &PathBuf) -> anyhow::Result<BannerSpec> {
    let f = File::open(path).with_context(|| format!("open spec '{}'", path.display()))?;
    let r = BufReader::new(f);
    let spec: BannerSpec = serde_json::from_reader(r).with_context(|| "parse spec JSON")?;
    Ok(spec)
}
