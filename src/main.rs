// Morphling - Procedural Creature Avatars
// Copyright (c) 2025 Filipe da Veiga Ventura Alves
// Licensed under MIT License

use clap::{Args, Parser, Subcommand};
use morphling::config::{OutputFormat, RenderSettings};
use morphling::{
    creature_name, decode_genome, derive_parameters, generate_with_policy, load_png_metadata,
    rasterize, render_svg, save_png, GenomeInput, Scene, SeedPolicy,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "morphling", version, about = "Deterministic creature avatars from on-chain genomes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GenomeArgs {
    /// Primary genome as hex (optional 0x prefix)
    #[arg(long, default_value = "")]
    genome: String,
    /// Secondary seed as hex, usually the object id
    #[arg(long, default_value = "")]
    seed: String,
    #[arg(long, default_value_t = 1)]
    level: u16,
    #[arg(long, default_value_t = 0)]
    stage: u16,
    /// Reject a malformed seed instead of ignoring it
    #[arg(long)]
    strict_seed: bool,
}

impl GenomeArgs {
    fn input(&self) -> GenomeInput {
        GenomeInput::new(self.genome.clone(), self.seed.clone(), self.level, self.stage)
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    genome: GenomeArgs,
    #[arg(long)]
    size: Option<f64>,
    #[arg(long)]
    label: Option<String>,
    /// Label unnamed creatures with a generated genus-species name
    #[arg(long)]
    auto_name: bool,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Pixel multiplier for PNG output
    #[arg(long)]
    scale: Option<u32>,
    /// Output file; SVG and JSON go to stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render an avatar as SVG, PNG or JSON scene
    Render(RenderArgs),
    /// Print derived parameters and the generated name
    Inspect {
        #[command(flatten)]
        genome: GenomeArgs,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Print the generation request embedded in a PNG avatar
    Metadata { path: PathBuf },
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<RenderSettings> {
    match path {
        Some(path) => RenderSettings::load_from_disk(path),
        None => {
            let default_path = RenderSettings::default_path();
            if default_path.exists() {
                log::info!("using settings from {}", default_path.display());
                RenderSettings::load_from_disk(&default_path)
            } else {
                Ok(RenderSettings::default())
            }
        }
    }
}

fn policy(args: &GenomeArgs, settings: &RenderSettings) -> SeedPolicy {
    if args.strict_seed {
        SeedPolicy::Strict
    } else {
        settings.seed_policy
    }
}

/// Command-line flags win over the settings file; `--auto-name` can only turn naming on.
fn apply_overrides(settings: &mut RenderSettings, args: &RenderArgs) {
    if let Some(size) = args.size {
        settings.size = size;
    }
    if let Some(scale) = args.scale {
        settings.raster_scale = scale;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    settings.auto_name |= args.auto_name;
    settings.sanitize();
}

fn build_scene(args: &RenderArgs, settings: &RenderSettings) -> anyhow::Result<Scene> {
    let input = args.genome.input();
    let policy = policy(&args.genome, settings);
    let mut scene = generate_with_policy(&input, settings.size, args.label.as_deref(), policy)?;
    if scene.label.is_none() && settings.auto_name {
        scene.label = Some(creature_name(&scene.params));
    }
    Ok(scene)
}

fn write_output(scene: &Scene, settings: &RenderSettings, out: Option<&Path>) -> anyhow::Result<()> {
    match settings.format {
        OutputFormat::Svg | OutputFormat::Json => {
            let text = if settings.format == OutputFormat::Svg {
                render_svg(scene)
            } else {
                serde_json::to_string_pretty(scene)?
            };
            match out {
                Some(path) => {
                    std::fs::write(path, text)?;
                    log::info!("wrote {}", path.display());
                }
                None => print!("{}", text),
            }
        }
        OutputFormat::Png => {
            let Some(path) = out else {
                anyhow::bail!("PNG output needs --out <path>");
            };
            let image = rasterize(scene, settings.raster_scale);
            save_png(path, scene, &image)?;
        }
    }
    Ok(())
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let mut settings = load_settings(args.settings.as_deref())?;
    apply_overrides(&mut settings, &args);
    let scene = build_scene(&args, &settings)?;
    write_output(&scene, &settings, args.out.as_deref())
}

fn inspect_report(genome: &GenomeArgs, settings: &RenderSettings) -> anyhow::Result<serde_json::Value> {
    let input = genome.input();
    let bytes = decode_genome(&input, policy(genome, settings))?;
    let params = derive_parameters(&bytes, input.level, input.stage);
    Ok(serde_json::json!({
        "bytes": hex::encode(bytes.as_slice()),
        "name": creature_name(&params),
        "params": params,
    }))
}

fn inspect(genome: GenomeArgs, settings: Option<PathBuf>) -> anyhow::Result<()> {
    let settings = load_settings(settings.as_deref())?;
    let report = inspect_report(&genome, &settings)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Inspect { genome, settings } => inspect(genome, settings),
        Commands::Metadata { path } => {
            let metadata = load_png_metadata(&path)?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(extra: &[&str]) -> RenderArgs {
        let argv: Vec<&str> = ["morphling", "render"].into_iter().chain(extra.iter().copied()).collect();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Render(args) => args,
            other => panic!("expected render, got {other:?}"),
        }
    }

    fn inspect_args(extra: &[&str]) -> GenomeArgs {
        let argv: Vec<&str> = ["morphling", "inspect"].into_iter().chain(extra.iter().copied()).collect();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Inspect { genome, .. } => genome,
            other => panic!("expected inspect, got {other:?}"),
        }
    }

    #[test]
    fn flags_override_settings() {
        let mut settings = RenderSettings {
            size: 64.0,
            raster_scale: 2,
            auto_name: true,
            format: OutputFormat::Json,
            ..RenderSettings::default()
        };
        let args = render_args(&["--size", "128", "--scale", "3", "--format", "png"]);
        apply_overrides(&mut settings, &args);
        assert_eq!(settings.size, 128.0);
        assert_eq!(settings.raster_scale, 3);
        assert_eq!(settings.format, OutputFormat::Png);
        // Absent flag leaves the file's choice alone.
        assert!(settings.auto_name);
    }

    #[test]
    fn missing_flags_keep_settings_and_still_sanitize() {
        let mut settings = RenderSettings {
            size: 1.0,
            raster_scale: 50,
            ..RenderSettings::default()
        };
        apply_overrides(&mut settings, &render_args(&[]));
        assert_eq!(settings.size, 16.0);
        assert_eq!(settings.raster_scale, 8);
        assert_eq!(settings.format, OutputFormat::Svg);
        assert!(!settings.auto_name);

        apply_overrides(&mut settings, &render_args(&["--auto-name"]));
        assert!(settings.auto_name);
    }

    #[test]
    fn auto_name_fills_only_missing_labels() {
        let settings = RenderSettings {
            auto_name: true,
            ..RenderSettings::default()
        };
        let unnamed = build_scene(&render_args(&["--genome", "0x010203"]), &settings).unwrap();
        assert_eq!(unnamed.label, Some(creature_name(&unnamed.params)));

        let named = build_scene(&render_args(&["--genome", "0x010203", "--label", "Blob"]), &settings).unwrap();
        assert_eq!(named.label.as_deref(), Some("Blob"));
    }

    #[test]
    fn png_without_out_path_is_an_error() {
        let settings = RenderSettings {
            format: OutputFormat::Png,
            ..RenderSettings::default()
        };
        let scene = build_scene(&render_args(&[]), &settings).unwrap();
        let err = write_output(&scene, &settings, None).unwrap_err();
        assert!(err.to_string().contains("--out"));
    }

    #[test]
    fn svg_goes_to_the_out_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.svg");
        let settings = RenderSettings::default();
        let scene = build_scene(&render_args(&["--genome", "0x0102"]), &settings).unwrap();
        write_output(&scene, &settings, Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_svg(&scene));
    }

    #[test]
    fn strict_seed_flag_beats_lenient_settings() {
        let lenient = RenderSettings::default();
        let strict = RenderSettings {
            seed_policy: SeedPolicy::Strict,
            ..RenderSettings::default()
        };
        let args = inspect_args(&["--genome", "0x0102", "--seed", "0xabc"]);
        assert_eq!(policy(&args, &lenient), SeedPolicy::Lenient);
        assert_eq!(policy(&args, &strict), SeedPolicy::Strict);

        let report = inspect_report(&args, &lenient).unwrap();
        assert_eq!(report["bytes"], "0102");
        assert!(inspect_report(&args, &strict).is_err());

        let flagged = inspect_args(&["--genome", "0x0102", "--seed", "0xabc", "--strict-seed"]);
        assert_eq!(policy(&flagged, &lenient), SeedPolicy::Strict);
        assert!(inspect_report(&flagged, &lenient).is_err());
    }
}
