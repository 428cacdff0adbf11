use clap::Parser;

/// Render every configured store asset into its output directory.
#[derive(Parser, Debug)]
#[command(name = "promoshot", version, about)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    for set in promoshot::asset_sets() {
        println!("== {} -> {}", set.name, set.output_dir.display());
        let mut processor = promoshot::Processor::new(&set, promoshot::Rng::from_entropy())?;
        for spec in &set.assets {
            println!("Generating {}...", spec.output());
            let report = processor.process(spec)?;
            if report.frame.is_none() && matches!(spec, promoshot::AssetSpec::Screenshot { .. }) {
                println!("  (no screenshot found; wrote text-only image)");
            }
        }
    }

    println!("Done.");
    Ok(())
}
