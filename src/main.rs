use clap::Parser;
use img_optimize::config::OptimizeConfig;
use img_optimize::optimize::{RunReport, optimize_dir};
use img_optimize::output;
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "optimize-images")]
#[command(about = "Resize and recompress the JPEGs in ./img for the web, in place")]
#[command(long_about = "\
Resize and recompress the JPEGs in ./img for the web, in place

Run from the project root. Every *.jpg / *.jpeg in img/ is downscaled so its
longest side is at most 900px and re-encoded as JPEG at quality 85. Originals
are overwritten; there is no backup.

  img/
  ├── hero-bread.png   # hero banner: always skipped
  ├── photo1.JPG       # resized + recompressed
  └── logo.svg         # not a JPEG: ignored

Per-file errors are reported and skipped. The exit status is always 0.")]
#[command(version = version_string())]
struct Cli {}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    // Diagnostics only; progress goes to stdout via `output`.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let image_dir = std::path::absolute("img").unwrap_or_else(|_| PathBuf::from("img"));
    let config = OptimizeConfig::for_dir(image_dir);

    match optimize_dir(&config, output::print_event) {
        Ok(RunReport::MissingDirectory(dir)) => {
            println!("{}", output::format_missing_dir(&dir));
        }
        Ok(RunReport::Completed { summary, .. }) => {
            output::print_summary(&summary);
        }
        Err(e) => {
            eprintln!("error: {}", e);
        }
    }

    // Best-effort batch job: failures never change the exit status.
    ExitCode::SUCCESS
}
