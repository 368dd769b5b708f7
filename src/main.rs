use basmi_common::{MeasurementType, PROCEDURE_GUIDES};
use basmi_measure::camera::{Camera, CaptureOptions, FileCamera, PromptCamera};
use basmi_measure::home::{self, HomeChoice};
use basmi_measure::sequencer::{CaptureOutcome, Sequencer};
use basmi_measure::service::HttpAnalysisClient;
use basmi_measure::store::JsonFileStore;
use basmi_measure::submitter::ResultSubmitter;
use basmi_measure::{cli, config, error, measure, results};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Confirm;
use error::{BasmiError, Result};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = Config::load()?;
    let store_path = match cli.store.clone() {
        Some(path) => path,
        None => config.results_path()?,
    };

    match cli.command {
        Commands::Measure { value, photos, folder, repeat } => {
            let measurement = match value {
                Some(measurement) => measurement,
                None => match home::select_interactive()? {
                    HomeChoice::Measure(measurement) => measurement,
                    HomeChoice::Results => return show_results(store_path),
                    HomeChoice::Quit => return Ok(()),
                },
            };

            let camera = if let Some(folder) = folder {
                Camera::Files(FileCamera::from_folder(&folder)?)
            } else if !photos.is_empty() {
                Camera::Files(FileCamera::from_paths(photos)?)
            } else {
                Camera::Prompt(PromptCamera::new())
            };

            measure_once(&config, store_path, camera, measurement, repeat).await?;
        }

        Commands::Results => {
            show_results(store_path)?;
        }

        Commands::Instructions => {
            for (title, paragraphs) in PROCEDURE_GUIDES.iter() {
                println!("[{}]", title);
                for paragraph in paragraphs.iter() {
                    println!("  {}", paragraph);
                }
                println!();
            }
        }

        Commands::Config { set_service_url, set_timeout, show } => {
            let mut config = config;

            if let Some(url) = set_service_url {
                config.set_service_url(url)?;
                config.save()?;
                println!("✔ 解析サービスURLを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                config.save()?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  解析サービス: {}", config.service_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  画質係数: {}", config.image_quality);
                println!("  結果ファイル: {}", store_path.display());
            }
        }
    }

    Ok(())
}

async fn measure_once(
    config: &Config,
    store_path: PathBuf,
    camera: Camera,
    measurement: MeasurementType,
    repeat: bool,
) -> Result<()> {
    let client = HttpAnalysisClient::new(config.timeout_seconds)?;
    let store = JsonFileStore::open(store_path);
    let submitter = ResultSubmitter::new(client, store, config.service_url());
    let options = CaptureOptions {
        quality: config.image_quality,
    };
    let mut sequencer = Sequencer::new(camera, submitter, options);

    let outcome = measure::run_measurement(&mut sequencer, measurement, || {
        if !repeat {
            return Ok(false);
        }
        Confirm::new()
            .with_prompt("もう一度測定しますか？")
            .default(false)
            .interact()
            .map_err(|e| BasmiError::Prompt(e.to_string()))
    })
    .await?;

    match outcome {
        CaptureOutcome::Failed(error) => Err(error.into()),
        _ => Ok(()),
    }
}

fn show_results(store_path: PathBuf) -> Result<()> {
    let store = JsonFileStore::open(store_path);
    let board = results::results_board(&store)?;
    print!("{}", results::format_board(&board));
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BASMI_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| BasmiError::Config(format!("ログを初期化できません: {}", e)))?;

    Ok(())
}
