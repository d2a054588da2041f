//! watson-cli: Watson 自然语言服务命令行工具
//!
//! Usage:
//!   watson-cli classifiers                         List classifiers
//!   watson-cli classifier <id>                     Show one classifier
//!   watson-cli classify <id> <text>                Classify a phrase
//!   watson-cli train <metadata.json> <data.csv>    Train a new classifier
//!   watson-cli delete <id>                         Delete a classifier
//!   watson-cli combined <text> [--url] [--extract a,b]   Combined analysis

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use watson_sdk::alchemy::{CombinedRequest, Feature};
use watson_sdk::{AlchemyLanguage, NaturalLanguageClassifier};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "classifiers" => cmd_classifiers().await,
        "classifier" => cmd_classifier(&args[2..]).await,
        "classify" => cmd_classify(&args[2..]).await,
        "train" => cmd_train(&args[2..]).await,
        "delete" => cmd_delete(&args[2..]).await,
        "combined" => cmd_combined(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("watson-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"watson-cli: Watson 自然语言服务命令行工具

USAGE:
    watson-cli <COMMAND> [ARGS]

COMMANDS:
    classifiers                          List classifiers
    classifier <id>                      Show one classifier
    classify <id> <text>                 Classify a phrase
    train <metadata.json> <data.csv>     Train a new classifier
    delete <id>                          Delete a classifier
    combined <text|url> [--url] [--extract a,b,...]
                                         AlchemyLanguage combined analysis
    version                              Show version information
    help                                 Show this help message

ENVIRONMENT:
    NATURAL_LANGUAGE_CLASSIFIER_USERNAME / _PASSWORD / _URL
    ALCHEMY_LANGUAGE_API_KEY / _URL
    WATSON_HTTP_TIMEOUT_SECS            Request timeout (default 60)
    RUST_LOG                            Log filter (e.g. watson_sdk=debug)"#
    );
}

fn classifier_client() -> anyhow::Result<NaturalLanguageClassifier> {
    NaturalLanguageClassifier::builder()
        .from_env()
        .build()
        .context("natural language classifier configuration")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    match args.get(index) {
        Some(value) => Ok(value.as_str()),
        None => bail!("missing argument <{name}>"),
    }
}

async fn cmd_classifiers() -> anyhow::Result<()> {
    let classifiers = classifier_client()?.list_classifiers().await?;
    print_json(&classifiers)
}

async fn cmd_classifier(args: &[String]) -> anyhow::Result<()> {
    let id = arg(args, 0, "id")?;
    let classifier = classifier_client()?.get_classifier(id).await?;
    print_json(&classifier)
}

async fn cmd_classify(args: &[String]) -> anyhow::Result<()> {
    let id = arg(args, 0, "id")?;
    let text = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    let classification = classifier_client()?.classify(id, &text).await?;
    print_json(&classification)
}

async fn cmd_train(args: &[String]) -> anyhow::Result<()> {
    let metadata = arg(args, 0, "metadata.json")?;
    let data = arg(args, 1, "data.csv")?;
    let classifier = classifier_client()?
        .create_classifier_from_files(metadata, data)
        .await?;
    print_json(&classifier)
}

async fn cmd_delete(args: &[String]) -> anyhow::Result<()> {
    let id = arg(args, 0, "id")?;
    classifier_client()?.delete_classifier(id).await?;
    println!("deleted {id}");
    Ok(())
}

async fn cmd_combined(args: &[String]) -> anyhow::Result<()> {
    let mut is_url = false;
    let mut features = Vec::new();
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => is_url = true,
            "--extract" => {
                let list = iter.next().context("--extract needs a value")?;
                for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    match Feature::parse(name) {
                        Some(feature) => features.push(feature),
                        None => bail!("unknown feature '{name}'"),
                    }
                }
            }
            _ => words.push(arg.as_str()),
        }
    }
    let input = words.join(" ");
    let request = if is_url {
        CombinedRequest::url(input)
    } else {
        CombinedRequest::text(input)
    }
    .features(features);

    let alchemy = AlchemyLanguage::builder()
        .from_env()
        .build()
        .context("alchemy language configuration")?;
    let result = alchemy.combined_analysis(&request).await?;
    print_json(&result)
}
