mod api;
mod banner;
mod page;
mod render;
mod submit;

use clap::Parser;

#[derive(clap::Parser)]
struct Opts {
    #[clap(long, default_value = "credicheck.toml")]
    config: std::path::PathBuf,

    /// Overrides `base_url` from the config file.
    #[clap(long)]
    base_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the full analysis and print the rendered page.
    Full {
        text: String,

        /// File name of the accompanying image. Only the name is sent.
        #[clap(long)]
        image: Option<String>,
    },
    /// Classify text with the text model only.
    Text { text: String },
    /// Check an image with the image model only.
    Image { path: String },
}

fn base_url_default() -> String {
    api::DEFAULT_BASE_URL.to_owned()
}

const fn request_timeout_secs_default() -> u64 {
    30
}

const fn banner_dismiss_secs_default() -> u64 {
    banner::DEFAULT_DISMISS_AFTER.as_secs()
}

#[derive(serde::Deserialize, Debug, PartialEq)]
struct Config {
    #[serde(default = "base_url_default")]
    base_url: String,
    #[serde(default = "request_timeout_secs_default")]
    request_timeout_secs: u64,
    #[serde(default = "banner_dismiss_secs_default")]
    banner_dismiss_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: base_url_default(),
            request_timeout_secs: request_timeout_secs_default(),
            banner_dismiss_secs: banner_dismiss_secs_default(),
        }
    }
}

impl Config {
    fn load(path: &std::path::Path) -> Result<Self, anyhow::Error> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Ok(toml::from_str::<Config>(std::str::from_utf8(&std::fs::read(path)?)?)?)
    }
}

fn print_verdict(verdict: &api::ModelVerdict) {
    println!("{} ({:.2})", verdict.label, verdict.confidence);
    if let Some(explanation) = verdict.explanation.as_ref() {
        println!("{}", explanation);
    }
}

fn report_verdict(endpoint: &str, result: Result<api::ModelVerdict, api::Error>) -> bool {
    match result {
        Ok(verdict) => {
            print_verdict(&verdict);
            true
        }
        Err(e) => {
            log::error!("error in {}: {:?}", endpoint, e);
            eprintln!("{}", e.user_message());
            false
        }
    }
}

fn report_outcome(outcome: &submit::Outcome) -> bool {
    match outcome {
        submit::Outcome::Rendered(data) => {
            log::info!(
                "verdict: {} (trust score: {})",
                data.final_label().unwrap_or("n/a"),
                data.final_trust_score.map_or_else(|| "n/a".to_owned(), |s| s.to_string())
            );
            true
        }
        submit::Outcome::Busy => {
            log::warn!("analysis already in flight");
            false
        }
        submit::Outcome::Failed(e) => {
            log::info!("analysis failed: {}", e.user_message());
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::builder()
        .filter_module("credicheck", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opts = Opts::parse();

    let mut config = Config::load(&opts.config)?;
    if let Some(base_url) = opts.base_url {
        config.base_url = base_url;
    }
    log::info!("{:?}", config);

    let client = api::Client::new(&config.base_url, std::time::Duration::from_secs(config.request_timeout_secs))?;

    let ok = match opts.command {
        Command::Full { text, image } => {
            let page = {
                let mut page = page::Page::standard();
                page.set_text(text);
                page.select_image(image);
                page.into_shared()
            };

            let outcome = submit::handle_analyze(
                &page,
                &client,
                std::time::Duration::from_secs(config.banner_dismiss_secs),
            )
            .await;

            let page = page.lock();
            print!("{}", page.to_html());
            if let Some(banner) = page.banner() {
                eprintln!("{}", banner.message);
            }
            report_outcome(&outcome)
        }
        Command::Text { text } => report_verdict("analyze-text", client.analyze_text(&text).await),
        Command::Image { path } => report_verdict("analyze-image", client.analyze_image(&path).await),
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
