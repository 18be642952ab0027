use std::fs::{self, File};
use std::io::{self, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use shelf_books::{persist, render, BooksScraper, OutputFormat, DEFAULT_OUTPUT_FILE};
use shelf_crawler::{
    crawl_catalog, CrawlerConfig, HttpFetcher, JobFuture, OnError, PageLocation, Scheduler,
    SchedulerConfig, Scrapable, SystemClock,
};
use tokio::runtime;

const LOG_FILTER: &str = "shelf=info,shelf_crawler=info,shelf_books=info";

/// Books catalogue crawler
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[command(name = "crawl")]
    Crawl(CrawlArgs),
    #[command(name = "daemon")]
    Daemon(DaemonArgs),
    #[command(name = "scrap")]
    Scrap(ScrapArgs),
    #[command(hide = true)]
    Completion,
}

/// Crawl the catalog once and save the scrapped books
#[derive(Debug, clap::Args)]
pub struct CrawlArgs {
    /// Path to the output file that will contain scrapped data
    #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,
    /// Output file format
    #[arg(value_enum, long, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print scrapped data to stdout instead of saving it
    #[arg(long)]
    pub no_persist: bool,
    /// Optional default crawler yaml configuration file
    #[arg(env = "SHELF_CRAWLER_CONFIG", long)]
    pub crawler_config: Option<PathBuf>,
    /// Override crawler's last catalog page to visit
    #[arg(long)]
    pub page_limit: Option<NonZeroU32>,
    /// Override crawler's delay in seconds between item requests
    #[arg(long)]
    pub delay: Option<f32>,
    /// Override crawler's user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override crawler's item download error handling strategy
    #[arg(value_enum, long)]
    pub on_item_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&CrawlArgs> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CrawlArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.crawler_config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlerConfig::default()
        };
        if let Some(page_limit) = args.page_limit {
            conf.page_limit = Some(page_limit);
        }
        if let Some(delay) = args.delay {
            conf.delay = delay;
        }
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(on_item_error) = args.on_item_error {
            conf.on_item_error = on_item_error;
        }
        conf.validate()?;
        Ok(conf)
    }
}

pub fn crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let crawler_conf: CrawlerConfig = (&args).try_into()?;
    let fetcher = HttpFetcher::new(&crawler_conf)?;
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let report = rt.block_on(crawl_catalog(&fetcher, &BooksScraper, &crawler_conf))?;

    if args.no_persist {
        io::stdout().write_all(render(&report.records, args.format)?.as_bytes())?;
    } else {
        persist(&report.records, &args.output_file, args.format)?;
    }

    log::info!(
        "Collected {} books from {} pages",
        report.items_collected,
        report.pages_visited
    );
    Ok(())
}

/// Crawl the catalog every day at a fixed time, until interrupted
#[derive(Debug, clap::Args)]
pub struct DaemonArgs {
    /// Path to the output file that will contain scrapped data
    #[arg(long, short, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,
    /// Output file format
    #[arg(value_enum, long, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Optional default scheduler yaml configuration file
    #[arg(env = "SHELF_SCHEDULER_CONFIG", long)]
    pub scheduler_config: Option<PathBuf>,
    /// Override the daily run time, as HH:MM local time
    #[arg(long)]
    pub at: Option<NaiveTime>,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

impl TryFrom<&DaemonArgs> for SchedulerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &DaemonArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.scheduler_config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            SchedulerConfig::default()
        };
        if let Some(at) = args.at {
            conf.at = at;
        }
        conf.validate()?;
        Ok(conf)
    }
}

pub fn daemon(args: DaemonArgs) -> anyhow::Result<()> {
    let scheduler_conf: SchedulerConfig = (&args).try_into()?;
    let fetcher = HttpFetcher::new(&scheduler_conf.crawler)?;
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;

    rt.block_on(async {
        let crawler_conf = &scheduler_conf.crawler;
        let fetcher = &fetcher;
        let output_file = args.output_file.as_path();
        let format = args.format;

        let mut scheduler = Scheduler::new(SystemClock);
        scheduler.every_day_at(scheduler_conf.at, "books crawl", move || {
            let job: JobFuture =
                Box::pin(crawl_and_persist(fetcher, crawler_conf, output_file, format));
            job
        });

        log::info!("Scheduler started, press Ctrl+C to stop");
        scheduler
            .run_until(scheduler_conf.poll(), tokio::signal::ctrl_c())
            .await;
    });

    Ok(())
}

async fn crawl_and_persist(
    fetcher: &HttpFetcher,
    crawler_conf: &CrawlerConfig,
    output_file: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = crawl_catalog(fetcher, &BooksScraper, crawler_conf).await?;
    persist(&report.records, output_file, format)?;
    log::info!(
        "Collected {} books from {} pages",
        report.items_collected,
        report.pages_visited
    );
    Ok(())
}

/// Scrap a single book page and print the result to stdout
#[derive(Debug, clap::Args)]
#[command(group = clap::ArgGroup::new("page").required(true))]
pub struct ScrapArgs {
    /// A local html page to scrap
    #[arg(group = "page", long)]
    pub file: Option<PathBuf>,
    /// A distant html page to scrap
    #[arg(group = "page", long)]
    pub url: Option<String>,
    /// Custom user agent to download the page
    #[arg(long, conflicts_with = "file")]
    pub ua: Option<String>,
}

pub fn scrap(args: ScrapArgs) -> anyhow::Result<()> {
    let (page, location) = if let Some(url) = args.url {
        let mut builder = reqwest::blocking::ClientBuilder::new();
        if let Some(ua) = args.ua {
            builder = builder.user_agent(ua);
        }
        let client = builder.build()?;
        let resp = client.get(&url).send()?;
        if !resp.status().is_success() {
            anyhow::bail!("Couldn't fetch {url} got: {}", resp.status());
        }
        (resp.text()?, PageLocation::Url(url))
    } else if let Some(path) = args.file {
        let page = fs::read_to_string(&path)?;
        (page, PageLocation::Path(path))
    } else {
        anyhow::bail!("Missing `url` or `file`");
    };

    println!("{}", BooksScraper.scrap(&page, &location));
    Ok(())
}

fn init_logs(quiet: bool) {
    if !quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(LOG_FILTER))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Crawl(args) => {
            init_logs(args.quiet);
            crawl(args)
        }
        SubCommand::Daemon(args) => {
            init_logs(args.quiet);
            daemon(args)
        }
        SubCommand::Scrap(args) => {
            init_logs(false);
            scrap(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "shelf", &mut io::stdout());
            Ok(())
        }
    }
}
