use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Context;
use chaoxing_client::config::{Config, ScanConfig};
use chaoxing_client::http_client::{Endpoints, ReqwestChaoxingClient};
use chaoxing_client::{ChaoxingClient, courses, orchestrator};
use clap::Parser;
use secrecy::SecretString;

mod report;

/// Check every course on a Chaoxing (学习通) account for in-progress
/// activities: quizzes, check-ins and group tasks.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Maximum number of courses scanned concurrently.
    #[arg(long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from `CHAOXING_LOG_LEVEL` (or fallback to `RUST_LOG`,
    // default `info`). Logs go to stderr so the report stays clean on stdout.
    let log_env = std::env::var("CHAOXING_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();
    let mut config = load_config()?;
    if let Some(workers) = args.workers {
        config.scan.max_concurrent = workers.max(1);
    }
    if let Some(secs) = args.timeout_secs {
        config.scan.request_timeout = Duration::from_secs(secs);
    }

    tracing::debug!(
        workers = config.scan.max_concurrent,
        timeout_secs = config.scan.request_timeout.as_secs(),
        "effective scan config"
    );
    let client = ReqwestChaoxingClient::new(Endpoints::default(), config.scan.request_timeout);

    println!("⏳ 登录中...");
    client
        .login(&config.phone, &config.password)
        .await
        .context("登录失败")?;
    println!("✅ 登录成功");

    let courses = courses::fetch_courses(&client)
        .await
        .context("获取课程列表失败")?;
    println!("📚 共 {} 门课程", courses.len());

    println!(
        "⏳ 检查进行中活动 (并发数: {})...",
        config.scan.max_concurrent
    );
    let started = Instant::now();
    let reports = orchestrator::scan_all(&client, &courses, &config.scan).await;
    println!("✅ 完成，耗时 {:.1} 秒", started.elapsed().as_secs_f32());

    print!("{}", report::render(&reports));
    Ok(())
}

/// Credentials and knobs from the environment when present, otherwise
/// prompted interactively.
fn load_config() -> anyhow::Result<Config> {
    if let Ok(config) = Config::from_env() {
        return Ok(config);
    }
    let scan = ScanConfig::from_env()?;
    let phone = prompt("手机号: ")?;
    let password = SecretString::new(prompt("密码: ")?.into());
    Ok(Config {
        phone,
        password,
        scan,
    })
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
