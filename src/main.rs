use clap::Parser;
use dsb_timetables::{DsbClient, Error, ImageLoader, ServiceConfig, TimetableServer};

/// Serve today's and tomorrow's DSB substitution plans as one image.
///
/// Without flags the service uses the school's shared account and listens
/// on port 8000.
#[derive(Parser, Debug)]
#[command(name = "dsb-timetables", version, about)]
struct Cli {
    /// DSB account identifier
    #[arg(long)]
    user: Option<String>,
    /// DSB account password
    #[arg(long)]
    password: Option<String>,
    /// Base URL of the DSBmobile API
    #[arg(long)]
    api_base: Option<String>,
    /// Host to bind
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,
    /// Timeout for each outbound request in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Title marker for today's plans
    #[arg(long)]
    today: Option<String>,
    /// Title marker for tomorrow's plans
    #[arg(long)]
    tomorrow: Option<String>,
    /// JPEG quality of the composite (1-100)
    #[arg(long)]
    quality: Option<u8>,
    /// Request-serving threads
    #[arg(long)]
    workers: Option<usize>,
}

impl Cli {
    fn into_config(self) -> ServiceConfig {
        let mut cfg = ServiceConfig::default();
        if let Some(v) = self.user {
            cfg.user = v;
        }
        if let Some(v) = self.password {
            cfg.password = v;
        }
        if let Some(v) = self.api_base {
            cfg.api_base = v;
        }
        if let Some(v) = self.host {
            cfg.bind_host = v;
        }
        if let Some(v) = self.port {
            cfg.port = v;
        }
        if let Some(v) = self.timeout_ms {
            cfg.timeout_ms = v;
        }
        if let Some(v) = self.today {
            cfg.today_marker = v;
        }
        if let Some(v) = self.tomorrow {
            cfg.tomorrow_marker = v;
        }
        if let Some(v) = self.quality {
            cfg.jpeg_quality = v;
        }
        if let Some(v) = self.workers {
            cfg.workers = v;
        }
        cfg
    }
}

fn run(config: &ServiceConfig) -> dsb_timetables::Result<()> {
    config.validate()?;

    let mut source = DsbClient::new(config)?;
    let loader = ImageLoader::new(config)?;
    let composite = dsb_timetables::build_composite(&mut source, &loader, config)?;

    let server = TimetableServer::bind(config)?;
    log::info!("Listening for requests at http://localhost:{}/timetables", config.port);
    server.serve(&composite);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    if let Err(e) = run(&config) {
        match e {
            Error::EmptyTimetable => log::info!("{}", e),
            _ => log::error!("Error: {}", e),
        }
        std::process::exit(e.exit_code());
    }
}
