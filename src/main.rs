use clap::Parser;
use seat_booking::app::Session;
use seat_booking::config::toml_config::StoreKind;
use seat_booking::utils::error::ErrorSeverity;
use seat_booking::utils::logger;
use seat_booking::{BookingDesk, BookingError, CliConfig, JsonFileStore, MemoryStore, RecordStore, Settings};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入並驗證配置
    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose, settings.log_level.as_deref());
    }

    tracing::info!("Starting seat-booking");
    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    let outcome = match settings.store_kind {
        StoreKind::Json => {
            tracing::info!("📁 Booking store: {}", settings.store_path.display());
            run(JsonFileStore::new(settings.store_path.clone()), &settings).await
        }
        StoreKind::Memory => {
            tracing::info!("Bookings are kept in memory for this session only");
            run(MemoryStore::new(), &settings).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<S: RecordStore>(store: S, settings: &Settings) -> Result<(), BookingError> {
    let desk = BookingDesk::open(settings.chart(), store, settings.render.clone()).await?;
    let session = Session::new(
        desk,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        settings.collect_passenger_details,
    );
    let desk = session.run().await?;

    let occupancy = desk.occupancy();
    tracing::info!(
        "Session closed with {} booked and {} free seat(s)",
        occupancy.booked,
        occupancy.free
    );
    Ok(())
}
