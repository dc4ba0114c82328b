use cafe_booking::core::{CafeId, SlotId, TableId};
use cafe_booking::utils::error::{BookingError, ErrorSeverity};
use cafe_booking::utils::{logger, validation::Validate};
use cafe_booking::{BookingFlow, CliConfig, RestBackend, SelectionInput};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting cafe-booking CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Booking flow failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

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
}

async fn run(config: &CliConfig) -> Result<(), BookingError> {
    let backend = RestBackend::new(config.base_url.clone(), config.token.clone());
    let mut flow = BookingFlow::start(backend.clone(), backend, CafeId(config.cafe_id)).await?;

    let cafe = flow.cafe().clone();
    println!("☕ {}", cafe.name);
    let grid = cafe.slot_grid();
    if !grid.is_empty() {
        println!(
            "   work hours {}–{}, {} slots of {} min",
            cafe.work_start_time.map(|t| t.to_string()).unwrap_or_default(),
            cafe.work_end_time.map(|t| t.to_string()).unwrap_or_default(),
            grid.len(),
            cafe.slot_duration_minutes.unwrap_or_default(),
        );
    }

    // one batched cycle for everything given on the command line
    let mut inputs = Vec::new();
    if let Some(date) = config.date {
        inputs.push(SelectionInput::Date(Some(date)));
    }
    if let Some(table_id) = config.table_id {
        inputs.push(SelectionInput::Table(Some(TableId(table_id))));
    }
    if let Some(slot_id) = config.slot_id {
        inputs.push(SelectionInput::Slot(Some(SlotId(slot_id))));
    }
    if let Some(note) = &config.note {
        inputs.push(SelectionInput::Note(Some(note.clone())));
    }
    flow.apply(inputs).await?;

    let selection = flow.selection().clone();
    let candidates = flow.candidates();
    println!(
        "📅 {}",
        selection
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "no date".to_string())
    );
    println!("🪑 available tables:");
    for table in &candidates.tables {
        let marker = if Some(table.id) == selection.table_id {
            "→"
        } else {
            " "
        };
        println!(
            " {} table #{} ({} seats){}",
            marker,
            table.id,
            table.seats_count,
            table
                .description
                .as_deref()
                .map(|d| format!(" - {}", d))
                .unwrap_or_default()
        );
    }
    println!("🕐 available slots:");
    for slot in &candidates.slots {
        let marker = if Some(slot.id) == selection.slot_id {
            "→"
        } else {
            " "
        };
        println!(" {} slot #{} {}–{}", marker, slot.id, slot.start_time, slot.end_time);
    }

    if config.submit {
        let booking = flow.submit().await?;
        println!(
            "✅ Booking #{} created: table #{}, slot #{}, {} ({:?})",
            booking.id, booking.table_id, booking.slot_id, booking.date, booking.status
        );
    } else {
        println!("ℹ️  Dry run only; pass --submit to create the booking");
    }

    Ok(())
}
