// External national ID lookup from the command line.
// Runs one ID through the same debounce/lookup/fill pipeline a client form uses.

use clap::Parser;
use nidlookup::{
    forms::{lock_form, FieldValue, PersonForm},
    models::{GenderOption, LookupContext, PersonField, VerificationStatus},
    utils::ExternalIdError,
    ExternalIdConfig, ExternalNationalIdService,
};

#[derive(Parser, Debug)]
#[command(
    name = "nidlookup",
    about = "Verify an external national ID and show the client fields it fills"
)]
struct Args {
    /// External national ID to verify
    external_id: String,

    /// Locale sent with the lookup
    #[arg(long)]
    locale: Option<String>,

    /// Currency sent with the lookup
    #[arg(long)]
    currency: Option<String>,

    /// Selectable gender option as ID:NAME (repeatable)
    #[arg(long = "gender", value_parser = parse_gender_option)]
    genders: Vec<GenderOption>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_gender_option(raw: &str) -> Result<GenderOption, String> {
    let (id, name) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected ID:NAME, got {:?}", raw))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid gender id {:?}: {}", id, e))?;
    Ok(GenderOption::new(id, name.trim()))
}

fn describe(value: Option<&FieldValue>) -> String {
    match value {
        None => "(not on form)".to_string(),
        Some(FieldValue::Empty) => "-".to_string(),
        Some(FieldValue::Text(text)) => text.clone(),
        Some(FieldValue::Date(date)) => date.format("%d/%m/%Y").to_string(),
        Some(FieldValue::Choice(id)) => format!("option #{}", id),
    }
}

// Function to print a detailed lookup report
fn print_detailed_report(status: VerificationStatus, form: &PersonForm) {
    println!("\n===============================================");
    println!("      EXTERNAL ID VERIFICATION REPORT");
    println!("===============================================\n");

    println!("  External ID: {}", form.external_id());
    println!("  Status: {}", status);
    if !status.message_key().is_empty() {
        println!("  Message: {}", status.message_key());
    }

    println!("\nCLIENT FIELDS:");
    for field in PersonField::ALL {
        let locked = match form.is_enabled(field) {
            Some(false) => " [locked]",
            _ => "",
        };
        println!("  {}: {}{}", field, describe(form.value(field)), locked);
    }
}

fn print_json_report(status: VerificationStatus, form: &PersonForm) {
    let mut fields = serde_json::Map::new();
    for field in PersonField::ALL {
        if let Some(control) = form.control(field) {
            fields.insert(
                field.name().to_string(),
                serde_json::json!({
                    "value": describe(Some(&control.value)),
                    "enabled": control.enabled,
                }),
            );
        }
    }

    let report = serde_json::json!({
        "externalId": form.external_id(),
        "status": status,
        "message": status.message_key(),
        "fields": fields,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{}", text),
        Err(err) => eprintln!("Could not render report: {}", err),
    }
}

#[tokio::main]
async fn main() -> Result<(), ExternalIdError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.external_id.trim().is_empty() {
        eprintln!("External ID must not be empty");
        return Ok(());
    }

    let config = ExternalIdConfig::from_env()?;
    if !config.enabled {
        println!("External national ID system is disabled.");
        println!("Set ENABLE_EXTERNAL_NATIONAL_ID_SYSTEM=true and EXTERNAL_NATIONAL_ID_SYSTEM_URL to use it.");
        return Ok(());
    }

    let service = ExternalNationalIdService::from_config(config)?.with_context(LookupContext {
        locale: args.locale.clone(),
        currency: args.currency.clone(),
    });

    let genders = if args.genders.is_empty() {
        vec![GenderOption::new(1, "Male"), GenderOption::new(2, "Female")]
    } else {
        args.genders.clone()
    };

    let form = PersonForm::new()
        .with_external_id(&args.external_id)
        .into_shared();

    let Some(watch) = service.watch_external_id(form.clone(), genders, false) else {
        return Ok(());
    };
    let mut status = watch.subscribe_status();

    // Wait for the lookup to settle into a terminal status
    while status.changed().await.is_ok() {
        let current = *status.borrow_and_update();
        if current.is_terminal() || current == VerificationStatus::Empty {
            break;
        }
    }
    let final_status = watch.status();
    watch.destroy();

    let snapshot = lock_form(&form).clone();
    if args.json {
        print_json_report(final_status, &snapshot);
    } else {
        print_detailed_report(final_status, &snapshot);
    }

    Ok(())
}
