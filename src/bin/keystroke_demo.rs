use std::io::BufRead;

use nidlookup::forms::{lock_form, PersonForm};
use nidlookup::models::{GenderOption, PersonField};
use nidlookup::utils::ExternalIdError;
use nidlookup::{ExternalIdConfig, ExternalNationalIdService};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), ExternalIdError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("External ID Keystroke Demo");
    println!("--------------------------");

    let config = ExternalIdConfig::from_env()?;
    if !config.enabled {
        println!("\nThe external national ID system is disabled.");
        println!("Set ENABLE_EXTERNAL_NATIONAL_ID_SYSTEM=true, EXTERNAL_NATIONAL_ID_SYSTEM_URL");
        println!("and EXTERNAL_NATIONAL_ID_REGEX, then run again.");
        return Ok(());
    }

    let service = ExternalNationalIdService::from_config(config)?;
    let form = PersonForm::new().into_shared();
    let genders = vec![GenderOption::new(1, "Male"), GenderOption::new(2, "Female")];

    let Some(watch) = service.watch_external_id(form.clone(), genders, false) else {
        return Ok(());
    };

    let mut status = watch.subscribe_status();
    let printer = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = *status.borrow_and_update();
            println!("  status -> {} {}", current, current.message_key());
        }
    });

    println!("Type the external ID field content, one line per edit (Ctrl-D to finish).");

    // Stdin is blocking, so read it on its own thread
    let (tx, mut lines) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = lines.recv().await {
        watch.set_external_id(line.trim_end());
    }

    // Let the last edit through the debounce window and any lookup finish
    let settle = service.config().debounce + service.config().lookup_timeout;
    tokio::time::sleep(service.config().debounce).await;
    let mut status = watch.subscribe_status();
    while watch.is_loading() {
        match tokio::time::timeout(settle, status.changed()).await {
            Ok(Ok(())) => {}
            _ => break,
        }
    }

    watch.destroy();
    printer.abort();

    println!("\nFINAL FORM:");
    let form = lock_form(&form);
    println!("  externalId: {}", form.external_id());
    for field in PersonField::ALL {
        if let Some(control) = form.control(field) {
            println!(
                "  {}: {:?}{}",
                field,
                control.value,
                if control.enabled { "" } else { " [locked]" }
            );
        }
    }

    Ok(())
}
