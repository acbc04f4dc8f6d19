use anyhow::Result;
use shipnote_cli::config::{AppConfig, EventFile};
use shipnote_notify::MessageBody;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  shipnote <config.toml> <event.json>             Print the notifications built for an event");
    eprintln!("  shipnote --mail-text <config.toml> <event.json> Print mail notifications as plain text");
}

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("shipnote=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if matches!(args.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }
    let mail_text = args.first().map(String::as_str) == Some("--mail-text");
    if mail_text {
        args.remove(0);
    }

    let (Some(config_path), Some(event_path)) = (args.first(), args.get(1)) else {
        print_usage();
        anyhow::bail!("expected <config.toml> and <event.json> arguments");
    };

    let config = AppConfig::load(config_path)?;
    let event = EventFile::load(event_path)?;
    tracing::info!(
        project = %event.project.name,
        run_id = %event.run.id,
        hooks = event.hooks.len(),
        locale = %config.locale,
        "Building notifications"
    );

    let report = config.manager().notify(&event.project, &event.run, &event.hooks);

    for message in &report.messages {
        match (&message.body, mail_text) {
            (MessageBody::Mail(mail), true) => {
                println!("To: {}\nSubject: {}\n\n{}\n", message.destination, mail.subject, mail.render_text());
            }
            (_, true) => {}
            _ => println!("{}", serde_json::to_string_pretty(&message.to_json())?),
        }
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} notifications failed to build",
            report.failures.len(),
            report.failures.len() + report.messages.len()
        );
    }
    Ok(())
}
