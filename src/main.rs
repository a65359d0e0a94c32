use std::process;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use log::error;
use smtp2wwpm::{SmtpServer, WebhookNotifier, tls};

/// Bridge inbound SMTP into a webhook notification channel
#[derive(Parser, Debug)]
#[command(name = "smtp2wwpm", version, about)]
struct Args {
    /// Webhook URL that receives the extracted messages
    #[arg(short, long)]
    url: String,

    /// Listen address for plaintext SMTP
    #[arg(long, default_value = "0.0.0.0:25")]
    smtp_addr: String,

    /// Listen address for implicit-TLS SMTP (SMTPS)
    #[arg(long, default_value = "0.0.0.0:465")]
    smtps_addr: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let tls_config = match tls::self_signed_config() {
        Ok(config) => config,
        Err(e) => {
            error!("TLS certificate generation failed: {e}");
            process::exit(1);
        }
    };

    let notifier = Arc::new(WebhookNotifier::new(args.url));
    let server = SmtpServer::new(notifier);

    let plain_server = server.clone();
    let smtp_addr = args.smtp_addr;
    thread::spawn(move || {
        if let Err(e) = plain_server.start(&smtp_addr) {
            error!("SMTP listener failed: {e}");
            process::exit(1);
        }
    });

    if let Err(e) = server.start_tls(&args.smtps_addr, tls_config) {
        error!("SMTPS listener failed: {e}");
        process::exit(1);
    }
}
