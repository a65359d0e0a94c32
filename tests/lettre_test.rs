//! Drive the bridge with a real SMTP client library

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use smtp2wwpm::{Notifier, SmtpServer};
use std::error::Error;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

struct ChannelNotifier {
    tx: Mutex<mpsc::Sender<(String, String)>>,
}

impl Notifier for ChannelNotifier {
    fn deliver(&self, subject: &str, html: &str) {
        let _ = self
            .tx
            .lock()
            .unwrap()
            .send((subject.to_string(), html.to_string()));
    }
}

fn start_server() -> (u16, mpsc::Receiver<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();
    let server = SmtpServer::new(Arc::new(ChannelNotifier { tx: Mutex::new(tx) }));

    thread::spawn(move || {
        server
            .start_with_listener(listener)
            .expect("server start failed")
    });

    (port, rx)
}

#[test]
fn basic_lettre_send() -> Result<(), Box<dyn Error>> {
    let (port, rx) = start_server();

    let message = lettre::Message::builder()
        .from("Hanako <hanako@example.com>".parse::<Mailbox>()?)
        .to("Tarou <tarou@example.com>".parse::<Mailbox>()?)
        .subject("Greetings")
        .body("Integration body".to_owned())
        .unwrap();

    let mailer = SmtpTransport::builder_dangerous("127.0.0.1")
        .port(port)
        .build();

    mailer.send(&message)?;

    let (subject, html) = rx.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(subject, "Greetings");
    assert!(html.contains("Integration body"));
    // lettre sends text/plain, which the walker wraps for display
    assert!(html.starts_with("<pre>"));

    Ok(())
}

#[test]
fn lettre_send_with_credentials() -> Result<(), Box<dyn Error>> {
    let (port, rx) = start_server();

    let message = lettre::Message::builder()
        .from("sender@example.com".parse::<Mailbox>()?)
        .to("receiver@example.com".parse::<Mailbox>()?)
        .subject("Authenticated")
        .body("sent after AUTH".to_owned())
        .unwrap();

    // Any credential passes; the handshake exists only to satisfy clients
    let mailer = SmtpTransport::builder_dangerous("127.0.0.1")
        .port(port)
        .credentials(Credentials::new(
            "not-a-real-user".to_owned(),
            "not-a-real-password".to_owned(),
        ))
        .build();

    mailer.send(&message)?;

    let (subject, _html) = rx.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(subject, "Authenticated");

    Ok(())
}
