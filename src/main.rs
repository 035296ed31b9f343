use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use messenger_wire::{EventKind, MessagingEvent, SendError};

mod config;
mod logger;

/// Decode Messenger Platform payloads captured from a webhook or the Send API.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a webhook POST body and log every event in it
    Webhook {
        /// File to read, stdin when omitted or `-`
        path: Option<PathBuf>,
    },
    /// Decode a Send API response body
    Response {
        /// File to read, stdin when omitted or `-`
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;
    logger::setup_simple_logger(config.log_level)?;

    match Args::parse().command {
        Command::Webhook { path } => inspect_webhook(&read_input(path)?),
        Command::Response { path } => inspect_response(&read_input(path)?),
    }
}

fn read_input(path: Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            fs::read(&path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut body = Vec::new();
            io::stdin()
                .read_to_end(&mut body)
                .context("failed to read stdin")?;
            Ok(body)
        }
    }
}

fn inspect_webhook(body: &[u8]) -> anyhow::Result<()> {
    let payload = messenger_wire::decode_webhook(body).context("webhook body rejected")?;

    for entry in &payload.entry {
        log::info!(
            "entry {} at {}: {} events, {} changes",
            entry.id,
            entry.time,
            entry.messaging.len(),
            entry.changes.len()
        );
        for event in &entry.messaging {
            log::info!("{}", describe(event));
        }
        for change in &entry.changes {
            log::info!(
                "change {}: {} {} by {}",
                change.field,
                change.value.verb,
                change.value.item,
                change.value.from.id
            );
        }
    }

    Ok(())
}

fn describe(event: &MessagingEvent) -> String {
    let from = if event.sender.is_anonymous() {
        &event.sender.user_ref
    } else {
        &event.sender.id
    };

    let what = match (event.kind(), event) {
        (EventKind::Message | EventKind::Echo, MessagingEvent { message: Some(m), .. }) => {
            format!("message {}: {:?}", m.mid, m.text)
        }
        (EventKind::Delivery, MessagingEvent { delivery: Some(d), .. }) => {
            format!("delivery of {} messages up to {}", d.mids.len(), d.watermark)
        }
        (EventKind::Postback, MessagingEvent { postback: Some(p), .. }) => {
            format!("postback {:?} ({})", p.payload, p.title)
        }
        (EventKind::Referral, MessagingEvent { referral: Some(r), .. }) => {
            format!("referral {:?} from {}", r.reference, r.source)
        }
        (EventKind::Optin, MessagingEvent { optin: Some(o), .. }) => {
            format!("optin {} {:?}", o.optin_type, o.payload)
        }
        (kind, _) => format!("{kind:?}"),
    };

    format!("{:?} from {} at {}: {}", event.kind(), from, event.timestamp, what)
}

fn inspect_response(body: &[u8]) -> anyhow::Result<()> {
    match messenger_wire::decode_send_response(body) {
        Ok(response) => {
            log::info!(
                "sent message {} to {}",
                response.message_id,
                response.recipient_id
            );
            Ok(())
        }
        Err(SendError::Api(err)) => Err(err).context("send failed"),
        Err(err) => Err(err).context("response body rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_is_reported_once() {
        let body = br#"{"error":{"message":"Invalid token","type":"OAuthException","code":190,"fbtrace_id":"abc123"}}"#;
        let report = format!("{:#}", inspect_response(body).unwrap_err());

        assert_eq!(
            report,
            "send failed: FB Error: Type OAuthException: Invalid token; FB trace ID: abc123"
        );
    }

    #[test]
    fn test_malformed_webhook_is_rejected() {
        let report = format!(
            "{:#}",
            inspect_webhook(br#"{"object":"page","entry":[["PAGE_ID",5,[]]]}"#).unwrap_err()
        );

        assert!(report.starts_with("webhook body rejected: malformed Messenger payload: "));
    }
}
