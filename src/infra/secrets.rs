//! Keeps login credentials out of logs and panic output.

use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 5] = ["password", "secret", "token", "session", "mfa"];

/// Scrubs words that carry credentials, plus any of the `known` secret
/// values wherever they appear.
pub fn redact_text(input: &str, known: &[&str]) -> String {
    let mut scrubbed = input.to_owned();
    for secret in known.iter().filter(|secret| !secret.is_empty()) {
        scrubbed = scrubbed.replace(secret, REDACTED);
    }

    scrubbed
        .split_whitespace()
        .map(redact_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Masks the local part of an email address: `ann@example.org` becomes
/// `a***@example.org`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{first}***@{domain}")
        }
        None => REDACTED.to_owned(),
    }
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload, &[]);

        match panic_info.location() {
            Some(location) => eprintln!(
                "stoat-view panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            ),
            None => eprintln!("stoat-view panic: {}", scrubbed),
        }
    }));
}

fn redact_word(word: &str) -> String {
    let lowered = word.to_ascii_lowercase();
    if SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker) && word.contains('='))
    {
        REDACTED.to_owned()
    } else {
        word.to_owned()
    }
}
