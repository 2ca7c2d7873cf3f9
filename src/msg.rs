//! Outlook MSG decoder
//!
//! Reconstructs an RFC-822-style message (sender, recipients, subject, body)
//! from the MAPI property streams of a compound-file `.msg` document.
//!
//! Each logical string field is stored under a fixed stream-name prefix with
//! one of two type suffixes: `001E` for the narrow (single-byte) encoding and
//! `001F` for the wide (UTF-16LE) encoding. Sender and recipient fields
//! additionally fall back from the embedded transport-header block to
//! container-specific properties when the header block is missing or does not
//! carry the field.

use crate::container::CompoundReader;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::debug;

const TRANSPORT_HEADERS: &str = "__substg1.0_007D";
const SENDER_NAME: &str = "__substg1.0_0C1A";
const SENDER_ADDRESS: &str = "__substg1.0_0C1F";
const DISPLAY_TO: &str = "__substg1.0_0E04";
const DISPLAY_CC: &str = "__substg1.0_0E03";
const SUBJECT: &str = "__substg1.0_0037";
const BODY: &str = "__substg1.0_1000";

const SUFFIX_NARROW: &str = "001E";
const SUFFIX_WIDE: &str = "001F";

/// Which string encoding wins when a field is stored in both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringPreference {
    /// Prefer the UTF-16LE stream
    #[default]
    Wide,
    /// Prefer the single-byte stream
    Narrow,
}

/// A message reconstructed from one `.msg` document.
///
/// Every field is resolved eagerly during decoding and never mutated
/// afterwards. An absent field is `None`, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedMessage {
    /// Sender, as `Name <addr>` when both parts are known
    pub sender: Option<String>,
    /// Primary recipients display text
    pub to: Option<String>,
    /// Carbon-copy recipients display text
    pub cc: Option<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Plain-text body
    pub body: Option<String>,
}

impl DecodedMessage {
    /// Render the message as plain text: one line each for From, To, CC and
    /// Subject, a separator line, a blank line, then the body verbatim.
    /// Absent fields render as empty values.
    #[must_use]
    pub fn render(&self) -> String {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut out = String::new();
        let _ = writeln!(out, "From: {}", field(&self.sender));
        let _ = writeln!(out, "To: {}", field(&self.to));
        let _ = writeln!(out, "CC: {}", field(&self.cc));
        let _ = writeln!(out, "Subject: {}", field(&self.subject));
        out.push_str("----------------\n\n");
        out.push_str(&field(&self.body));
        out
    }
}

/// Decode one compound-file mail document into a [`DecodedMessage`].
///
/// Fails only when the container itself is unreadable; any individual field
/// may be absent without failing the decode.
pub fn decode_message(
    container: &mut CompoundReader,
    preference: StringPreference,
) -> Result<DecodedMessage> {
    let header_block = resolve_string(container, TRANSPORT_HEADERS, preference)?
        .and_then(|raw| HeaderBlock::parse(&raw));

    let sender = match header_field(header_block.as_ref(), "from") {
        Some(value) => Some(value),
        None => sender_from_properties(container, preference)?,
    };
    let to = match header_field(header_block.as_ref(), "to") {
        Some(value) => Some(value),
        None => resolve_string(container, DISPLAY_TO, preference)?,
    };
    let cc = match header_field(header_block.as_ref(), "cc") {
        Some(value) => Some(value),
        None => resolve_string(container, DISPLAY_CC, preference)?,
    };
    let subject = resolve_string(container, SUBJECT, preference)?;
    let body = resolve_string(container, BODY, preference)?;

    debug!(
        "Decoded message: sender={:?} subject={:?}",
        sender, subject
    );

    Ok(DecodedMessage {
        sender,
        to,
        cc,
        subject,
        body,
    })
}

/// Resolve a logical string field stored under `prefix`.
///
/// Policy: narrow alone is used as-is; wide alone is decoded as UTF-16LE;
/// when both streams exist the configured preference wins; neither means the
/// field is absent.
fn resolve_string(
    container: &mut CompoundReader,
    prefix: &str,
    preference: StringPreference,
) -> Result<Option<String>> {
    let narrow = container.stream_bytes(&format!("{prefix}{SUFFIX_NARROW}"))?;
    let wide = container.stream_bytes(&format!("{prefix}{SUFFIX_WIDE}"))?;

    let value = match (narrow, wide) {
        (None, None) => None,
        (Some(bytes), None) => Some(decode_narrow(&bytes)),
        (None, Some(bytes)) => Some(decode_utf16le(&bytes)),
        (Some(narrow_bytes), Some(wide_bytes)) => Some(match preference {
            StringPreference::Wide => decode_utf16le(&wide_bytes),
            StringPreference::Narrow => decode_narrow(&narrow_bytes),
        }),
    };

    Ok(value)
}

/// Sender assembled from the container's name and address properties:
/// `Name <addr>` when both exist, whichever exists alone otherwise.
fn sender_from_properties(
    container: &mut CompoundReader,
    preference: StringPreference,
) -> Result<Option<String>> {
    let name = resolve_string(container, SENDER_NAME, preference)?;
    let address = resolve_string(container, SENDER_ADDRESS, preference)?;

    let sender = match (name, address) {
        (Some(name), Some(address)) => Some(format!("{name} <{address}>")),
        (Some(name), None) => Some(name),
        (None, Some(address)) => Some(address),
        (None, None) => None,
    };

    Ok(sender)
}

fn decode_narrow(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}

/// The wide stream encoding is UTF-16 little-endian by definition; an odd
/// trailing byte is dropped and unpaired surrogates become replacement
/// characters.
fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect::<String>()
        .trim_end_matches('\0')
        .to_string()
}

/// An RFC-822 header block embedded in the transport-headers stream.
struct HeaderBlock {
    headers: Vec<(String, String)>,
}

impl HeaderBlock {
    fn parse(raw: &str) -> Option<Self> {
        let (parsed, _) = mailparse::parse_headers(raw.as_bytes()).ok()?;

        let headers = parsed
            .iter()
            .map(|h| (h.get_key().to_lowercase(), h.get_value()))
            .collect();

        Some(Self { headers })
    }

    fn get(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

/// Tier-one lookup: a field present in the header block wins outright.
fn header_field(block: Option<&HeaderBlock>, name: &str) -> Option<String> {
    block.and_then(|b| b.get(name))
}
