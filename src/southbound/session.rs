//! JSON-lines southbound session.
//!
//! # Protocol
//! ```text
//! agent → core : one SouthboundEvent per line
//! core → agent : one Intent per line, in the order produced
//! ```
//! Lines that fail to decode or exceed `MAX_LINE_BYTES` are logged and
//! skipped; the session only ends on EOF, an IO error, or shutdown.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::controller::Controller;
use crate::southbound::intent::Intent;
use crate::southbound::message::SouthboundEvent;
use crate::southbound::SouthboundError;

/// Longest accepted message, excluding the newline.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Counters for one finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub events: u64,
    pub malformed: u64,
    pub intents: u64,
}

/// Drive one session until the reader hits EOF.
pub async fn run_session<R, W>(
    controller: &Controller,
    mut reader: R,
    mut writer: W,
) -> Result<SessionStats, SouthboundError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut stats = SessionStats::default();

    loop {
        match next_frame(&mut reader, &mut buf).await? {
            Frame::Eof => break,
            Frame::Oversize => {
                stats.malformed += 1;
                tracing::warn!(limit = MAX_LINE_BYTES, "Skipping oversize southbound message");
                continue;
            }
            Frame::Line => {}
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_slice::<SouthboundEvent>(line) {
            Ok(event) => event,
            Err(e) => {
                stats.malformed += 1;
                tracing::debug!(error = %e, "Skipping undecodable southbound message");
                continue;
            }
        };
        stats.events += 1;

        let intents = dispatch(controller, event);
        for intent in &intents {
            write_intent(&mut writer, intent).await?;
        }
        stats.intents += intents.len() as u64;
        writer.flush().await?;
    }

    Ok(stats)
}

enum Frame {
    Line,
    Oversize,
    Eof,
}

/// Read one newline-terminated message into `buf`, never buffering more than
/// `MAX_LINE_BYTES + 1` bytes. An oversize line is drained up to its newline.
async fn next_frame<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = MAX_LINE_BYTES as u64 + 1;
    let n = AsyncReadExt::take(&mut *reader, limit).read_until(b'\n', buf).await?;
    if n == 0 {
        return Ok(Frame::Eof);
    }
    if buf.last() == Some(&b'\n') || buf.len() <= MAX_LINE_BYTES {
        return Ok(Frame::Line);
    }

    loop {
        buf.clear();
        let n = AsyncReadExt::take(&mut *reader, limit).read_until(b'\n', buf).await?;
        if n == 0 || buf.last() == Some(&b'\n') {
            buf.clear();
            return Ok(Frame::Oversize);
        }
    }
}

fn dispatch(controller: &Controller, event: SouthboundEvent) -> Vec<Intent> {
    match event {
        SouthboundEvent::SwitchConnected { datapath_id } => controller.on_switch_connect(datapath_id),
        SouthboundEvent::PacketIn(descriptor) => controller.handle_event(&descriptor),
        SouthboundEvent::FlowRemoved { criteria, .. } => {
            controller.on_flow_removed(&criteria);
            Vec::new()
        }
    }
}

async fn write_intent<W: AsyncWrite + Unpin>(
    writer: &mut W,
    intent: &Intent,
) -> Result<(), SouthboundError> {
    let mut line = serde_json::to_vec(intent)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    Ok(())
}
