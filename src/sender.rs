// src/sender.rs
// 测试用信号源：通过串口循环发送锯齿波字节
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use crate::drivers::Sawtooth;

#[derive(Clone, Debug)]
pub struct SenderOptions {
    pub port: String,
    pub baud_rate: u32,
    pub interval: Duration,
    pub step: u8,
    /// Stop after this many bytes; run until killed when `None`.
    pub count: Option<u64>,
    pub dry_run: bool,
}

// dry-run 时代替串口，只打印字节
struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for b in buf {
            log::info!("Simulated byte: {}", b);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn run(options: &SenderOptions) -> Result<()> {
    let mut wave = Sawtooth::new(0, options.step);
    let sent = if options.dry_run {
        log::info!("Dry run: bytes are logged, not sent");
        send_bytes(&mut LogWriter, &mut wave, options.count, options.interval)?
    } else {
        let mut port = serialport::new(&options.port, options.baud_rate)
            .open()
            .with_context(|| format!("could not open serial port {}", options.port))?;
        log::info!("Sending sawtooth on {} @ {} baud", options.port, options.baud_rate);
        send_bytes(&mut port, &mut wave, options.count, options.interval)
            .with_context(|| format!("write to {} failed", options.port))?
    };
    log::info!("Sender finished after {} bytes", sent);
    Ok(())
}

/// Writes one byte per `interval`. Returns how many bytes went out.
pub fn send_bytes<W: Write>(
    writer: &mut W,
    wave: &mut Sawtooth,
    count: Option<u64>,
    interval: Duration,
) -> io::Result<u64> {
    let mut sent = 0u64;
    while count.map_or(true, |limit| sent < limit) {
        let Some(value) = wave.next() else { break };
        writer.write_all(&[value])?;
        writer.flush()?;
        log::debug!("Sent {}", value);
        sent += 1;
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    Ok(sent)
}
