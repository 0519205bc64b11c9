//! Serial transport to the chassis
//!
//! The chassis firmware speaks a line-oriented ASCII protocol: one command
//! per line, one reply per line. Each configure call opens its own serial
//! connection, so the analog task, the digital task and the output task hold
//! fully independent handles (the firmware multiplexes per connection).
//!
//! Protocol summary:
//!
//! ```text
//! -> CONF:ANA <channel>      <- OK | ERR <reason>     (repeated per channel)
//! -> ARM:ANA                 <- OK
//! -> READ:ANA?               <- <v1>,<v2>,<v3>,<v4>
//! -> CONF:DIN <port>         <- OK | ERR <reason>
//! -> READ:DIN?               <- <byte 0..255>
//! -> CONF:DOUT <port>        <- OK | ERR <reason>
//! -> SET:DOUT <mask>         <- OK
//! -> ABRT                    (no reply; best-effort teardown)
//! -> SYST:MODS?              <- <name>,<product>,<serial>;... | (empty)
//! ```
//!
//! Reads block until the chassis produces a sample; the configured read
//! timeout bounds a stalled chassis and surfaces as an I/O error.

use serialport::SerialPort;
use std::io::{Read, Write};
use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::{DaqError, Result};
use crate::types::{DeviceInfo, ANALOG_CHANNELS};

use super::chassis::{AnalogInput, Chassis, DigitalInput, DigitalOutput};

/// Chassis driver over a serial link
pub struct SerialChassis {
    port: String,
    baud_rate: u32,
    read_timeout: Duration,
}

impl SerialChassis {
    /// Create a driver for the configured link. Nothing is opened here;
    /// each configure call opens its own connection.
    pub fn new(transport: &TransportConfig) -> Self {
        Self {
            port: transport.port.clone(),
            baud_rate: transport.baud_rate,
            read_timeout: transport.read_timeout(),
        }
    }

    fn open_link(&self) -> Result<SerialLink> {
        let port = serialport::new(self.port.as_str(), self.baud_rate)
            .timeout(self.read_timeout)
            .open()?;
        Ok(SerialLink {
            port,
            line: Vec::with_capacity(64),
        })
    }

    /// Send one CONF command, mapping an ERR reply to `ChannelUnavailable`
    /// naming the identifier.
    fn configure_channel(link: &mut SerialLink, verb: &str, identifier: &str) -> Result<()> {
        let reply = link.query(&format!("CONF:{verb} {identifier}"))?;
        match reply.strip_prefix("ERR") {
            None if reply == "OK" => Ok(()),
            None => Err(DaqError::Protocol(format!(
                "expected OK or ERR, got {reply:?}"
            ))),
            Some(reason) => Err(DaqError::channel_unavailable(
                identifier,
                reason.trim().to_string(),
            )),
        }
    }
}

impl Chassis for SerialChassis {
    fn list_devices(&self) -> Vec<DeviceInfo> {
        // Listing failures are not errors to the caller; an unreachable
        // chassis simply shows an empty module table.
        let mut link = match self.open_link() {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("Module listing failed: {e}");
                return Vec::new();
            }
        };
        match link.query("SYST:MODS?") {
            Ok(reply) => parse_module_list(&reply),
            Err(e) => {
                tracing::warn!("Module listing failed: {e}");
                Vec::new()
            }
        }
    }

    fn configure_analog(
        &self,
        channels: &[String; ANALOG_CHANNELS],
    ) -> Result<Box<dyn AnalogInput>> {
        let mut link = self.open_link()?;
        for channel in channels {
            Self::configure_channel(&mut link, "ANA", channel)?;
        }
        let reply = link.query("ARM:ANA")?;
        if reply != "OK" {
            return Err(DaqError::Protocol(format!("arm rejected: {reply:?}")));
        }
        tracing::info!("Analog channels armed: {}", channels.join(", "));
        Ok(Box::new(SerialAnalogTask { link }))
    }

    fn configure_digital_input(&self, port: &str) -> Result<Box<dyn DigitalInput>> {
        let mut link = self.open_link()?;
        Self::configure_channel(&mut link, "DIN", port)?;
        tracing::info!("Digital input port armed: {port}");
        Ok(Box::new(SerialDigitalInTask { link }))
    }

    fn configure_digital_output(&self, port: &str) -> Result<Box<dyn DigitalOutput>> {
        let mut link = self.open_link()?;
        Self::configure_channel(&mut link, "DOUT", port)?;
        Ok(Box::new(SerialDigitalOutTask { link }))
    }
}

struct SerialAnalogTask {
    link: SerialLink,
}

impl AnalogInput for SerialAnalogTask {
    fn read(&mut self) -> Result<[f64; ANALOG_CHANNELS]> {
        let reply = self.link.query("READ:ANA?")?;
        parse_analog_tuple(&reply)
    }

    fn close(&mut self) {
        self.link.abort();
    }
}

struct SerialDigitalInTask {
    link: SerialLink,
}

impl DigitalInput for SerialDigitalInTask {
    fn read(&mut self) -> Result<u8> {
        let reply = self.link.query("READ:DIN?")?;
        reply
            .trim()
            .parse::<u8>()
            .map_err(|_| DaqError::Protocol(format!("expected port byte, got {reply:?}")))
    }

    fn close(&mut self) {
        self.link.abort();
    }
}

struct SerialDigitalOutTask {
    link: SerialLink,
}

impl DigitalOutput for SerialDigitalOutTask {
    fn write(&mut self, pattern: u8) -> Result<()> {
        let reply = self.link.query(&format!("SET:DOUT {pattern}"))?;
        if reply != "OK" {
            return Err(DaqError::Protocol(format!("write rejected: {reply:?}")));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.link.abort();
    }
}

/// One open serial connection with line-oriented command/reply framing
struct SerialLink {
    port: Box<dyn SerialPort>,
    line: Vec<u8>,
}

impl SerialLink {
    /// Send one command line and block for the single reply line.
    fn query(&mut self, command: &str) -> Result<String> {
        tracing::trace!("-> {command}");
        self.port.write_all(command.as_bytes())?;
        self.port.write_all(b"\n")?;
        let reply = self.read_line()?;
        tracing::trace!("<- {reply}");
        Ok(reply)
    }

    fn read_line(&mut self) -> Result<String> {
        self.line.clear();
        let mut byte = [0u8; 1];
        loop {
            self.port.read_exact(&mut byte)?;
            match byte[0] {
                b'\n' => break,
                b'\r' => {}
                b => self.line.push(b),
            }
        }
        String::from_utf8(self.line.clone())
            .map_err(|_| DaqError::Protocol("non-UTF-8 reply".to_string()))
    }

    /// Best-effort teardown; the connection closes when the link drops.
    fn abort(&mut self) {
        if let Err(e) = self.port.write_all(b"ABRT\n") {
            tracing::debug!("Teardown write failed (ignored): {e}");
        }
    }
}

fn parse_analog_tuple(reply: &str) -> Result<[f64; ANALOG_CHANNELS]> {
    let mut values = [0.0; ANALOG_CHANNELS];
    let mut fields = reply.split(',');
    for slot in values.iter_mut() {
        let field = fields
            .next()
            .ok_or_else(|| DaqError::Protocol(format!("short analog tuple: {reply:?}")))?;
        *slot = field
            .trim()
            .parse::<f64>()
            .map_err(|_| DaqError::Protocol(format!("bad analog value {field:?}")))?;
    }
    if fields.next().is_some() {
        return Err(DaqError::Protocol(format!("oversized analog tuple: {reply:?}")));
    }
    Ok(values)
}

fn parse_module_list(reply: &str) -> Vec<DeviceInfo> {
    reply
        .split(';')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let mut fields = entry.split(',').map(str::trim);
            let name = fields.next()?.to_string();
            let product = fields.next().unwrap_or("unknown").to_string();
            let serial = fields.next().map(str::to_string).filter(|s| !s.is_empty());
            Some(DeviceInfo {
                name,
                product,
                serial,
            })
        })
        .collect()
}
