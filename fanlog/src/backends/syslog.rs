//! Backend for the local syslog daemon (unix only).
//!
//! Sends BSD-format datagrams straight to the local syslog socket, the same
//! wire behavior as a libc `syslog(3)` call but without touching the
//! process-global `openlog` state, so multiple instances with different tags
//! and facilities can coexist.
//!
//! Severity mapping: DEBUG → debug, INFO → info, WARNING → warning, ERROR →
//! err, FATAL → crit, anything else → info.

use crate::attrib::AttribStore;
use crate::backend::{Backend, Message};
use crate::error::BackendError;
use crate::level::Level;
use chrono::Local;
use std::os::unix::net::UnixDatagram;
use std::sync::Mutex;

/// Paths tried, in order, when connecting to the local syslog daemon.
const SOCKET_PATHS: &[&str] = &["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Standard syslog facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Facility {
    Kern = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    Authpriv = 10,
    Ftp = 11,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

fn severity(level: Level) -> u32 {
    match level {
        Level::DEBUG => 7,
        Level::INFO => 6,
        Level::WARNING => 4,
        Level::ERROR => 3,
        Level::FATAL => 2,
        _ => 6,
    }
}

fn priority(facility: Facility, level: Level) -> u32 {
    (facility as u32) << 3 | severity(level)
}

fn format_line(pri: u32, timestamp: &str, tag: &str, pid: u32, text: &str) -> String {
    format!("<{}>{} {}[{}]: {}", pri, timestamp, tag, pid, text)
}

/// Syslog backend over the local daemon socket.
pub struct Syslog {
    socket: Mutex<Option<UnixDatagram>>,
    tag: String,
    facility: Facility,
}

impl Syslog {
    /// Connect to the local syslog daemon.
    ///
    /// # Errors
    ///
    /// Fails when no local syslog socket can be reached; the error is fatal
    /// to this backend's setup only.
    pub fn new(tag: impl Into<String>, facility: Facility) -> Result<Self, BackendError> {
        let socket = UnixDatagram::unbound()?;
        let connected = SOCKET_PATHS
            .iter()
            .any(|path| socket.connect(path).is_ok());
        if !connected {
            return Err(BackendError::Sink(format!(
                "no local syslog socket among {:?}",
                SOCKET_PATHS
            )));
        }
        Ok(Self {
            socket: Mutex::new(Some(socket)),
            tag: tag.into(),
            facility,
        })
    }
}

impl Backend for Syslog {
    fn message<'a>(&'a self, level: Level, text: &str) -> Box<dyn Message + 'a> {
        Box::new(SyslogMessage {
            parent: self,
            level,
            text: text.to_string(),
        })
    }

    fn close(&self) -> Result<(), BackendError> {
        self.socket.lock().unwrap().take();
        Ok(())
    }
}

struct SyslogMessage<'a> {
    parent: &'a Syslog,
    level: Level,
    text: String,
}

impl Message for SyslogMessage<'_> {
    fn compose(&mut self, _attribs: &AttribStore) -> Result<(), BackendError> {
        Ok(())
    }

    fn write(&mut self) -> Result<(), BackendError> {
        let line = format_line(
            priority(self.parent.facility, self.level),
            &Local::now().format("%b %e %H:%M:%S").to_string(),
            &self.parent.tag,
            std::process::id(),
            &self.text,
        );
        let guard = self.parent.socket.lock().unwrap();
        match guard.as_ref() {
            Some(socket) => {
                socket.send(line.as_bytes())?;
                Ok(())
            }
            None => Err(BackendError::Closed),
        }
    }
}
