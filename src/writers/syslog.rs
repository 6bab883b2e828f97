//! Syslog writer over UDP, TCP or a local unix socket
//!
//! Messages use BSD syslog framing. Network transports send
//! `<PRI>TIMESTAMP HOSTNAME TAG[PID]: MSG` with an RFC 3339 timestamp and a
//! trailing newline; the local socket gets the shorter
//! `<PRI>Mmm dd hh:mm:ss TAG[PID]: MSG` form the local daemon expects.

use crate::core::{Level, LoggerError, Result, Writer};
use chrono::{Local, SecondsFormat};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::net::{TcpStream, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;
#[cfg(unix)]
use std::path::PathBuf;
use std::time::Duration;

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(unix)]
const LOCAL_SOCKETS: [&str; 3] = ["/dev/log", "/var/run/syslog", "/var/run/log"];

/// Syslog facility codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facility {
    Kern = 0,
    #[default]
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    AuthPriv = 10,
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

impl Facility {
    /// `<PRI>` value for a record of `level`
    pub fn priority(self, level: Level) -> u8 {
        (self as u8) * 8 + level.syslog_severity()
    }
}

/// Where the syslog daemon listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyslogTransport {
    /// `host:port` reached over UDP
    Udp(String),
    /// `host:port` reached over TCP
    Tcp(String),
    /// Unix datagram socket at a path
    #[cfg(unix)]
    Unix(PathBuf),
    /// The first of the usual local daemon sockets that accepts a connection
    Local,
}

impl SyslogTransport {
    fn address(&self) -> String {
        match self {
            SyslogTransport::Udp(addr) => format!("udp://{}", addr),
            SyslogTransport::Tcp(addr) => format!("tcp://{}", addr),
            #[cfg(unix)]
            SyslogTransport::Unix(path) => format!("unix://{}", path.display()),
            SyslogTransport::Local => "local".to_string(),
        }
    }
}

enum Connection {
    Udp(UdpSocket),
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixDatagram),
}

impl Connection {
    fn is_local(&self) -> bool {
        match self {
            Connection::Udp(_) | Connection::Tcp(_) => false,
            #[cfg(unix)]
            Connection::Unix(_) => true,
        }
    }

    fn send(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            Connection::Udp(socket) => socket.send(bytes).map(|_| ()),
            Connection::Tcp(stream) => stream.write_all(bytes),
            #[cfg(unix)]
            Connection::Unix(socket) => socket.send(bytes).map(|_| ()),
        }
    }
}

/// Sends records to a syslog daemon
///
/// The connection is dialled on the first write. A failed send drops the
/// connection and retries once on a fresh one. `reopen` and `close` both
/// disconnect; the next write dials again.
///
/// ```no_run
/// use module_logger::writers::{Facility, SyslogTransport, SyslogWriter};
///
/// let writer = SyslogWriter::new(SyslogTransport::Local, Facility::Daemon, "myapp");
/// ```
pub struct SyslogWriter {
    transport: SyslogTransport,
    facility: Facility,
    tag: String,
    hostname: String,
    connection: Mutex<Option<Connection>>,
}

impl SyslogWriter {
    pub fn new(transport: SyslogTransport, facility: Facility, tag: impl Into<String>) -> Self {
        Self {
            transport,
            facility,
            tag: tag.into(),
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "-".to_string()),
            connection: Mutex::new(None),
        }
    }

    /// Override the host name sent with network messages
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection.lock().is_some()
    }

    fn dial(&self) -> Result<Connection> {
        let fail = |e: std::io::Error| LoggerError::syslog(self.transport.address(), e.to_string());

        match &self.transport {
            SyslogTransport::Udp(addr) => {
                let socket = UdpSocket::bind("0.0.0.0:0").map_err(fail)?;
                socket.connect(addr).map_err(fail)?;
                Ok(Connection::Udp(socket))
            }
            SyslogTransport::Tcp(addr) => {
                let stream = TcpStream::connect(addr).map_err(fail)?;
                stream.set_write_timeout(Some(WRITE_TIMEOUT)).map_err(fail)?;
                Ok(Connection::Tcp(stream))
            }
            #[cfg(unix)]
            SyslogTransport::Unix(path) => {
                let socket = UnixDatagram::unbound().map_err(fail)?;
                socket.connect(path).map_err(fail)?;
                Ok(Connection::Unix(socket))
            }
            SyslogTransport::Local => self.dial_local(),
        }
    }

    #[cfg(unix)]
    fn dial_local(&self) -> Result<Connection> {
        for path in LOCAL_SOCKETS {
            if let Ok(socket) = UnixDatagram::unbound() {
                if socket.connect(path).is_ok() {
                    return Ok(Connection::Unix(socket));
                }
            }
        }
        Err(LoggerError::syslog("local", "no local syslog socket accepted a connection"))
    }

    #[cfg(not(unix))]
    fn dial_local(&self) -> Result<Connection> {
        Err(LoggerError::syslog("local", "local syslog is only available on unix"))
    }

    fn frame(&self, local: bool, level: Level, text: &str) -> String {
        let pri = self.facility.priority(level);
        let pid = std::process::id();
        let message = text.trim_end_matches('\n');

        if local {
            let stamp = Local::now().format("%b %e %H:%M:%S");
            format!("<{}>{} {}[{}]: {}", pri, stamp, self.tag, pid, message)
        } else {
            let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
            format!(
                "<{}>{} {} {}[{}]: {}\n",
                pri, stamp, self.hostname, self.tag, pid, message
            )
        }
    }

    fn send(&self, connection: &mut Connection, level: Level, text: &str) -> std::io::Result<()> {
        let framed = self.frame(connection.is_local(), level, text);
        connection.send(framed.as_bytes())
    }
}

impl Writer for SyslogWriter {
    fn write(&self, level: Level, _module: &str, text: &str) -> Result<()> {
        let mut guard = self.connection.lock();

        if let Some(connection) = guard.as_mut() {
            if self.send(connection, level, text).is_ok() {
                return Ok(());
            }
            *guard = None;
        }

        let mut connection = self.dial()?;
        let result = self
            .send(&mut connection, level, text)
            .map_err(|e| LoggerError::syslog(self.transport.address(), e.to_string()));
        if result.is_ok() {
            *guard = Some(connection);
        }
        result
    }

    fn reopen(&self) -> Result<()> {
        self.close()
    }

    fn close(&self) -> Result<()> {
        self.connection.lock().take();
        Ok(())
    }

    fn name(&self) -> &str {
        "syslog"
    }
}
