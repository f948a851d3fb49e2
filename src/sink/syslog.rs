use super::LogSink;
use crate::error::Error;
use std::io::{self, Write};
use std::net::{TcpStream, UdpSocket};
#[cfg(unix)]
use std::os::unix::net::UnixDatagram;

/// Local syslog sink, writing to the platform's syslog socket (`/dev/log` on
/// Linux) with sensible defaults (facility `LOCAL0`, severity `NOTICE`).
pub struct SyslogSink {
    tag: String,
    #[cfg(unix)]
    socket: Option<UnixDatagram>,
}

impl SyslogSink {
    pub fn new(tag: &str) -> Self {
        #[cfg(unix)]
        {
            let socket = UnixDatagram::unbound()
                .ok()
                .and_then(|s| s.connect("/dev/log").ok().map(|_| s));
            SyslogSink {
                tag: tag.to_string(),
                socket,
            }
        }
        #[cfg(not(unix))]
        {
            SyslogSink { tag: tag.to_string() }
        }
    }

    fn format(&self, msg: &str) -> String {
        // facility LOCAL0 (16) << 3 | severity NOTICE (5) = 133
        format!("<133>{}: {}", self.tag, msg)
    }
}

impl LogSink for SyslogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = self.format(&String::from_utf8_lossy(buf));
        #[cfg(unix)]
        {
            if let Some(sock) = &self.socket {
                let _ = sock.send(msg.as_bytes());
            }
        }
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_pid(&mut self, _pid: u32) {}

    fn read_log(&self, _offset: i64, _length: i64) -> Result<String, Error> {
        Ok(String::new())
    }

    fn read_tail_log(&self, offset: i64, _length: i64) -> Result<(String, i64, bool), Error> {
        Ok((String::new(), offset, true))
    }

    fn clear_cur_log_file(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn clear_all_log_files(&mut self) -> io::Result<()> {
        Ok(())
    }
}

enum RemoteTransport {
    Tcp(TcpStream),
    Udp(UdpSocket, String),
}

/// Remote syslog sink, dialing a `proto:host:port` endpoint.
///
/// Parsing follows the `[protocol:]host[:port]` grammar: protocol defaults to
/// `udp`; port defaults to `514` (udp) / `6514` (tcp) when omitted.
pub struct RemoteSyslogSink {
    tag: String,
    transport: Option<RemoteTransport>,
}

impl RemoteSyslogSink {
    pub fn new(tag: &str, config: &str) -> Self {
        let transport = parse_syslog_config(config).and_then(|(proto, host, port)| {
            let addr = format!("{host}:{port}");
            match proto.as_str() {
                "tcp" => TcpStream::connect(&addr).ok().map(RemoteTransport::Tcp),
                _ => UdpSocket::bind("0.0.0.0:0")
                    .ok()
                    .map(|s| RemoteTransport::Udp(s, addr)),
            }
        });
        RemoteSyslogSink {
            tag: tag.to_string(),
            transport,
        }
    }

    fn format(&self, msg: &str) -> String {
        format!("<133>{}: {}", self.tag, msg)
    }
}

impl LogSink for RemoteSyslogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = self.format(&String::from_utf8_lossy(buf));
        match &mut self.transport {
            Some(RemoteTransport::Tcp(stream)) => {
                let _ = stream.write_all(msg.as_bytes());
            }
            Some(RemoteTransport::Udp(sock, addr)) => {
                let _ = sock.send_to(msg.as_bytes(), addr);
            }
            None => {}
        }
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn set_pid(&mut self, _pid: u32) {}

    fn read_log(&self, _offset: i64, _length: i64) -> Result<String, Error> {
        Ok(String::new())
    }

    fn read_tail_log(&self, offset: i64, _length: i64) -> Result<(String, i64, bool), Error> {
        Ok((String::new(), offset, true))
    }

    fn clear_cur_log_file(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn clear_all_log_files(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Parses `[protocol:]host[:port]` into `(protocol, host, port)`.
fn parse_syslog_config(config: &str) -> Option<(String, String, u16)> {
    let fields: Vec<&str> = config.split(':').collect();
    match fields.len() {
        1 => Some(("udp".to_string(), fields[0].to_string(), 514)),
        2 => match fields[0] {
            "tcp" => Some(("tcp".to_string(), fields[1].to_string(), 6514)),
            "udp" => Some(("udp".to_string(), fields[1].to_string(), 514)),
            _ => fields[1]
                .parse::<u16>()
                .ok()
                .map(|port| ("udp".to_string(), fields[0].to_string(), port)),
        },
        3 => fields[2]
            .parse::<u16>()
            .ok()
            .map(|port| (fields[0].to_string(), fields[1].to_string(), port)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_only() {
        assert_eq!(
            parse_syslog_config("example.com"),
            Some(("udp".to_string(), "example.com".to_string(), 514))
        );
    }

    #[test]
    fn parses_explicit_udp() {
        assert_eq!(
            parse_syslog_config("udp:example.com"),
            Some(("udp".to_string(), "example.com".to_string(), 514))
        );
    }

    #[test]
    fn parses_explicit_tcp() {
        assert_eq!(
            parse_syslog_config("tcp:example.com"),
            Some(("tcp".to_string(), "example.com".to_string(), 6514))
        );
    }

    #[test]
    fn parses_host_and_port() {
        assert_eq!(
            parse_syslog_config("example.com:9000"),
            Some(("udp".to_string(), "example.com".to_string(), 9000))
        );
    }

    #[test]
    fn parses_protocol_host_port() {
        assert_eq!(
            parse_syslog_config("tcp:example.com:9000"),
            Some(("tcp".to_string(), "example.com".to_string(), 9000))
        );
    }
}
