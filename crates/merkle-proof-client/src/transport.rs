//! Blocking byte-stream transport to the authority with exact-length reads and writes.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{ClientError, ProtocolError};
use crate::request::AuthorityEndpoint;

/// A bidirectional byte stream the transport can drive
pub trait Stream: Read + Write {
    /// Close both directions of the stream
    fn shutdown(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Stream for TcpStream {
    fn shutdown(&mut self) -> std::io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// Exclusive owner of one connection to the authority.
///
/// Dropping the transport releases the underlying stream, so every exit path of a
/// session gives the connection back even when `close` is never reached.
#[derive(Debug)]
pub struct Transport<S: Stream = TcpStream> {
    stream: S,
    peer: String,
}

impl Transport<TcpStream> {
    /// Connect to the authority and apply the configured timeouts
    pub fn open(endpoint: &AuthorityEndpoint, config: &ClientConfig) -> Result<Self, ClientError> {
        let connection_error = |source| ClientError::Connection {
            endpoint: endpoint.to_string(),
            source,
        };

        let stream = match config.connect_timeout() {
            None => TcpStream::connect((endpoint.host(), endpoint.port()))
                .map_err(connection_error)?,
            Some(timeout) => {
                let addrs = (endpoint.host(), endpoint.port())
                    .to_socket_addrs()
                    .map_err(connection_error)?;
                let mut last_err = None;
                let mut connected = None;
                for addr in addrs {
                    match TcpStream::connect_timeout(&addr, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(err) => last_err = Some(err),
                    }
                }
                match connected {
                    Some(stream) => stream,
                    None => {
                        return Err(connection_error(last_err.unwrap_or_else(|| {
                            std::io::Error::new(
                                ErrorKind::AddrNotAvailable,
                                "host resolved to no addresses",
                            )
                        })))
                    }
                }
            }
        };

        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;
        stream.set_nodelay(true)?;

        debug!("Connected to authority at {}", endpoint);
        Ok(Self::new(stream, endpoint.to_string()))
    }
}

impl<S: Stream> Transport<S> {
    /// Wrap an already-connected stream
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
        }
    }

    /// Write the whole buffer and flush it
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        trace!(peer = %self.peer, len = bytes.len(), "Sent bytes");
        Ok(())
    }

    /// Read exactly `n` bytes, looping over short reads.
    ///
    /// Fails with [`ProtocolError::Truncated`] if the peer closes the stream first.
    pub fn recv_exact(&mut self, n: usize) -> Result<Vec<u8>, ClientError> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(ProtocolError::Truncated {
                        expected: n,
                        received: filled,
                    }
                    .into())
                }
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        trace!(peer = %self.peer, len = n, "Received bytes");
        Ok(buf)
    }

    /// Flush and shut down the stream
    pub fn close(mut self) -> Result<(), ClientError> {
        self.stream.flush()?;
        self.stream.shutdown()?;
        debug!("Closed connection to {}", self.peer);
        Ok(())
    }
}
