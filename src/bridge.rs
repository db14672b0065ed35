//! Session client for a Milight Wifi bridge.

use std::io;
use std::time::Duration;

use log::{debug, error, warn};
use serde_json::{Value, json};

use crate::command::{Command, CommandKind};
use crate::config::BridgeConfig;
use crate::errors::{Error, ErrorKind, Phase};
use crate::frame::{self, START_SESSION_FRAME};
use crate::history::{MessageHistory, MessageType, to_hex};
use crate::runtime::{self, AsyncUdpSocket, UdpSocket};
use crate::session::{self, SequenceCounter, Session};
use crate::types::{Temperature, Zone};

type Result<T> = std::result::Result<T, Error>;

const RECV_BUFFER_LEN: usize = 1024;

/// Upper bound on stale datagrams discarded before a request.
const MAX_STALE_DATAGRAMS: usize = 16;

/// Client for one Milight Wifi bridge (LimitlessLED v6 protocol).
///
/// Every command performs a fresh handshake: a start-session request whose
/// reply carries the session ids, then the command frame itself, which the
/// bridge acknowledges by echoing its sequence number. Nothing is retried;
/// a failed call simply returns `false` and the next call starts over.
///
/// Methods take `&mut self`, so one client never has two requests in flight.
///
/// # Example
///
/// ```no_run
/// use milight_bridge_rs::{Bridge, Zone};
///
/// # async fn demo() {
/// let mut bridge = Bridge::new();
/// if bridge.setup("192.168.1.23", 5987, 5.0).await {
///     bridge.turn_on(Zone::One).await;
///     bridge.set_color(0xBA, Zone::One).await;
///     bridge.close();
/// }
/// # }
/// ```
pub struct Bridge<S: AsyncUdpSocket = UdpSocket> {
    socket: Option<S>,
    config: Option<BridgeConfig>,
    sequence: SequenceCounter,
    history: MessageHistory,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Create an uninitialized client; call [`Bridge::setup`] before use.
    pub fn new() -> Self {
        Bridge {
            socket: None,
            config: None,
            sequence: SequenceCounter::new(),
            history: MessageHistory::new(),
        }
    }
}

impl<S: AsyncUdpSocket> Bridge<S> {
    /// Zone byte sent with every bridge lamp command.
    pub const BRIDGE_LAMP_ZONE: Zone = Zone::One;

    /// Wrap an already connected transport.
    pub fn from_socket(socket: S, config: BridgeConfig) -> Self {
        Bridge {
            socket: Some(socket),
            config: Some(config),
            sequence: SequenceCounter::new(),
            history: MessageHistory::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.socket.is_some()
    }

    pub fn config(&self) -> Option<&BridgeConfig> {
        self.config.as_ref()
    }

    /// Last sequence number used, 0 if no command frame was built yet.
    pub fn sequence_number(&self) -> u8 {
        self.sequence.current()
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Description of the most recent failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.history.last_error()
    }

    /// Open the UDP transport towards the bridge.
    ///
    /// Any previous transport is closed first, so this can be called again
    /// after a change of address or a failure.
    pub async fn setup(&mut self, address: &str, port: u16, timeout_secs: f64) -> bool {
        let timeout = match Duration::try_from_secs_f64(timeout_secs) {
            Ok(timeout) => timeout,
            Err(e) => {
                self.close();
                let err = Error::socket(
                    "configure timeout",
                    io::Error::new(io::ErrorKind::InvalidInput, e),
                );
                error!("Impossible to initialize the UDP connection: {err}");
                self.history.record_error(&err.to_string());
                return false;
            }
        };
        let config = BridgeConfig::new(address)
            .with_port(port)
            .with_timeout(timeout);
        self.setup_with(&config).await
    }

    pub async fn setup_with(&mut self, config: &BridgeConfig) -> bool {
        self.close();

        match Self::connect(config).await {
            Ok(socket) => {
                debug!("UDP connection initialized with {}", config.endpoint());
                self.socket = Some(socket);
                self.config = Some(config.clone());
                true
            }
            Err(e) => {
                error!(
                    "Impossible to initialize the UDP connection with {}: {e}",
                    config.endpoint()
                );
                self.history.record_error(&e.to_string());
                false
            }
        }
    }

    /// Release the transport. Closing a closed client does nothing.
    pub fn close(&mut self) {
        self.sequence.reset();
        self.config = None;
        if self.socket.take().is_some() {
            debug!("Socket closed");
        }
    }

    /// MAC address of the bridge, or an empty string if the handshake failed.
    pub async fn get_mac_address(&mut self) -> String {
        let mac = match self.start_session().await {
            Ok(session) => session.mac,
            Err(e) => {
                self.record_failure(&e);
                String::new()
            }
        };
        debug!("Get MAC address: {mac}");
        mac
    }

    /// Perform the start-session handshake.
    pub async fn start_session(&mut self) -> Result<Session> {
        let mut buffer = [0u8; RECV_BUFFER_LEN];
        let len = self
            .exchange(Phase::StartSession, &START_SESSION_FRAME, &mut buffer)
            .await?;
        let session = Session::parse(&buffer[..len])?;
        debug!(
            "Start session (mac address: {}, session ID 1: {}, session ID 2: {})",
            session.mac, session.session_id1, session.session_id2
        );
        Ok(session)
    }

    /// Send a command to a zone and wait for the bridge's acknowledgment.
    pub async fn execute(&mut self, command: &Command, zone: Zone) -> Result<()> {
        self.send_request(command.bytes(), zone.id()).await
    }

    /// Send untyped command bytes; the length and zone are checked before
    /// anything goes on the wire.
    pub async fn send_raw(&mut self, command: &[u8], zone: u8) -> bool {
        let result = self.send_request(command, zone).await;
        self.report(&format!("Send {} to zone {zone}", to_hex(command)), result)
    }

    /// Build and send `kind` with `param` (ignored by parameterless kinds).
    ///
    /// Bridge lamp kinds always go to [`Self::BRIDGE_LAMP_ZONE`].
    pub async fn run(&mut self, kind: CommandKind, param: i32, zone: Zone) -> bool {
        let zone = if kind.targets_bridge_lamp() {
            Self::BRIDGE_LAMP_ZONE
        } else {
            zone
        };
        let command = Command::build(kind, param);
        let result = self.execute(&command, zone).await;
        let label = if kind.is_parameterized() {
            format!("{kind} {param} to zone {zone}")
        } else {
            format!("{kind} zone {zone}")
        };
        self.report(&label, result)
    }

    pub async fn turn_on(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::On, 0, zone).await
    }

    pub async fn turn_off(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::Off, 0, zone).await
    }

    pub async fn set_night_mode(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::NightMode, 0, zone).await
    }

    pub async fn set_white_mode(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::WhiteMode, 0, zone).await
    }

    pub async fn speed_up_disco_mode(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::DiscoSpeedUp, 0, zone).await
    }

    pub async fn slow_down_disco_mode(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::DiscoSlowDown, 0, zone).await
    }

    /// Pair lights with a zone. The lights must have been switched on at
    /// most 3 seconds earlier.
    pub async fn link(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::Link, 0, zone).await
    }

    /// Unpair lights. Same 3 second power-on window as [`Self::link`].
    pub async fn unlink(&mut self, zone: Zone) -> bool {
        self.run(CommandKind::Unlink, 0, zone).await
    }

    /// Color wheel position, saturated into 0-255.
    pub async fn set_color(&mut self, color: i32, zone: Zone) -> bool {
        self.run(CommandKind::Color, color, zone).await
    }

    /// Saturation percentage, saturated into 0-100.
    pub async fn set_saturation(&mut self, saturation: i32, zone: Zone) -> bool {
        self.run(CommandKind::Saturation, saturation, zone).await
    }

    /// Brightness percentage, saturated into 0-100.
    pub async fn set_brightness(&mut self, brightness: i32, zone: Zone) -> bool {
        self.run(CommandKind::Brightness, brightness, zone).await
    }

    /// White temperature percentage (0 warm, 100 cool), saturated into 0-100.
    pub async fn set_temperature(&mut self, temperature: i32, zone: Zone) -> bool {
        debug!(
            "Temperature {temperature}% is about {} kelvin",
            Temperature::clamped(temperature).kelvin()
        );
        self.run(CommandKind::Temperature, temperature, zone).await
    }

    /// Disco program, saturated into 1-9.
    pub async fn set_disco_mode(&mut self, mode: i32, zone: Zone) -> bool {
        self.run(CommandKind::DiscoMode, mode, zone).await
    }

    pub async fn turn_on_bridge_lamp(&mut self) -> bool {
        self.run(CommandKind::LampOn, 0, Self::BRIDGE_LAMP_ZONE).await
    }

    pub async fn turn_off_bridge_lamp(&mut self) -> bool {
        self.run(CommandKind::LampOff, 0, Self::BRIDGE_LAMP_ZONE).await
    }

    pub async fn set_white_mode_bridge_lamp(&mut self) -> bool {
        self.run(CommandKind::LampWhiteMode, 0, Self::BRIDGE_LAMP_ZONE)
            .await
    }

    pub async fn speed_up_disco_mode_bridge_lamp(&mut self) -> bool {
        self.run(CommandKind::LampDiscoSpeedUp, 0, Self::BRIDGE_LAMP_ZONE)
            .await
    }

    pub async fn slow_down_disco_mode_bridge_lamp(&mut self) -> bool {
        self.run(CommandKind::LampDiscoSlowDown, 0, Self::BRIDGE_LAMP_ZONE)
            .await
    }

    pub async fn set_color_bridge_lamp(&mut self, color: i32) -> bool {
        self.run(CommandKind::LampColor, color, Self::BRIDGE_LAMP_ZONE)
            .await
    }

    pub async fn set_brightness_bridge_lamp(&mut self, brightness: i32) -> bool {
        self.run(CommandKind::LampBrightness, brightness, Self::BRIDGE_LAMP_ZONE)
            .await
    }

    pub async fn set_disco_mode_bridge_lamp(&mut self, mode: i32) -> bool {
        self.run(CommandKind::LampDiscoMode, mode, Self::BRIDGE_LAMP_ZONE)
            .await
    }

    /// Returns connection settings, sequence state and history summary.
    pub fn diagnostics(&self) -> Value {
        json!({
            "initialized": self.is_initialized(),
            "address": self.config.as_ref().map(|c| c.address.clone()),
            "port": self.config.as_ref().map(|c| c.port),
            "timeout": self.config.as_ref().map(|c| c.timeout.as_secs_f64()),
            "sequence_number": self.sequence.current(),
            "history": serde_json::to_value(self.history.summary()).unwrap_or(Value::Null),
        })
    }

    async fn connect(config: &BridgeConfig) -> Result<S> {
        let socket = S::bind("0.0.0.0:0")
            .await
            .map_err(|e| Error::socket("bind", e))?;

        socket
            .connect(&config.endpoint())
            .await
            .map_err(|e| Error::socket("connect", e))?;

        Ok(socket)
    }

    async fn send_request(&mut self, command: &[u8], zone: u8) -> Result<()> {
        let command = Command::from_slice(command)?;
        let zone = Zone::try_from(zone)?;
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }

        let session = self.start_session().await?;

        // the counter advances even though the session ids are new every time
        let sequence = self.sequence.advance();
        let request = frame::request_frame(
            session.session_id1,
            session.session_id2,
            sequence,
            command.bytes(),
            zone.id(),
        )?;

        debug!(
            "Sending request with command '{command}' with session ID 1 '{}', session ID 2 '{}' and sequence number '{sequence}'",
            session.session_id1, session.session_id2
        );

        let mut buffer = [0u8; RECV_BUFFER_LEN];
        let len = self.exchange(Phase::Command, &request, &mut buffer).await?;
        session::check_ack(&buffer[..len], sequence)?;

        debug!("Received valid response for previously sent request");
        Ok(())
    }

    /// Send one datagram and wait for one reply, bounded by the timeout.
    ///
    /// Datagrams already queued on the socket are late replies to an earlier
    /// request and are dropped before sending.
    async fn exchange(&mut self, phase: Phase, request: &[u8], buffer: &mut [u8]) -> Result<usize> {
        let timeout = self
            .config
            .as_ref()
            .map(|c| c.timeout)
            .ok_or(Error::NotInitialized)?;
        let socket = self.socket.as_ref().ok_or(Error::NotInitialized)?;

        for _ in 0..MAX_STALE_DATAGRAMS {
            match runtime::timeout(Duration::ZERO, socket.recv(buffer)).await {
                Ok(Ok(len)) => debug!("Discarding stale frame '{}'", to_hex(&buffer[..len])),
                Ok(Err(_)) | Err(_) => break,
            }
        }

        debug!("Sending {phase} frame '{}'", to_hex(request));
        self.history.record(MessageType::Send, request);
        socket
            .send(request)
            .await
            .map_err(|e| Error::socket("send", e))?;

        let len = runtime::timeout(timeout, socket.recv(buffer))
            .await
            .map_err(|_| Error::Timeout { phase })?
            .map_err(|e| Error::socket("receive", e))?;

        self.history.record(MessageType::Receive, &buffer[..len]);
        Ok(len)
    }

    fn report(&mut self, label: &str, result: Result<()>) -> bool {
        if let Err(e) = &result {
            self.record_failure(e);
        }
        let ok = result.is_ok();
        debug!("{label}: {ok}");
        ok
    }

    fn record_failure(&mut self, err: &Error) {
        match err.kind() {
            ErrorKind::InvalidInput | ErrorKind::Transport => error!("{err}"),
            _ => warn!("{err}"),
        }
        self.history.record_error(&err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::frame::REQUEST_FRAME_LEN;

    /// What the fake bridge answers to the next datagram.
    enum Reply {
        Bytes(Vec<u8>),
        /// A well-formed ack echoing the last request's sequence number
        Ack,
        /// A well-formed ack with another sequence number
        WrongAck,
        Silence,
    }

    /// Scripted bridge: one scripted reply becomes readable per datagram
    /// sent, while `late` datagrams are readable at any time.
    #[derive(Default)]
    struct FakeSocket {
        replies: Mutex<VecDeque<Reply>>,
        answered: Mutex<usize>,
        late: Arc<Mutex<VecDeque<Vec<u8>>>>,
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl FakeSocket {
        fn scripted(replies: Vec<Reply>) -> (Self, Arc<Mutex<Vec<Vec<u8>>>>) {
            let socket = FakeSocket {
                replies: Mutex::new(replies.into()),
                ..FakeSocket::default()
            };
            let sent = Arc::clone(&socket.sent);
            (socket, sent)
        }

        fn ack_for(&self, offset: u8) -> Vec<u8> {
            let sequence = self
                .sent
                .lock()
                .unwrap()
                .last()
                .map(|frame| frame[8])
                .unwrap_or(0);
            vec![0x88, 0x00, 0x00, 0x00, 0x03, 0x00, sequence.wrapping_add(offset), 0x00]
        }

        fn next_reply(&self) -> Option<Reply> {
            if let Some(bytes) = self.late.lock().unwrap().pop_front() {
                return Some(Reply::Bytes(bytes));
            }
            let mut answered = self.answered.lock().unwrap();
            if *answered >= self.sent.lock().unwrap().len() {
                return None;
            }
            *answered += 1;
            self.replies.lock().unwrap().pop_front()
        }
    }

    impl AsyncUdpSocket for FakeSocket {
        async fn bind(_addr: &str) -> io::Result<Self> {
            Ok(FakeSocket::default())
        }

        async fn connect(&self, _addr: &str) -> io::Result<()> {
            Ok(())
        }

        async fn send(&self, buf: &[u8]) -> io::Result<usize> {
            self.sent.lock().unwrap().push(buf.to_vec());
            Ok(buf.len())
        }

        async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
            let next = self.next_reply();
            let bytes = match next {
                Some(Reply::Bytes(bytes)) => bytes,
                Some(Reply::Ack) => self.ack_for(0),
                Some(Reply::WrongAck) => self.ack_for(1),
                Some(Reply::Silence) | None => {
                    return std::future::pending::<io::Result<usize>>().await;
                }
            };
            buf[..bytes.len()].copy_from_slice(&bytes);
            Ok(bytes.len())
        }
    }

    fn session_reply(id1: u8, id2: u8) -> Reply {
        let mut reply = vec![0u8; 22];
        reply[..7].copy_from_slice(&[0x28, 0x00, 0x00, 0x00, 0x11, 0x00, 0x02]);
        reply[7..13].copy_from_slice(&[0xAC, 0xCF, 0x23, 0x0A, 0x0B, 0x0C]);
        reply[19] = id1;
        reply[20] = id2;
        Reply::Bytes(reply)
    }

    fn bridge(replies: Vec<Reply>) -> (Bridge<FakeSocket>, Arc<Mutex<Vec<Vec<u8>>>>) {
        let (socket, sent) = FakeSocket::scripted(replies);
        let config = BridgeConfig::new("10.0.0.2").with_timeout(Duration::from_millis(50));
        (Bridge::from_socket(socket, config), sent)
    }

    #[tokio::test]
    async fn test_turn_on_sends_handshake_then_command() {
        let (mut bridge, sent) = bridge(vec![session_reply(0x11, 0x22), Reply::Ack]);

        assert!(bridge.turn_on(Zone::Two).await);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], START_SESSION_FRAME.to_vec());
        assert_eq!(
            sent[1],
            vec![
                0x80, 0x00, 0x00, 0x00, 0x11, 0x11, 0x22, 0x00, 0x01, 0x00, 0x31, 0x00, 0x00,
                0x08, 0x04, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x40
            ]
        );
    }

    #[tokio::test]
    async fn test_mac_address() {
        let (mut bridge, sent) = bridge(vec![session_reply(1, 2)]);
        assert_eq!(bridge.get_mac_address().await, "ac:cf:23:a:b:c");
        // handshake only
        assert_eq!(sent.lock().unwrap().len(), 1);
        assert_eq!(bridge.sequence_number(), 0);
    }

    #[tokio::test]
    async fn test_mac_address_empty_on_bad_reply() {
        let (mut bridge, _) = bridge(vec![Reply::Bytes(vec![0u8; 8]), Reply::Silence]);
        assert_eq!(bridge.get_mac_address().await, "");
        assert_eq!(bridge.get_mac_address().await, "");
        assert_eq!(
            bridge.last_error(),
            Some("timed out waiting for start session response")
        );
    }

    #[tokio::test]
    async fn test_handshake_timeout_sends_no_command() {
        let (mut bridge, sent) = bridge(vec![Reply::Silence]);

        assert!(!bridge.turn_off(Zone::All).await);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], START_SESSION_FRAME.to_vec());
        assert_eq!(bridge.sequence_number(), 0);
    }

    #[tokio::test]
    async fn test_malformed_handshake_fails() {
        let (mut bridge, sent) = bridge(vec![Reply::Bytes(vec![0u8; 21])]);
        let err = bridge
            .execute(&Command::fixed(CommandKind::On), Zone::One)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_sequence_ack_fails() {
        let (mut bridge, _) = bridge(vec![session_reply(1, 2), Reply::WrongAck]);
        assert!(!bridge.set_brightness(50, Zone::One).await);
        assert_eq!(
            bridge.last_error(),
            Some("invalid sequence number ack 2 instead of 1")
        );
    }

    #[tokio::test]
    async fn test_wrong_ack_size_fails() {
        let (mut bridge, _) = bridge(vec![session_reply(1, 2), Reply::Bytes(vec![0u8; 7])]);
        let err = bridge
            .execute(&Command::fixed(CommandKind::Link), Zone::Three)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_ack_timeout_fails() {
        let (mut bridge, _) = bridge(vec![session_reply(1, 2), Reply::Silence]);
        let err = bridge
            .execute(&Command::fixed(CommandKind::Unlink), Zone::Four)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Timeout {
                phase: Phase::Command
            }
        );
    }

    #[tokio::test]
    async fn test_failed_call_does_not_block_next() {
        let (mut bridge, _) = bridge(vec![
            session_reply(1, 2),
            Reply::WrongAck,
            session_reply(3, 4),
            Reply::Ack,
        ]);
        assert!(!bridge.turn_on(Zone::One).await);
        assert!(bridge.turn_on(Zone::One).await);
        assert_eq!(bridge.sequence_number(), 2);
    }

    #[tokio::test]
    async fn test_late_handshake_reply_is_discarded() {
        let (socket, sent) = FakeSocket::scripted(vec![
            Reply::Silence,
            session_reply(3, 4),
            Reply::Ack,
        ]);
        let late = Arc::clone(&socket.late);
        let config = BridgeConfig::new("10.0.0.2").with_timeout(Duration::from_millis(50));
        let mut bridge = Bridge::from_socket(socket, config);

        assert!(!bridge.turn_on(Zone::One).await);

        // the reply to the timed-out handshake shows up afterwards
        let Reply::Bytes(stale) = session_reply(1, 2) else {
            unreachable!()
        };
        late.lock().unwrap().push_back(stale);

        assert!(bridge.turn_on(Zone::One).await);
        let sent = sent.lock().unwrap();
        let request = sent.last().unwrap();
        assert_eq!((request[5], request[6]), (3, 4));
    }

    #[tokio::test]
    async fn test_sequence_advances_and_wraps() {
        let mut replies = Vec::new();
        for _ in 0..256 {
            replies.push(session_reply(1, 2));
            replies.push(Reply::Ack);
        }
        let (mut bridge, sent) = bridge(replies);

        for _ in 0..256 {
            assert!(bridge.set_white_mode(Zone::All).await);
        }

        let sent = sent.lock().unwrap();
        let sequences: Vec<u8> = sent
            .iter()
            .filter(|frame| frame.len() == REQUEST_FRAME_LEN)
            .map(|frame| frame[8])
            .collect();
        assert_eq!(sequences.len(), 256);
        assert_eq!(sequences[0], 1);
        assert_eq!(sequences[254], 255);
        assert_eq!(sequences[255], 1);
        assert!(!sequences.contains(&0));
    }

    #[tokio::test]
    async fn test_color_is_clamped_on_the_wire() {
        let (mut bridge, sent) = bridge(vec![
            session_reply(9, 9),
            Reply::Ack,
            session_reply(9, 9),
            Reply::Ack,
        ]);
        assert!(bridge.set_color(9999, Zone::Two).await);
        assert!(bridge.set_color(255, Zone::Two).await);

        let sent = sent.lock().unwrap();
        // ignore the sequence byte, which differs between the two calls
        let strip = |frame: &Vec<u8>| {
            let mut frame = frame.clone();
            frame[8] = 0;
            frame
        };
        assert_eq!(strip(&sent[1]), strip(&sent[3]));
        assert_eq!(&sent[1][10..19], &[0x31, 0, 0, 0x08, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[tokio::test]
    async fn test_bridge_lamp_uses_zone_one() {
        let (mut bridge, sent) = bridge(vec![session_reply(1, 2), Reply::Ack]);
        assert!(bridge.set_disco_mode_bridge_lamp(0).await);

        let sent = sent.lock().unwrap();
        assert_eq!(&sent[1][10..19], &[0x31, 0, 0, 0, 0x04, 0x01, 0, 0, 0]);
        assert_eq!(sent[1][19], 1);
    }

    #[tokio::test]
    async fn test_raw_send_validates_before_io() {
        let (mut bridge, sent) = bridge(vec![session_reply(1, 2), Reply::Ack]);

        assert!(!bridge.send_raw(&[0x31, 0x00, 0x00], 1).await);
        assert!(!bridge.send_raw(Command::fixed(CommandKind::On).bytes(), 5).await);
        assert!(sent.lock().unwrap().is_empty());
        assert_eq!(
            bridge.last_error(),
            Some("invalid zone 5 (must be between 0 and 4)")
        );

        assert!(bridge.send_raw(Command::fixed(CommandKind::On).bytes(), 4).await);
    }

    #[tokio::test]
    async fn test_uninitialized_client_fails() {
        let mut bridge = Bridge::new();
        assert!(!bridge.turn_on(Zone::One).await);
        assert_eq!(bridge.get_mac_address().await, "");
        assert_eq!(
            bridge.last_error(),
            Some("bridge is not initialized; call setup first")
        );
    }

    #[tokio::test]
    async fn test_close_twice() {
        let (mut bridge, _) = bridge(vec![session_reply(1, 2), Reply::Ack]);
        assert!(bridge.turn_on(Zone::One).await);

        bridge.close();
        bridge.close();
        assert!(!bridge.is_initialized());
        assert_eq!(bridge.sequence_number(), 0);

        let mut fresh = Bridge::new();
        fresh.close();
        fresh.close();
        assert!(!fresh.is_initialized());
    }

    #[tokio::test]
    async fn test_setup_rejects_bad_timeout() {
        let mut bridge: Bridge<FakeSocket> = Bridge::from_socket(
            FakeSocket::default(),
            BridgeConfig::new("10.0.0.2"),
        );
        assert!(!bridge.setup("10.0.0.2", 5987, -1.0).await);
        assert!(!bridge.is_initialized());
        assert!(bridge.setup("10.0.0.2", 5987, 0.5).await);
        assert_eq!(
            bridge.config().map(|c| c.timeout),
            Some(Duration::from_millis(500))
        );
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let (mut bridge, _) = bridge(vec![session_reply(1, 2), Reply::Ack]);
        assert!(bridge.link(Zone::One).await);

        let diag = bridge.diagnostics();
        assert_eq!(diag["initialized"], json!(true));
        assert_eq!(diag["address"], json!("10.0.0.2"));
        assert_eq!(diag["sequence_number"], json!(1));
        assert_eq!(diag["history"]["send_count"], json!(2));
        assert_eq!(diag["history"]["receive_count"], json!(2));
    }

    #[tokio::test]
    async fn test_loopback_round_trip() {
        let fake = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = fake.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, peer) = fake.recv_from(&mut buf).await.unwrap();
            assert_eq!(&buf[..len], &START_SESSION_FRAME[..]);

            let mut reply = [0u8; 22];
            reply[7..13].copy_from_slice(&[0x08, 0x09, 0x10, 0x11, 0x12, 0x13]);
            reply[19] = 0x5A;
            reply[20] = 0xA5;
            fake.send_to(&reply, peer).await.unwrap();

            let (len, peer) = fake.recv_from(&mut buf).await.unwrap();
            let request = buf[..len].to_vec();
            let ack = [0x88, 0, 0, 0, 0x03, 0, request[8], 0];
            fake.send_to(&ack, peer).await.unwrap();
            request
        });

        let mut bridge = Bridge::new();
        assert!(bridge.setup("127.0.0.1", port, 2.0).await);
        assert!(bridge.set_temperature(35, Zone::Three).await);

        let request = server.await.unwrap();
        assert_eq!(request.len(), REQUEST_FRAME_LEN);
        assert_eq!((request[5], request[6], request[8]), (0x5A, 0xA5, 1));
        assert_eq!(&request[10..19], &[0x31, 0, 0, 0x08, 0x05, 35, 0, 0, 0]);
        assert_eq!(request[19], 3);
        assert_eq!(request[21], frame::checksum(&request[10..19], 3));

        bridge.close();
        assert!(!bridge.is_initialized());
    }
}
