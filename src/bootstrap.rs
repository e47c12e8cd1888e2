//! Connection setup and role negotiation.
//!
//! The connecting side picks its mark and announces it; the listening side
//! takes the complement and always moves first.

use crate::codec::{self, Message};
use crate::config::DuelConfig;
use crate::error::SessionError;
use crate::events::GameEvent;
use crate::players::Player;
use crate::session::{EndReason, GameSession, SessionReport};
use crate::transport::{TcpTransport, Transport, TransportError};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, instrument, warn};
use ttt_board::Mark;

/// Which end of the connection this process is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Bound the port and accepted the connection.
    Listener,
    /// Dialed the listener.
    Connector,
}

/// Settled marks and turn order for one connection.
///
/// The remote mark is always the complement of the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roles {
    side: Side,
    local: Mark,
}

impl Roles {
    /// Roles for `side` playing `local`.
    pub fn new(side: Side, local: Mark) -> Self {
        Self { side, local }
    }

    /// This process's end of the connection.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Mark placed by this process.
    pub fn local(&self) -> Mark {
        self.local
    }

    /// Mark placed by the peer.
    pub fn remote(&self) -> Mark {
        self.local.opponent()
    }

    /// Whether this process opens each round.
    pub fn moves_first(&self) -> bool {
        self.side == Side::Listener
    }
}

/// Settles marks over a fresh connection.
#[instrument(skip(transport, player), fields(player = %player.name()))]
pub async fn negotiate_roles<T, P>(
    side: Side,
    transport: &mut T,
    player: &mut P,
) -> Result<Roles, SessionError>
where
    T: Transport,
    P: Player,
{
    let roles = match side {
        Side::Connector => {
            let mark = player.choose_mark().await?;
            transport.send(&Message::Role(mark).encode()).await?;
            Roles::new(side, mark)
        }
        Side::Listener => {
            let token = transport.receive().await?;
            let theirs = codec::decode_role(&token)?;
            Roles::new(side, theirs.opponent())
        }
    };
    info!(local = %roles.local(), remote = %roles.remote(), "Roles negotiated");
    player.notify(GameEvent::RolesAssigned(roles));
    Ok(roles)
}

/// Negotiates roles and runs a session to completion.
pub async fn start_session<T, P>(
    side: Side,
    transport: &mut T,
    player: &mut P,
) -> Result<SessionReport, SessionError>
where
    T: Transport,
    P: Player,
{
    let roles = negotiate_roles(side, transport, player).await?;
    GameSession::new(transport, player, roles).run().await
}

/// Builds TCP sessions from a [`DuelConfig`].
#[derive(Debug, Clone)]
pub struct SessionFactory {
    config: DuelConfig,
}

impl SessionFactory {
    /// Creates a factory for the given configuration.
    pub fn new(config: DuelConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// Binds the configured port on all interfaces.
    #[instrument(skip(self), fields(port = self.config.port()))]
    pub async fn bind(&self) -> Result<TcpListener, TransportError> {
        let listener = TcpListener::bind(("0.0.0.0", *self.config.port())).await?;
        info!("Listening");
        Ok(listener)
    }

    /// Accepts one connection.
    #[instrument(skip(self, listener))]
    pub async fn accept(&self, listener: &TcpListener) -> Result<TcpTransport, TransportError> {
        let (stream, addr) = listener.accept().await?;
        info!(%addr, "Client connected");
        Ok(TcpTransport::from_stream(
            stream,
            self.config.receive_timeout(),
        ))
    }

    /// Connects to the configured host and port.
    #[instrument(skip(self), fields(host = %self.config.host(), port = self.config.port()))]
    pub async fn dial(&self) -> Result<TcpTransport, TransportError> {
        let stream = TcpStream::connect((self.config.host().as_str(), *self.config.port())).await?;
        info!("Connected to server");
        Ok(TcpTransport::from_stream(
            stream,
            self.config.receive_timeout(),
        ))
    }

    /// Binds and serves (see [`SessionFactory::serve_on`]).
    pub async fn serve<P: Player>(&self, player: &mut P) -> Result<Vec<SessionReport>, SessionError> {
        let listener = self.bind().await?;
        self.serve_on(&listener, player).await
    }

    /// Accepts clients one at a time and plays a session with each.
    ///
    /// A failed accept, or a session that ends in a transport or protocol
    /// error, is logged and the next client is accepted. With
    /// `keep_listening` off, returns after the first session. A local quit
    /// or closed local input always stops serving.
    #[instrument(skip(self, listener, player), fields(player = %player.name()))]
    pub async fn serve_on<P: Player>(
        &self,
        listener: &TcpListener,
        player: &mut P,
    ) -> Result<Vec<SessionReport>, SessionError> {
        let mut reports = Vec::new();
        let addr = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| format!("port {}", self.config.port()));
        player.notify(GameEvent::Listening { addr });

        loop {
            let mut transport = match self.accept(listener).await {
                Ok(transport) => transport,
                Err(err) => {
                    self.recover(player, err.into())?;
                    continue;
                }
            };
            player.notify(GameEvent::Connected);

            match start_session(Side::Listener, &mut transport, player).await {
                Ok(report) => {
                    let quit = *report.ended_by() == EndReason::Quit;
                    reports.push(report);
                    if quit || !*self.config.keep_listening() {
                        return Ok(reports);
                    }
                }
                Err(err) => self.recover(player, err)?,
            }
        }
    }

    /// Decides whether the server survives a failed accept or session.
    ///
    /// Returns `Ok` when the next client should be accepted. Closed local
    /// input, or any failure with `keep_listening` off, is returned.
    fn recover<P: Player>(&self, player: &mut P, err: SessionError) -> Result<(), SessionError> {
        if matches!(err, SessionError::InputClosed) {
            return Err(err);
        }
        warn!(error = %err, "Session ended abnormally");
        player.notify(GameEvent::ConnectionLost {
            reason: err.to_string(),
        });
        if !*self.config.keep_listening() {
            return Err(err);
        }
        player.notify(GameEvent::AwaitingNextClient);
        Ok(())
    }

    /// Dials the server and plays one session.
    ///
    /// Any failure, including a failed dial, is reported to the player as
    /// [`GameEvent::ConnectionLost`] before it is returned.
    #[instrument(skip(self, player), fields(player = %player.name()))]
    pub async fn connect<P: Player>(&self, player: &mut P) -> Result<SessionReport, SessionError> {
        let result = match self.dial().await {
            Ok(mut transport) => {
                player.notify(GameEvent::Connected);
                start_session(Side::Connector, &mut transport, player).await
            }
            Err(err) => Err(SessionError::from(err)),
        };
        match &result {
            Ok(_) | Err(SessionError::InputClosed) => {}
            Err(err) => {
                warn!(error = %err, "Session ended abnormally");
                player.notify(GameEvent::ConnectionLost {
                    reason: err.to_string(),
                });
            }
        }
        result
    }

    /// Plays sessions against the server until one finishes normally.
    ///
    /// After a failed dial, a lost connection or a protocol error the
    /// player is asked whether to dial again. Returns `Ok(None)` when the
    /// player declines. Closed local input is returned as an error.
    #[instrument(skip(self, player), fields(player = %player.name()))]
    pub async fn connect_with_restarts<P: Player>(
        &self,
        player: &mut P,
    ) -> Result<Option<SessionReport>, SessionError> {
        let mut attempt = 1usize;
        loop {
            match self.connect(player).await {
                Ok(report) => return Ok(Some(report)),
                Err(SessionError::InputClosed) => return Err(SessionError::InputClosed),
                Err(err) => {
                    debug!(attempt, disconnect = err.is_disconnect(), "Offering restart");
                    if !player.wants_reconnect().await? {
                        info!(attempt, "Player declined to reconnect");
                        return Ok(None);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
