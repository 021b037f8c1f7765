/// Connection lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No stream is open.
    #[default]
    Disconnected,
    /// Opening the TCP stream.
    Connecting,
    /// Stream open, registration not yet confirmed by the server.
    Connected,
    /// Server confirmed registration (001).
    Authenticated,
}

impl ConnectionState {
    /// Whether a stream is currently open.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::Authenticated)
    }

    /// Whether the server has confirmed registration.
    pub fn is_authenticated(self) -> bool {
        self == Self::Authenticated
    }
}
