//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! SessionProvider (login state)      ChainClient (RPC connection)
//!     → watch<ProviderState>             → watch<ClientState>
//!               \                           /
//!                → detector.rs (assessment, debounce, forced disconnect)
//!                → SessionValidator (throttled gate for transfers)
//! ```

pub mod detector;
pub mod provider;
pub mod signal;

pub use detector::{SessionAssessment, SessionValidator, StalenessDetector};
pub use provider::{LocalSession, ModalView, SessionProvider};
pub use signal::{ClientState, ConnectionSignal, ConnectionStatus, ProviderReadiness, ProviderState};
