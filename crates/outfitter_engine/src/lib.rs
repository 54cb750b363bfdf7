//! Outfitter engine: backend channel and flow orchestration.
mod channel;
mod client;
mod config;
mod debounce;
mod flow;
mod gate;
mod host;
mod monitor;
mod surface;

pub use channel::{BackendChannel, ChannelError, ChannelSettings, HttpChannel};
pub use client::{
    AckResponse, BackendClient, CredentialStatusResponse, JobStatusResponse, StartResponse,
};
pub use config::EngineConfig;
pub use debounce::Debouncer;
pub use flow::{FlowContext, FlowController};
pub use gate::CredentialGate;
pub use host::{CredentialPrompt, ModalHandle, ModalHost, PageHost};
pub use monitor::ProgressMonitor;
pub use surface::ProgressSurface;
