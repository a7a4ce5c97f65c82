//! End screen overlay window.
//!
//! A borderless webview that loads the configured screen document and
//! exposes the status records to it as JavaScript bindings
//! (`window.player_status`, `window.mission_status`). [`Overlay::show`]
//! blocks until the window is closed, matching the one-screen-at-a-time
//! display model of the control loop.

use endscreen_status::{MissionStatus, PlayerStatus};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tao::platform::run_return::EventLoopExtRunReturn;
use tao::window::WindowBuilder;
use tokio_util::sync::CancellationToken;
use wry::WebViewBuilder;

/// Errors raised while building or running the overlay window.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("window error: {0}")]
    Window(#[from] tao::error::OsError),

    #[error("webview error: {0}")]
    Webview(#[from] wry::Error),

    #[error("binding serialization error: {0}")]
    Bindings(#[from] serde_json::Error),

    #[error("window has no gtk container")]
    MissingGtkContainer,
}

/// Event injected into the window loop when the process is interrupted.
#[derive(Debug)]
enum OverlayRequest {
    Close,
}

/// Owns the windowing event loop and shows one end screen at a time.
///
/// The event loop is acquired once and kept for the process lifetime; the
/// window and webview of each screen are created per [`Overlay::show`] call
/// and torn down by drop on every exit path.
pub struct Overlay {
    event_loop: EventLoop<OverlayRequest>,
    screen: String,
    cancel: CancellationToken,
}

impl Overlay {
    /// Acquires the windowing event loop. Must be called on the main
    /// thread.
    pub fn new(screen: String, cancel: CancellationToken) -> Self {
        let event_loop = EventLoopBuilder::<OverlayRequest>::with_user_event().build();
        Self {
            event_loop,
            screen,
            cancel,
        }
    }

    /// Shows the end screen populated with both status records and blocks
    /// until it is closed by the user or the process is interrupted.
    ///
    /// Must be called from within the tokio runtime; the interrupt watcher
    /// is spawned on it.
    pub fn show(
        &mut self,
        player: &PlayerStatus,
        mission: &MissionStatus,
    ) -> Result<(), OverlayError> {
        let window = WindowBuilder::new()
            .with_title("endscreen")
            .with_decorations(false)
            .with_always_on_top(true)
            .build(&self.event_loop)?;

        let bindings = binding_script(player, mission)?;
        let builder = WebViewBuilder::new()
            .with_url(&self.screen)
            .with_initialization_script(&bindings);

        #[cfg(not(any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd"
        )))]
        let webview = builder.build(&window)?;
        #[cfg(any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        let webview = {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            let vbox = window
                .default_vbox()
                .ok_or(OverlayError::MissingGtkContainer)?;
            builder.build_gtk(vbox)?
        };

        tracing::debug!(screen = %self.screen, "end screen opened");

        // Forward process interrupt into the window loop; Ctrl-C during
        // display closes the overlay.
        let proxy = self.event_loop.create_proxy();
        let cancel = self.cancel.clone();
        let watcher = tokio::spawn(async move {
            cancel.cancelled().await;
            let _ = proxy.send_event(OverlayRequest::Close);
        });

        let _ = self.event_loop.run_return(|event, _target, control_flow| {
            *control_flow = ControlFlow::Wait;
            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                }
                | Event::UserEvent(OverlayRequest::Close) => *control_flow = ControlFlow::Exit,
                _ => {}
            }
        });

        watcher.abort();
        drop(webview);
        tracing::debug!("end screen closed");
        Ok(())
    }
}

/// Init script publishing both records to the document's scripting
/// environment before any of its own scripts run.
fn binding_script(
    player: &PlayerStatus,
    mission: &MissionStatus,
) -> Result<String, serde_json::Error> {
    Ok(format!(
        "window.player_status = {}; window.mission_status = {};",
        serde_json::to_string(player)?,
        serde_json::to_string(mission)?,
    ))
}
