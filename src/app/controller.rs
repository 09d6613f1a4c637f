//! Screen controller
//!
//! Owns the view state and runs the capture trigger: concurrent permission
//! requests, the capture flow, and the position read that follows a
//! successful capture. Platform services come in through traits so the
//! same flow runs against GTK in the app and against fakes in tests.

use futures::future::LocalBoxFuture;
use gtk4::gio;
use gtk4::gio::prelude::*;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::ViewState;
use crate::capture::{CameraService, CaptureOptions, CaptureResponse};
use crate::format::{format_capture_time, TimeFormat};
use crate::location::{GeolocationService, PositionError, PositionOptions};
use crate::permission::{Capability, PermissionService, PermissionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationDuration {
    Short,
    Long,
}

/// Transient, non-blocking message to the user
pub trait Notifier {
    fn show(&self, text: &str, duration: NotificationDuration);
}

/// Runs a future on the UI context without the caller awaiting it
pub trait Spawner {
    fn spawn(&self, future: LocalBoxFuture<'static, ()>);
}

/// What to do when a position read fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PositionErrorPolicy {
    /// Log the code and message; show nothing
    #[default]
    LogOnly,
    /// Log and show a transient notification
    Notify,
}

impl PositionErrorPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "log" | "log-only" | "silent" => Some(PositionErrorPolicy::LogOnly),
            "notify" | "toast" => Some(PositionErrorPolicy::Notify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A capture was already running; this trigger did nothing
    AlreadyInFlight,
    PermissionDenied {
        camera: PermissionStatus,
        location: PermissionStatus,
    },
    Captured,
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub capture_options: CaptureOptions,
    pub position_options: PositionOptions,
    pub position_error_policy: PositionErrorPolicy,
    pub time_format: TimeFormat,
}

pub struct Services {
    pub permissions: Rc<dyn PermissionService>,
    pub camera: Rc<dyn CameraService>,
    pub geolocation: Rc<dyn GeolocationService>,
    pub notifier: Rc<dyn Notifier>,
    pub spawner: Rc<dyn Spawner>,
}

type ChangeHandler = Box<dyn Fn(&ViewState)>;

pub struct CaptureController {
    state: RefCell<ViewState>,
    services: Services,
    settings: ControllerSettings,
    position_cancellable: RefCell<Option<gio::Cancellable>>,
    on_change: RefCell<Option<ChangeHandler>>,
}

impl CaptureController {
    pub fn new(services: Services, settings: ControllerSettings) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(ViewState::new()),
            services,
            settings,
            position_cancellable: RefCell::new(None),
            on_change: RefCell::new(None),
        })
    }

    /// Snapshot of the current view state
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn time_format(&self) -> &TimeFormat {
        &self.settings.time_format
    }

    /// Register the render callback. It runs once immediately.
    pub fn connect_changed(&self, handler: impl Fn(&ViewState) + 'static) {
        handler(&self.state.borrow());
        *self.on_change.borrow_mut() = Some(Box::new(handler));
    }

    fn update(&self, f: impl FnOnce(&mut ViewState) -> bool) {
        let changed = f(&mut self.state.borrow_mut());
        if changed {
            if let Some(handler) = self.on_change.borrow().as_ref() {
                handler(&self.state.borrow());
            }
        }
    }

    /// Handle a press of the capture button
    pub async fn trigger_capture(self: &Rc<Self>) -> TriggerOutcome {
        let started = self.state.borrow_mut().begin_capture();
        if !started {
            debug!("Capture already in flight, ignoring trigger");
            return TriggerOutcome::AlreadyInFlight;
        }
        self.update(|_| true);

        let outcome = self.run_capture().await;
        info!("Capture finished: {:?}", outcome);

        self.update(|s| s.finish_capture());
        outcome
    }

    async fn run_capture(self: &Rc<Self>) -> TriggerOutcome {
        let permissions = &self.services.permissions;
        let (camera, location) = futures::join!(
            permissions.request(Capability::Camera),
            permissions.request(Capability::Location)
        );

        if !camera.is_granted() || !location.is_granted() {
            info!(
                "Capture blocked: camera {}, location {}",
                camera, location
            );
            return TriggerOutcome::PermissionDenied { camera, location };
        }

        let response = self
            .services
            .camera
            .launch(self.settings.capture_options)
            .await;
        self.apply_capture_response(response)
    }

    fn apply_capture_response(self: &Rc<Self>, response: CaptureResponse) -> TriggerOutcome {
        if let Some(asset) = response.assets.into_iter().next() {
            debug!(
                "Asset {} ({:?}x{:?}, {:?} bytes)",
                asset.file_path.display(),
                asset.width,
                asset.height,
                asset.file_size
            );
            let image_time =
                format_capture_time(asset.timestamp.as_deref(), &self.settings.time_format);
            if image_time.is_none() {
                warn!("Unusable capture timestamp: {:?}", asset.timestamp);
            }

            self.start_position_read();
            self.update(|s| {
                let source_changed = s.set_image_source(asset.uri);
                let time_changed = s.set_image_time(image_time);
                source_changed || time_changed
            });
            return TriggerOutcome::Captured;
        }

        if let Some(message) = response.error_message.filter(|m| !m.is_empty()) {
            self.services
                .notifier
                .show(&message, NotificationDuration::Short);
            return TriggerOutcome::Failed(message);
        }

        TriggerOutcome::Cancelled
    }

    /// Spawn a position read, superseding any read still running
    fn start_position_read(self: &Rc<Self>) {
        let cancellable = gio::Cancellable::new();
        if let Some(previous) = self
            .position_cancellable
            .borrow_mut()
            .replace(cancellable.clone())
        {
            previous.cancel();
        }

        let this = Rc::clone(self);
        self.services
            .spawner
            .spawn(Box::pin(async move { this.read_position(cancellable).await }));
    }

    async fn read_position(&self, cancellable: gio::Cancellable) {
        if cancellable.is_cancelled() {
            return;
        }

        let result = self
            .services
            .geolocation
            .current_position(self.settings.position_options, cancellable.clone())
            .await;

        if cancellable.is_cancelled() {
            debug!("Discarding result of a cancelled position read");
            return;
        }

        match result {
            Ok(position) => {
                debug!(
                    "Position fix {:?}, accuracy {:?} m, altitude {:?} m",
                    position.coords, position.accuracy, position.altitude
                );
                self.update(|s| s.set_position(position.coords));
            }
            Err(err) => self.handle_position_error(err),
        }
    }

    fn handle_position_error(&self, err: PositionError) {
        if err.is_cancelled() {
            return;
        }
        warn!("Position read failed: {}", err);
        if self.settings.position_error_policy == PositionErrorPolicy::Notify {
            self.services
                .notifier
                .show(&err.message, NotificationDuration::Long);
        }
    }

    /// Cancel any position read still running
    pub fn shutdown(&self) {
        if let Some(cancellable) = self.position_cancellable.borrow_mut().take() {
            cancellable.cancel();
        }
    }
}
