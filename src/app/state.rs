//! View state
//!
//! Everything the screen shows about the most recent capture.

use crate::location::Coordinates;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// URI of the most recent photo
    image_source: Option<String>,
    /// Formatted capture time of that photo
    image_time: Option<String>,
    /// Latest fix; `None` until a read succeeds
    position: Option<Coordinates>,
    /// Whether a capture trigger is being processed
    capture_in_flight: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }

    pub fn image_time(&self) -> Option<&str> {
        self.image_time.as_deref()
    }

    pub fn position(&self) -> Option<Coordinates> {
        self.position
    }

    pub fn capture_in_flight(&self) -> bool {
        self.capture_in_flight
    }

    pub fn has_image(&self) -> bool {
        self.image_source.is_some()
    }

    // Setters return whether the value changed so callers know to re-render

    pub fn set_image_source(&mut self, uri: impl Into<String>) -> bool {
        let uri = Some(uri.into());
        replace_if_changed(&mut self.image_source, uri)
    }

    pub fn set_image_time(&mut self, time: Option<String>) -> bool {
        replace_if_changed(&mut self.image_time, time)
    }

    pub fn set_position(&mut self, coords: Coordinates) -> bool {
        replace_if_changed(&mut self.position, Some(coords))
    }

    /// Mark a capture as started. Returns `false` if one is already running.
    pub fn begin_capture(&mut self) -> bool {
        if self.capture_in_flight {
            return false;
        }
        self.capture_in_flight = true;
        true
    }

    pub fn finish_capture(&mut self) -> bool {
        replace_if_changed(&mut self.capture_in_flight, false)
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = ViewState::new();
        assert!(!state.has_image());
        assert_eq!(state.image_time(), None);
        assert_eq!(state.position(), None);
        assert!(!state.capture_in_flight());
    }

    #[test]
    fn test_setters_report_changes() {
        let mut state = ViewState::new();
        assert!(state.set_image_source("file:///tmp/a.jpg"));
        assert!(!state.set_image_source("file:///tmp/a.jpg"));
        assert!(state.set_image_source("file:///tmp/b.jpg"));
        assert_eq!(state.image_source(), Some("file:///tmp/b.jpg"));

        assert!(state.set_image_time(Some("Kamis, 15 Juni 2023, 09:05".to_string())));
        assert!(state.set_image_time(None));
        assert_eq!(state.image_time(), None);
    }

    #[test]
    fn test_zero_position_is_a_reading() {
        let mut state = ViewState::new();
        assert!(state.set_position(Coordinates::new(0.0, 0.0)));
        assert_eq!(state.position(), Some(Coordinates::new(0.0, 0.0)));
    }

    #[test]
    fn test_capture_guard() {
        let mut state = ViewState::new();
        assert!(state.begin_capture());
        assert!(!state.begin_capture());
        assert!(state.finish_capture());
        assert!(!state.finish_capture());
        assert!(state.begin_capture());
    }
}
