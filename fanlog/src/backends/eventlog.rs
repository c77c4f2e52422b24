//! Backend for the Windows Event Log.
//!
//! The [`event_id`] directive is available on every platform so that code
//! logging with event IDs stays portable; the [`EventLog`] sink itself only
//! exists on Windows. Event Log has no fatal or debug severities, so FATAL
//! degrades to error and DEBUG to information.
//!
//! Registration of the event source in the Windows registry is deliberately
//! out of scope here: sources need registering once, typically during
//! software installation, not on every process start.

use crate::attrib::Attrib;

/// Store key for the Event Log event ID directive.
pub const EVENT_ID: &str = "EventID";

/// Attach a numeric Event Log event ID to this call.
///
/// Only the Event Log backend consumes it; without the directive messages
/// are reported under event ID 1.
pub fn event_id(id: u32) -> Attrib {
    Box::new(move |store| store.store(EVENT_ID, id))
}

#[cfg(windows)]
pub use self::sink::EventLog;

#[cfg(windows)]
mod sink {
    use super::EVENT_ID;
    use crate::attrib::{self, AttribStore};
    use crate::backend::{Backend, Message};
    use crate::error::BackendError;
    use crate::level::Level;
    use std::sync::Mutex;
    use windows_sys::Win32::Foundation::HANDLE;
    use windows_sys::Win32::System::EventLog::{
        DeregisterEventSource, RegisterEventSourceW, ReportEventW, EVENTLOG_ERROR_TYPE,
        EVENTLOG_INFORMATION_TYPE, EVENTLOG_WARNING_TYPE,
    };

    fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    /// Event Log backend bound to a registered source name.
    pub struct EventLog {
        handle: Mutex<Option<HANDLE>>,
    }

    // The event source handle is a plain kernel object reference; Event Log
    // write calls on it are safe from any thread.
    unsafe impl Send for EventLog {}
    unsafe impl Sync for EventLog {}

    impl EventLog {
        /// Open a handle to the given event source.
        ///
        /// # Errors
        ///
        /// Surfaces the OS error when the source cannot be opened.
        pub fn open(source: &str) -> Result<Self, BackendError> {
            let wide = to_wide(source);
            let handle = unsafe { RegisterEventSourceW(std::ptr::null(), wide.as_ptr()) };
            if handle == 0 {
                return Err(BackendError::Io(std::io::Error::last_os_error()));
            }
            Ok(Self {
                handle: Mutex::new(Some(handle)),
            })
        }

        fn report(&self, kind: u16, id: u32, text: &str) -> Result<(), BackendError> {
            let guard = self.handle.lock().unwrap();
            let handle = guard.as_ref().copied().ok_or(BackendError::Closed)?;
            let wide = to_wide(text);
            let strings = [wide.as_ptr()];
            let ok = unsafe {
                ReportEventW(
                    handle,
                    kind,
                    0,
                    id,
                    std::ptr::null_mut(),
                    1,
                    0,
                    strings.as_ptr(),
                    std::ptr::null(),
                )
            };
            if ok == 0 {
                return Err(BackendError::Io(std::io::Error::last_os_error()));
            }
            Ok(())
        }
    }

    impl Backend for EventLog {
        fn message<'a>(&'a self, level: Level, text: &str) -> Box<dyn Message + 'a> {
            Box::new(EventLogMessage {
                parent: self,
                level,
                text: text.to_string(),
                event_id: 1,
            })
        }

        fn close(&self) -> Result<(), BackendError> {
            if let Some(handle) = self.handle.lock().unwrap().take() {
                unsafe { DeregisterEventSource(handle) };
            }
            Ok(())
        }
    }

    struct EventLogMessage<'a> {
        parent: &'a EventLog,
        level: Level,
        text: String,
        event_id: u32,
    }

    impl Message for EventLogMessage<'_> {
        fn compose(&mut self, attribs: &AttribStore) -> Result<(), BackendError> {
            attribs.get::<usize>(attrib::DEPTH)?;
            if let Some(id) = attribs.get_opt::<u32>(EVENT_ID)? {
                self.event_id = *id;
            }
            Ok(())
        }

        fn write(&mut self) -> Result<(), BackendError> {
            let kind = match self.level {
                Level::WARNING => EVENTLOG_WARNING_TYPE,
                // Event Log has no fatal severity; degrade to error.
                Level::ERROR | Level::FATAL => EVENTLOG_ERROR_TYPE,
                _ => EVENTLOG_INFORMATION_TYPE,
            };
            self.parent.report(kind, self.event_id, &self.text)
        }
    }
}
