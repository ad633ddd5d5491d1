//! Background screenshot capture.
//!
//! The frame loop hands a pixel buffer to [`ScreenshotMailbox::try_submit`]
//! and never waits. A single [`CaptureWorker`] thread encodes and writes it.
//! The mailbox holds one request; a new one is refused until the previous
//! file is written.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageFormat, ImageResult, RgbImage};
use time::OffsetDateTime;

use crate::error::CaptureError;

/// Directory screenshots are written to, relative to the working directory.
pub const SCREENSHOT_DIR: &str = "screenshots";

/// Pixels read back from the renderer, tightly packed RGB8, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl CaptureRequest {
    pub fn new(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(CaptureError::BufferSize { expected, actual: pixels.len() });
        }
        Ok(Self { path: path.into(), width, height, pixels })
    }
}

/// Writes one captured frame somewhere.
pub trait ImageEncoder: Send + 'static {
    fn encode(&mut self, request: CaptureRequest) -> ImageResult<()>;
}

/// PNG file writer. Creates the parent directory on first use.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn encode(&mut self, request: CaptureRequest) -> ImageResult<()> {
        if let Some(dir) = request.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let image = RgbImage::from_raw(request.width, request.height, request.pixels).ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
        })?;
        image.save_with_format(&request.path, ImageFormat::Png)
    }
}

/// `screenshots/screenshot_YYYY-M-D_H-M-S.png` for the current local time
/// (UTC if the local offset cannot be determined).
pub fn screenshot_name() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    screenshot_name_at(now)
}

pub fn screenshot_name_at(t: OffsetDateTime) -> String {
    let file = format!(
        "screenshot_{}-{}-{}_{}-{}-{}.png",
        t.year(),
        u8::from(t.month()),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
    );
    Path::new(SCREENSHOT_DIR).join(file).to_string_lossy().into_owned()
}

#[derive(Default)]
struct Slot {
    request: Option<CaptureRequest>,
    /// Set from submit until the worker finishes writing.
    in_flight: bool,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-slot handoff between the frame loop and the capture worker.
#[derive(Clone, Default)]
pub struct ScreenshotMailbox {
    shared: Arc<Shared>,
}

impl ScreenshotMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request without blocking.
    pub fn try_submit(&self, request: CaptureRequest) -> Result<(), CaptureError> {
        let mut slot = self.shared.lock();
        if slot.closed {
            return Err(CaptureError::Closed);
        }
        if slot.in_flight {
            return Err(CaptureError::Busy);
        }
        slot.request = Some(request);
        slot.in_flight = true;
        drop(slot);
        self.shared.ready.notify_one();
        Ok(())
    }

    /// True while a request is queued or being written.
    pub fn is_pending(&self) -> bool {
        self.shared.lock().in_flight
    }

    /// Block until no request is in flight.
    pub fn wait_idle(&self) {
        let mut slot = self.shared.lock();
        while slot.in_flight {
            slot = self.shared.idle.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Refuse further requests and wake the worker.
    pub fn close(&self) {
        self.shared.lock().closed = true;
        self.shared.ready.notify_all();
    }

    /// Block until a request arrives. `None` once closed and drained.
    fn receive(&self) -> Option<CaptureRequest> {
        let mut slot = self.shared.lock();
        loop {
            if let Some(request) = slot.request.take() {
                return Some(request);
            }
            if slot.closed {
                return None;
            }
            slot = self.shared.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn finish(&self) {
        self.shared.lock().in_flight = false;
        self.shared.idle.notify_all();
    }
}

/// Owns the encoding thread.
pub struct CaptureWorker {
    mailbox: ScreenshotMailbox,
    handle: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    pub fn spawn<E: ImageEncoder>(mut encoder: E) -> io::Result<Self> {
        let mailbox = ScreenshotMailbox::new();
        let inbox = mailbox.clone();
        let handle = thread::Builder::new()
            .name("screenshot".into())
            .spawn(move || {
                while let Some(request) = inbox.receive() {
                    let path = request.path.clone();
                    match encoder.encode(request) {
                        Ok(()) => log::info!("Saved screenshot {}", path.display()),
                        Err(e) => log::error!("Failed to write {}: {}", path.display(), e),
                    }
                    inbox.finish();
                }
            })?;
        Ok(Self { mailbox, handle: Some(handle) })
    }

    pub fn mailbox(&self) -> &ScreenshotMailbox {
        &self.mailbox
    }

    pub fn submit(&self, request: CaptureRequest) -> Result<(), CaptureError> {
        self.mailbox.try_submit(request)
    }

    /// Close the mailbox and join the thread. A pending request is written first.
    pub fn shutdown(&mut self) {
        self.mailbox.close();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Screenshot worker panicked");
            }
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use time::macros::datetime;

    /// Encoder that blocks until the test lets it continue.
    struct GatedEncoder {
        gate: mpsc::Receiver<()>,
        written: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl ImageEncoder for GatedEncoder {
        fn encode(&mut self, request: CaptureRequest) -> ImageResult<()> {
            let _ = self.gate.recv();
            self.written.lock().unwrap().push(request.path);
            Ok(())
        }
    }

    fn request(name: &str) -> CaptureRequest {
        CaptureRequest::new(name, 2, 1, vec![0; 6]).unwrap()
    }

    #[test]
    fn name_has_unpadded_fields() {
        let name = screenshot_name_at(datetime!(2024-03-07 09:05:02 UTC));
        assert!(name.ends_with("screenshot_2024-3-7_9-5-2.png"), "{}", name);
        assert!(name.starts_with(SCREENSHOT_DIR));
    }

    #[test]
    fn buffer_size_is_checked() {
        let err = CaptureRequest::new("x.png", 2, 2, vec![0; 5]).unwrap_err();
        assert_eq!(err, CaptureError::BufferSize { expected: 12, actual: 5 });
    }

    #[test]
    fn at_most_one_request_in_flight() {
        let (open, gate) = mpsc::channel();
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut worker = CaptureWorker::spawn(GatedEncoder { gate, written: written.clone() }).unwrap();

        worker.submit(request("a.png")).unwrap();
        assert!(worker.mailbox().is_pending());
        assert_eq!(worker.submit(request("b.png")), Err(CaptureError::Busy));

        open.send(()).unwrap();
        worker.mailbox().wait_idle();
        assert!(!worker.mailbox().is_pending());

        worker.submit(request("c.png")).unwrap();
        open.send(()).unwrap();
        worker.shutdown();

        let written = written.lock().unwrap();
        assert_eq!(*written, vec![PathBuf::from("a.png"), PathBuf::from("c.png")]);
    }

    #[test]
    fn closed_mailbox_refuses() {
        let (_open, gate) = mpsc::channel();
        let mut worker =
            CaptureWorker::spawn(GatedEncoder { gate, written: Arc::default() }).unwrap();
        worker.shutdown();
        assert_eq!(worker.submit(request("late.png")), Err(CaptureError::Closed));
    }

    #[test]
    fn png_encoder_writes_readable_file() {
        let dir = std::env::temp_dir().join(format!("roche-capture-{}", std::process::id()));
        let path = dir.join("nested").join("shot.png");
        let mut worker = CaptureWorker::spawn(PngEncoder).unwrap();
        let pixels = vec![9, 8, 7, 1, 2, 3];
        worker.submit(CaptureRequest::new(&path, 2, 1, pixels).unwrap()).unwrap();
        worker.shutdown();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(0, 0).0, [9, 8, 7]);
        assert_eq!(decoded.get_pixel(1, 0).0, [1, 2, 3]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn png_encoder_rejects_short_buffer() {
        let request = CaptureRequest { path: PathBuf::from("unused.png"), width: 4, height: 4, pixels: vec![0; 3] };
        assert!(PngEncoder.encode(request).is_err());
    }
}
