// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal pairing presenter.
//!
//! Draws the QR payload with unicode half blocks, prints the phone-entry
//! code, and saves the PNG the gateway rendered so it can be opened in an
//! image viewer when the terminal QR does not scan. With an opener attached,
//! the saved image (or the manager URL when there is no code) is handed to
//! the desktop.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use colored::Colorize;
use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;
use tracing::{info, warn};
use zapsend_core::{PairingArtifact, PairingPresenter, ZapsendError};

/// Launches a file or URL outside the terminal.
pub type Opener = Box<dyn Fn(&OsStr) -> std::io::Result<()> + Send + Sync>;

/// Opens `target` with the platform's default handler without waiting for it.
pub fn desktop_opener() -> Opener {
    Box::new(|target: &OsStr| open::that_detached(target))
}

/// Renders pairing artifacts to an output stream (stdout by default).
pub struct TerminalPresenter {
    image_path: PathBuf,
    out: Mutex<Box<dyn Write + Send>>,
    opener: Option<Opener>,
}

impl TerminalPresenter {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self::with_writer(image_path, Box::new(std::io::stdout()))
    }

    pub fn with_writer(image_path: impl Into<PathBuf>, out: Box<dyn Write + Send>) -> Self {
        Self {
            image_path: image_path.into(),
            out: Mutex::new(out),
            opener: None,
        }
    }

    pub fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Hands `target` to the opener, if any. Failures only warn.
    fn launch(&self, target: &OsStr) {
        let Some(opener) = &self.opener else {
            return;
        };
        match opener(target) {
            Ok(()) => info!(opened = %target.to_string_lossy(), "opened pairing target"),
            Err(e) => warn!(
                path = %target.to_string_lossy(),
                error = %e,
                "could not open pairing target"
            ),
        }
    }

    fn write_block(&self, text: &str) -> Result<(), ZapsendError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ZapsendError::Presentation("output lock poisoned".into()))?;
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| ZapsendError::Presentation(format!("failed to write output: {e}")))
    }
}

/// Renders `payload` as a scannable unicode QR code.
pub fn render_qr(payload: &str) -> Result<String, ZapsendError> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| ZapsendError::Presentation(format!("cannot encode QR payload: {e}")))?;
    Ok(code
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

fn save_image(path: &Path, bytes: &[u8]) -> Result<(), ZapsendError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ZapsendError::Presentation(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| ZapsendError::Presentation(format!("cannot write {}: {e}", path.display())))
}

impl PairingPresenter for TerminalPresenter {
    fn present(&self, session: &str, artifact: &PairingArtifact) -> Result<(), ZapsendError> {
        let mut text = format!(
            "\n{} {}\n",
            "Pair session".bold(),
            session.bold().green()
        );
        text.push_str("Open WhatsApp > Linked devices > Link a device, then scan:\n\n");

        let mut shown = false;
        let mut saved = false;
        if let Some(payload) = artifact.qr_payload.as_deref().filter(|p| !p.is_empty()) {
            match render_qr(payload) {
                Ok(qr) => {
                    text.push_str(&qr);
                    text.push('\n');
                    shown = true;
                }
                Err(e) => warn!(error = %e, "could not render QR in terminal"),
            }
        }

        if let Some(code) = artifact.pairing_code.as_deref().filter(|c| !c.is_empty()) {
            text.push_str(&format!(
                "\nOr link with phone number using code: {}\n",
                code.bold().yellow()
            ));
            shown = true;
        }

        if let Some(image) = artifact.image.as_deref().filter(|i| !i.is_empty()) {
            match save_image(&self.image_path, image) {
                Ok(()) => {
                    info!(path = %self.image_path.display(), "saved QR image");
                    text.push_str(&format!(
                        "\nQR image saved to {}\n",
                        self.image_path.display()
                    ));
                    shown = true;
                    saved = true;
                }
                Err(e) => warn!(error = %e, "could not save QR image"),
            }
        }

        if !shown {
            return Err(ZapsendError::Presentation(
                "pairing artifact could not be displayed".into(),
            ));
        }
        self.write_block(&text)?;
        if saved {
            self.launch(self.image_path.as_os_str());
        }
        Ok(())
    }

    fn unavailable(&self, session: &str, manager_hint: Option<&str>) {
        let mut text = format!(
            "\n{} no pairing code available for session {}\n",
            "warning:".yellow().bold(),
            session.bold()
        );
        if let Some(hint) = manager_hint {
            text.push_str(&format!("Pair it manually in the gateway manager: {hint}\n"));
        }
        if let Err(e) = self.write_block(&text) {
            warn!(error = %e, "failed to report unavailable pairing artifact");
        }
        if let Some(hint) = manager_hint {
            self.launch(OsStr::new(hint));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn qr_renders_as_block_characters() {
        let qr = render_qr("2@abc,def,ghi").unwrap();
        assert!(qr.lines().count() > 10);
        assert!(qr.contains('█') || qr.contains('▀') || qr.contains('▄'));
    }

    #[test]
    fn present_prints_code_and_saves_image() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("nested").join("qrcode.png");
        let buf = SharedBuf::default();
        let presenter = TerminalPresenter::with_writer(&image_path, Box::new(buf.clone()));

        let artifact = PairingArtifact {
            qr_payload: Some("2@abc".into()),
            pairing_code: Some("WZYEH1YY".into()),
            image: Some(b"png".to_vec()),
        };
        presenter.present("s1", &artifact).unwrap();

        let text = buf.text();
        assert!(text.contains("WZYEH1YY"));
        assert!(text.contains("qrcode.png"));
        assert_eq!(std::fs::read(&image_path).unwrap(), b"png");
    }

    #[test]
    fn empty_artifact_is_presentation_error() {
        let dir = tempfile::tempdir().unwrap();
        let presenter = TerminalPresenter::with_writer(
            dir.path().join("qr.png"),
            Box::new(SharedBuf::default()),
        );
        let err = presenter
            .present("s1", &PairingArtifact::default())
            .unwrap_err();
        assert!(matches!(err, ZapsendError::Presentation(_)));
    }

    fn recording_opener() -> (Opener, Arc<Mutex<Vec<String>>>) {
        let opened = Arc::new(Mutex::new(Vec::new()));
        let sink = opened.clone();
        let opener: Opener = Box::new(move |target: &OsStr| {
            sink.lock()
                .unwrap()
                .push(target.to_string_lossy().into_owned());
            Ok(())
        });
        (opener, opened)
    }

    #[test]
    fn saved_image_is_opened_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("qrcode.png");
        let (opener, opened) = recording_opener();
        let presenter =
            TerminalPresenter::with_writer(&image_path, Box::new(SharedBuf::default()))
                .with_opener(opener);

        let artifact = PairingArtifact {
            image: Some(b"png".to_vec()),
            ..Default::default()
        };
        presenter.present("s1", &artifact).unwrap();

        assert_eq!(
            *opened.lock().unwrap(),
            vec![image_path.to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn code_without_image_opens_nothing() {
        let (opener, opened) = recording_opener();
        let presenter = TerminalPresenter::with_writer("qr.png", Box::new(SharedBuf::default()))
            .with_opener(opener);
        let artifact = PairingArtifact {
            pairing_code: Some("WZYEH1YY".into()),
            ..Default::default()
        };
        presenter.present("s1", &artifact).unwrap();
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn unavailable_opens_manager_and_tolerates_failure() {
        let (opener, opened) = recording_opener();
        let presenter = TerminalPresenter::with_writer("qr.png", Box::new(SharedBuf::default()))
            .with_opener(opener);
        presenter.unavailable("s1", Some("http://localhost:8080/manager"));
        assert_eq!(
            *opened.lock().unwrap(),
            vec!["http://localhost:8080/manager".to_string()]
        );

        let failing = TerminalPresenter::with_writer("qr.png", Box::new(SharedBuf::default()))
            .with_opener(Box::new(|_: &OsStr| Err(std::io::Error::other("no display"))));
        failing.unavailable("s1", Some("http://localhost:8080/manager"));
    }

    #[test]
    fn unavailable_prints_manager_hint() {
        let buf = SharedBuf::default();
        let presenter = TerminalPresenter::with_writer("qr.png", Box::new(buf.clone()));
        presenter.unavailable("s1", Some("http://localhost:8080/manager"));
        assert!(buf.text().contains("http://localhost:8080/manager"));
    }
}
