use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender, unbounded};

pub struct DecodedImage {
    pub path: PathBuf,
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub enum LoaderMsg {
    Loaded(DecodedImage),
    Failed { path: PathBuf, reason: String },
}

/// Decodes tile images off the event-loop thread. Results are picked up with
/// [`ImageLoader::drain`]; dropping the loader stops the worker after its current file.
pub struct ImageLoader {
    rx: Receiver<LoaderMsg>,
}

impl ImageLoader {
    pub fn spawn(paths: &[PathBuf]) -> Self {
        let (tx, rx) = unbounded();
        let queue = distinct_paths(paths);
        let spawned = thread::Builder::new()
            .name("image-loader".to_string())
            .spawn(move || run_loader(queue, tx));
        if let Err(err) = spawned {
            log_error!("Failed to start image loader thread: {}", err);
        }
        Self { rx }
    }

    pub fn drain(&self) -> Vec<LoaderMsg> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

fn run_loader(queue: Vec<PathBuf>, tx: Sender<LoaderMsg>) {
    for path in queue {
        let msg = match decode_file(&path) {
            Ok(decoded) => LoaderMsg::Loaded(decoded),
            Err(err) => LoaderMsg::Failed {
                path,
                reason: format!("{err:#}"),
            },
        };
        if tx.send(msg).is_err() {
            // gallery was torn down
            break;
        }
    }
}

/// First occurrence of each path, in order.
pub fn distinct_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for p in paths {
        if !out.contains(p) {
            out.push(p.clone());
        }
    }
    out
}

pub fn decode_file(path: &Path) -> anyhow::Result<DecodedImage> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_bytes(path, &bytes)
}

pub fn decode_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<DecodedImage> {
    let img = image::load_from_memory(bytes)
        .with_context(|| format!("decoding {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        anyhow::bail!("{} has no pixels", path.display());
    }
    Ok(DecodedImage {
        path: path.to_path_buf(),
        rgba: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("png encode");
        out.into_inner()
    }

    #[test]
    fn decodes_png_bytes() {
        let decoded = decode_bytes(Path::new("x.png"), &png_bytes(3, 2)).expect("decodes");
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
        assert_eq!(&decoded.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_bytes(Path::new("bad.jpg"), b"not an image").is_err());
    }

    #[test]
    fn doubled_list_is_decoded_once_per_path() {
        let a = PathBuf::from("a.jpg");
        let b = PathBuf::from("b.jpg");
        let doubled = vec![a.clone(), b.clone(), a.clone(), b.clone()];
        assert_eq!(distinct_paths(&doubled), vec![a, b]);
    }

    #[test]
    fn worker_reports_every_distinct_path() {
        let dir = std::env::temp_dir().join(format!("gallery-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let good = dir.join("good.png");
        fs::write(&good, png_bytes(4, 4)).expect("write png");
        let missing = dir.join("missing.png");

        let loader = ImageLoader::spawn(&[good.clone(), missing.clone(), good.clone()]);
        let mut loaded = Vec::new();
        let mut failed = Vec::new();
        for _ in 0..2 {
            match loader.rx.recv_timeout(Duration::from_secs(5)) {
                Ok(LoaderMsg::Loaded(img)) => loaded.push(img.path),
                Ok(LoaderMsg::Failed { path, .. }) => failed.push(path),
                Err(err) => panic!("loader stalled: {err}"),
            }
        }
        assert_eq!(loaded, vec![good]);
        assert_eq!(failed, vec![missing]);
        assert!(loader.rx.recv_timeout(Duration::from_millis(200)).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
