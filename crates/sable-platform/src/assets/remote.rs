use std::sync::Arc;

use super::image::decode_image;
use super::{AssetError, AssetResult, Image, Scale};

/// Fetches the raw bytes behind a URL.
///
/// Called from a background thread; implementations block until the body is
/// complete or the request fails.
pub trait RemoteFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> AssetResult<Vec<u8>>;
}

/// Plain HTTP GET through the `reqwest` blocking client.
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl RemoteFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> AssetResult<Vec<u8>> {
        let remote = |e: reqwest::Error| AssetError::Remote { url: url.to_string(), message: e.to_string() };
        let body = reqwest::blocking::get(url)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(remote)?;
        Ok(body.to_vec())
    }
}

/// Starts fetching `url` on a new thread and returns its placeholder.
///
/// The placeholder is resolved exactly once, from that thread. There is no
/// cancellation: dropping every handle just discards the result.
pub(crate) fn spawn_fetch(fetcher: Arc<dyn RemoteFetcher>, url: &str, width: f32, height: f32) -> Image {
    let image = Image::placeholder(width, height);
    let url = url.to_string();

    let spawned = std::thread::Builder::new()
        .name("sable-remote-image".into())
        .spawn({
            let target = image.clone();
            let url = url.clone();
            move || {
                let result = fetcher.fetch(&url).and_then(|bytes| decode_image(&url, &bytes, Scale::ONE));
                match &result {
                    Ok(data) => log::debug!(
                        "remote image {url} loaded ({}x{})",
                        data.pixmap().width(),
                        data.pixmap().height()
                    ),
                    Err(err) => log::warn!("remote image {url} failed: {err}"),
                }
                target.resolve(result);
            }
        });

    if let Err(err) = spawned {
        log::warn!("could not start fetch thread for {url}: {err}");
        image.resolve(Err(AssetError::Remote { url, message: err.to_string() }));
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fixtures::png_bytes;
    use std::time::Duration;

    struct StubFetcher(Option<Vec<u8>>);

    impl RemoteFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> AssetResult<Vec<u8>> {
            std::thread::sleep(Duration::from_millis(20));
            self.0
                .clone()
                .ok_or_else(|| AssetError::Remote { url: url.into(), message: "503".into() })
        }
    }

    #[test]
    fn placeholder_resolves_with_fetched_pixels() {
        let fetcher = Arc::new(StubFetcher(Some(png_bytes(12, 6, [0, 255, 0, 255]))));
        let image = spawn_fetch(fetcher, "http://example.test/a.png", 100.0, 50.0);
        assert_eq!(image.width(), 100.0);

        let data = image.wait_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!((data.pixmap().width(), data.pixmap().height()), (12, 6));
        assert_eq!(data.scale(), Scale::ONE);
        assert_eq!(image.width(), 12.0);
    }

    #[test]
    fn fetch_failure_marks_placeholder_failed() {
        let image = spawn_fetch(Arc::new(StubFetcher(None)), "http://example.test/b.png", 10.0, 10.0);
        let err = image.wait_timeout(Duration::from_secs(5)).unwrap().unwrap_err();
        assert!(matches!(*err, AssetError::Remote { .. }));
        assert!(image.error().is_some());
    }

    #[test]
    fn undecodable_body_marks_placeholder_failed() {
        let image = spawn_fetch(
            Arc::new(StubFetcher(Some(b"<html>".to_vec()))),
            "http://example.test/c.png",
            10.0,
            10.0,
        );
        let err = image.wait_timeout(Duration::from_secs(5)).unwrap().unwrap_err();
        assert!(err.is_decode());
    }
}
