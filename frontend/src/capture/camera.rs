use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};
use yew::NodeRef;

const HAVE_ENOUGH_DATA: u16 = 4;
const JPEG_QUALITY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("camera access is not available in this browser")]
    Unavailable,
    #[error("camera access failed: {0}")]
    Denied(String),
}

pub async fn open_camera() -> Result<MediaStream, CameraError> {
    let window = web_sys::window().ok_or(CameraError::Unavailable)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CameraError::Unavailable)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| CameraError::Denied(format!("{e:?}")))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|e| CameraError::Denied(format!("{e:?}")))?;

    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| CameraError::Denied("getUserMedia did not return a stream".to_string()))
}

pub fn attach_stream(video: &NodeRef, stream: &MediaStream) {
    let Some(video) = video.cast::<HtmlVideoElement>() else {
        log::warn!("No video element to attach the camera stream to");
        return;
    };
    video.set_src_object(Some(stream));
    if let Err(e) = video.play() {
        log::warn!("Video playback did not start: {e:?}");
    }
}

/// Stops every track and detaches the stream from the video element.
pub fn release_stream(video: &NodeRef, stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
    if let Some(video) = video.cast::<HtmlVideoElement>() {
        video.set_src_object(None);
    }
}

/// Something a sampling tick can read a frame from.
pub trait FrameSource {
    /// The current frame as an encoded image, or `None` when not ready.
    fn capture(&self) -> Option<String>;
}

/// Something a sampled frame is sent to.
pub trait FrameSink {
    fn send_frame(&self, frame: String) -> bool;
}

/// Reads frames off a `<video>` by drawing them onto a scratch `<canvas>`.
#[derive(Clone, PartialEq)]
pub struct VideoFrameGrabber {
    pub video: NodeRef,
    pub canvas: NodeRef,
}

impl FrameSource for VideoFrameGrabber {
    fn capture(&self) -> Option<String> {
        let video = self.video.cast::<HtmlVideoElement>()?;
        let canvas = self.canvas.cast::<HtmlCanvasElement>()?;
        if video.ready_state() != HAVE_ENOUGH_DATA {
            return None;
        }

        let (width, height) = (video.video_width(), video.video_height());
        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &video,
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            )
            .ok()?;

        canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(JPEG_QUALITY))
            .map_err(|e| log::warn!("Frame encoding failed: {e:?}"))
            .ok()
    }
}
