use crate::api::{decode, dispatch, ApiError};
use crate::cancel::CancelToken;
use crate::capture::protocol::{GenerateRequest, GenerateResponse};
use gloo_net::http::Request;

/// Asks the generation service to rewrite a sentence for the detected emotion.
/// The generate endpoint takes no credentials.
pub async fn request_rewrite(
    url: &str,
    request: &GenerateRequest,
    cancel: &CancelToken,
) -> Result<GenerateResponse, ApiError> {
    let signal = cancel.signal();
    let prepared = Request::post(url)
        .abort_signal(signal.as_ref())
        .json(request);
    decode(dispatch(prepared, cancel).await?, cancel).await
}
