use crate::api::{ApiClient, ApiError};
use crate::cancel::CancelToken;
use crate::session::Session;
use crate::upload::models::Submission;
use web_sys::{File, FormData};

fn build_form(submission: &Submission<File>) -> Result<FormData, ApiError> {
    let form_error = |e: wasm_bindgen::JsValue| ApiError::Request(format!("{e:?}"));

    let form = FormData::new().map_err(form_error)?;
    form.append_with_blob("file", &submission.file)
        .map_err(form_error)?;
    form.append_with_str("title", &submission.title)
        .map_err(form_error)?;
    form.append_with_str("description", &submission.description)
        .map_err(form_error)?;
    form.append_with_str("category", submission.category.as_str())
        .map_err(form_error)?;
    Ok(form)
}

pub async fn upload_video(
    client: &ApiClient,
    session: &Session,
    submission: &Submission<File>,
    cancel: &CancelToken,
) -> Result<(), ApiError> {
    let form = build_form(submission)?;
    client
        .post_form("/videos/upload", form, session, cancel)
        .await
}
