use crate::api::ApiClient;
use crate::cancel::use_cancel_token;
use crate::components::DashboardLayout;
use crate::session::Session;
use crate::upload::api::upload_video;
use crate::upload::models::{
    is_video_mime, Category, UploadAction, UploadForm, UPLOAD_FAILURE,
};
use web_sys::{File, FileList, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

pub mod api;
pub mod models;

fn first_video(files: Option<FileList>) -> Option<File> {
    let files = files?;
    (0..files.length())
        .filter_map(|i| files.get(i))
        .find(|file| is_video_mime(&file.type_()))
}

#[function_component(UploadVideo)]
pub fn upload_video_page() -> Html {
    let session = use_context::<Session>().unwrap_or_default();
    let client = use_memo((), |_| ApiClient::default());
    let cancel = use_cancel_token();
    let form = use_reducer(UploadForm::<File>::default);

    {
        let dispatcher = form.dispatcher();
        let authenticated = session.is_authenticated();
        use_effect_with((), move |_| {
            if !authenticated {
                dispatcher.dispatch(UploadAction::Unauthenticated);
            }
            || ()
        });
    }

    let on_drag_over = Callback::from(|e: DragEvent| e.prevent_default());

    let on_drop = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            let files = e.data_transfer().and_then(|dt| dt.files());
            match first_video(files) {
                Some(file) => dispatcher.dispatch(UploadAction::Stage(file)),
                None => log::debug!("Drop contained no video file"),
            }
        })
    };

    let on_pick = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            let input = e.target_unchecked_into::<HtmlInputElement>();
            if let Some(file) = first_video(input.files()) {
                dispatcher.dispatch(UploadAction::Stage(file));
            }
        })
    };

    let on_title = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            dispatcher.dispatch(UploadAction::Title(value));
        })
    };

    let on_description = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlTextAreaElement>().value();
            dispatcher.dispatch(UploadAction::Description(value));
        })
    };

    let on_category = {
        let dispatcher = form.dispatcher();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            dispatcher.dispatch(UploadAction::Category(value.parse::<Category>().ok()));
        })
    };

    let on_upload = {
        let form = form.clone();
        let client = client.clone();
        let cancel = cancel.clone();
        let session = session.clone();

        Callback::from(move |_: MouseEvent| {
            let dispatcher = form.dispatcher();
            let submission = match form.draft.submission() {
                Ok(submission) => submission,
                Err(e) => {
                    dispatcher.dispatch(UploadAction::Rejected(e));
                    return;
                }
            };

            dispatcher.dispatch(UploadAction::Started);

            let client = client.clone();
            let cancel = cancel.clone();
            let session = session.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match upload_video(&client, &session, &submission, &cancel).await {
                    Ok(()) => {
                        log::info!("Uploaded video '{}'", submission.title);
                        dispatcher.dispatch(UploadAction::Succeeded);
                    }
                    Err(e) if e.is_aborted() => {}
                    Err(e) => {
                        log::error!("Video upload failed: {e}");
                        let message = e.server_message().unwrap_or(UPLOAD_FAILURE).to_string();
                        dispatcher.dispatch(UploadAction::Failed(message));
                    }
                }
            });
        })
    };

    let selected_category = form.draft.category.map(Category::as_str).unwrap_or_default();

    html! {
        <DashboardLayout title="Upload Video">
            <div class="max-w-lg mx-auto p-8 bg-gradient-to-r from-indigo-200 to-blue-200 rounded-xl shadow-xl">
                <h1 class="text-center text-3xl font-bold text-gray-800 mb-6">{"Upload Video"}</h1>

                <label
                    class="block border-2 border-dashed border-indigo-500 p-8 rounded-lg text-center cursor-pointer bg-gray-100 hover:bg-gray-200"
                    ondragover={on_drag_over}
                    ondrop={on_drop}
                >
                    <input type="file" accept="video/*" class="hidden" onchange={on_pick} />
                    {
                        match &form.draft.file {
                            Some(file) => html! { <p class="text-gray-800">{file.name()}</p> },
                            None => html! {
                                <p class="text-gray-600">
                                    {"Drag & Drop your video here, or click to select a file"}
                                </p>
                            },
                        }
                    }
                </label>

                <input
                    type="text"
                    class="w-full mt-4 p-4 border border-gray-300 rounded-lg bg-white text-gray-800"
                    placeholder="Enter video title"
                    value={form.draft.title.clone()}
                    oninput={on_title}
                />

                <textarea
                    class="w-full mt-4 p-4 border border-gray-300 rounded-lg bg-white text-gray-800"
                    placeholder="Enter video description"
                    value={form.draft.description.clone()}
                    oninput={on_description}
                />

                <select
                    class="w-full mt-4 p-4 border border-gray-300 rounded-lg bg-white text-gray-800"
                    onchange={on_category}
                >
                    <option value="" selected={selected_category.is_empty()}>{"Select Expression"}</option>
                    {
                        Category::ALL.iter().map(|category| html! {
                            <option
                                value={category.as_str()}
                                selected={selected_category == category.as_str()}
                            >
                                {category.label()}
                            </option>
                        }).collect::<Html>()
                    }
                </select>

                <button
                    onclick={on_upload}
                    disabled={form.uploading}
                    class="w-full mt-6 p-4 rounded-lg font-bold text-white bg-gradient-to-r from-indigo-500 to-blue-500 hover:from-indigo-400 hover:to-blue-400 disabled:bg-gray-400 disabled:cursor-not-allowed"
                >
                    { if form.uploading { "Uploading..." } else { "Upload" } }
                </button>

                {
                    if let Some(message) = &form.message {
                        let color = if form.message_is_error() { "text-red-500" } else { "text-green-500" };
                        html! {
                            <p class={classes!("mt-6", "text-center", "font-semibold", color)}>
                                { &message.text }
                            </p>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </DashboardLayout>
    }
}
